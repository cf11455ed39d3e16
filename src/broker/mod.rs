//! Broker API collaborators: bearer-token supply and quote retrieval
//!
//! Nothing in [`crate::rates`] or [`crate::irr`] depends on this module. Both
//! collaborators are traits so the HTTP transport stays in the application
//! that composes them.

mod auth;
mod quote;

pub use auth::{
    refresh_grant_form, AuthProvider, Credentials, TokenCache, TokenEndpoint, TokenGrant,
    TokenState, TOKEN_URL,
};
pub use quote::{
    bearer_header, fetch_validated_quote, quote_url, PriceSource, QuoteData, QuotePunta,
    QuoteSource,
};
