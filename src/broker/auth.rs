//! Bearer-token supply for the broker API
//!
//! The token cache is an explicit state object owned by [`TokenCache`]:
//! empty at creation, filled by a password grant, renewed with the refresh
//! token once expired, and reset when a refresh fails. HTTP is left to the
//! [`TokenEndpoint`] implementation.

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::BrokerError;

/// Token endpoint of the broker API
pub const TOKEN_URL: &str = "https://api.invertironline.com/token";

/// Account credentials for the password grant
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read IOL_USERNAME and IOL_PASSWORD
    pub fn from_env() -> Result<Self, BrokerError> {
        let username =
            env::var("IOL_USERNAME").map_err(|_| BrokerError::MissingCredential("IOL_USERNAME"))?;
        let password =
            env::var("IOL_PASSWORD").map_err(|_| BrokerError::MissingCredential("IOL_PASSWORD"))?;
        Ok(Self { username, password })
    }

    /// Form body (x-www-form-urlencoded fields) for the password grant
    pub fn password_grant_form(&self) -> [(&'static str, &str); 3] {
        [
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
            ("grant_type", "password"),
        ]
    }
}

/// Form body for the refresh grant
pub fn refresh_grant_form(refresh_token: &str) -> [(&'static str, &str); 2] {
    [("refresh_token", refresh_token), ("grant_type", "refresh_token")]
}

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Cached tokens and their expiry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenState {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenState {
    /// The access token, if one is cached and `now` is before its expiry
    pub fn valid_token(&self, now: DateTime<Utc>) -> Option<&str> {
        match (&self.access_token, self.expires_at) {
            (Some(token), Some(expires_at)) if now < expires_at => Some(token.as_str()),
            _ => None,
        }
    }

    /// Cache a grant received at `now`; the state is untouched on error
    pub fn store(&mut self, grant: &TokenGrant, now: DateTime<Utc>) -> Result<(), BrokerError> {
        let expires_at = Duration::try_seconds(grant.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                BrokerError::Authentication(format!("invalid expires_in {}", grant.expires_in))
            })?;
        self.access_token = Some(grant.access_token.clone());
        self.refresh_token = Some(grant.refresh_token.clone());
        self.expires_at = Some(expires_at);
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Transport for the two OAuth grants the broker supports
pub trait TokenEndpoint {
    fn password_grant(&self, credentials: &Credentials) -> Result<TokenGrant, BrokerError>;

    fn refresh_grant(&self, refresh_token: &str) -> Result<TokenGrant, BrokerError>;
}

/// Supplier of an opaque bearer token
pub trait AuthProvider {
    fn get_token(&mut self) -> Result<String, BrokerError>;
}

/// Expiry-aware token cache with one refresh attempt before re-authenticating
#[derive(Debug)]
pub struct TokenCache<E> {
    endpoint: E,
    credentials: Credentials,
    state: TokenState,
}

impl<E: TokenEndpoint> TokenCache<E> {
    pub fn new(endpoint: E, credentials: Credentials) -> Self {
        Self {
            endpoint,
            credentials,
            state: TokenState::default(),
        }
    }

    pub fn state(&self) -> &TokenState {
        &self.state
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Token valid at `now`, refreshing or re-authenticating as needed
    pub fn get_token_at(&mut self, now: DateTime<Utc>) -> Result<String, BrokerError> {
        if let Some(token) = self.state.valid_token(now) {
            info!("Using cached token");
            return Ok(token.to_string());
        }

        if let Some(refresh_token) = self.state.refresh_token.clone() {
            info!("Token expired, attempting refresh...");
            let refreshed = self
                .endpoint
                .refresh_grant(&refresh_token)
                .and_then(|grant| self.state.store(&grant, now).map(|_| grant));
            match refreshed {
                Ok(grant) => {
                    info!("Token refreshed successfully");
                    return Ok(grant.access_token);
                }
                Err(err) => {
                    warn!("Token refresh failed ({}), requesting new token...", err);
                    self.state.reset();
                }
            }
        }

        info!("Requesting new authentication token...");
        let grant = self.endpoint.password_grant(&self.credentials)?;
        self.state.store(&grant, now)?;
        info!("Authentication successful");
        Ok(grant.access_token)
    }
}

impl<E: TokenEndpoint> AuthProvider for TokenCache<E> {
    fn get_token(&mut self) -> Result<String, BrokerError> {
        self.get_token_at(Utc::now())
    }
}
