//! Rate Metrics - Nominal annual rates and internal rate of return
//!
//! This library provides:
//! - Effective to nominal annual rate conversion
//! - Simple annualized return of an observed investment
//! - Newton-Raphson IRR for arbitrary cash-flow series, single or batched
//! - Broker token and quote collaborators, kept apart from the numeric core

pub mod error;
pub mod rates;
pub mod irr;
pub mod loader;
pub mod broker;

// Re-export commonly used types
pub use error::{RateError, RateResult, NonConvergence, BrokerError};
pub use rates::{nominal_annual_rate, nominal_annual_rate_since, InvestmentObservation, StartDate};
pub use irr::{calculate_irr, CashFlowSeries, ConvergenceConfig, IrrSolution};
