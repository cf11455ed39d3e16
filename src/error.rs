//! Error types for rate conversion and IRR solving

use thiserror::Error;

/// Result alias used by the rate and IRR calculations
pub type RateResult<T> = Result<T, RateError>;

/// Failure of a rate calculation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RateError {
    /// Malformed or out-of-domain input
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The iterative solver could not produce a rate
    #[error("IRR did not converge: {cause}")]
    NonConvergent { cause: NonConvergence },
}

impl RateError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        RateError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// True for input validation failures (never worth retrying as-is)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RateError::InvalidArgument { .. })
    }

    /// The non-convergence cause, if the solver gave up
    pub fn non_convergence(&self) -> Option<&NonConvergence> {
        match self {
            RateError::NonConvergent { cause } => Some(cause),
            RateError::InvalidArgument { .. } => None,
        }
    }
}

impl From<NonConvergence> for RateError {
    fn from(cause: NonConvergence) -> Self {
        RateError::NonConvergent { cause }
    }
}

/// Why Newton-Raphson stopped without converging
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NonConvergence {
    /// NPV derivative was exactly zero, so the update step is undefined
    #[error("zero derivative at iteration {iteration} (rate = {rate})")]
    ZeroDerivative { iteration: u32, rate: f64 },

    /// Iteration cap reached before the step fell under the tolerance
    #[error("exceeded max iterations ({max_iterations}); try a different initial guess or check the cash flows")]
    MaxIterationsExceeded { max_iterations: u32 },
}

/// Failure in the broker collaborators (authentication and quotes)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    #[error("Failed to authenticate: {0}")]
    Authentication(String),

    #[error("Failed to refresh token: {0}")]
    Refresh(String),

    #[error("HTTP {status}: {reason}")]
    Http { status: u16, reason: String },

    #[error("No price data available for {ticker}")]
    NoPriceData { ticker: String },

    #[error("Missing credential: environment variable {0} is not set")]
    MissingCredential(&'static str),
}
