//! Closed-form nominal annual rate conversions
//!
//! - [`nominal_annual_rate`]: Effective Annual Rate to Nominal Annual Rate
//! - [`nominal_annual_rate_since`]: simple annualized return of an observed investment

mod nominal;
mod observed;

pub use nominal::nominal_annual_rate;
pub use observed::{
    nominal_annual_rate_between, nominal_annual_rate_since, round_to_decimals,
    InvestmentObservation, StartDate,
};
