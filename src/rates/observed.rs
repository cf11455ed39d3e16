//! Nominal annual rate from an observed investment
//!
//! Simple annualization: total return divided by elapsed years, where
//! years = elapsed days / 365 (no leap-year handling).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RateError, RateResult};

const MICROS_PER_DAY: f64 = 86_400_000_000.0;
const MILLIS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_YEAR: f64 = 365.0;

/// Start of an investment, either a timestamp or text to be parsed
///
/// Text may be an RFC 3339 timestamp (`2024-03-01T10:00:00Z`), a naive
/// timestamp (`2024-03-01T10:00:00`, read as UTC) or a date (`2024-03-01`,
/// midnight UTC).
#[derive(Debug, Clone, PartialEq)]
pub enum StartDate {
    Instant(DateTime<Utc>),
    Text(String),
}

impl StartDate {
    pub fn resolve(&self) -> RateResult<DateTime<Utc>> {
        match self {
            StartDate::Instant(instant) => Ok(*instant),
            StartDate::Text(text) => parse_start_date(text),
        }
    }
}

impl From<DateTime<Utc>> for StartDate {
    fn from(instant: DateTime<Utc>) -> Self {
        StartDate::Instant(instant)
    }
}

impl From<NaiveDate> for StartDate {
    fn from(date: NaiveDate) -> Self {
        StartDate::Instant(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }
}

impl From<&str> for StartDate {
    fn from(text: &str) -> Self {
        StartDate::Text(text.to_string())
    }
}

impl From<String> for StartDate {
    fn from(text: String) -> Self {
        StartDate::Text(text)
    }
}

fn parse_start_date(text: &str) -> RateResult<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    Err(RateError::invalid(format!("unrecognised start date '{}'", text)))
}

/// An investment observed from its start until some evaluation instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentObservation {
    pub start_date: DateTime<Utc>,
    pub initial_value: f64,
    pub current_value: f64,
}

impl InvestmentObservation {
    pub fn new(
        start: impl Into<StartDate>,
        initial_value: f64,
        current_value: f64,
    ) -> RateResult<Self> {
        if !(initial_value.is_finite() && initial_value > 0.0) {
            return Err(RateError::invalid(format!(
                "initial value must be > 0, got {}",
                initial_value
            )));
        }
        if !(current_value.is_finite() && current_value > 0.0) {
            return Err(RateError::invalid(format!(
                "current value must be > 0, got {}",
                current_value
            )));
        }
        let start: StartDate = start.into();
        Ok(Self {
            start_date: start.resolve()?,
            initial_value,
            current_value,
        })
    }

    /// Elapsed years up to `as_of`, counting 365 days per year
    pub fn years_elapsed(&self, as_of: DateTime<Utc>) -> f64 {
        let elapsed = as_of - self.start_date;
        // Microseconds overflow past ~292k years; milliseconds cover any DateTime range
        let days = match elapsed.num_microseconds() {
            Some(micros) => micros as f64 / MICROS_PER_DAY,
            None => elapsed.num_milliseconds() as f64 / MILLIS_PER_DAY,
        };
        days / DAYS_PER_YEAR
    }

    /// current / initial - 1
    pub fn total_return(&self) -> f64 {
        self.current_value / self.initial_value - 1.0
    }

    /// Simple annualized return at `as_of`, rounded to 4 decimals
    pub fn nominal_annual_rate_at(&self, as_of: DateTime<Utc>) -> RateResult<f64> {
        let years = self.years_elapsed(as_of);
        if !(years > 0.0) {
            return Err(RateError::invalid(format!(
                "start date {} must be before the evaluation date {}",
                self.start_date, as_of
            )));
        }
        let total_return = self.total_return();
        if !total_return.is_finite() {
            return Err(RateError::invalid(format!(
                "total return of {} -> {} is not finite",
                self.initial_value, self.current_value
            )));
        }
        let rate = round_to_decimals(total_return / years, 4);
        if !rate.is_finite() {
            return Err(RateError::invalid(format!(
                "annualized return is not finite ({} over {} years)",
                total_return, years
            )));
        }
        Ok(rate)
    }
}

/// Nominal annual rate of an investment from `start` until now
pub fn nominal_annual_rate_since(
    start: impl Into<StartDate>,
    initial_value: f64,
    current_value: f64,
) -> RateResult<f64> {
    nominal_annual_rate_between(start, Utc::now(), initial_value, current_value)
}

/// Nominal annual rate of an investment from `start` until `as_of`
pub fn nominal_annual_rate_between(
    start: impl Into<StartDate>,
    as_of: DateTime<Utc>,
    initial_value: f64,
    current_value: f64,
) -> RateResult<f64> {
    InvestmentObservation::new(start, initial_value, current_value)?.nominal_annual_rate_at(as_of)
}

/// Round half away from zero at the given decimal place
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
