//! Effective to nominal annual rate conversion

use crate::error::{RateError, RateResult};

/// Convert an Effective Annual Rate to a Nominal Annual Rate
///
/// # Formula
/// ```text
/// NAR = m * ((1 + EAR)^(1/m) - 1)
/// ```
///
/// # Arguments
/// * `ear` - Effective Annual Rate as a decimal (0.80 for 80%); must be > -1
/// * `periods_per_year` - compounding periods per year `m` (12 for monthly); must be > 0
///
/// With `periods_per_year == 1` there is no compounding to invert and `ear`
/// is returned unchanged.
pub fn nominal_annual_rate(ear: f64, periods_per_year: f64) -> RateResult<f64> {
    if !(periods_per_year > 0.0) || periods_per_year.is_infinite() {
        return Err(RateError::invalid(format!(
            "periods per year must be > 0, got {}",
            periods_per_year
        )));
    }
    if !ear.is_finite() {
        return Err(RateError::invalid(format!("EAR must be finite, got {}", ear)));
    }
    if ear <= -1.0 {
        // (1 + EAR) would be non-positive and its fractional power not real
        return Err(RateError::invalid(format!("EAR must be > -1, got {}", ear)));
    }

    if periods_per_year == 1.0 {
        return Ok(ear);
    }

    Ok(periods_per_year * ((1.0 + ear).powf(1.0 / periods_per_year) - 1.0))
}
