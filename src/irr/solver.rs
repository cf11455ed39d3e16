//! Newton-Raphson IRR solver
//!
//! Finds the rate r with NPV(r) = sum cf[t] / (1+r)^t = 0. The solver is
//! single-shot: it never brackets, bisects or clamps, so divergence and
//! oscillation surface as `NonConvergent` and the caller may retry with a
//! different initial guess.

use log::debug;

use super::config::ConvergenceConfig;
use crate::error::{NonConvergence, RateError, RateResult};

/// A converged IRR together with the number of Newton steps taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolution {
    /// Periodic rate in decimal form, aligned with the cash-flow spacing
    pub rate: f64,
    pub iterations: u32,
}

/// Solver state; `Converged` and `Failed` are terminal
#[derive(Debug, Clone, Copy, PartialEq)]
enum SolverState {
    Iterating { iteration: u32, rate: f64 },
    Converged(IrrSolution),
    Failed(NonConvergence),
}

/// Calculate the Internal Rate of Return of a cash-flow series
///
/// # Arguments
/// * `cash_flows` - index 0 is time zero (usually the negative initial outlay),
///   index t occurs t periods later
/// * `config` - initial guess, iteration cap and tolerance
///
/// # Returns
/// * periodic IRR as a decimal (0.10 for 10%)
pub fn calculate_irr(cash_flows: &[f64], config: &ConvergenceConfig) -> RateResult<f64> {
    solve(cash_flows, config).map(|solution| solution.rate)
}

/// Same as [`calculate_irr`] but also reports the iteration count
pub fn solve(cash_flows: &[f64], config: &ConvergenceConfig) -> RateResult<IrrSolution> {
    validate_cash_flows(cash_flows)?;
    config.validate()?;

    let mut state = SolverState::Iterating {
        iteration: 0,
        rate: config.initial_guess,
    };

    loop {
        state = match state {
            SolverState::Iterating { iteration, rate } => step(cash_flows, config, iteration, rate),
            SolverState::Converged(solution) => {
                debug!(
                    "IRR converged to {} after {} iterations",
                    solution.rate, solution.iterations
                );
                return Ok(solution);
            }
            SolverState::Failed(cause) => {
                debug!("IRR failed: {}", cause);
                return Err(cause.into());
            }
        };
    }
}

/// One Newton-Raphson update from `rate`
fn step(cash_flows: &[f64], config: &ConvergenceConfig, iteration: u32, rate: f64) -> SolverState {
    if iteration >= config.max_iterations {
        return SolverState::Failed(NonConvergence::MaxIterationsExceeded {
            max_iterations: config.max_iterations,
        });
    }

    let (npv, derivative) = npv_and_derivative(cash_flows, rate);

    if derivative == 0.0 {
        return SolverState::Failed(NonConvergence::ZeroDerivative { iteration, rate });
    }

    let new_rate = rate - npv / derivative;

    if (new_rate - rate).abs() < config.tolerance {
        SolverState::Converged(IrrSolution {
            rate: new_rate,
            iterations: iteration + 1,
        })
    } else {
        SolverState::Iterating {
            iteration: iteration + 1,
            rate: new_rate,
        }
    }
}

/// Check the series has at least two values and all of them are finite
pub fn validate_cash_flows(cash_flows: &[f64]) -> RateResult<()> {
    if cash_flows.len() < 2 {
        return Err(RateError::invalid(format!(
            "cash flows need at least two values (initial and one future cash flow), got {}",
            cash_flows.len()
        )));
    }
    if let Some((t, cf)) = cash_flows.iter().enumerate().find(|(_, cf)| !cf.is_finite()) {
        return Err(RateError::invalid(format!(
            "cash flow at period {} is not a finite number ({})",
            t, cf
        )));
    }
    Ok(())
}

/// NPV and its derivative with respect to rate, evaluated at the same point
///
/// Each term computes (1+rate)^t once and reuses it for both sums.
pub fn npv_and_derivative(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let growth = 1.0 + rate;
    let mut npv = 0.0;
    let mut derivative = 0.0;

    for (t, &cf) in cash_flows.iter().enumerate() {
        let denom = growth.powi(t as i32);
        npv += cf / denom;
        derivative -= (t as f64) * cf / (denom * growth);
    }

    (npv, derivative)
}

/// NPV at a given periodic rate
pub fn npv(cash_flows: &[f64], rate: f64) -> f64 {
    npv_and_derivative(cash_flows, rate).0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn bisection_reference(cash_flows: &[f64], mut low: f64, mut high: f64) -> f64 {
        let f = |r: f64| -> f64 {
            cash_flows
                .iter()
                .enumerate()
                .map(|(t, cf)| cf / (1.0 + r).powf(t as f64))
                .sum()
        };
        assert!(f(low) * f(high) < 0.0, "reference interval must bracket a root");
        for _ in 0..200 {
            let mid = (low + high) / 2.0;
            if f(mid) * f(low) > 0.0 {
                low = mid;
            } else {
                high = mid;
            }
        }
        (low + high) / 2.0
    }

    #[test]
    fn test_simple_irr() {
        let irr = calculate_irr(&[-100.0, 110.0], &ConvergenceConfig::default()).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-7);
    }

    #[test]
    fn test_level_inflows_match_bisection() {
        let cash_flows = [-100.0, 50.0, 50.0, 50.0];
        let config = ConvergenceConfig::default().with_initial_guess(0.1);
        let irr = calculate_irr(&cash_flows, &config).unwrap();

        assert!(irr > 0.0 && irr < 1.0, "IRR out of range: {}", irr);
        let reference = bisection_reference(&cash_flows, 0.0, 1.0);
        assert_abs_diff_eq!(irr, reference, epsilon = 1e-6);
        assert_abs_diff_eq!(npv(&cash_flows, irr), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_monthly_cashflows() {
        // Investment of $1000, returns $1100 after 12 months
        let mut cash_flows = vec![-1000.0];
        cash_flows.extend(vec![0.0; 11]);
        cash_flows.push(1100.0);

        let config = ConvergenceConfig::default().with_initial_guess(0.01);
        let monthly = calculate_irr(&cash_flows, &config).unwrap();
        let annual = (1.0 + monthly).powi(12) - 1.0;
        assert_abs_diff_eq!(annual, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_loan_with_level_payments() {
        // Borrow $10000, repay 12 monthly payments of $900
        let mut cash_flows = vec![10000.0];
        cash_flows.extend(vec![-900.0; 12]);

        let config = ConvergenceConfig::default().with_initial_guess(0.01);
        let rate = calculate_irr(&cash_flows, &config).unwrap();
        assert!(rate > 0.0);
        assert_abs_diff_eq!(npv(&cash_flows, rate), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_repeated_calls_are_bit_identical() {
        let cash_flows = [-250.0, 40.0, 80.0, 120.0, 60.0];
        let config = ConvergenceConfig::default();
        let first = calculate_irr(&cash_flows, &config).unwrap();
        for _ in 0..5 {
            let again = calculate_irr(&cash_flows, &config).unwrap();
            assert_eq!(first.to_bits(), again.to_bits());
        }
    }

    #[test]
    fn test_all_positive_flows_do_not_converge() {
        // The only root of 1 + 2/(1+r) is r = -3; Newton from 0.10 runs away
        // from it until the derivative underflows to zero.
        let err = calculate_irr(&[1.0, 2.0], &ConvergenceConfig::default()).unwrap_err();
        assert!(
            matches!(err, RateError::NonConvergent { .. }),
            "expected NonConvergent, got {:?}",
            err
        );
    }

    #[test]
    fn test_zero_derivative() {
        // Only a time-zero flow is non-zero: derivative is exactly 0
        let err = calculate_irr(&[-100.0, 0.0, 0.0], &ConvergenceConfig::default()).unwrap_err();
        assert_eq!(
            err.non_convergence(),
            Some(&NonConvergence::ZeroDerivative { iteration: 0, rate: 0.10 })
        );
    }

    #[test]
    fn test_iteration_cap() {
        let config = ConvergenceConfig::default().with_max_iterations(1);
        let err = calculate_irr(&[-100.0, 50.0, 50.0, 50.0], &config).unwrap_err();
        assert_eq!(
            err.non_convergence(),
            Some(&NonConvergence::MaxIterationsExceeded { max_iterations: 1 })
        );
        assert!(err.to_string().contains("(1)"));
    }

    #[test]
    fn test_reports_iterations() {
        let solution = solve(&[-100.0, 110.0], &ConvergenceConfig::default()).unwrap();
        assert!(solution.iterations >= 1);
        assert!(solution.iterations < 20);
    }

    #[test]
    fn test_invalid_cash_flows() {
        let config = ConvergenceConfig::default();
        assert!(calculate_irr(&[-100.0], &config).unwrap_err().is_invalid_argument());
        assert!(calculate_irr(&[], &config).unwrap_err().is_invalid_argument());
        assert!(calculate_irr(&[-100.0, f64::NAN], &config).unwrap_err().is_invalid_argument());
        assert!(calculate_irr(&[-100.0, f64::INFINITY], &config)
            .unwrap_err()
            .is_invalid_argument());
    }

    #[test]
    fn test_invalid_config_rejected_before_iterating() {
        let config = ConvergenceConfig::default().with_tolerance(0.0);
        assert!(calculate_irr(&[-100.0, 110.0], &config).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_npv_and_derivative_at_zero_rate() {
        let (value, slope) = npv_and_derivative(&[-100.0, 60.0, 60.0], 0.0);
        assert_abs_diff_eq!(value, 20.0, epsilon = 1e-12);
        // -(1*60 + 2*60)
        assert_abs_diff_eq!(slope, -180.0, epsilon = 1e-12);
    }
}
