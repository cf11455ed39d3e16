//! Solve many independent cash-flow series in parallel

use rayon::prelude::*;

use super::config::ConvergenceConfig;
use super::solver::{self, IrrSolution};
use crate::error::RateResult;

/// Solve each series with the same config; results keep the input order
///
/// Every series is solved on its own, single-threaded, so one failure
/// never affects the others.
pub fn solve_batch<S>(series: &[S], config: &ConvergenceConfig) -> Vec<RateResult<IrrSolution>>
where
    S: AsRef<[f64]> + Sync,
{
    series
        .par_iter()
        .map(|flows| solver::solve(flows.as_ref(), config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let series = vec![
            vec![-100.0, 110.0],
            vec![-100.0],
            vec![-100.0, 121.0],
        ];
        let results = solve_batch(&series, &ConvergenceConfig::default());

        assert_eq!(results.len(), 3);
        assert_abs_diff_eq!(results[0].as_ref().unwrap().rate, 0.10, epsilon = 1e-7);
        assert!(results[1].as_ref().unwrap_err().is_invalid_argument());
        assert_abs_diff_eq!(results[2].as_ref().unwrap().rate, 0.21, epsilon = 1e-7);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let series: Vec<Vec<f64>> = (1..=20)
            .map(|n| {
                let mut flows = vec![-1000.0];
                flows.extend(vec![120.0 + n as f64; 10]);
                flows
            })
            .collect();
        let config = ConvergenceConfig::default();

        let parallel = solve_batch(&series, &config);
        for (flows, result) in series.iter().zip(parallel) {
            let sequential = solver::calculate_irr(flows, &config).unwrap();
            assert_eq!(result.unwrap().rate.to_bits(), sequential.to_bits());
        }
    }
}
