//! Validated cash-flow series

use serde::{Deserialize, Serialize};

use super::config::ConvergenceConfig;
use super::solver::{self, IrrSolution};
use crate::error::{RateError, RateResult};

/// Ordered cash flows, index 0 at time zero and index t t periods later
///
/// Always holds at least two finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CashFlowSeries {
    flows: Vec<f64>,
}

impl CashFlowSeries {
    pub fn new(flows: impl Into<Vec<f64>>) -> RateResult<Self> {
        let flows = flows.into();
        solver::validate_cash_flows(&flows)?;
        Ok(Self { flows })
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.flows
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Never true; a series holds at least two flows
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Net present value at a periodic rate
    pub fn npv(&self, rate: f64) -> f64 {
        solver::npv(&self.flows, rate)
    }

    /// Internal rate of return per period
    pub fn irr(&self, config: &ConvergenceConfig) -> RateResult<f64> {
        solver::calculate_irr(&self.flows, config)
    }

    pub fn solve(&self, config: &ConvergenceConfig) -> RateResult<IrrSolution> {
        solver::solve(&self.flows, config)
    }
}

impl TryFrom<Vec<f64>> for CashFlowSeries {
    type Error = RateError;

    fn try_from(flows: Vec<f64>) -> RateResult<Self> {
        Self::new(flows)
    }
}

impl From<CashFlowSeries> for Vec<f64> {
    fn from(series: CashFlowSeries) -> Self {
        series.flows
    }
}

impl AsRef<[f64]> for CashFlowSeries {
    fn as_ref(&self) -> &[f64] {
        &self.flows
    }
}
