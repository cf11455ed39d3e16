//! Internal Rate of Return via Newton-Raphson

mod batch;
mod cashflows;
mod config;
mod solver;

pub use batch::solve_batch;
pub use cashflows::CashFlowSeries;
pub use config::{
    ConvergenceConfig, DEFAULT_INITIAL_GUESS, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE,
};
pub use solver::{calculate_irr, npv, npv_and_derivative, solve, validate_cash_flows, IrrSolution};
