//! Solve the IRR of every cash-flow row in a CSV file
//!
//! Usage: irr_batch <flows.csv> [--json]
//! Rows are solved in parallel; convergence settings come from
//! IRR_GUESS, IRR_MAX_ITERATIONS and IRR_TOLERANCE.

use anyhow::{bail, Result};
use rate_metrics::{irr, loader, ConvergenceConfig};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Serialize)]
struct BatchRow {
    line: u64,
    periods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    irr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct BatchResponse {
    config: ConvergenceConfig,
    solved: usize,
    failed: usize,
    rows: Vec<BatchRow>,
    execution_time_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let path = match env::args().skip(1).find(|arg| !arg.starts_with("--")) {
        Some(path) => PathBuf::from(path),
        None => bail!("usage: irr_batch <flows.csv> [--json]"),
    };

    let start = Instant::now();
    let config = ConvergenceConfig::from_env();
    let series = loader::load_cash_flow_file(&path)?;
    log::info!("Loaded {} cash-flow rows from {}", series.len(), path.display());

    let results = irr::solve_batch(&series, &config);

    let rows: Vec<BatchRow> = series
        .iter()
        .zip(results)
        .map(|(source, result)| match result {
            Ok(solution) => BatchRow {
                line: source.line,
                periods: source.flows.len(),
                irr: Some(solution.rate),
                iterations: Some(solution.iterations),
                error: None,
            },
            Err(e) => BatchRow {
                line: source.line,
                periods: source.flows.len(),
                irr: None,
                iterations: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let solved = rows.iter().filter(|row| row.irr.is_some()).count();
    let response = BatchResponse {
        config,
        solved,
        failed: rows.len() - solved,
        rows,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{:>5} {:>7} {:>14} {:>6}", "Line", "Periods", "IRR", "Iters");
        println!("{}", "-".repeat(40));
        for row in &response.rows {
            match (&row.irr, &row.error) {
                (Some(rate), _) => println!(
                    "{:>5} {:>7} {:>14.8} {:>6}",
                    row.line,
                    row.periods,
                    rate,
                    row.iterations.unwrap_or(0)
                ),
                (None, Some(error)) => println!("{:>5} {:>7}   {}", row.line, row.periods, error),
                (None, None) => {}
            }
        }
        println!(
            "\n{} solved, {} failed in {} ms",
            response.solved, response.failed, response.execution_time_ms
        );
    }

    Ok(())
}
