//! Rate Metrics CLI
//!
//! Command-line interface for nominal annual rates and IRR.
//! Convergence defaults can be set via IRR_GUESS, IRR_MAX_ITERATIONS and
//! IRR_TOLERANCE; command-line flags take precedence.

use clap::{Parser, Subcommand};
use rate_metrics::{
    irr::{self, ConvergenceConfig},
    rates, RateError,
};
use serde::Serialize;
use std::process;

#[derive(Parser)]
#[command(name = "rate_metrics")]
#[command(version, about = "Nominal annual rate and IRR calculator", long_about = None)]
struct Cli {
    /// Print a JSON response instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an Effective Annual Rate to a Nominal Annual Rate
    Nar {
        /// Effective Annual Rate as a decimal (0.80 for 80%)
        #[arg(long, allow_negative_numbers = true)]
        ear: f64,

        /// Compounding periods per year (12 for monthly)
        #[arg(long, allow_negative_numbers = true)]
        periods: f64,
    },

    /// Simple annualized return of an investment from a start date until now
    NarSince {
        /// Start date (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        start: String,

        /// Value at the start date
        #[arg(long, allow_negative_numbers = true)]
        initial: f64,

        /// Value today
        #[arg(long, allow_negative_numbers = true)]
        current: f64,
    },

    /// Internal rate of return of a cash-flow series (index 0 = time zero)
    Irr {
        /// Cash flows, one per period
        #[arg(required = true, allow_negative_numbers = true)]
        flows: Vec<f64>,

        /// Initial guess for the rate
        #[arg(long, allow_negative_numbers = true)]
        guess: Option<f64>,

        /// Maximum Newton-Raphson iterations
        #[arg(long)]
        max_iterations: Option<u32>,

        /// Convergence tolerance on the rate step
        #[arg(long)]
        tolerance: Option<f64>,
    },
}

#[derive(Serialize)]
struct RateResponse {
    metric: &'static str,
    rate: f64,
    rate_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<u32>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn run(command: Commands) -> Result<RateResponse, RateError> {
    match command {
        Commands::Nar { ear, periods } => {
            let rate = rates::nominal_annual_rate(ear, periods)?;
            Ok(RateResponse {
                metric: "nominal_annual_rate",
                rate,
                rate_pct: rate * 100.0,
                iterations: None,
            })
        }
        Commands::NarSince {
            start,
            initial,
            current,
        } => {
            let rate = rates::nominal_annual_rate_since(start, initial, current)?;
            Ok(RateResponse {
                metric: "nominal_annual_rate",
                rate,
                rate_pct: rate * 100.0,
                iterations: None,
            })
        }
        Commands::Irr {
            flows,
            guess,
            max_iterations,
            tolerance,
        } => {
            let mut config = ConvergenceConfig::from_env();
            if let Some(guess) = guess {
                config = config.with_initial_guess(guess);
            }
            if let Some(max_iterations) = max_iterations {
                config = config.with_max_iterations(max_iterations);
            }
            if let Some(tolerance) = tolerance {
                config = config.with_tolerance(tolerance);
            }
            log::debug!("Solving IRR for {} cash flows with {:?}", flows.len(), config);

            let solution = irr::solve(&flows, &config)?;
            Ok(RateResponse {
                metric: "irr",
                rate: solution.rate,
                rate_pct: solution.rate * 100.0,
                iterations: Some(solution.iterations),
            })
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let json_output = cli.json;

    match run(cli.command) {
        Ok(response) => {
            if json_output {
                match serde_json::to_string_pretty(&response) {
                    Ok(body) => println!("{}", body),
                    Err(e) => {
                        eprintln!("Failed to serialize response: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                match response.iterations {
                    Some(iterations) => println!(
                        "IRR: {:.6} ({:.4}%) after {} iterations",
                        response.rate, response.rate_pct, iterations
                    ),
                    None => println!("NAR: {:.6} ({:.4}%)", response.rate, response.rate_pct),
                }
            }
        }
        Err(e) => {
            if json_output {
                let body = ErrorResponse { error: e.to_string() };
                println!("{}", serde_json::to_string(&body).unwrap_or_else(|_| e.to_string()));
            } else {
                eprintln!("Error: {}", e);
            }
            process::exit(1);
        }
    }
}
