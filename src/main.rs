//! CLI entry point for Pursuit Sim

use clap::{Parser, Subcommand, ValueEnum};
use pursuit_sim_lib::{
    config::AppConfig,
    logging,
    scenario::{evaluate_all, sweep_and_aggregate, ScenarioSet, SweepConfig},
    server,
    stats::CatchStats,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "pursuit-sim")]
#[command(version = "1.0")]
#[command(about = "Catch-feasibility simulator for hunter/prey pursuits", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the configure/hunt HTTP API
    Serve {
        /// Path to the service configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Evaluate every scenario in a file
    Evaluate {
        /// Path to the scenario file (YAML or JSON)
        #[arg(short, long)]
        scenarios: PathBuf,

        /// Use parallel processing
        #[arg(short, long, default_value = "false")]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
    /// Estimate the catch rate against randomly placed prey
    Sweep {
        #[arg(long)]
        hunter_speed: f64,

        #[arg(long)]
        prey_speed: f64,

        /// Prey is placed in a cube of this half-width around the hunter
        #[arg(short, long)]
        radius: f64,

        /// Number of samples to run
        #[arg(short = 'n', long, default_value = "10000")]
        samples: usize,

        #[arg(short, long, default_value = "100")]
        max_time: f64,

        #[arg(long, default_value = "0")]
        seed: u64,

        /// Use parallel processing
        #[arg(short, long, default_value = "false")]
        parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

fn print_stats(stats: &CatchStats) {
    println!("Runs: {}", stats.runs);
    println!("Catches: {} ({:.2}%)", stats.catches, stats.catch_rate * 100.0);
    println!("Average Distance: {:.2}", stats.avg_distance);
    println!();
    println!("--- Catch Duration ---");
    println!("Average: {:.2}", stats.avg_duration);
    println!("Range: {:.2} - {:.2}", stats.min_duration, stats.max_duration);
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn main() {
    let args = Args::parse();

    match args.command {
        Command::Serve { config } => {
            let config = match config {
                Some(path) => AppConfig::from_file(&path).unwrap_or_else(|e| fail(e)),
                None => AppConfig::default(),
            };
            logging::init(&config.log_level);

            let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| fail(e));
            if let Err(e) = runtime.block_on(server::serve(&config)) {
                fail(e);
            }
        }
        Command::Evaluate { scenarios, parallel, output } => {
            logging::init("warn");

            let set = ScenarioSet::from_file(&scenarios).unwrap_or_else(|e| fail(e));
            let start = Instant::now();
            let outcomes = evaluate_all(&set.scenarios, parallel).unwrap_or_else(|e| fail(e));
            let elapsed = start.elapsed();
            let stats = CatchStats::from_outcomes(&outcomes);

            match output {
                OutputFormat::Text => {
                    println!("=== Scenario Results ===");
                    for (i, (scenario, outcome)) in set.scenarios.iter().zip(&outcomes).enumerate() {
                        let name = scenario.name.clone().unwrap_or_else(|| format!("#{}", i));
                        if outcome.caught {
                            println!("{}: caught after {:.2}", name, outcome.duration);
                        } else {
                            println!("{}: escaped", name);
                        }
                    }
                    println!();
                    print_stats(&stats);
                    println!();
                    println!("Total time: {:.3}s", elapsed.as_secs_f64());
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "parallel": parallel,
                        "elapsed_seconds": elapsed.as_secs_f64(),
                        "outcomes": outcomes,
                        "stats": stats,
                    });
                    match serde_json::to_string_pretty(&output) {
                        Ok(s) => println!("{}", s),
                        Err(e) => fail(e),
                    }
                }
            }
        }
        Command::Sweep { hunter_speed, prey_speed, radius, samples, max_time, seed, parallel, output } => {
            logging::init("info");

            let config = SweepConfig {
                hunter_speed,
                prey_speed,
                radius,
                samples,
                max_time_to_catch: max_time,
                seed,
            };
            if let Err(e) = config.validate() {
                fail(e);
            }

            let start = Instant::now();
            let stats = sweep_and_aggregate(&config, parallel).unwrap_or_else(|e| fail(e));
            let elapsed = start.elapsed();

            match output {
                OutputFormat::Text => {
                    println!("=== Pursuit Sweep Results ===");
                    print_stats(&stats);
                    println!();
                    println!("--- Performance ---");
                    println!("Total time: {:.3}s", elapsed.as_secs_f64());
                    if samples > 0 {
                        println!("Samples/sec: {:.0}", samples as f64 / elapsed.as_secs_f64());
                    }
                }
                OutputFormat::Json => {
                    let output = serde_json::json!({
                        "config": config,
                        "parallel": parallel,
                        "elapsed_seconds": elapsed.as_secs_f64(),
                        "stats": stats,
                    });
                    match serde_json::to_string_pretty(&output) {
                        Ok(s) => println!("{}", s),
                        Err(e) => fail(e),
                    }
                }
            }
        }
    }
}
