//! cascade CLI - command-line harness for the tournament tree
//!
//! Prints trees, routes a single example with scripted scores, and measures
//! predict/learn throughput before the engine is wired into a real learner.

mod bench;
mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cascade_engine::{ScriptedLearner, Tournament, TournamentConfig};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Continuous-action tournament tree harness")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every node of the tree
    Tree {
        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Route one example with a scripted score sequence
    Route {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Scores handed out in order at each decision node
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        scores: Vec<f32>,
    },

    /// Measure predict and learn throughput with a hashed scorer
    Bench {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Examples per phase
        #[arg(long, default_value = "1000000")]
        samples: u64,
    },
}

#[derive(Args)]
struct ShapeArgs {
    /// Number of actions (leaves)
    #[arg(allow_hyphen_values = true, required_unless_present = "config")]
    num_leaves: Option<i64>,

    /// Smoothing bandwidth (0 disables pass-through nodes)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    bandwidth: i64,

    /// TOML file with `num_leaves`, `bandwidth` and `seed`; overrides the flags
    #[arg(long)]
    config: Option<PathBuf>,
}

impl ShapeArgs {
    fn resolve(&self) -> Result<TournamentConfig, CliError> {
        match &self.config {
            Some(path) => load_config(path),
            None => Ok(TournamentConfig::new(self.num_leaves.unwrap_or(0), self.bandwidth)?),
        }
    }
}

fn load_config(path: &Path) -> Result<TournamentConfig, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| CliError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber installed by an embedding process wins; ignore the error.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Tree { shape } => {
            let engine = Tournament::new(shape.resolve()?)?;
            let tree = engine.tree();
            println!(
                "{} leaves, bandwidth {}, {} nodes, depth {}",
                tree.num_leaves(),
                engine.config().bandwidth(),
                tree.len(),
                tree.depth()
            );
            for node in tree.nodes() {
                match tree.action_for_leaf(node.id) {
                    Some(action) => println!("  {}  action {}", node, action),
                    None => println!("  {}", node),
                }
            }
        }
        Commands::Route { shape, scores } => {
            let engine = Tournament::new(shape.resolve()?)?;
            let needed = engine.tree().depth() as usize;
            if scores.len() < needed {
                return Err(CliError::NotEnoughScores { needed, given: scores.len() });
            }
            let learner = ScriptedLearner::new(scores);
            let action = engine.predict(&learner, &());
            println!("visited {:?}", learner.predicted_offsets());
            println!("action {}", action);
        }
        Commands::Bench { shape, samples } => {
            let config = shape.resolve()?;
            info!(num_leaves = config.num_leaves(), bandwidth = config.bandwidth(), samples, "running tournament benchmark");
            let report = bench::run(config, samples)?;

            println!("Results:");
            println!("  Predict: {} ms, {:.2}M examples/sec", report.predict_ms, report.predict_rate() / 1_000_000.0);
            println!("  Batch:   {} ms, {:.2}M examples/sec", report.batch_ms, report.batch_rate() / 1_000_000.0);
            println!("  Learn:   {} ms, {:.2}M examples/sec", report.learn_ms, report.learn_rate() / 1_000_000.0);
            println!("  Node updates: {}", report.updates);
            println!("  {}", report.stats);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
