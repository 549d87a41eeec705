use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod scenario;

#[derive(Parser)]
#[command(
    name = "rsched",
    about = "rsched — replay placement scenarios against the static scheduler",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every node for the scenario's candidate service
    Score {
        /// Scenario file (TOML, or JSON when the name ends in .json)
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Place the candidate repeatedly, always on the best-ranked node.
    ///
    /// Each round ranks the nodes, records the candidate on the winner
    /// under a fresh service id and prints the ranking.
    Simulate {
        #[arg(short, long)]
        scenario: PathBuf,
        /// Number of placement rounds
        #[arg(short, long, default_value_t = 10)]
        iterations: usize,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the scheduler state of a scenario as a JSON snapshot
    Snapshot {
        #[arg(short, long)]
        scenario: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rsched=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score { scenario, format } => commands::score::score(&scenario, format),
        Commands::Simulate {
            scenario,
            iterations,
            format,
        } => commands::simulate::simulate(&scenario, iterations, format),
        Commands::Snapshot { scenario } => commands::snapshot::snapshot(&scenario),
    }
}
