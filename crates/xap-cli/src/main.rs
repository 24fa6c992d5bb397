use clap::{Parser, Subcommand};

mod commands;
mod output;
mod scenario;

use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "xap-plan",
    about = "XAP elastic capacity planner: container bin-packing and zone clamps",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a deployment by the scenario's target capacity.
    ScaleOut {
        /// Scenario file with [solver], [target] and [agents.*] tables
        #[arg(short, long)]
        scenario: String,
        /// Solver config file, overriding the scenario's [solver] table
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Shrink a deployment by the scenario's target capacity.
    ScaleIn {
        #[arg(short, long)]
        scenario: String,
        #[arg(short, long)]
        config: Option<String>,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Plan per-zone capacity for one cycle.
    ///
    /// Each zone's desired capacity is clamped between its minimum and
    /// maximum, taking the other zones' capacity into account.
    Zones {
        /// Scenario file with [limits] and [[zones]] tables
        #[arg(short, long)]
        scenario: String,
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("xap=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ScaleOut { scenario, config, format } => {
            commands::solve::scale_out(&scenario, config.as_deref(), format)
        }
        Commands::ScaleIn { scenario, config, format } => {
            commands::solve::scale_in(&scenario, config.as_deref(), format)
        }
        Commands::Zones { scenario, format } => {
            commands::zones::plan(&scenario, format)
        }
    }
}
