//! CLI for perfprobe — record device performance sessions and compare
//! them against baselines.

mod commands;

use clap::{Parser, Subcommand};
use perfprobe_core::Config;

#[derive(Parser)]
#[command(name = "perfprobe")]
#[command(about = "Sample Android app performance over adb and catch regressions")]
#[command(version = perfprobe_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a sampling session until Ctrl+C
    Record {
        /// Device serial (adb -s); defaults to $ADB_SERIAL
        #[arg(long)]
        serial: Option<String>,

        /// Target application package; defaults to $APP_PACKAGE
        #[arg(long)]
        package: Option<String>,

        /// Sampling interval in seconds; defaults to $SAMPLE_INTERVAL_SECONDS or 1.0
        #[arg(long)]
        interval: Option<f64>,

        /// Data directory for session logs; defaults to $DATA_DIR or ./data
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// List recorded sessions
    Sessions {
        /// Data directory; defaults to $DATA_DIR or ./data
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Analyze the latest session and write a report artifact
    Analyze {
        /// Data directory; defaults to $DATA_DIR or ./data
        #[arg(long)]
        data_dir: Option<String>,

        /// Skip writing the report_<timestamp>.json artifact
        #[arg(long)]
        no_save: bool,
    },

    /// Manage performance baselines
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },

    /// Compare the latest session against a named baseline
    Compare {
        /// Baseline name
        name: String,

        /// Data directory; defaults to $DATA_DIR or ./data
        #[arg(long)]
        data_dir: Option<String>,

        /// Write the comparison report as JSON to this path
        #[arg(long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
enum BaselineAction {
    /// Create (or replace) a baseline from the latest session
    Create {
        /// Baseline name
        name: String,

        /// Free-form description
        #[arg(default_value = "")]
        description: String,

        /// Data directory; defaults to $DATA_DIR or ./data
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// List all baselines
    List,

    /// Show one baseline in detail
    Show {
        /// Baseline name
        name: String,
    },

    /// Delete a baseline and its data copy
    Delete {
        /// Baseline name
        name: String,
    },
}

fn main() {
    // .env is a convenience for development setups; absence is fine.
    let _ = dotenvy::dotenv();
    env_logger::init();

    let config = Config::from_env();
    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            serial,
            package,
            interval,
            data_dir,
        } => commands::record::run(config, serial, package, interval, data_dir),
        Commands::Sessions { data_dir } => commands::sessions::run(config, data_dir),
        Commands::Analyze { data_dir, no_save } => {
            commands::analyze::run(config, data_dir, !no_save)
        }
        Commands::Baseline { action } => match action {
            BaselineAction::Create {
                name,
                description,
                data_dir,
            } => commands::baseline::create(config, &name, &description, data_dir),
            BaselineAction::List => commands::baseline::list(config),
            BaselineAction::Show { name } => commands::baseline::show(config, &name),
            BaselineAction::Delete { name } => commands::baseline::delete(config, &name),
        },
        Commands::Compare {
            name,
            data_dir,
            output,
        } => commands::compare::run(config, &name, data_dir, output.as_deref()),
    }
}
