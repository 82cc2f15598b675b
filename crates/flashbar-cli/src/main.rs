mod cmd;
mod config_path;
mod output;
mod runtime;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use cmd::simulate::IntervalChange;
use flashbar_core::types::FlashMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "flashbar",
    about = "Periodic flash reminder: flashes the top bar or the indicator every few minutes",
    version,
    propagate_version = true
)]
struct Cli {
    /// Settings file (default: $XDG_CONFIG_HOME/flashbar/settings.yaml)
    #[arg(long, global = true, env = "FLASHBAR_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the indicator until interrupted, following changes to the settings file
    Run {
        /// Print one line per visual change instead of drawing the bar
        #[arg(long)]
        plain: bool,
    },

    /// Flash once with the current settings and exit
    Flash {
        /// Target to flash: top-bar or indicator (default: flash-mode setting)
        #[arg(long)]
        mode: Option<FlashMode>,

        /// Milliseconds per on/off cycle (default: flash-duration setting)
        #[arg(long)]
        duration: Option<u32>,

        /// Number of cycles (default: flash-count setting)
        #[arg(long)]
        count: Option<u32>,

        /// Print one line per visual change instead of drawing the bar
        #[arg(long)]
        plain: bool,
    },

    /// Replay the reminder in virtual time and print every visual change
    Simulate {
        /// Length of the simulated run
        #[arg(long)]
        seconds: u64,

        /// Turn the reminder off at this second
        #[arg(long, value_name = "SECONDS")]
        disable_at: Option<u64>,

        /// Change flash-interval at a given second, e.g. 45:60
        #[arg(long, value_name = "AT:SECS")]
        interval_at: Vec<IntervalChange>,
    },

    /// Turn the periodic reminder on
    Enable,

    /// Turn the periodic reminder off
    Disable,

    /// Flip the periodic reminder on or off
    Toggle,

    /// Show the effective reminder settings
    Status,

    /// Read and write individual settings
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let json = cli.json;
    let result = config_path::resolve_settings_path(cli.config.as_deref()).and_then(|path| {
        match cli.command {
            Commands::Run { plain } => cmd::run::run(&path, plain),
            Commands::Flash {
                mode,
                duration,
                count,
                plain,
            } => cmd::flash::run(&path, cmd::flash::FlashArgs { mode, duration, count, plain }, json),
            Commands::Simulate {
                seconds,
                disable_at,
                interval_at,
            } => cmd::simulate::run(&path, seconds, disable_at, interval_at, json),
            Commands::Enable => cmd::toggle::set_enabled(&path, true, json),
            Commands::Disable => cmd::toggle::set_enabled(&path, false, json),
            Commands::Toggle => cmd::toggle::toggle(&path, json),
            Commands::Status => cmd::status::run(&path, json),
            Commands::Config { subcommand } => cmd::config::run(&path, subcommand, json),
        }
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
