mod cmd;
mod config;
mod host;
mod output;
mod session;

use clap::{Parser, Subcommand};
use config::{BackendArgs, CliConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "qon-automation",
    about = "Drive the automation engine from a terminal: parse action URIs, replay pushes, register tokens",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./qon-automation.yaml when present)
    #[arg(long, global = true, env = "QON_AUTOMATION_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Debug logging
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(flatten)]
    backend: BackendArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an action URI without executing it
    Parse {
        /// URI reported by a screen, e.g. qon-app://automation?action=navigate&data=s1
        uri: String,
    },

    /// Replay a push payload through the engine
    Push {
        /// Payload entry, repeatable
        #[arg(short = 'd', long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
    },

    /// Execute an action URI against the backend and print the delegate calls
    Action {
        uri: String,
    },

    /// Record a device push token and register it if it changed
    Token {
        token: String,
    },

    /// Report that a screen was shown
    View {
        screen_id: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let json = cli.json;
    let config = || load_config(cli.config.as_deref(), &cli.backend);

    let result = match cli.command {
        Commands::Parse { uri } => cmd::parse::run(&uri, json),
        Commands::Push { data } => config().and_then(|c| cmd::push::run(&c, &data, json)),
        Commands::Action { uri } => config().and_then(|c| cmd::action::run(&c, &uri, json)),
        Commands::Token { token } => config().and_then(|c| cmd::token::run(&c, &token, json)),
        Commands::View { screen_id } => {
            config().and_then(|c| cmd::view::run(&c, &screen_id, json))
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>, overrides: &BackendArgs) -> anyhow::Result<CliConfig> {
    let mut config = CliConfig::load(path)?;
    config.apply(overrides);
    Ok(config)
}
