mod config_commands;
mod resource_commands;
mod run_commands;

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    clap::{Parser, Subcommand},
    sendtick::{Capabilities, SendtickApi, schema},
    sendtick_config::SendtickConfig,
    tracing::{debug, info},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "sendtick", about = "Sendtick: WhatsApp messaging from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of the discovered one.
    #[arg(long, global = true, env = "SENDTICK_CONFIG")]
    config: Option<PathBuf>,

    /// Print the request that would be sent instead of sending it.
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the node over a JSON array of items.
    Run(run_commands::RunArgs),
    /// Send a WhatsApp message.
    Send(resource_commands::SendArgs),
    /// Contact management.
    Contacts {
        #[command(subcommand)]
        action: resource_commands::ContactAction,
    },
    /// Media management.
    Media {
        #[command(subcommand)]
        action: resource_commands::MediaAction,
    },
    /// WhatsApp sessions.
    Sessions {
        #[command(subcommand)]
        action: resource_commands::SessionAction,
    },
    /// Print the node description consumed by workflow hosts.
    Describe,
    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: config_commands::ConfigAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr; stdout carries command output.
    if cli.json_logs {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Load the explicit config file if given, otherwise discover one.
fn load_config(path: Option<&Path>) -> Result<SendtickConfig> {
    let Some(path) = path else {
        return Ok(sendtick_config::discover_and_load());
    };
    let mut config = sendtick_config::load_config(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    sendtick_config::apply_env_overrides(&mut config);
    Ok(config)
}

/// Build the API client; a key is only needed when requests are sent.
fn build_api(config: &SendtickConfig, dry_run: bool) -> Result<SendtickApi> {
    if !dry_run && !config.api.has_api_key() {
        anyhow::bail!(
            "no API key configured; set {} or api.api_key in sendtick.toml",
            sendtick_config::loader::API_KEY_ENV
        );
    }
    debug!(base_url = %config.api.base_url, "using Sendtick API");
    Ok(SendtickApi::from_config(config)?)
}

pub(crate) fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "sendtick starting");

    match cli.command {
        Commands::Config { action } => config_commands::handle_config(action, cli.config.as_deref()),
        Commands::Describe => {
            let config = load_config(cli.config.as_deref())?;
            print_json(&schema::describe(&Capabilities::from(&config.connector)))
        },
        Commands::Run(args) => {
            let config = load_config(cli.config.as_deref())?;
            let api = build_api(&config, cli.dry_run)?;
            run_commands::handle_run(args, api, cli.dry_run).await
        },
        Commands::Send(args) => {
            let api = build_api(&load_config(cli.config.as_deref())?, cli.dry_run)?;
            resource_commands::execute(&api, args.into_call(), cli.dry_run).await
        },
        Commands::Contacts { action } => {
            let api = build_api(&load_config(cli.config.as_deref())?, cli.dry_run)?;
            resource_commands::execute(&api, action.into_call(), cli.dry_run).await
        },
        Commands::Media { action } => {
            let api = build_api(&load_config(cli.config.as_deref())?, cli.dry_run)?;
            resource_commands::execute(&api, action.into_call(), cli.dry_run).await
        },
        Commands::Sessions { action } => {
            let api = build_api(&load_config(cli.config.as_deref())?, cli.dry_run)?;
            resource_commands::execute(&api, action.into_call(), cli.dry_run).await
        },
    }
}
