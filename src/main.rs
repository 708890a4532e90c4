use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use gateway_message::infrastructure::config::Config;
use gateway_message::{AppError, ConfigError, MessagePayload, MessageService};

#[derive(Parser)]
#[command(name = "gateway-message")]
#[command(about = "Hydrate gateway message payloads and render their clean content", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Hydrate a JSON payload and show the result
    Render {
        /// Path to the message payload
        payload: PathBuf,

        /// Channel id (overrides the payload's channel_id)
        #[arg(long)]
        channel: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    let cli = Cli::parse();
    let (config, load_error) = load_config(&cli.config);

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    if let Some(e) = load_error {
        tracing::warn!("Failed to load config: {}, using defaults", e);
    }

    let result = match cli.command {
        Commands::Render { payload, channel, json } => render(&config, &payload, channel, json),
        Commands::Version => {
            println!("gateway-message v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(&cli.config),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Load the config, falling back to defaults. The load error is handed back
/// so it can be logged once the subscriber is installed.
fn load_config(path: &str) -> (Config, Option<ConfigError>) {
    if !Path::new(path).exists() {
        return (Config::load_env(), None);
    }
    match Config::load(path) {
        Ok(config) => (config, None),
        Err(e) => (Config::load_env(), Some(e)),
    }
}

fn render(config: &Config, path: &Path, channel: Option<String>, json: bool) -> Result<(), AppError> {
    let mut service = MessageService::new(config.build_server());
    for private in config.build_private_channels() {
        service.register_private_channel(private);
    }

    let text = fs::read_to_string(path)?;
    let mut payload = MessagePayload::from_json(&text)?;
    if channel.is_some() {
        payload.channel_id = channel;
    }

    let message = service.hydrate(payload)?;
    let summary = service.summarize(&message);

    if json {
        let output = serde_json::to_string_pretty(&summary).map_err(AppError::Serialize)?;
        println!("{}", output);
        return Ok(());
    }

    println!("Message {} by {}", summary.id, summary.author);
    println!(
        "  channel:  {} ({})",
        summary.channel_id.as_deref().unwrap_or("-"),
        summary.channel_kind.as_deref().unwrap_or("unresolved")
    );
    println!("  server:   {}", summary.server.as_deref().unwrap_or("-"));
    println!("  sent:     {}", summary.timestamp);
    if let Some(edited) = summary.edited_timestamp {
        println!("  edited:   {}", edited);
    }
    println!("  mentions: {}", summary.mentions.join(", "));
    println!("  channels: {}", summary.channel_mentions.join(", "));
    println!("  roles:    {}", summary.role_mentions.join(", "));
    println!();
    println!("{}", summary.clean_content);
    Ok(())
}

fn init_config(path: &str) -> Result<(), AppError> {
    if Path::new(path).exists() {
        println!("Config already exists at {}", path);
        return Ok(());
    }
    fs::write(path, Config::default().to_yaml()?)?;
    println!("Config written to {}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_returns_error_with_defaults() {
        let path = std::env::temp_dir().join(format!("gateway-message-{}.yaml", std::process::id()));
        fs::write(&path, "server: [").unwrap();

        let (config, error) = load_config(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();

        assert!(matches!(error, Some(ConfigError::Parse(_))));
        assert_eq!(config.server.name, Config::default().server.name);
    }

    #[test]
    fn test_missing_config_is_not_an_error() {
        let (_, error) = load_config("does-not-exist.yaml");
        assert!(error.is_none());
    }
}
