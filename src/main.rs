use std::path::Path;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use wa_command_bot::application::errors::BotError;
use wa_command_bot::application::AppContext;
use wa_command_bot::domain::traits::{Capabilities, Notifier};
use wa_command_bot::infrastructure::adapters::{console, ConsoleNotifier, WhatsAppNotifier};
use wa_command_bot::infrastructure::config::Config;
use wa_command_bot::infrastructure::http;
use wa_command_bot::infrastructure::system::{SystemClock, ThreadRandom};
use wa_command_bot::infrastructure::weather::OpenWeatherClient;

#[derive(Parser)]
#[command(name = "wa-command-bot")]
#[command(about = "A WhatsApp command bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Run,
    /// Chat with the bot on stdin (dev mode)
    Console,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_server(&cli.config),
        Commands::Console => run_console(&cli.config),
        Commands::Version => {
            println!("wa-command-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Result<Config, BotError> {
    let mut config = if Path::new(config_path).exists() {
        Config::load(config_path)?
    } else {
        tracing::info!("No config file at {}, using defaults", config_path);
        Config::default()
    };
    config.apply_env();
    config.prefix()?;
    Ok(config)
}

fn capabilities(config: &Config) -> Result<Capabilities, BotError> {
    let weather = OpenWeatherClient::new(config.weather.clone())
        .map_err(|e| BotError::Internal(e.to_string()))?;
    if !weather.is_configured() {
        tracing::warn!("WEATHER_API_KEY not set, weather command will report the service as unavailable");
    }

    Ok(Capabilities::new(
        Arc::new(weather),
        Arc::new(SystemClock),
        Arc::new(ThreadRandom),
    ))
}

fn runtime() -> Result<tokio::runtime::Runtime, BotError> {
    tokio::runtime::Runtime::new().map_err(|e| BotError::Internal(e.to_string()))
}

fn run_server(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;

    if !config.whatsapp.is_configured() {
        tracing::error!("Missing WhatsApp credentials (META_WHATSAPP_TOKEN / META_WHATSAPP_PHONE_ID), replies will not be delivered");
    }

    let caps = capabilities(&config)?;
    let notifier: Arc<dyn Notifier> = Arc::new(WhatsAppNotifier::new(config.whatsapp.clone())?);

    tracing::info!("Starting {}", config.bot.name);
    let ctx = Arc::new(AppContext::new(config, caps, notifier)?);

    // Blocking HTTP clients must be dropped outside the runtime, so main keeps a handle
    let rt = runtime()?;
    rt.block_on(http::serve(ctx.clone()))
}

fn run_console(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path)?;
    let caps = capabilities(&config)?;
    let ctx = Arc::new(AppContext::new(config, caps, Arc::new(ConsoleNotifier::new()))?);

    let rt = runtime()?;
    rt.block_on(console::run_console(&ctx.messages))
}

fn init_config() -> Result<(), BotError> {
    let yaml = serde_yaml::to_string(&Config::default())
        .map_err(|e| BotError::Internal(e.to_string()))?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
