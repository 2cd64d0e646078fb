use anyhow::{Context, Result};
use botsite::{
    AppContext, ConfigOverrides, DatabaseConnection, DiscordBot, HttpServer, Orchestrator,
    RedisConnection, SignalWaiter, SiteConfig,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

#[derive(Parser, Debug)]
#[command(name = "botsite")]
#[command(about = "Bot companion website: bot session, database and cache pools, HTTP listener")]
#[command(version)]
struct Args {
    /// The configuration for the webserver
    #[arg(required_unless_present = "print_config")]
    config_file: Option<PathBuf>,

    /// The host IP to run the webserver on [default: 0.0.0.0]
    #[arg(long)]
    host: Option<String>,

    /// The port to run the webserver on [default: 8080]
    #[arg(long)]
    port: Option<u16>,

    /// Run the website in debug mode
    #[arg(long)]
    debug: bool,

    /// Override log format (json, pretty, compact)
    #[arg(long, value_name = "FORMAT")]
    log_format: Option<String>,

    /// Validate configuration file and exit without starting anything
    #[arg(long)]
    validate_config: bool,

    /// Print default configuration in TOML format and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_config {
        print_default_config()?;
        return Ok(());
    }

    let _log_guard = init_logging(&args);

    let config_file = args
        .config_file
        .clone()
        .context("A configuration file is required")?;

    info!("Starting botsite v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration file: {}", config_file.display());

    let overrides = ConfigOverrides {
        host: args.host.clone(),
        port: args.port,
    };

    let config = match SiteConfig::load_with_overrides(&config_file, &overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if args.validate_config {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let config = Arc::new(config);

    let bot = Arc::new(DiscordBot::new(config.bot.api_base.clone())?);
    let database = Arc::new(DatabaseConnection::new());
    let cache = Arc::new(RedisConnection::new());
    let context = AppContext::new(
        Arc::clone(&config),
        Arc::clone(&bot),
        Arc::clone(&database),
        Arc::clone(&cache),
        args.debug,
    );
    let server = Arc::new(HttpServer::new(context));

    let mut orchestrator = Orchestrator::builder(Arc::clone(&config))
        .bot(bot)
        .database(database)
        .cache(cache)
        .listener(server)
        .build()?;

    let mut signal = SignalWaiter::new();
    let report = orchestrator.run(&mut signal).await.map_err(|e| {
        error!("Failed to start system: {}", e);
        e
    })?;

    info!(
        "Botsite shut down: {} resource(s) closed, {} warning(s)",
        report.stopped.len(),
        report.warnings.len()
    );
    Ok(())
}

fn init_logging(args: &Args) -> WorkerGuard {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = if args.debug { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("botsite={},tower_http={}", log_level, log_level))
    });

    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());

    let fmt_layer = match args.log_format.as_deref() {
        Some("json") => fmt::layer()
            .json()
            .with_writer(writer)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        Some("pretty") => fmt::layer()
            .pretty()
            .with_writer(writer)
            .with_target(true)
            .with_file(args.debug)
            .with_line_number(args.debug)
            .boxed(),
        Some("compact") | None => fmt::layer()
            .compact()
            .with_writer(writer)
            .with_target(true)
            .boxed(),
        Some(format) => {
            eprintln!("Warning: Unknown log format '{}', using default", format);
            fmt::layer().with_writer(writer).with_target(true).boxed()
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .init();

    guard
}

/// Print default configuration in TOML format
fn print_default_config() -> Result<()> {
    let mut config = SiteConfig::default();
    config.authorization_tokens.bot = "<bot token>".to_string();

    println!("# Botsite Configuration File");
    println!("# Every resource section accepts `enabled = false` to skip it");
    println!();
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
