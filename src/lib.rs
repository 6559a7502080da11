pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod services;

use anyhow::Context;
use rand::{Rng, distr::Alphanumeric};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::Commands;
pub use config::Config;
use config::LogFormat;

/// Runs one CLI command. Only `serve` reads the configuration, so `init`
/// still works when the existing config file is broken.
pub async fn run_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { path, force } => cmd_init(path, force),
        Commands::HashPassword { password } => cmd_hash_password(&password).await,
        Commands::Serve => serve(Config::load()?).await,
    }
}

/// Sets up logging and metrics, then serves the panel until ctrl-c.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    init_tracing(&config);

    match Config::source_path() {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => info!("No config file found, using defaults"),
    }

    run_server(config).await
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!("wboard v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = api::create_app_state(config, prometheus_handle).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web panel listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn cmd_init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(Config::default_config_path);

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let admin_password = random_token(16);

    let mut config = Config::default();
    config.auth.secret_key = random_token(64);
    config.admin.password.clone_from(&admin_password);
    config.save_to_path(&path)?;

    println!("Wrote {}", path.display());
    println!(
        "Administrator '{}' will be created on first start with password: {}",
        config.admin.username, admin_password
    );
    Ok(())
}

async fn cmd_hash_password(password: &str) -> anyhow::Result<()> {
    let password = password.to_string();
    let digest = tokio::task::spawn_blocking(move || auth::hash_password(&password))
        .await
        .context("Hashing task failed")??;

    println!("{digest}");
    Ok(())
}
