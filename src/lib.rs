pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod views;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use cli::{Cli, Commands};
pub use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use scheduler::Scheduler;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    init_tracing(&config)?;

    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config, prometheus_handle).await,
        Commands::Check => cli::cmd_check(&config).await,
        Commands::SweepPhotos => cli::cmd_sweep_photos(config).await,
        Commands::Students => cli::cmd_list_students(config).await,
        Commands::Complaints { email } => cli::cmd_list_complaints(config, email.as_deref()).await,
        Commands::Init => cli::cmd_init(),
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let json = config.general.log_json;
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()));

    if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let (layer, task) = config
            .observability
            .loki_labels
            .iter()
            .try_fold(tracing_loki::builder(), |builder, (key, value)| {
                builder.label(key.as_str(), value.as_str())
            })?
            .build_url(url)?;

        tokio::spawn(task);

        registry.with(layer).init();
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    } else {
        registry.init();
    }

    Ok(())
}

async fn run_server(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<()> {
    info!(
        "Complaint desk v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    tokio::fs::create_dir_all(&config.uploads.photo_dir)
        .await
        .with_context(|| format!("Failed to create photo directory {}", config.uploads.photo_dir))?;

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let shared = Arc::new(SharedState::new(config).await?);

    let scheduler = Arc::new(Scheduler::new(
        Arc::clone(&shared.photo_sweeper),
        shared.config.uploads.clone(),
    ));
    let scheduler_handle = {
        let sched = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if let Err(e) = sched.start().await {
                error!("Scheduler error: {}", e);
            }
        })
    };

    let app = api::router(api::create_app_state(shared, prometheus_handle));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    scheduler.stop().await;
    if let Err(e) = scheduler_handle.await {
        error!("Scheduler task failed: {}", e);
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
