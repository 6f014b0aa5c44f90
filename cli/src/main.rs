//! CLI entrypoint for flag-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use flagpanel_infrastructure::{
    CommandPublisher, ConfigLoader, FileConfig, GitRepoMetadata, TfvarsFileStore,
};
use flagpanel_presentation::{AppState, Cli, build_router};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    if cli.show_config {
        print_config(&cli, &config)?;
        return Ok(());
    }

    let _log_guard = init_logging(cli.verbose, &config)?;

    info!("Starting flag-panel");

    // === Dependency Injection ===
    let features_path = config.repository.features_path();
    let store = Arc::new(
        TfvarsFileStore::new(&features_path).context("Failed to compile flag patterns")?,
    );
    let publisher = Arc::new(CommandPublisher::with_fallback(
        &config.publish.command,
        config.repo_root(),
    ));
    let metadata = Arc::new(GitRepoMetadata::new(config.repo_root(), &features_path));

    info!(
        "Managing {} flags in {}",
        flagpanel_domain::schema().len(),
        features_path.display()
    );
    info!(
        "Publishing with {} (repo root {}, on update: {})",
        config.publish.command,
        config.repo_root().display(),
        config.publish.on_update
    );

    let state = AppState::new(store, publisher, metadata)
        .with_publish_on_update(config.publish.on_update);
    let app = build_router(state);

    let bind = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    info!("flag-panel listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("flag-panel stopped");
    Ok(())
}

/// Load layered config, then apply CLI overrides on top.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(root) = &cli.repo_root {
        config.repository.root = root.clone();
    }
    if let Some(file) = &cli.features_file {
        config.repository.features_file = file.clone();
    }
    if let Some(command) = &cli.publish_command {
        config.publish.command = command.clone();
    }
    if cli.publish_on_update {
        config.publish.on_update = true;
    }
    if let Some(log_file) = &cli.log_file {
        config.logging.file = Some(log_file.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Initialize logging based on verbosity level.
///
/// `RUST_LOG` takes precedence over `-v`. When a log file is configured,
/// logs go to both stderr and the file.
fn init_logging(verbose: u8, config: &FileConfig) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match &config.logging.file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| std::path::Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}

fn print_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    println!("Configuration sources (in priority order):");
    println!("  {} Env:     {}*", "[     ]".dimmed(), flagpanel_infrastructure::config::ENV_PREFIX);
    for source in ConfigLoader::config_sources(cli.config.as_ref()) {
        let marker = if source.found {
            "[FOUND]".green()
        } else {
            "[     ]".dimmed()
        };
        println!("  {} {:<8} {}", marker, format!("{}:", source.label), source.location);
    }
    println!("  {} Default: built-in defaults", "[     ]".dimmed());

    println!();
    println!("{}", "Effective configuration:".bold());
    println!(
        "{}",
        toml::to_string_pretty(config).context("Failed to render configuration")?
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
