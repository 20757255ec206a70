//! ipset-exporter
//!
//! Polls the kernel's ipsets and serves their entry counts on `/metrics`.
//! SIGINT/SIGTERM trigger a graceful shutdown bounded by five seconds.

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ipset_exporter::{cli::Cli, config, logging, source::IpsetCommand, Exporter};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match config::load_from_file(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            let _ = logging::init("info");
            tracing::error!(path = %cli.config.display(), error = %e, "failed to load configs");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init(&cfg.app.log_level) {
        eprintln!("ipset-exporter: {e}");
        return ExitCode::FAILURE;
    }
    tracing::info!(path = %cli.config.display(), "config loaded");

    let source = Arc::new(IpsetCommand::new(cfg.ipset.binary.clone()));
    let mut exporter = match Exporter::new(cfg.export_config(), source) {
        Ok(exporter) => exporter,
        Err(e) => {
            tracing::error!(error = %e, "could not create exporter");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = exporter.boot().await {
        tracing::error!(class = e.class().as_str(), error = %e, "could not boot application");
        return ExitCode::FAILURE;
    }

    shutdown_signal().await;

    match exporter.shutdown(SHUTDOWN_TIMEOUT).await {
        Ok(()) => {
            tracing::info!("shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(class = e.class().as_str(), error = %e, "server shutdown failed");
            ExitCode::FAILURE
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
