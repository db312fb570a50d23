//! Toxiguard
//!
//! Toxic comment detection: every comment is classified before it is saved,
//! flagged comments wait for the author to edit, accept or cancel them, and
//! moderators read reports over everything that was stored.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::{BufRead, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use toxiguard_core::{Author, Label};
use toxiguard_moderation::{random_author, SubmitOutcome};
use toxiguard_reporting::{ExportFormat, Reporter};
use toxiguard_server::auth::hash_password;
use toxiguard_server::cli::{Cli, Commands};
use toxiguard_server::state::build_workflow;
use toxiguard_server::{run_server, AppConfig, AppState};
use toxiguard_store::{open_store, CommentQuery};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = cli.overrides();
    let load_config = || -> Result<AppConfig> {
        let mut config = AppConfig::load(cli.config.as_deref())?;
        config.apply_overrides(&overrides);
        Ok(config)
    };

    match &cli.command {
        Commands::Serve { .. } => serve(load_config()?).await,
        Commands::Submit {
            text,
            author,
            accept_anyway,
        } => submit(&load_config()?, text, author.as_deref(), *accept_anyway).await,
        Commands::Report { top } => report(&load_config()?, *top),
        Commands::Export {
            format,
            output,
            label,
        } => export(&load_config()?, *format, output.as_ref(), *label),
        Commands::HashPassword { password } => print_hash(password.clone()),
    }
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting Toxiguard");

    let metrics_handle = init_metrics()?;
    let state = AppState::from_config(&config)
        .context("failed to initialise application state")?
        .with_metrics(metrics_handle);

    if config.admin.password_hash.is_none() {
        warn!("No admin password hash configured, admin login is disabled");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.listen, config.server.port).parse()?;

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    run_server(state, &config.server.cors_origins, addr, shutdown).await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn submit(config: &AppConfig, text: &str, author: Option<&str>, accept_anyway: bool) -> Result<()> {
    let workflow = build_workflow(config)?;
    let author = author.map(Author::new).unwrap_or_else(random_author);

    match workflow.submit(author, text).await? {
        SubmitOutcome::Accepted { comment } => {
            println!("Comment posted as {} ({})", comment.author, comment.id);
        }
        SubmitOutcome::Flagged { draft } if accept_anyway => {
            let comment = workflow.accept_anyway(&draft.id).await?;
            println!("Comment flagged as toxic, saved anyway ({})", comment.id);
        }
        SubmitOutcome::Flagged { draft } => {
            let score = draft
                .score
                .map(|s| format!(" (score {s:.2})"))
                .unwrap_or_default();
            println!("Comment flagged as toxic{score}; nothing was saved.");
            println!("Edit the text, or re-run with --accept-anyway to save it as is.");
        }
    }
    Ok(())
}

fn report(config: &AppConfig, top: usize) -> Result<()> {
    let reporter = Reporter::new(open_store(&config.store)?);
    print!("{}", reporter.render_text(top)?);
    Ok(())
}

fn export(config: &AppConfig, format: ExportFormat, output: Option<&PathBuf>, label: Option<Label>) -> Result<()> {
    let reporter = Reporter::new(open_store(&config.store)?);
    let query = CommentQuery {
        label,
        ..Default::default()
    };

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(std::io::BufWriter::new(
            std::fs::File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(std::io::stdout().lock()),
    };

    let rows = reporter.export(&query, format, writer)?;
    if let Some(path) = output {
        eprintln!("Exported {} comments to {}", rows, path.display());
    }
    Ok(())
}

fn print_hash(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => {
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        anyhow::bail!("password must not be empty");
    }

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))?;
    println!("{hash}");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
}

/// Initialize tracing/logging on stderr
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("toxiguard=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("toxiguard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "toxiguard_submissions_total",
        "Submission workflow outcomes by type"
    );
    metrics::describe_histogram!(
        "toxiguard_classifier_latency_us",
        metrics::Unit::Microseconds,
        "Classifier call latency in microseconds"
    );
    metrics::describe_counter!(
        "toxiguard_store_appends_total",
        "Comments appended to the store by backend"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
