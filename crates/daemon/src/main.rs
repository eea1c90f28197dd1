//! `foremand`: the long-running orchestrator process (§4.7). Wires the
//! registry, dispatch pipeline, health checker, and heartbeat engine
//! together and drives the tick loop until interrupted.

mod adapters;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use foreman_core::SystemClock;
use foreman_dispatch::attachments::NoAttachments;
use foreman_heartbeat::{HeartbeatEngine, NoopGitPuller};
use foreman_notify::TemplatedNotifier;
use foreman_registry::{AuditLog, RegistryStore};

use adapters::{NoopChatAdapter, NoopIssueProvider, NoopSessionRegistry};

/// Drive issues through a configurable workflow by dispatching LLM worker
/// sessions against an issue tracker and a chat channel.
#[derive(Parser, Debug)]
#[command(name = "foremand", version, about)]
struct Cli {
    /// Workspace directory holding `foreman-state.json`, `foreman.yaml`,
    /// and `projects/<slug>.yaml`.
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Heartbeat cadence in seconds, overriding every project's resolved
    /// `heartbeat_interval_secs` for this process.
    #[arg(long)]
    interval_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let workspace = cli.workspace.canonicalize().unwrap_or(cli.workspace);

    tracing::info!(workspace = %workspace.display(), "starting foreman daemon");

    let registry = Arc::new(RegistryStore::new(&workspace));
    let audit = Arc::new(AuditLog::new(&workspace));

    let engine = Arc::new(HeartbeatEngine::new(
        Arc::new(NoopIssueProvider),
        Arc::new(NoopSessionRegistry),
        TemplatedNotifier::new(NoopChatAdapter),
        Arc::new(NoAttachments),
        Arc::new(NoopGitPuller),
        registry,
        audit,
        SystemClock,
        &workspace,
    ));

    let interval_secs = cli.interval_secs.unwrap_or(60);
    let cancel = CancellationToken::new();

    let run_handle = tokio::spawn({
        let engine = engine.clone();
        let cancel = cancel.clone();
        async move { engine.run(interval_secs, cancel).await }
    });

    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("received ctrl-c, shutting down after the in-flight tick");
    }
    cancel.cancel();
    let _ = run_handle.await;

    tracing::info!("foreman daemon stopped");
    Ok(())
}
