//! Run command - poll and act, one action per cycle

use crate::cli::context::CommandContext;
use anyhow::Result;
use mergerine::execute::{ExecuteOptions, report, run_cycle, run_until};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Run cycles on the configured interval until SIGINT or SIGTERM
///
/// With `once` a single cycle runs and its error is returned.
pub async fn run_loop(ctx: &CommandContext, once: bool) -> Result<()> {
    let decide_options = ctx.config.decide_options();
    let execute_options = ExecuteOptions {
        dry: ctx.config.dry,
        delete_branch_after_merge: ctx.config.delete_branch_after_merge,
    };
    let platform = ctx.platform.as_ref();

    if once {
        let outcome = run_cycle(&decide_options, &execute_options, platform).await?;
        report(&outcome);
        return Ok(());
    }

    // Handlers are registered before the first cycle starts
    let signal_task = spawn_signal_listener()?;
    let shutdown = async {
        let _ = signal_task.await;
    };

    run_until(
        &decide_options,
        &execute_options,
        platform,
        Duration::from_millis(ctx.config.interval_ms),
        shutdown,
    )
    .await;
    Ok(())
}

#[cfg(unix)]
fn spawn_signal_listener() -> Result<JoinHandle<()>> {
    use anyhow::Context;
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigterm = signal(SignalKind::terminate()).context("failed to register SIGTERM")?;
    let mut sigint = signal(SignalKind::interrupt()).context("failed to register SIGINT")?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("received SIGTERM"),
            _ = sigint.recv() => info!("received SIGINT"),
        }
    }))
}

#[cfg(not(unix))]
fn spawn_signal_listener() -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl-C");
        }
    }))
}
