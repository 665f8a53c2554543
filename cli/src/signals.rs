//! Save-on-signal
//!
//! A dedicated thread waits for SIGINT or SIGTERM, writes the last
//! published session snapshot and exits the process.

use geode_core::SessionManager;
use std::io;

pub fn spawn_save_on_signal(session: SessionManager) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::Builder::new()
        .name("geode-signals".to_string())
        .spawn(move || {
            let signal = runtime.block_on(wait_for_shutdown());
            tracing::info!(signal, "Shutting down");

            match session.save_latest() {
                Ok(saved) => tracing::debug!(saved, "Session saved on signal"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to save session");
                    eprintln!("error: failed to save session: {e}");
                }
            }
            std::process::exit(0);
        })?;

    Ok(())
}

#[cfg(unix)]
async fn wait_for_shutdown() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => "SIGINT",
                _ = terminate.recv() => "SIGTERM",
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM");
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "ctrl-c"
}
