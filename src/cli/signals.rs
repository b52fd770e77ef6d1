//! OS signal forwarding into the interview controller

use tokio::sync::mpsc;
use tracing::info;

use crate::application::ControllerEvent;

/// Turn every SIGINT/SIGTERM into a controller `Shutdown` event.
///
/// Must be called from within a tokio runtime.
#[cfg(unix)]
pub fn forward_shutdown_signals(
    tx: mpsc::UnboundedSender<ControllerEvent>,
) -> Result<(), std::io::Error> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    // Keep listening: the handler replaces the default action, so every
    // later signal must still reach the controller.
    tokio::spawn(async move {
        loop {
            let name = tokio::select! {
                Some(()) = sigint.recv() => "SIGINT",
                Some(()) = sigterm.recv() => "SIGTERM",
                else => break,
            };
            info!(signal = name, "shutdown requested");
            if tx.send(ControllerEvent::Shutdown).is_err() {
                break;
            }
        }
    });

    Ok(())
}

#[cfg(not(unix))]
pub fn forward_shutdown_signals(
    tx: mpsc::UnboundedSender<ControllerEvent>,
) -> Result<(), std::io::Error> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            info!(signal = "ctrl-c", "shutdown requested");
            if tx.send(ControllerEvent::Shutdown).is_err() {
                break;
            }
        }
    });
    Ok(())
}
