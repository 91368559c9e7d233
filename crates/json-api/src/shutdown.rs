//! Graceful shutdown signal handling

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::{signal, sync::watch};

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),

    #[cfg(windows)]
    #[error("failed to install Windows terminate handler: {0}")]
    Terminate(#[source] io::Error),
}

/// Wait for a shutdown signal, tell background tasks, then stop the server gracefully.
pub(crate) async fn listen(
    handle: ServerHandle,
    stopping: watch::Sender<bool>,
) -> Result<(), ShutdownSignalError> {
    let ctrl_c = async { signal::ctrl_c().await.map_err(ShutdownSignalError::CtrlC) };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(ShutdownSignalError::SigTerm)?
            .recv()
            .await;
        Ok::<(), ShutdownSignalError>(())
    };

    #[cfg(windows)]
    let terminate = async {
        signal::windows::ctrl_close()
            .map_err(ShutdownSignalError::Terminate)?
            .recv()
            .await;
        Ok::<(), ShutdownSignalError>(())
    };

    tokio::select! {
        result = ctrl_c => {
            result?;
            tracing::info!("ctrl_c signal received");
        }
        result = terminate => {
            result?;
            tracing::info!("terminate signal received");
        }
    };

    stopping.send_replace(true);
    handle.stop_graceful(None);

    Ok(())
}

/// Resolves once [`listen`] has seen a shutdown signal, or its sender is gone.
pub(crate) async fn stopped(mut stopping: watch::Receiver<bool>) {
    _ = stopping.wait_for(|stopping| *stopping).await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn stopped_resolves_when_shutdown_is_sent() -> TestResult {
        let (sender, receiver) = watch::channel(false);

        let waiter = tokio::spawn(stopped(receiver));

        sender.send_replace(true);

        tokio::time::timeout(Duration::from_secs(1), waiter).await??;

        Ok(())
    }

    #[tokio::test]
    async fn stopped_resolves_when_sender_is_dropped() -> TestResult {
        let (sender, receiver) = watch::channel(false);

        drop(sender);

        tokio::time::timeout(Duration::from_secs(1), stopped(receiver)).await?;

        Ok(())
    }
}
