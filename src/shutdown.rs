//! Process termination signals: Ctrl-C everywhere, plus SIGTERM on unix.

use std::io;
use tracing::warn;

pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Registers the handlers right away, so a signal that arrives before
    /// `recv` is polled is not lost. Needs a running tokio runtime.
    pub fn install() -> io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            Ok(Self {
                terminate: signal(SignalKind::terminate())?,
            })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Resolves on the first Ctrl-C or SIGTERM.
    pub async fn recv(&mut self) {
        #[cfg(unix)]
        tokio::select! {
            _ = ctrl_c() => {}
            _ = self.terminate.recv() => {}
        }

        #[cfg(not(unix))]
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a Ctrl-C handler only the other signals can stop us
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn sigterm_ends_the_wait() {
        let mut signal = ShutdownSignal::install().unwrap();

        let early = tokio::time::timeout(Duration::from_millis(50), signal.recv()).await;
        assert!(early.is_err(), "no signal has been sent yet");

        let status = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        tokio::time::timeout(Duration::from_secs(5), signal.recv())
            .await
            .expect("SIGTERM should end the wait");
    }
}
