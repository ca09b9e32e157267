/// Cooperative shutdown for the render loop
///
/// SIGINT and SIGTERM only flip a flag. The loop reads it between
/// iterations, so a frame that is being composed or flushed always completes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    requested: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }
}

/// Route SIGINT and SIGTERM to `token`
///
/// Can only be installed once per process.
pub fn install_signal_handler(token: &ShutdownToken) -> Result<()> {
    let token = token.clone();
    ctrlc::set_handler(move || {
        if !token.is_requested() {
            info!("Shutdown signal received, finishing current frame");
        }
        token.request();
    })
    .context("Failed to install signal handler")
}
