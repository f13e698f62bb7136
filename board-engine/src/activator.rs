//! Periodic scheduled-booking activation task
//!
//! Drives `BoardManager::tick_scheduled_activation` on a fixed cadence, with
//! an immediate sweep on startup so bookings due while the process was down
//! are promoted right away.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::manager::BoardManager;

pub struct ActivationScheduler {
    manager: Arc<BoardManager>,
    shutdown: CancellationToken,
    interval: Duration,
}

impl ActivationScheduler {
    pub fn new(manager: Arc<BoardManager>, shutdown: CancellationToken) -> Self {
        let interval = Duration::from_secs(manager.config().activation_interval_secs);
        Self {
            manager,
            shutdown,
            interval,
        }
    }

    /// Main loop: immediate startup sweep, then fixed cadence
    pub async fn run(self) {
        info!("Activation scheduler started");
        self.sweep();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // interval fires immediately; the startup sweep already ran
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("Activation scheduler received shutdown signal");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep();
                }
            }
        }
        info!("Activation scheduler stopped");
    }

    fn sweep(&self) {
        let activated = self.manager.tick_scheduled_activation(Utc::now());
        if !activated.is_empty() {
            info!(count = activated.len(), "Activation sweep promoted bookings");
        }
    }
}
