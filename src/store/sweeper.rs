use super::HandoffStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Periodic sweep task owned by the server lifecycle: started alongside
/// the store, aborted on shutdown. The store itself stays unaware of
/// scheduling.
pub struct Sweeper {
    handle: JoinHandle<()>,
}

impl Sweeper {
    pub fn start(store: Arc<dyn HandoffStore>, interval: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so a restart
            // doesn't sweep before the store has seen any traffic.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                match store.sweep(Utc::now()).await {
                    Ok(0) => debug!("Sweep found no expired transcriptions"),
                    Ok(removed) => info!("Swept {} expired transcription(s)", removed),
                    Err(e) => warn!("Sweep failed: {}", e),
                }
            }
        });

        Self { handle }
    }

    pub fn shutdown(self) {
        self.handle.abort();
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
