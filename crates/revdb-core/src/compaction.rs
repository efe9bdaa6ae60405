//! Periodic retention compaction.
//!
//! Runs [`VersionedStore::compact`] on a fixed interval until cancelled. The
//! sweep takes the same lock as every CRUD operation, so it never observes a
//! partially applied revision.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::CompactionConfig;
use crate::store::VersionedStore;

/// Background task trimming revision logs to a bounded tail.
pub struct Compactor;

impl Compactor {
    /// Spawn the compaction loop on the current tokio runtime.
    ///
    /// The first sweep happens one full interval after spawning. The loop exits
    /// as soon as `cancel` fires; an in-progress sweep always runs to completion.
    pub fn spawn(
        store: Arc<VersionedStore>,
        config: CompactionConfig,
        cancel: CancellationToken,
    ) -> CompactorHandle {
        let task_cancel = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = time::interval(config.interval.max(Duration::from_secs(1)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick completes immediately
            ticker.tick().await;

            info!(
                interval_secs = config.interval.as_secs(),
                retention = config.retention,
                "Compaction task started"
            );

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!("Starting periodic compaction");
                        let report = store.compact(config.retention);
                        info!(
                            keys_compacted = report.keys_compacted,
                            revisions_dropped = report.revisions_dropped,
                            "Compaction complete"
                        );
                    }
                }
            }

            info!("Compaction task stopped");
        });

        CompactorHandle { cancel, task }
    }
}

/// Handle to a running compaction task.
pub struct CompactorHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl CompactorHandle {
    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the task to stop and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Application;

    fn store_with_history(updates: usize) -> Arc<VersionedStore> {
        let store = Arc::new(VersionedStore::new());
        store.create(&Application::new("nginx", "0")).unwrap();
        for v in 1..=updates {
            store
                .update(&Application::new("nginx", v.to_string()))
                .unwrap();
        }
        store
    }

    #[tokio::test(start_paused = true)]
    async fn test_compacts_after_interval() {
        let store = store_with_history(4);
        let config = CompactionConfig::default()
            .with_interval(Duration::from_secs(60))
            .with_retention(2);

        let handle = Compactor::spawn(store.clone(), config, CancellationToken::new());

        // nothing happens before the first full interval
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(store.dump_key("nginx").unwrap().len(), 5);

        time::sleep(Duration::from_secs(31)).await;
        let history = store.dump_key("nginx").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].resource_version, "4");

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_task() {
        let store = store_with_history(0);
        let cancel = CancellationToken::new();
        let handle = Compactor::spawn(store, CompactionConfig::default(), cancel.clone());

        cancel.cancel();
        time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
        handle.shutdown().await;
    }
}
