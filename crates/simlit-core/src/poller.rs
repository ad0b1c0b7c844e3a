use crate::gateway::ResearchGateway;
use parking_lot::RwLock;
use simlit_model::{Notification, UserId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cancellable background task refreshing one user's notification feed.
///
/// The fetched list replaces the shared store wholesale: the feed is
/// server-owned and the poller never merges locally. A failed poll leaves
/// the store untouched and the next tick retries.
pub struct NotificationPoller {
    shutdown: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    /// Spawns the poll loop. The first fetch happens immediately, then once
    /// per `period`.
    #[must_use]
    pub fn spawn<G>(
        gateway: Arc<G>,
        user_id: UserId,
        store: Arc<RwLock<Vec<Notification>>>,
        period: Duration,
    ) -> Self
    where
        G: ResearchGateway + 'static,
    {
        let (shutdown, mut rx) = mpsc::channel::<()>(1);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match gateway.fetch_notifications(user_id).await {
                            Ok(feed) => {
                                *store.write() = feed;
                            }
                            Err(e) => {
                                tracing::warn!(user = %user_id, error = %e, "notification poll failed");
                            }
                        }
                    }
                    _ = rx.recv() => {
                        tracing::debug!(user = %user_id, "notification poller stopping");
                        break;
                    }
                }
            }
        });
        Self { shutdown, handle }
    }

    /// Stops the loop and waits for the task to exit. After this resolves
    /// no further fetch can run.
    pub async fn stop(self) {
        let _ = self.shutdown.send(()).await;
        let _ = self.handle.await;
    }
}
