//! Activity Tracking
//!
//! Fire-and-forget last-activity stamping. Resolvers enqueue an event on
//! a bounded channel and return immediately; a consumer task drains the
//! channel and writes the timestamp. Ordering relative to the enqueue is
//! unspecified, and a full queue drops the event rather than blocking
//! the request path.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::login::repository::LoginRepository;
use crate::shared::error::Result;

/// One "login was seen" observation.
#[derive(Debug, Clone)]
pub struct ActivityEvent {
    pub login_id: String,
    pub seen_at: DateTime<Utc>,
}

/// Producer handle. Cheap to clone; dropping every handle stops the
/// consumer.
#[derive(Clone)]
pub struct ActivityTracker {
    sender: mpsc::Sender<ActivityEvent>,
}

impl ActivityTracker {
    /// Create a tracker and the receiving end for its consumer.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ActivityEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Enqueue an observation. Never blocks; a full or closed queue
    /// drops the event with a warning. Activity stamps are best-effort.
    pub fn record(&self, login_id: &str) {
        let event = ActivityEvent {
            login_id: login_id.to_string(),
            seen_at: Utc::now(),
        };
        if let Err(e) = self.sender.try_send(event) {
            warn!(error = %e, "activity event dropped");
        }
    }
}

/// Drains activity events and stamps the corresponding records.
pub struct ActivityConsumer {
    repository: Arc<dyn LoginRepository>,
    receiver: mpsc::Receiver<ActivityEvent>,
}

impl ActivityConsumer {
    pub fn new(
        repository: Arc<dyn LoginRepository>,
        receiver: mpsc::Receiver<ActivityEvent>,
    ) -> Self {
        Self { repository, receiver }
    }

    /// Process events until every tracker handle has been dropped.
    /// Store faults are logged and skipped; one bad record must not
    /// stall the queue.
    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            if let Err(e) = self.apply(&event).await {
                warn!(login_id = %event.login_id, error = %e, "failed to record activity");
            }
        }
        debug!("activity consumer stopped");
    }

    async fn apply(&self, event: &ActivityEvent) -> Result<()> {
        // Records deleted between enqueue and drain are skipped silently.
        if let Some(mut login) = self.repository.find_by_id(&event.login_id).await? {
            login.mark_seen(event.seen_at);
            self.repository.save(&login, None).await?;
        }
        Ok(())
    }
}
