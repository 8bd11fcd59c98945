use std::sync::Arc;
use tokio::sync::watch;
use treescope_api::RefreshEvent;

/// Latest refresh handed to the view, tagged with the tree generation it
/// was computed from.
#[derive(Debug, Clone, Default)]
pub struct Published {
    pub generation: u64,
    pub event: Option<Arc<RefreshEvent>>,
}

/// Last-write-wins channel for refresh events.
///
/// A refresh computed from a tree older than the one already published is
/// dropped, so a slow refresh can never overwrite a newer view.
pub struct RefreshPublisher {
    tx: watch::Sender<Published>,
}

impl Default for RefreshPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshPublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Published::default());
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.tx.subscribe()
    }

    /// Publish `event` unless a newer generation is already out.
    /// Returns whether the event was published.
    pub fn publish(&self, generation: u64, event: RefreshEvent) -> bool {
        let published = self.tx.send_if_modified(|current| {
            if current.event.is_some() && generation < current.generation {
                return false;
            }
            current.generation = generation;
            current.event = Some(Arc::new(event));
            true
        });
        if !published {
            tracing::debug!(generation, "Discarded stale refresh");
        }
        published
    }

    pub fn latest(&self) -> Published {
        self.tx.borrow().clone()
    }
}
