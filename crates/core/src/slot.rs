//! Per-slot image load coordination.
//!
//! An [`ImageSlot`] owns at most one in-flight image fetch for one visible
//! list position. Fetches run on spawned tasks and post a [`Delivery`] to a
//! channel shared by all slots of a list. The owner drains that channel on
//! its own context and hands each delivery back to its slot with
//! [`ImageSlot::apply`], which drops anything that is no longer current.
//!
//! Every fetch is tagged with the slot's generation. Cancelling (on
//! reassignment or when the slot leaves the screen) bumps the generation and
//! aborts the task. A task that already posted its result before being
//! aborted is still filtered out by the generation check.

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::loader::ImageLoader;

/// Index of a slot within its list.
pub type SlotId = usize;

/// Lifecycle of an [`ImageSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No fetch in flight.
    Idle,
    /// A fetch for the current identity is in flight.
    Loading,
    /// The last fetch for the current identity finished.
    Loaded,
}

/// Result of a slot fetch, posted from the fetch task.
#[derive(Debug, Clone)]
pub struct Delivery {
    slot: SlotId,
    generation: u64,
    key: String,
    image: Option<Bytes>,
}

impl Delivery {
    /// The slot this delivery belongs to.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// A delivery accepted by its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub key: String,
    /// `None` when the fetch failed.
    pub image: Option<Bytes>,
}

/// Create the channel slots post their deliveries to.
pub fn channel() -> (mpsc::UnboundedSender<Delivery>, mpsc::UnboundedReceiver<Delivery>) {
    mpsc::unbounded_channel()
}

/// One list position's image fetch.
pub struct ImageSlot<L> {
    id: SlotId,
    loader: Arc<L>,
    deliveries: mpsc::UnboundedSender<Delivery>,
    identity: Option<String>,
    state: SlotState,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl<L: ImageLoader + 'static> ImageSlot<L> {
    pub fn new(id: SlotId, loader: Arc<L>, deliveries: mpsc::UnboundedSender<Delivery>) -> Self {
        Self { id, loader, deliveries, identity: None, state: SlotState::Idle, generation: 0, task: None }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    /// Point the slot at a new image key.
    ///
    /// Keeps a fetch already in flight for the same key; otherwise cancels the
    /// current fetch and starts one for `key`.
    pub fn on_identity_changed(&mut self, key: impl Into<String>) {
        let key = key.into();
        if self.state == SlotState::Loading && self.identity.as_deref() == Some(key.as_str()) {
            return;
        }
        self.identity = Some(key);
        self.start();
    }

    /// The slot scrolled into view.
    pub fn on_visible(&mut self) {
        if self.state != SlotState::Loading && self.identity.is_some() {
            self.start();
        }
    }

    /// The slot scrolled out of view. Any in-flight fetch is cancelled.
    pub fn on_invisible(&mut self) {
        self.cancel();
        self.state = SlotState::Idle;
    }

    /// Accept a delivery if it belongs to this slot's live fetch.
    ///
    /// Returns `None` for deliveries from superseded or cancelled fetches.
    pub fn apply(&mut self, delivery: Delivery) -> Option<LoadedImage> {
        if delivery.slot != self.id || delivery.generation != self.generation || self.state != SlotState::Loading {
            tracing::trace!(slot = self.id, key = %delivery.key, "dropping stale delivery");
            return None;
        }

        self.state = SlotState::Loaded;
        self.task = None;
        Some(LoadedImage { key: delivery.key, image: delivery.image })
    }

    fn start(&mut self) {
        self.cancel();
        let Some(key) = self.identity.clone() else {
            return;
        };

        let loader = Arc::clone(&self.loader);
        let deliveries = self.deliveries.clone();
        let slot = self.id;
        let generation = self.generation;

        self.task = Some(tokio::spawn(async move {
            let image = match loader.load(&key).await {
                Ok(data) => Some(data),
                Err(e) => {
                    tracing::debug!(slot, key = %key, error = %e, "image load failed");
                    None
                }
            };
            // the receiver may be gone if the list was torn down
            let _ = deliveries.send(Delivery { slot, generation, key, image });
        }));
        self.state = SlotState::Loading;
    }

    fn cancel(&mut self) {
        self.generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<L> Drop for ImageSlot<L> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
