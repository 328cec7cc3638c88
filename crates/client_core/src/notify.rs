//! Inline error slots and self-dismissing transient notices.

use std::{collections::HashMap, sync::Arc, time::Duration};

use tokio::sync::{broadcast, Mutex};
use tracing::debug;

use crate::ClientEvent;

/// How long a transient notice stays visible before it removes itself.
pub const TRANSIENT_DISMISS_DELAY: Duration = Duration::from_millis(3000);

/// Fixed inline error regions. Each holds at most one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSlot {
    Login,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientNotice {
    pub id: u64,
    pub message: String,
}

#[derive(Default)]
struct NotifyState {
    slots: HashMap<ErrorSlot, String>,
    notices: Vec<TransientNotice>,
    next_notice_id: u64,
}

pub struct NotificationCenter {
    inner: Arc<Mutex<NotifyState>>,
    events: broadcast::Sender<ClientEvent>,
}

impl NotificationCenter {
    pub(crate) fn new(events: broadcast::Sender<ClientEvent>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(NotifyState::default())),
            events,
        }
    }

    /// Latest write wins; any previous message in the slot is replaced.
    pub async fn set_slot_error(&self, slot: ErrorSlot, message: impl Into<String>) {
        let message = message.into();
        self.inner.lock().await.slots.insert(slot, message.clone());
        let _ = self.events.send(ClientEvent::SlotErrorChanged {
            slot,
            message: Some(message),
        });
    }

    pub async fn clear_slot_error(&self, slot: ErrorSlot) {
        let cleared = self.inner.lock().await.slots.remove(&slot).is_some();
        if cleared {
            let _ = self
                .events
                .send(ClientEvent::SlotErrorChanged { slot, message: None });
        }
    }

    pub async fn slot_error(&self, slot: ErrorSlot) -> Option<String> {
        self.inner.lock().await.slots.get(&slot).cloned()
    }

    /// Posts a floating notice that removes itself after
    /// [`TRANSIENT_DISMISS_DELAY`]. Notices stack; each runs its own timer.
    pub async fn notify_success(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let id = {
            let mut state = self.inner.lock().await;
            state.next_notice_id += 1;
            let id = state.next_notice_id;
            state.notices.push(TransientNotice {
                id,
                message: message.clone(),
            });
            id
        };
        let _ = self.events.send(ClientEvent::NoticePosted { id, message });

        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(TRANSIENT_DISMISS_DELAY).await;
            inner.lock().await.notices.retain(|notice| notice.id != id);
            debug!(id, "transient notice expired");
            let _ = events.send(ClientEvent::NoticeExpired { id });
        });

        id
    }

    pub async fn active_notices(&self) -> Vec<TransientNotice> {
        self.inner.lock().await.notices.clone()
    }
}
