//! The handset environment phone actions run against.

use crate::phone::PhoneId;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Something a phone's hardware did in response to an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HandsetEvent {
    Dialed { phone: PhoneId, callee: String },
    TimerStarted { phone: PhoneId, at: DateTime<Utc> },
    TimerStopped { phone: PhoneId, at: DateTime<Utc> },
    Muted { phone: PhoneId },
    Unmuted { phone: PhoneId },
    VolumeSet { phone: PhoneId, level: i64 },
    Wrecked { phone: PhoneId },
}

impl HandsetEvent {
    /// The phone the event happened on.
    pub fn phone(&self) -> PhoneId {
        match self {
            Self::Dialed { phone, .. }
            | Self::TimerStarted { phone, .. }
            | Self::TimerStopped { phone, .. }
            | Self::Muted { phone }
            | Self::Unmuted { phone }
            | Self::VolumeSet { phone, .. }
            | Self::Wrecked { phone } => *phone,
        }
    }
}

/// Shared handset hardware for every phone driven by one machine.
///
/// Cloning shares the same event journal.
#[derive(Clone, Debug, Default)]
pub struct Handset {
    events: Arc<Mutex<Vec<HandsetEvent>>>,
}

impl Handset {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn dial(&self, phone: PhoneId, callee: &str) {
        info!(phone, callee, "call placed");
        self.record(HandsetEvent::Dialed {
            phone,
            callee: callee.to_string(),
        });
    }

    pub(crate) fn start_timer(&self, phone: PhoneId) {
        let at = Utc::now();
        info!(phone, at = %at.format("%H:%M"), "call timer started");
        self.record(HandsetEvent::TimerStarted { phone, at });
    }

    pub(crate) fn stop_timer(&self, phone: PhoneId) {
        let at = Utc::now();
        info!(phone, at = %at.format("%H:%M"), "call timer stopped");
        self.record(HandsetEvent::TimerStopped { phone, at });
    }

    pub(crate) fn mute(&self, phone: PhoneId) {
        info!(phone, "microphone muted");
        self.record(HandsetEvent::Muted { phone });
    }

    pub(crate) fn unmute(&self, phone: PhoneId) {
        info!(phone, "microphone unmuted");
        self.record(HandsetEvent::Unmuted { phone });
    }

    pub(crate) fn set_volume(&self, phone: PhoneId, level: i64) {
        info!(phone, level, "volume set");
        self.record(HandsetEvent::VolumeSet { phone, level });
    }

    pub(crate) fn wreck(&self, phone: PhoneId) {
        info!(phone, "phone wrecked");
        self.record(HandsetEvent::Wrecked { phone });
    }

    /// Every event so far, in the order it happened.
    pub fn events(&self) -> Vec<HandsetEvent> {
        self.events.lock().clone()
    }

    /// Events for one phone, in the order they happened.
    pub fn events_for(&self, phone: PhoneId) -> Vec<HandsetEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.phone() == phone)
            .cloned()
            .collect()
    }

    fn record(&self, event: HandsetEvent) {
        self.events.lock().push(event);
    }
}
