// Event streaming for Dashboard
//
// Uses tokio broadcast channel to notify SSE clients of report updates

use crate::report::ReportKind;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event sent to Dashboard clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEvent {
    /// Timestamp (ISO 8601)
    pub timestamp: String,
    /// Event type
    pub event_type: ReportEventType,
    /// Report that changed
    pub kind: ReportKind,
    /// Snapshot version after the change
    pub version: String,
    pub percent_complete: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportEventType {
    /// A new report snapshot was stored
    ReportUpdated,
    /// A checklist item changed
    ChecklistUpdated,
}

/// Event broadcaster for Dashboard
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<ReportEvent>,
}

impl EventBroadcaster {
    /// Create a new broadcaster with buffer size
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event to all subscribers
    pub fn broadcast(&self, event: ReportEvent) {
        // Ignore error if no subscribers
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<ReportEvent> {
        self.sender.subscribe()
    }

    /// Get number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}
