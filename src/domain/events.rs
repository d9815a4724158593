//! Domain events for the application.
//!
//! Event types sent via the event bus to notify subscribers of cache
//! and session state changes.

use serde::Serialize;

/// Events published on the broadcast bus while operations run.
///
/// Every remote-backed operation announces its start and its outcome,
/// which is how consumers observe the Loading/Success/Error lifecycle
/// without polling.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum NotificationEvent {
    RefreshStarted,
    RefreshFinished {
        count: usize,
    },

    SearchStarted {
        character: String,
    },
    SearchFinished {
        character: String,
        count: usize,
    },

    FavoriteToggled {
        id: i32,
        favorite: bool,
    },

    SignedIn {
        email: String,
    },
    SignedOut,

    Error {
        message: String,
    },
}
