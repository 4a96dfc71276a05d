//! Client-side core of the event outreach workflow.
//!
//! Discovery fills a [`PhaseStore`] with events and attendees, the user picks
//! attendees through a [`SelectionSet`], "send to notifications" moves them
//! into the [`NotificationQueue`], and an [`ActionDispatcher`] performs one
//! bulk social action over a snapshot of that queue. [`PhaseController`]
//! tracks which of the three phases has focus, and [`Session`] maps
//! front-end [`UiAction`]s onto all of the above.

pub mod controller;
pub mod discovery;
pub mod dispatcher;
pub mod error;
pub mod selection;
pub mod store;
pub mod transport;

pub use controller::{
    events::{HealthSnapshot, UiError, UiErrorCategory, UiErrorContext, UiEvent},
    orchestration::{action_name, Session, UiAction},
    NotificationRow, NotificationView, Phase, PhaseController, EMPTY_QUEUE_MESSAGE,
};
pub use discovery::{
    AttendeeCriteria, EventCriteria, DEFAULT_MAX_RESULTS, MAX_RESULTS, MIN_RESULTS,
};
pub use dispatcher::{
    reconcile, ActionChoice, ActionDispatcher, DispatchOutcome, DispatchSummary, EntryResult,
};
pub use error::{ClientError, Result};
pub use selection::{SelectAllState, SelectionSet};
pub use store::{EnqueueOutcome, EntryStatus, NotificationQueue, PhaseStore, QueuedAttendee};
pub use transport::{EventApi, HttpEventApi, DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;
