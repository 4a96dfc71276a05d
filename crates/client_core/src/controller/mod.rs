//! Controller layer: phase focus, gated transitions, and command orchestration.

pub mod events;
pub mod orchestration;

use std::{fmt, str::FromStr};

use shared::domain::{EngagementType, Username};
use tracing::{info, warn};

use crate::{
    dispatcher::DispatchOutcome,
    error::{ClientError, Result},
    store::{EnqueueOutcome, EntryStatus, PhaseStore, QueuedAttendee},
};

pub const EMPTY_QUEUE_MESSAGE: &str = "No users queued for notifications";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Events,
    Attendees,
    Notifications,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Self::Events, Self::Attendees, Self::Notifications];

    pub fn label(self) -> &'static str {
        match self {
            Self::Events => "events",
            Self::Attendees => "attendees",
            Self::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Phase {
    type Err = ClientError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "events" | "event" => Ok(Self::Events),
            "attendees" | "attendee" | "users" => Ok(Self::Attendees),
            "notifications" | "notify" | "queue" => Ok(Self::Notifications),
            other => Err(ClientError::validation(format!("unknown tab '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRow {
    pub position: usize,
    pub username: Username,
    pub verified: bool,
    pub engagement: EngagementType,
    pub post_link: Option<String>,
    /// False when the service will reject the entry for lack of a tweet id.
    pub actionable: bool,
    pub status: EntryStatus,
}

impl NotificationRow {
    fn from_entry(position: usize, entry: &QueuedAttendee) -> Self {
        Self {
            position,
            username: entry.username().clone(),
            verified: entry.attendee.verified,
            engagement: entry.attendee.engagement_type,
            post_link: entry.attendee.post_link.clone(),
            actionable: entry.attendee.tweet_id().is_some(),
            status: entry.status.clone(),
        }
    }
}

/// Render model of the notifications table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationView {
    Empty { message: &'static str },
    Rows(Vec<NotificationRow>),
}

/// Three-state focus controller over a [`PhaseStore`]. Any phase can be
/// entered from any other; only entering `notifications` has a side effect.
#[derive(Debug)]
pub struct PhaseController {
    phase: Phase,
    store: PhaseStore,
    dispatch_in_flight: bool,
}

impl Default for PhaseController {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseController {
    pub fn new() -> Self {
        Self {
            phase: Phase::Events,
            store: PhaseStore::new(),
            dispatch_in_flight: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &PhaseStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PhaseStore {
        &mut self.store
    }

    pub fn is_dispatch_in_flight(&self) -> bool {
        self.dispatch_in_flight
    }

    /// Switches focus. Entering `notifications` always yields a fresh render,
    /// including when it is already the active phase.
    pub fn enter(&mut self, phase: Phase) -> Option<NotificationView> {
        if self.phase != phase {
            info!(from = %self.phase, to = %phase, "phase changed");
        }
        self.phase = phase;
        (phase == Phase::Notifications).then(|| self.notifications_view())
    }

    pub fn notifications_view(&self) -> NotificationView {
        let entries = self.store.queue().entries();
        if entries.is_empty() {
            return NotificationView::Empty {
                message: EMPTY_QUEUE_MESSAGE,
            };
        }
        NotificationView::Rows(
            entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| NotificationRow::from_entry(idx + 1, entry))
                .collect(),
        )
    }

    /// "Send selected to notifications": rejected when nothing is selected,
    /// otherwise enqueues the selection and moves focus to `notifications`.
    pub fn send_selected_to_notifications(
        &mut self,
    ) -> Result<(EnqueueOutcome, NotificationView)> {
        if self.store.selection().is_empty() {
            warn!("send to notifications rejected: empty selection");
            return Err(ClientError::validation("no users selected"));
        }
        let outcome = self.store.enqueue_selected();
        let view = self
            .enter(Phase::Notifications)
            .unwrap_or_else(|| self.notifications_view());
        Ok((outcome, view))
    }

    /// Marks a dispatch as outstanding and snapshots the queue it will act on.
    pub fn begin_dispatch(&mut self) -> Result<Vec<QueuedAttendee>> {
        if self.dispatch_in_flight {
            warn!("dispatch rejected: another dispatch is in flight");
            return Err(ClientError::validation(
                "an action is already in progress; wait for it to finish",
            ));
        }
        self.dispatch_in_flight = true;
        Ok(self.store.queue().entries().to_vec())
    }

    /// Clears the in-flight flag and writes per-entry results onto the live
    /// queue by username. Entries removed since the snapshot are skipped, and
    /// entries that got no result keep whatever status they already had.
    pub fn finish_dispatch(&mut self, outcome: Option<&DispatchOutcome>) -> NotificationView {
        self.dispatch_in_flight = false;
        if let Some(outcome) = outcome {
            let mut stale = 0usize;
            for result in &outcome.results {
                if result.status == EntryStatus::Pending {
                    continue;
                }
                if !self
                    .store
                    .set_entry_status(result.username.as_str(), result.status.clone())
                {
                    stale += 1;
                }
            }
            if stale > 0 {
                warn!(stale, "results for entries removed during dispatch were dropped");
            }
        }
        self.notifications_view()
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
