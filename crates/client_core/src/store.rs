//! In-memory collections for the three workflow phases.

use shared::domain::{DiscoveredAttendee, DiscoveredEvent, Username};
use tracing::{debug, info};

use crate::{
    error::{ClientError, Result},
    selection::{SelectAllState, SelectionSet},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    Pending,
    Sent,
    Failed(String),
}

impl EntryStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueuedAttendee {
    pub attendee: DiscoveredAttendee,
    pub status: EntryStatus,
}

impl QueuedAttendee {
    pub fn username(&self) -> &Username {
        &self.attendee.username
    }
}

/// Ordered, username-deduplicated list of attendees awaiting an action.
#[derive(Debug, Default, Clone)]
pub struct NotificationQueue {
    entries: Vec<QueuedAttendee>,
}

impl NotificationQueue {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[QueuedAttendee] {
        &self.entries
    }

    pub fn contains(&self, username: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.username().as_str() == username)
    }

    pub fn get(&self, username: &str) -> Option<&QueuedAttendee> {
        self.entries
            .iter()
            .find(|entry| entry.username().as_str() == username)
    }

    /// Appends `attendee` as pending unless its username is already queued.
    pub fn push(&mut self, attendee: DiscoveredAttendee) -> bool {
        if self.contains(attendee.username.as_str()) {
            return false;
        }
        self.entries.push(QueuedAttendee {
            attendee,
            status: EntryStatus::Pending,
        });
        true
    }

    pub fn remove(&mut self, username: &str) -> Option<QueuedAttendee> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry.username().as_str() == username)?;
        Some(self.entries.remove(idx))
    }

    /// Updates the status of `username` in place; false when it is no longer queued.
    pub fn set_status(&mut self, username: &str, status: EntryStatus) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.username().as_str() == username)
        {
            Some(entry) => {
                entry.status = status;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnqueueOutcome {
    pub added: usize,
    pub already_queued: usize,
}

/// Owns discovered events and attendees, the attendee selection, and the
/// notification queue for one session.
#[derive(Debug, Default)]
pub struct PhaseStore {
    events: Vec<DiscoveredEvent>,
    attendees: Vec<DiscoveredAttendee>,
    selection: SelectionSet,
    queue: NotificationQueue,
}

impl PhaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DiscoveredEvent] {
        &self.events
    }

    pub fn attendees(&self) -> &[DiscoveredAttendee] {
        &self.attendees
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn queue(&self) -> &NotificationQueue {
        &self.queue
    }

    pub fn set_events(&mut self, events: Vec<DiscoveredEvent>) {
        info!(count = events.len(), "events replaced");
        self.events = events;
    }

    /// Replaces the attendee collection and drops every selected username.
    pub fn set_attendees(&mut self, attendees: Vec<DiscoveredAttendee>) {
        info!(
            count = attendees.len(),
            dropped_selection = self.selection.size(),
            "attendees replaced"
        );
        self.attendees = attendees;
        self.selection.clear();
    }

    /// Toggles a username that must belong to the current attendee collection.
    pub fn toggle(&mut self, username: &str) -> Result<bool> {
        let Some(attendee) = self
            .attendees
            .iter()
            .find(|attendee| attendee.username.as_str() == username)
        else {
            return Err(ClientError::validation(format!(
                "'{username}' is not in the current attendee list"
            )));
        };
        Ok(self.selection.toggle(&attendee.username))
    }

    pub fn select_all(&mut self) {
        self.selection
            .select_all(self.attendees.iter().map(|attendee| &attendee.username));
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn select_all_state(&self) -> SelectAllState {
        self.selection.tri_state(self.attendees.len())
    }

    /// Queues every selected attendee, in attendee-list order. Usernames that
    /// are already queued are skipped. An empty selection is a no-op.
    pub fn enqueue_selected(&mut self) -> EnqueueOutcome {
        let mut outcome = EnqueueOutcome::default();
        for attendee in &self.attendees {
            if !self.selection.is_selected(attendee.username.as_str()) {
                continue;
            }
            if self.queue.push(attendee.clone()) {
                outcome.added += 1;
            } else {
                outcome.already_queued += 1;
            }
        }
        debug!(
            added = outcome.added,
            already_queued = outcome.already_queued,
            queue_len = self.queue.len(),
            "selection enqueued"
        );
        outcome
    }

    /// Removes `username` from the queue whatever its status, and from the selection.
    pub fn dequeue(&mut self, username: &str) -> bool {
        let removed = self.queue.remove(username).is_some();
        let deselected = self.selection.remove(username);
        debug!(username, removed, deselected, "dequeued");
        removed
    }

    pub fn set_entry_status(&mut self, username: &str, status: EntryStatus) -> bool {
        self.queue.set_status(username, status)
    }
}
