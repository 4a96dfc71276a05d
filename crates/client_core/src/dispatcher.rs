//! Bulk social actions over a snapshot of the notification queue.

use std::sync::Arc;

use shared::{
    domain::{ActionKind, Username},
    protocol::{ActionResultItem, SocialActionRequest, SocialActionResponse},
};
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, Result},
    store::{EntryStatus, QueuedAttendee},
    transport::EventApi,
};

const GENERIC_FAILURE: &str = "Unknown error";

/// The action a user picked, plus the message for comment/quote actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionChoice {
    pub action: ActionKind,
    pub message: Option<String>,
}

impl ActionChoice {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Message to put on the wire: trimmed, required for comment/quote and
    /// never sent for retweet/like.
    fn wire_message(&self) -> Result<Option<String>> {
        if !self.action.requires_message() {
            return Ok(None);
        }
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => Ok(Some(message.to_string())),
            _ => Err(ClientError::validation(format!(
                "a message is required for {} actions",
                self.action
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryResult {
    pub username: Username,
    pub status: EntryStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSummary {
    pub action: ActionKind,
    pub submitted: usize,
    pub sent: usize,
    pub failed: usize,
    /// Entries without a matching result item; they stay pending.
    pub unmatched: usize,
    pub reported_sent: Option<u64>,
    pub reported_failed: Option<u64>,
}

impl DispatchSummary {
    /// Reported counts disagreeing with the per-entry statuses.
    pub fn counts_disagree(&self) -> bool {
        let sent_mismatch = self
            .reported_sent
            .is_some_and(|reported| reported != self.sent as u64);
        let failed_mismatch = self
            .reported_failed
            .is_some_and(|reported| reported != self.failed as u64);
        sent_mismatch || failed_mismatch
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub summary: DispatchSummary,
    /// One per submitted entry, in submission order.
    pub results: Vec<EntryResult>,
}

pub struct ActionDispatcher {
    api: Arc<dyn EventApi>,
}

impl ActionDispatcher {
    pub fn new(api: Arc<dyn EventApi>) -> Self {
        Self { api }
    }

    /// Performs `choice` on every entry of `queue` with a single remote call.
    ///
    /// `queue` is the snapshot taken when the user triggered the action;
    /// results are paired with it by position. Validation failures return
    /// before anything is sent. Transport and service failures abort the whole
    /// batch, so no entry is reported as sent.
    pub async fn dispatch(
        &self,
        choice: &ActionChoice,
        queue: &[QueuedAttendee],
    ) -> Result<DispatchOutcome> {
        if queue.is_empty() {
            return Err(ClientError::validation(
                "no users queued for notifications",
            ));
        }
        let message = choice.wire_message()?;

        let request = SocialActionRequest {
            attendees: queue.iter().map(|entry| entry.attendee.clone()).collect(),
            message,
        };
        info!(
            action = %choice.action,
            operation = choice.action.operation(),
            attendees = request.attendees.len(),
            "dispatching bulk action"
        );

        let response = self.api.perform_action(choice.action, &request).await?;
        if response.is_failure() {
            return Err(ClientError::semantic(response.error));
        }

        let outcome = reconcile(choice.action, queue, &response);
        info!(
            action = %choice.action,
            sent = outcome.summary.sent,
            failed = outcome.summary.failed,
            unmatched = outcome.summary.unmatched,
            "bulk action completed"
        );
        Ok(outcome)
    }
}

/// Pairs snapshot entry `i` with result item `i`. Entries whose item is
/// missing, carries no status, or echoes a different username stay pending.
pub fn reconcile(
    action: ActionKind,
    snapshot: &[QueuedAttendee],
    response: &SocialActionResponse,
) -> DispatchOutcome {
    let items: &[ActionResultItem] = response.results.as_deref().unwrap_or_default();
    if response.results.is_none() {
        warn!(%action, "action response carried no results; entries stay pending");
    } else if items.len() != snapshot.len() {
        warn!(
            %action,
            submitted = snapshot.len(),
            returned = items.len(),
            "action result count does not match submitted queue"
        );
    }

    let results: Vec<EntryResult> = snapshot
        .iter()
        .enumerate()
        .map(|(idx, entry)| EntryResult {
            username: entry.username().clone(),
            status: entry_status(action, entry, items.get(idx)),
        })
        .collect();

    let sent = results
        .iter()
        .filter(|result| result.status == EntryStatus::Sent)
        .count();
    let failed = results
        .iter()
        .filter(|result| matches!(result.status, EntryStatus::Failed(_)))
        .count();

    DispatchOutcome {
        summary: DispatchSummary {
            action,
            submitted: snapshot.len(),
            sent,
            failed,
            unmatched: snapshot.len() - sent - failed,
            reported_sent: response.reported_success_count(action),
            reported_failed: response.failed_count,
        },
        results,
    }
}

fn entry_status(
    action: ActionKind,
    entry: &QueuedAttendee,
    item: Option<&ActionResultItem>,
) -> EntryStatus {
    let Some(item) = item else {
        return EntryStatus::Pending;
    };
    if let Some(echoed) = &item.username {
        if echoed != entry.username() {
            warn!(
                expected = %entry.username(),
                echoed = %echoed,
                "action result out of order; leaving entry pending"
            );
            return EntryStatus::Pending;
        }
    }
    match item.status.as_deref() {
        None => EntryStatus::Pending,
        Some(status) if status == action.success_token() => {
            debug!(
                username = %entry.username(),
                id = item.created_id().unwrap_or("-"),
                "action applied"
            );
            EntryStatus::Sent
        }
        Some(_) => EntryStatus::Failed(
            item.error
                .clone()
                .filter(|error| !error.trim().is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ),
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
