//! Plain-text rendering of the three tabs and of session events.

use std::fmt::Write as _;

use client_core::{
    DispatchSummary, EntryStatus, HealthSnapshot, NotificationView, PhaseController, PhaseStore,
    UiEvent,
};
use shared::{domain::DiscoveredEvent, protocol::AuthStatusResponse};

pub fn render_events(events: &[DiscoveredEvent]) -> String {
    if events.is_empty() {
        return "No events found".into();
    }
    let mut out = String::new();
    for (idx, event) in events.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} | {} | {} | {} | confidence {:.2} | hype {:.2}",
            idx + 1,
            event.name,
            event.date.as_deref().unwrap_or("date tbd"),
            event.venue.as_deref().unwrap_or("venue tbd"),
            event.category,
            event.confidence_score,
            event.hype_score,
        );
    }
    out
}

pub fn render_attendees(store: &PhaseStore) -> String {
    let attendees = store.attendees();
    if attendees.is_empty() {
        return "No attendees found".into();
    }
    let selection = store.selection();
    let mut out = format!(
        "{} select all ({}/{} selected)\n",
        store.select_all_state().marker(),
        selection.size(),
        attendees.len()
    );
    for attendee in attendees {
        let marker = if selection.is_selected(attendee.username.as_str()) {
            "[x]"
        } else {
            "[ ]"
        };
        let queued = if store.queue().contains(attendee.username.as_str()) {
            " (queued)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{marker} @{}{} | {} | {} followers | confidence {:.2} | {}{queued}",
            attendee.username.handle(),
            if attendee.verified { " [verified]" } else { "" },
            attendee.engagement_type.label(),
            attendee.followers_count,
            attendee.confidence_score,
            attendee.post_link.as_deref().unwrap_or("no post link"),
        );
    }
    out
}

pub fn render_notifications(view: &NotificationView) -> String {
    let rows = match view {
        NotificationView::Empty { message } => return (*message).to_string(),
        NotificationView::Rows(rows) => rows,
    };
    let mut out = String::new();
    for row in rows {
        let status = match &row.status {
            EntryStatus::Failed(reason) => format!("failed: {reason}"),
            other => other.label().to_string(),
        };
        let _ = writeln!(
            out,
            "{:>3}. @{}{} | {} | {} | {}{}",
            row.position,
            row.username.handle(),
            if row.verified { " [verified]" } else { "" },
            row.engagement.label(),
            row.post_link.as_deref().unwrap_or("no post link"),
            status,
            if row.actionable { "" } else { " (no tweet id)" },
        );
    }
    out
}

fn render_summary(summary: &DispatchSummary) -> String {
    let mut out = format!(
        "{}: {} sent, {} failed, {} without result (of {})",
        summary.action, summary.sent, summary.failed, summary.unmatched, summary.submitted
    );
    if summary.counts_disagree() {
        let _ = write!(
            out,
            "; service reported {} sent / {} failed",
            summary
                .reported_sent
                .map_or_else(|| "?".to_string(), |n| n.to_string()),
            summary
                .reported_failed
                .map_or_else(|| "?".to_string(), |n| n.to_string()),
        );
    }
    out
}

fn render_health(health: &HealthSnapshot) -> String {
    let flag = |ready: Option<bool>| match ready {
        Some(true) => "ready",
        Some(false) => "not ready",
        None => "unknown",
    };
    format!(
        "service {} (search {}, actions {})",
        health.status,
        flag(health.search_ready),
        flag(health.actions_ready)
    )
}

fn render_auth(status: &AuthStatusResponse) -> String {
    let mut out = if status.oauth1_ready {
        format!(
            "posting credentials ready as @{}",
            status.oauth1_user.as_deref().unwrap_or("unknown")
        )
    } else {
        "posting credentials not configured".to_string()
    };
    if let Some(recommendation) = &status.recommendation {
        let _ = write!(out, "; {recommendation}");
    }
    out
}

/// Text for one event. Table-bearing events read the current store.
pub fn render_ui_event(event: &UiEvent, controller: &PhaseController) -> String {
    match event {
        UiEvent::Info(message) => message.clone(),
        UiEvent::Error(err) => format!("error: {err}"),
        UiEvent::PhaseChanged(phase) => format!("== {phase} =="),
        UiEvent::EventsLoaded { count } => format!(
            "{count} events discovered\n{}",
            render_events(controller.store().events())
        ),
        UiEvent::AttendeesLoaded { event_name, count } => {
            format!("{count} attendees discovered for {event_name}")
        }
        UiEvent::SelectionChanged { .. } => render_attendees(controller.store()),
        UiEvent::Enqueued(outcome) if outcome.already_queued > 0 => format!(
            "{} added to notifications, {} already queued",
            outcome.added, outcome.already_queued
        ),
        UiEvent::Enqueued(outcome) => format!("{} added to notifications", outcome.added),
        UiEvent::NotificationsRendered(view) => render_notifications(view),
        UiEvent::DispatchCompleted(summary) => render_summary(summary),
        UiEvent::Health(health) => render_health(health),
        UiEvent::AuthStatus(status) => render_auth(status),
    }
}
