//! Events emitted to the front-end and UI-facing error modeling.

use shared::protocol::{AuthStatusResponse, HealthResponse};

use crate::{
    controller::{NotificationView, Phase},
    dispatcher::DispatchSummary,
    error::ClientError,
    selection::SelectAllState,
    store::EnqueueOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Info(String),
    Error(UiError),
    PhaseChanged(Phase),
    EventsLoaded {
        count: usize,
    },
    AttendeesLoaded {
        event_name: String,
        count: usize,
    },
    SelectionChanged {
        selected: usize,
        total: usize,
        state: SelectAllState,
    },
    Enqueued(EnqueueOutcome),
    NotificationsRendered(NotificationView),
    DispatchCompleted(DispatchSummary),
    Health(HealthSnapshot),
    AuthStatus(AuthStatusResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthSnapshot {
    pub healthy: bool,
    pub status: String,
    pub search_ready: Option<bool>,
    pub actions_ready: Option<bool>,
}

impl From<HealthResponse> for HealthSnapshot {
    fn from(value: HealthResponse) -> Self {
        Self {
            healthy: value.is_healthy(),
            search_ready: value.twitter_search_ready,
            actions_ready: value.twitter_actions_ready,
            status: value.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Service,
    Malformed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    EventDiscovery,
    AttendeeDiscovery,
    Selection,
    SendToNotifications,
    Dispatch,
    Health,
    General,
}

impl UiErrorContext {
    pub fn label(self) -> &'static str {
        match self {
            Self::EventDiscovery => "Event discovery",
            Self::AttendeeDiscovery => "Attendee discovery",
            Self::Selection => "Selection",
            Self::SendToNotifications => "Send to notifications",
            Self::Dispatch => "Action",
            Self::Health => "Health check",
            Self::General => "Error",
        }
    }
}

/// Rewrites low-level connection failures into a hint the user can act on.
pub fn classify_transport_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("error sending request")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("failed to connect")
    {
        format!("Service unreachable; check the API URL/network and retry. ({message})")
    } else if lower.contains("timed out") || lower.contains("timeout") {
        format!("Service did not answer in time; retry the action. ({message})")
    } else {
        message.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn validation(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Validation,
            context,
            message: message.into(),
        }
    }

    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let (category, message) = match err {
            ClientError::Validation(message) => (UiErrorCategory::Validation, message.clone()),
            ClientError::Transport {
                status: Some(status),
                message,
            } => (
                UiErrorCategory::Transport,
                format!("HTTP {status}: {message}"),
            ),
            ClientError::Transport {
                status: None,
                message,
            } => (
                UiErrorCategory::Transport,
                classify_transport_failure(message),
            ),
            ClientError::Semantic(message) => (UiErrorCategory::Service, message.clone()),
            ClientError::Decode(message) => (UiErrorCategory::Malformed, message.clone()),
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.context.label(), self.message)
    }
}
