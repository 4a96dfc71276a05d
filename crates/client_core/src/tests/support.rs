use std::sync::Mutex;

use async_trait::async_trait;
use shared::{
    domain::{ActionKind, DiscoveredAttendee, DiscoveredEvent, EngagementType, Username},
    protocol::{
        AttendeeDiscoveryRequest, AttendeeDiscoveryResponse, AuthStatusResponse,
        EventDiscoveryRequest, EventDiscoveryResponse, HealthResponse, SocialActionRequest,
        SocialActionResponse,
    },
};

use crate::{
    error::{ClientError, Result},
    store::{EntryStatus, QueuedAttendee},
    transport::EventApi,
};

#[derive(Debug, Clone)]
pub enum Canned<T> {
    Reply(T),
    Fail { status: Option<u16>, message: String },
}

impl<T: Clone> Canned<T> {
    fn produce(&self) -> Result<T> {
        match self {
            Self::Reply(value) => Ok(value.clone()),
            Self::Fail { status, message } => Err(ClientError::Transport {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    DiscoverEvents(EventDiscoveryRequest),
    DiscoverAttendees(AttendeeDiscoveryRequest),
    Action(ActionKind, SocialActionRequest),
    Health,
    AuthStatus,
}

/// In-memory service double that records every call it receives.
pub struct FakeEventApi {
    events: Mutex<Canned<EventDiscoveryResponse>>,
    attendees: Mutex<Canned<AttendeeDiscoveryResponse>>,
    action: Mutex<Canned<SocialActionResponse>>,
    health: Mutex<Canned<HealthResponse>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeEventApi {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Canned::Reply(EventDiscoveryResponse {
                success: true,
                events: Vec::new(),
                total_events: Some(0),
                requested_limit: None,
                error: None,
            })),
            attendees: Mutex::new(Canned::Reply(AttendeeDiscoveryResponse {
                success: true,
                attendees: Vec::new(),
                total_attendees: Some(0),
                requested_limit: None,
                error: None,
            })),
            action: Mutex::new(Canned::Reply(SocialActionResponse::default())),
            health: Mutex::new(Canned::Reply(HealthResponse {
                status: "healthy".into(),
                twitter_search_ready: Some(true),
                twitter_actions_ready: Some(true),
                features: Vec::new(),
            })),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_events(self, events: Vec<DiscoveredEvent>) -> Self {
        *self.events.lock().expect("lock") = Canned::Reply(EventDiscoveryResponse {
            success: true,
            total_events: Some(events.len() as u32),
            events,
            requested_limit: None,
            error: None,
        });
        self
    }

    pub fn set_events_reply(&self, reply: Canned<EventDiscoveryResponse>) {
        *self.events.lock().expect("lock") = reply;
    }

    pub fn with_attendees(self, attendees: Vec<DiscoveredAttendee>) -> Self {
        self.set_attendees(attendees);
        self
    }

    pub fn set_attendees(&self, attendees: Vec<DiscoveredAttendee>) {
        *self.attendees.lock().expect("lock") = Canned::Reply(AttendeeDiscoveryResponse {
            success: true,
            total_attendees: Some(attendees.len() as u32),
            attendees,
            requested_limit: None,
            error: None,
        });
    }

    /// Next action response, given as the JSON body the service would send.
    pub fn with_action_json(self, body: serde_json::Value) -> Self {
        self.set_action_json(body);
        self
    }

    pub fn set_action_json(&self, body: serde_json::Value) {
        let response = serde_json::from_value(body).expect("valid action response");
        *self.action.lock().expect("lock") = Canned::Reply(response);
    }

    pub fn failing_actions(self, status: Option<u16>, message: &str) -> Self {
        *self.action.lock().expect("lock") = Canned::Fail {
            status,
            message: message.to_string(),
        };
        self
    }

    pub fn failing_health(self, message: &str) -> Self {
        *self.health.lock().expect("lock") = Canned::Fail {
            status: None,
            message: message.to_string(),
        };
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn action_calls(&self) -> Vec<(ActionKind, SocialActionRequest)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RecordedCall::Action(kind, request) => Some((kind, request)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl EventApi for FakeEventApi {
    async fn discover_events(
        &self,
        request: &EventDiscoveryRequest,
    ) -> Result<EventDiscoveryResponse> {
        self.record(RecordedCall::DiscoverEvents(request.clone()));
        self.events.lock().expect("lock").produce()
    }

    async fn discover_attendees(
        &self,
        request: &AttendeeDiscoveryRequest,
    ) -> Result<AttendeeDiscoveryResponse> {
        self.record(RecordedCall::DiscoverAttendees(request.clone()));
        self.attendees.lock().expect("lock").produce()
    }

    async fn perform_action(
        &self,
        action: ActionKind,
        request: &SocialActionRequest,
    ) -> Result<SocialActionResponse> {
        self.record(RecordedCall::Action(action, request.clone()));
        self.action.lock().expect("lock").produce()
    }

    async fn health(&self) -> Result<HealthResponse> {
        self.record(RecordedCall::Health);
        self.health.lock().expect("lock").produce()
    }

    async fn auth_status(&self) -> Result<AuthStatusResponse> {
        self.record(RecordedCall::AuthStatus);
        Ok(AuthStatusResponse {
            oauth1_ready: true,
            oauth1_user: Some("outreach_bot".into()),
            recommendation: Some("Using OAuth 1.1 for all actions".into()),
        })
    }
}

pub fn attendee(name: &str) -> DiscoveredAttendee {
    DiscoveredAttendee {
        username: Username::from(name),
        verified: false,
        engagement_type: EngagementType::Interested,
        post_content: Some(format!("{name} is going!")),
        post_date: Some("2026-03-02".into()),
        followers_count: 120,
        confidence_score: 0.8,
        post_link: Some(format!("https://x.com/{name}/status/100{}", name.len())),
    }
}

pub fn event(name: &str, date: Option<&str>) -> DiscoveredEvent {
    DiscoveredEvent {
        name: name.to_string(),
        date: date.map(str::to_string),
        venue: Some("Downtown".into()),
        category: "music".into(),
        confidence_score: 0.9,
        hype_score: 0.7,
    }
}

pub fn queued(names: &[&str]) -> Vec<QueuedAttendee> {
    names
        .iter()
        .map(|name| QueuedAttendee {
            attendee: attendee(name),
            status: EntryStatus::Pending,
        })
        .collect()
}
