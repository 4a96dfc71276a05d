//! Validated discovery queries for events and their attendees.

use chrono::NaiveDate;
use shared::{
    domain::{DiscoveredAttendee, DiscoveredEvent},
    protocol::{AttendeeDiscoveryRequest, EventDiscoveryRequest},
};
use tracing::info;

use crate::{
    error::{ClientError, Result},
    transport::EventApi,
};

pub const MIN_RESULTS: u32 = 1;
pub const MAX_RESULTS: u32 = 100;
pub const DEFAULT_MAX_RESULTS: u32 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventCriteria {
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub categories: Vec<String>,
    pub max_results: u32,
}

impl EventCriteria {
    pub fn new(
        location: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            categories: Vec::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn to_request(&self) -> Result<EventDiscoveryRequest> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(ClientError::validation("location is required"));
        }
        let start = parse_date("start date", &self.start_date)?;
        let end = parse_date("end date", &self.end_date)?;
        if start > end {
            return Err(ClientError::validation(format!(
                "start date {start} is after end date {end}"
            )));
        }

        Ok(EventDiscoveryRequest {
            location: location.to_string(),
            start_date: start.format(DATE_FORMAT).to_string(),
            end_date: end.format(DATE_FORMAT).to_string(),
            categories: self.categories.clone(),
            max_results: check_max_results(self.max_results)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendeeCriteria {
    pub event_name: String,
    pub event_date: Option<String>,
    pub max_results: u32,
}

impl AttendeeCriteria {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            event_date: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn for_event(event: &DiscoveredEvent, max_results: u32) -> Self {
        Self {
            event_name: event.name.clone(),
            event_date: event.date.clone(),
            max_results,
        }
    }

    pub fn with_event_date(mut self, event_date: impl Into<String>) -> Self {
        self.event_date = Some(event_date.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn to_request(&self) -> Result<AttendeeDiscoveryRequest> {
        let event_name = self.event_name.trim();
        if event_name.is_empty() {
            return Err(ClientError::validation("event name is required"));
        }
        let event_date = self
            .event_date
            .as_deref()
            .map(str::trim)
            .filter(|date| !date.is_empty())
            .map(str::to_string);

        Ok(AttendeeDiscoveryRequest {
            event_name: event_name.to_string(),
            event_date,
            max_results: check_max_results(self.max_results)?,
        })
    }
}

fn parse_date(label: &str, raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ClientError::validation(format!("{label} is required")));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
        ClientError::validation(format!("{label} '{raw}' is not a YYYY-MM-DD date"))
    })
}

fn check_max_results(max_results: u32) -> Result<u32> {
    if (MIN_RESULTS..=MAX_RESULTS).contains(&max_results) {
        Ok(max_results)
    } else {
        Err(ClientError::validation(format!(
            "result count must be between {MIN_RESULTS} and {MAX_RESULTS}, got {max_results}"
        )))
    }
}

pub async fn discover_events(
    api: &dyn EventApi,
    criteria: &EventCriteria,
) -> Result<Vec<DiscoveredEvent>> {
    let request = criteria.to_request()?;
    info!(
        location = %request.location,
        start = %request.start_date,
        end = %request.end_date,
        max_results = request.max_results,
        "discovering events"
    );
    let response = api.discover_events(&request).await?;
    if !response.success {
        return Err(ClientError::semantic(response.error));
    }
    info!(
        returned = response.events.len(),
        total = ?response.total_events,
        "events discovered"
    );
    Ok(response.events)
}

pub async fn discover_attendees(
    api: &dyn EventApi,
    criteria: &AttendeeCriteria,
) -> Result<Vec<DiscoveredAttendee>> {
    let request = criteria.to_request()?;
    info!(
        event = %request.event_name,
        date = ?request.event_date,
        max_results = request.max_results,
        "discovering attendees"
    );
    let response = api.discover_attendees(&request).await?;
    if !response.success {
        return Err(ClientError::semantic(response.error));
    }
    info!(
        returned = response.attendees.len(),
        total = ?response.total_attendees,
        "attendees discovered"
    );
    Ok(response.attendees)
}
