use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{ActionKind, DiscoveredAttendee, DiscoveredEvent, Username};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDiscoveryRequest {
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub categories: Vec<String>,
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDiscoveryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub events: Vec<DiscoveredEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_events: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendeeDiscoveryRequest {
    pub event_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_date: Option<String>,
    pub max_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendeeDiscoveryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub attendees: Vec<DiscoveredAttendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_attendees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body shared by all four bulk action endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialActionRequest {
    pub attendees: Vec<DiscoveredAttendee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One per submitted attendee, in submission order. Every field is optional so
/// that a partially filled item still decodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResultItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<Username>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub tweet_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub quote_tweet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Post ids arrive as strings or as bare integers depending on the endpoint.
/// Anything else decodes as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    })
}

impl ActionResultItem {
    /// Id of whatever the action created (reply or quote), else the target tweet.
    pub fn created_id(&self) -> Option<&str> {
        self.comment_id
            .as_deref()
            .or(self.quote_tweet_id.as_deref())
            .or(self.tweet_id.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialActionResponse {
    /// Absent is treated as success; only an explicit `false` is a service failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<ActionResultItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_attempted: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Catches the per-action `<action>_count` field.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl SocialActionResponse {
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Success count as reported by the service for `action`, if present.
    pub fn reported_success_count(&self, action: ActionKind) -> Option<u64> {
        self.extra
            .get(action.count_field())
            .and_then(serde_json::Value::as_u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_search_ready: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter_actions_ready: Option<bool>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    #[serde(default)]
    pub oauth1_ready: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth1_user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn action_response_reads_per_action_count() {
        let response: SocialActionResponse = serde_json::from_value(json!({
            "success": true,
            "liked_count": 2,
            "failed_count": 1,
            "results": [{"status": "liked"}, {"status": "liked"}, {"status": "failed", "error": "Like failed"}]
        }))
        .expect("decode");

        assert!(!response.is_failure());
        assert_eq!(response.reported_success_count(ActionKind::Like), Some(2));
        assert_eq!(response.reported_success_count(ActionKind::Retweet), None);
        assert_eq!(response.results.map(|r| r.len()), Some(3));
    }

    #[test]
    fn action_response_without_success_flag_is_not_a_failure() {
        let response: SocialActionResponse =
            serde_json::from_value(json!({"results": [{}]})).expect("decode");
        assert!(!response.is_failure());
        assert_eq!(response.results, Some(vec![ActionResultItem::default()]));
    }

    #[test]
    fn created_id_prefers_the_new_post() {
        let item: ActionResultItem = serde_json::from_value(json!({
            "username": "alice",
            "status": "commented",
            "tweet_id": "100",
            "comment_id": "200"
        }))
        .expect("decode");
        assert_eq!(item.created_id(), Some("200"));
        assert_eq!(ActionResultItem::default().created_id(), None);
    }

    #[test]
    fn numeric_and_odd_ids_still_decode() {
        let item: ActionResultItem = serde_json::from_value(json!({
            "status": "quoted",
            "original_tweet_id": "100",
            "quote_tweet_id": 1789012345678901234u64,
            "tweet_id": {"unexpected": true}
        }))
        .expect("decode");
        assert_eq!(item.quote_tweet_id.as_deref(), Some("1789012345678901234"));
        assert_eq!(item.tweet_id, None);
        assert_eq!(item.created_id(), Some("1789012345678901234"));
    }

    #[test]
    fn attendee_request_omits_absent_event_date() {
        let body = serde_json::to_value(AttendeeDiscoveryRequest {
            event_name: "SXSW".into(),
            event_date: None,
            max_results: 10,
        })
        .expect("encode");
        assert_eq!(body, json!({"event_name": "SXSW", "max_results": 10}));
    }
}
