use std::{borrow::Borrow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Natural key of an attendee within one discovery result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(pub String);

impl Username {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The username without a leading `@`, as it appears in mentions.
    pub fn handle(&self) -> &str {
        self.0.trim_start_matches('@')
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Username {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    Mention,
    Interested,
    ConfirmedAttendance,
    #[serde(other)]
    Unknown,
}

impl EngagementType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Interested => "interested",
            Self::ConfirmedAttendance => "confirmed",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredEvent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub hype_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredAttendee {
    pub username: Username,
    #[serde(default)]
    pub verified: bool,
    pub engagement_type: EngagementType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_date: Option<String>,
    #[serde(default)]
    pub followers_count: u64,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_link: Option<String>,
}

impl DiscoveredAttendee {
    /// Tweet id the action endpoints will act on, if the post link carries one.
    pub fn tweet_id(&self) -> Option<&str> {
        self.post_link.as_deref().and_then(tweet_id_from_link)
    }
}

/// Extracts the numeric status id from a twitter.com / x.com post link.
pub fn tweet_id_from_link(link: &str) -> Option<&str> {
    for (idx, marker) in link.match_indices("status/") {
        let rest = &link[idx + marker.len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end > 0 {
            return Some(&rest[..end]);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Retweet,
    Like,
    Comment,
    Quote,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [Self::Retweet, Self::Like, Self::Comment, Self::Quote];

    /// Path segment of the remote endpoint performing this action.
    pub fn operation(self) -> &'static str {
        match self {
            Self::Retweet => "retweet-posts",
            Self::Like => "like-posts",
            Self::Comment => "post-comments",
            Self::Quote => "post-quote-tweets",
        }
    }

    /// Per-result status the service reports when the action succeeded.
    pub fn success_token(self) -> &'static str {
        match self {
            Self::Retweet => "retweeted",
            Self::Like => "liked",
            Self::Comment => "commented",
            Self::Quote => "quoted",
        }
    }

    pub fn count_field(self) -> &'static str {
        match self {
            Self::Retweet => "retweeted_count",
            Self::Like => "liked_count",
            Self::Comment => "commented_count",
            Self::Quote => "quoted_count",
        }
    }

    pub fn requires_message(self) -> bool {
        matches!(self, Self::Comment | Self::Quote)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Retweet => "retweet",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Quote => "quote",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}' (expected retweet, like, comment or quote)")]
pub struct ParseActionKindError(pub String);

impl FromStr for ActionKind {
    type Err = ParseActionKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "retweet" | "rt" => Ok(Self::Retweet),
            "2" | "like" => Ok(Self::Like),
            "3" | "comment" | "reply" => Ok(Self::Comment),
            "4" | "quote" => Ok(Self::Quote),
            _ => Err(ParseActionKindError(raw.to_string())),
        }
    }
}
