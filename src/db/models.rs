// Data models — Rust structs that map to database rows.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without depending
// on rusqlite or sqlx directly.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The social platforms a token may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Telegram,
    Website,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Telegram => "telegram",
            Platform::Website => "website",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Platform keys are matched exactly — `Twitter` is not `twitter`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "twitter" => Ok(Platform::Twitter),
            "telegram" => Ok(Platform::Telegram),
            "website" => Ok(Platform::Website),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

/// A platform key outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

/// One claimed social link. The primary key is `normalized_link`; the
/// owner and timestamp are written once and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinkRecord {
    pub normalized_link: String,
    pub platform_type: Platform,
    pub first_seen_at: DateTime<Utc>,
    pub first_seen_in_token: String,
}

/// Result of an atomic insert-if-absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The caller's record was stored; it is now the first-seen owner.
    Inserted,
    /// Another record already held this link. Carries the stored winner.
    AlreadyExists(SocialLinkRecord),
}

/// Number of claimed links per platform, for status display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordCounts {
    pub twitter: u64,
    pub telegram: u64,
    pub website: u64,
}

impl RecordCounts {
    pub fn total(&self) -> u64 {
        self.twitter + self.telegram + self.website
    }

    pub(crate) fn add(&mut self, platform: Platform, count: u64) {
        match platform {
            Platform::Twitter => self.twitter += count,
            Platform::Telegram => self.telegram += count,
            Platform::Website => self.website += count,
        }
    }
}
