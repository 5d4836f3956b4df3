//! Video record and resolution types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported playback resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
}

impl Resolution {
    /// Every resolution, lowest first.
    pub const ALL: [Resolution; 8] = [
        Resolution::P144,
        Resolution::P240,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
        Resolution::P1440,
        Resolution::P2160,
    ];

    /// Wire name of the resolution.
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P144 => "P144",
            Resolution::P240 => "P240",
            Resolution::P360 => "P360",
            Resolution::P480 => "P480",
            Resolution::P720 => "P720",
            Resolution::P1080 => "P1080",
            Resolution::P1440 => "P1440",
            Resolution::P2160 => "P2160",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resolution: {0}")]
pub struct UnknownResolution(pub String);

impl FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownResolution(s.to_string()))
    }
}

/// A stored video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub can_be_downloaded: bool,
    /// `None` means no age restriction.
    pub min_age_restriction: Option<u8>,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub publication_date: DateTime<Utc>,
    pub available_resolutions: Vec<Resolution>,
}

/// Validated input for creating a video.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVideo {
    pub title: String,
    pub author: String,
    pub available_resolutions: Vec<Resolution>,
}

/// Validated field mutations for an existing video.
///
/// `None` leaves the stored value untouched. For `min_age_restriction`,
/// `Some(None)` clears the restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoUpdate {
    pub title: String,
    pub author: String,
    pub available_resolutions: Vec<Resolution>,
    pub can_be_downloaded: Option<bool>,
    pub min_age_restriction: Option<Option<u8>>,
    pub publication_date: Option<DateTime<Utc>>,
}

impl VideoUpdate {
    /// Apply the mutation in place.
    pub fn apply(self, video: &mut Video) {
        video.title = self.title;
        video.author = self.author;
        video.available_resolutions = self.available_resolutions;
        if let Some(flag) = self.can_be_downloaded {
            video.can_be_downloaded = flag;
        }
        if let Some(age) = self.min_age_restriction {
            video.min_age_restriction = age;
        }
        if let Some(date) = self.publication_date {
            video.publication_date = date;
        }
    }
}

/// Timestamps on the wire: RFC 3339, UTC, millisecond precision, `Z` suffix.
pub(crate) mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}
