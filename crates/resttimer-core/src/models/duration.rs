//! Preset rest durations

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed rest lengths a countdown can run for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum RestDuration {
    Thirty,
    Sixty,
    Ninety,
    OneTwenty,
}

impl RestDuration {
    /// Every preset, shortest first
    pub const ALL: [RestDuration; 4] = [
        RestDuration::Thirty,
        RestDuration::Sixty,
        RestDuration::Ninety,
        RestDuration::OneTwenty,
    ];

    pub fn seconds(&self) -> u32 {
        match self {
            RestDuration::Thirty => 30,
            RestDuration::Sixty => 60,
            RestDuration::Ninety => 90,
            RestDuration::OneTwenty => 120,
        }
    }

    /// Short label used on the selection screen, e.g. "60s"
    pub fn display_text(&self) -> String {
        format!("{}s", self.seconds())
    }
}

impl TryFrom<u32> for RestDuration {
    type Error = Error;

    fn try_from(seconds: u32) -> Result<Self> {
        RestDuration::ALL
            .into_iter()
            .find(|d| d.seconds() == seconds)
            .ok_or_else(|| Error::InvalidDuration(seconds.to_string()))
    }
}

impl From<RestDuration> for u32 {
    fn from(duration: RestDuration) -> Self {
        duration.seconds()
    }
}

impl FromStr for RestDuration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        let seconds: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidDuration(s.to_string()))?;
        RestDuration::try_from(seconds)
    }
}

impl fmt::Display for RestDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.seconds())
    }
}
