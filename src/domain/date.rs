//! Date values as stored by the CMS.
//!
//! Records carry either full ISO-8601 timestamps or bare `YYYY-MM-DD` dates.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Timestamp that accepts both date-only and full ISO inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlexDate(pub DateTime<Utc>);

impl FlexDate {
    pub fn now() -> Self {
        FlexDate(Utc::now())
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Some(FlexDate(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(FlexDate(Utc.from_utc_datetime(&naive)));
        }
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| FlexDate(Utc.from_utc_datetime(&naive)))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| FlexDate(Utc.from_utc_datetime(&naive)))
    }

    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// `1/15/2024`
    pub fn short_date(&self) -> String {
        self.0.format("%-m/%-d/%Y").to_string()
    }

    /// `January 15, 2024`
    pub fn long_date(&self) -> String {
        self.0.format("%B %-d, %Y").to_string()
    }
}

impl fmt::Display for FlexDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl Serialize for FlexDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlexDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FlexDate::parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
    }
}
