//! Commit metadata record
//!
//! Every commit directory carries a `commit.json` file next to the snapshot files:
//!
//! ```text
//! {"message":"first","date":"2024-01-01T12:00:00.000Z"}
//! ```
//!
//! The date is an RFC 3339 UTC timestamp with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// File name of the metadata record inside a commit directory
pub const COMMIT_RECORD_FILE: &str = "commit.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct CommitRecord {
    message: String,
    #[serde(with = "iso_millis")]
    date: DateTime<Utc>,
}

impl CommitRecord {
    /// Capture a record stamped with the current time
    pub fn now(message: impl Into<String>) -> Self {
        CommitRecord::new(message.into(), Utc::now())
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    pub fn readable_date(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn to_json(&self) -> anyhow::Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_json(data: &[u8]) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|date| date.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_message_and_millisecond_date() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let record = CommitRecord::new("first".to_string(), date);

        let json = String::from_utf8(record.to_json().unwrap()).unwrap();
        assert_eq!(json, r#"{"message":"first","date":"2024-01-01T12:00:00.000Z"}"#);
    }

    #[test]
    fn accepts_dates_written_with_an_offset() {
        let record =
            CommitRecord::from_json(br#"{"message":"m","date":"2024-01-01T14:00:00+02:00"}"#)
                .unwrap();

        assert_eq!(record.readable_date(), "2024-01-01T12:00:00.000Z");
    }

    #[test]
    fn short_message_is_the_first_line() {
        let record = CommitRecord::now("subject\n\nbody");
        assert_eq!(record.short_message(), "subject");

        let empty = CommitRecord::now("");
        assert_eq!(empty.short_message(), "");
    }
}
