use crate::import::CallTarget;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of a call to one target. At most one per target id; later calls
/// overwrite earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    /// Same as the `CallTarget` id
    pub id: String,

    pub phone_number: String,

    /// RFC 3339 UTC timestamp, e.g. `2025-10-27T14:30:00.000Z`
    pub timestamp: String,

    /// `role: content` lines, newline separated
    pub transcript: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CallRecord {
    pub fn new(
        target: &CallTarget,
        at: DateTime<Utc>,
        transcript: String,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: target.id.clone(),
            phone_number: target.number.clone(),
            timestamp: format_timestamp(at),
            transcript,
            notes,
        }
    }

    /// `YYYY-MM-DD` part of the timestamp
    pub fn date(&self) -> &str {
        self.timestamp
            .split_once('T')
            .map_or(self.timestamp.as_str(), |(date, _)| date)
    }

    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wire_format() {
        let target = CallTarget {
            id: "1".to_string(),
            number: "555-0100".to_string(),
            name: None,
            notes: None,
        };
        let at = Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap();
        let record = CallRecord::new(&target, at, "user: hi".to_string(), None);

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"phoneNumber\":\"555-0100\""));
        assert!(json.contains("\"timestamp\":\"2025-10-27T14:30:00.000Z\""));
        assert!(!json.contains("notes"));

        assert_eq!(record.date(), "2025-10-27");
        assert_eq!(record.parsed_timestamp(), Some(at));
    }
}
