use crate::store::CallRecord;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BTreeMap;

const DAYS_SHOWN: usize = 7;
const RECENT_SHOWN: usize = 5;
const NOTES_PREVIEW_CHARS: usize = 50;

/// Aggregate view over all stored call records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Number of stored records
    pub total_calls: usize,

    /// Records whose timestamp falls on the current UTC date
    pub calls_today: usize,

    /// Calls per date for the most recent dates that have calls, oldest first
    pub calls_by_day: Vec<DailyCount>,

    /// Latest calls, newest first
    pub recent_calls: Vec<RecentCall>,

    /// Mean length of operator notes in characters, across all records
    pub avg_note_length: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: String,
    pub calls: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCall {
    pub id: String,
    pub phone_number: String,
    pub timestamp: String,
    /// First 50 characters of the notes, with `...` when cut
    pub notes_preview: Option<String>,
}

/// Compute dashboard metrics for `records` as seen on `today`
pub fn summarize<'a, I>(records: I, today: NaiveDate) -> DashboardSummary
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let records: Vec<&CallRecord> = records.into_iter().collect();
    let today = today.format("%Y-%m-%d").to_string();

    let calls_today = records
        .iter()
        .filter(|r| r.timestamp.starts_with(&today))
        .count();

    let mut per_day: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *per_day.entry(record.date()).or_default() += 1;
    }
    let skip = per_day.len().saturating_sub(DAYS_SHOWN);
    let calls_by_day = per_day
        .into_iter()
        .skip(skip)
        .map(|(date, calls)| DailyCount {
            date: date.to_string(),
            calls,
        })
        .collect();

    let mut by_recency = records.clone();
    // Unparsable timestamps sort after every valid one
    by_recency.sort_by_key(|r| Reverse(r.parsed_timestamp()));
    let recent_calls = by_recency
        .into_iter()
        .take(RECENT_SHOWN)
        .map(|r| RecentCall {
            id: r.id.clone(),
            phone_number: r.phone_number.clone(),
            timestamp: r.timestamp.clone(),
            notes_preview: r.notes.as_deref().map(preview),
        })
        .collect();

    let note_chars: usize = records
        .iter()
        .map(|r| r.notes.as_deref().map_or(0, |n| n.chars().count()))
        .sum();
    let avg_note_length = note_chars as f64 / records.len().max(1) as f64;

    DashboardSummary {
        total_calls: records.len(),
        calls_today,
        calls_by_day,
        recent_calls,
        avg_note_length,
    }
}

/// `summarize` against the current UTC date
pub fn summarize_now<'a, I>(records: I) -> DashboardSummary
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    summarize(records, Utc::now().date_naive())
}

fn preview(notes: &str) -> String {
    if notes.chars().count() > NOTES_PREVIEW_CHARS {
        let cut: String = notes.chars().take(NOTES_PREVIEW_CHARS).collect();
        format!("{}...", cut)
    } else {
        notes.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, timestamp: &str, notes: Option<&str>) -> CallRecord {
        CallRecord {
            id: id.to_string(),
            phone_number: format!("555-{}", id),
            timestamp: timestamp.to_string(),
            transcript: String::new(),
            notes: notes.map(str::to_string),
        }
    }

    #[test]
    fn test_empty() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
        let records: Vec<CallRecord> = Vec::new();
        let summary = summarize(&records, today);
        assert_eq!(summary.total_calls, 0);
        assert_eq!(summary.calls_today, 0);
        assert!(summary.calls_by_day.is_empty());
        assert!(summary.recent_calls.is_empty());
        assert_eq!(summary.avg_note_length, 0.0);
    }

    #[test]
    fn test_trailing_seven_dates() {
        let records: Vec<CallRecord> = (1..=9)
            .map(|d| record(&d.to_string(), &format!("2025-10-{:02}T09:00:00.000Z", d), None))
            .collect();
        let today = NaiveDate::from_ymd_opt(2025, 10, 9).unwrap();

        let summary = summarize(&records, today);
        assert_eq!(summary.calls_by_day.len(), 7);
        assert_eq!(summary.calls_by_day[0].date, "2025-10-03");
        assert_eq!(summary.calls_by_day[6].date, "2025-10-09");
        assert_eq!(summary.calls_today, 1);
    }

    #[test]
    fn test_recent_order_and_preview() {
        let long = "x".repeat(60);
        let records = vec![
            record("a", "2025-10-01T08:00:00.000Z", None),
            record("b", "not a timestamp", None),
            record("c", "2025-10-03T08:00:00.000Z", Some(&long)),
            record("d", "2025-10-02T08:00:00.000Z", Some("short")),
        ];
        let today = NaiveDate::from_ymd_opt(2025, 10, 3).unwrap();

        let summary = summarize(&records, today);
        let ids: Vec<&str> = summary.recent_calls.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "d", "a", "b"]);
        assert_eq!(
            summary.recent_calls[0].notes_preview.as_deref(),
            Some(format!("{}...", "x".repeat(50)).as_str())
        );
        assert_eq!(summary.recent_calls[1].notes_preview.as_deref(), Some("short"));
        assert_eq!(summary.avg_note_length, 65.0 / 4.0);
    }
}
