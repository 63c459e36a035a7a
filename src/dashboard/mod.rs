//! Dashboard metrics derived from stored call records

mod summary;

pub use summary::{summarize, summarize_now, DailyCount, DashboardSummary, RecentCall};
