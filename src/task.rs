// Task model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single to-do entry
///
/// Tasks carry no identifier. Everything that addresses a task does so by its
/// position in the unfiltered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub text: String,
    pub completed: bool,
    pub time_created: DateTime<Utc>,
}

impl Task {
    /// Create an open task stamped with the current time
    pub fn new(text: impl Into<String>) -> Self {
        Self::created_at(text, Utc::now())
    }

    /// Create an open task with an explicit creation time
    pub fn created_at(text: impl Into<String>, time_created: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            completed: false,
            time_created,
        }
    }

    /// How long ago this task was created, relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> String {
        format_age(self.time_created, now)
    }
}

/// True when `text` is empty or only whitespace
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Render the distance between `created` and `now` as "5 minutes ago" and so on
///
/// Anything under a minute, including timestamps in the future, reads "just now".
pub fn format_age(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - created).num_seconds();
    if secs < MINUTE {
        return "just now".to_string();
    }

    let (count, unit) = match secs {
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < MONTH => (s / DAY, "day"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_task_is_open() {
        let before = Utc::now();
        let task = Task::new("Buy milk");
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(task.time_created >= before);
    }

    #[test]
    fn test_task_serializes_camel_case() {
        let task = Task::created_at("Buy milk", base());
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"text\":\"Buy milk\""));
        assert!(json.contains("\"completed\":false"));
        assert!(json.contains("\"timeCreated\":\"2024-03-01T12:00:00Z\""));
    }

    #[test]
    fn test_task_parses_millisecond_timestamp() {
        let json = r#"{"text":"Clean","completed":true,"timeCreated":"2024-03-01T12:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.time_created, base());
        assert!(task.completed);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_format_age() {
        let now = base();
        assert_eq!(format_age(now, now), "just now");
        assert_eq!(format_age(now - Duration::seconds(59), now), "just now");
        assert_eq!(format_age(now + Duration::hours(2), now), "just now");
        assert_eq!(format_age(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_age(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(format_age(now - Duration::hours(3), now), "3 hours ago");
        assert_eq!(format_age(now - Duration::days(1), now), "1 day ago");
        assert_eq!(format_age(now - Duration::days(45), now), "1 month ago");
        assert_eq!(format_age(now - Duration::days(800), now), "2 years ago");
    }
}
