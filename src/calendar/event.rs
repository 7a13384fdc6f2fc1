use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Millisecond timestamp taken when the event was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawId", into = "i64")]
pub struct EventId(i64);

impl EventId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<EventId> for i64 {
    fn from(id: EventId) -> Self {
        id.0
    }
}

// Older snapshots may carry the id as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl TryFrom<RawId> for EventId {
    type Error = String;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        match raw {
            RawId::Number(n) => Ok(Self(n)),
            RawId::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| format!("invalid event id '{}'", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub name: String,
    #[serde(default, with = "description")]
    pub description: Option<String>,
}

impl Event {
    pub fn time_range_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }

    /// Display order within a day. Storage order is left untouched.
    pub fn display_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start_time
            .cmp(&other.start_time)
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time '{}'", raw)))
    }
}

// Written as "" when absent; "", null and a missing field all read as None.
mod description {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standup() -> Event {
        Event {
            id: EventId::new(1718000000000),
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 15, 0).unwrap(),
            name: "Standup".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_serializes_with_stored_field_names() {
        let json = serde_json::to_value(standup()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 1718000000000i64,
                "date": "2024-06-10",
                "startTime": "09:00",
                "endTime": "09:15",
                "name": "Standup",
                "description": ""
            })
        );
    }

    #[test]
    fn test_reads_legacy_snapshot() {
        let raw = r#"[{"id":1718000000000,"date":"2024-06-10","name":"Standup",
            "startTime":"09:00","endTime":"09:15","description":"daily sync"}]"#;
        let events: Vec<Event> = serde_json::from_str(raw).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Standup");
        assert_eq!(events[0].description.as_deref(), Some("daily sync"));
        assert_eq!(events[0].start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }

    #[test]
    fn test_missing_or_empty_description_is_none() {
        let missing = r#"{"id":1,"date":"2024-06-10","startTime":"09:00","endTime":"10:00","name":"a"}"#;
        let empty = r#"{"id":1,"date":"2024-06-10","startTime":"09:00","endTime":"10:00","name":"a","description":""}"#;
        let null = r#"{"id":1,"date":"2024-06-10","startTime":"09:00","endTime":"10:00","name":"a","description":null}"#;
        for raw in [missing, empty, null] {
            let event: Event = serde_json::from_str(raw).unwrap();
            assert_eq!(event.description, None);
        }
    }

    #[test]
    fn test_string_id_is_accepted() {
        let raw = r#"{"id":"42","date":"2024-06-10","startTime":"09:00","endTime":"10:00","name":"a"}"#;
        let event: Event = serde_json::from_str(raw).unwrap();
        assert_eq!(event.id, EventId::new(42));
    }

    #[test]
    fn test_rejects_bad_date_and_time() {
        let bad_date = r#"{"id":1,"date":"2024-13-40","startTime":"09:00","endTime":"10:00","name":"a"}"#;
        let bad_time = r#"{"id":1,"date":"2024-06-10","startTime":"9am","endTime":"10:00","name":"a"}"#;
        assert!(serde_json::from_str::<Event>(bad_date).is_err());
        assert!(serde_json::from_str::<Event>(bad_time).is_err());
    }

    #[test]
    fn test_parse_time_accepts_seconds() {
        assert_eq!(parse_time("09:30:15"), NaiveTime::from_hms_opt(9, 30, 15));
        assert_eq!(parse_time(" 18:05 "), NaiveTime::from_hms_opt(18, 5, 0));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn test_time_range_display() {
        assert_eq!(standup().time_range_display(), "09:00 - 09:15");
    }
}
