pub mod repository;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a road record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "closed")]
    Closed,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "open" => Some(Status::Open),
            "in-progress" => Some(Status::InProgress),
            "closed" => Some(Status::Closed),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
    #[serde(rename = "urgent")]
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "urgent" => Some(Priority::Urgent),
            _ => None,
        }
    }
}

/// Wire shape of one records.json entry. Everything past the id is optional
/// on the wire and backfilled by normalization.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// A normalized record. Immutable once loaded; the working set is replaced
/// wholesale on reload or import, never patched in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: Status,
    pub priority: Priority,
    pub date: Option<NaiveDate>,
    pub state: String,
    pub district: String,
    pub location: String,
}

impl Record {
    /// Missing or unknown kind/status/priority fall back to
    /// "other"/open/low; an unparseable date is kept as absent.
    pub fn normalize(raw: RawRecord) -> Record {
        Record {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            kind: raw
                .kind
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| "other".to_string()),
            status: raw
                .status
                .as_deref()
                .and_then(Status::parse)
                .unwrap_or_default(),
            priority: raw
                .priority
                .as_deref()
                .and_then(Priority::parse)
                .unwrap_or_default(),
            date: raw.date.as_deref().and_then(parse_date),
            state: raw.state.unwrap_or_default(),
            district: raw.district.unwrap_or_default(),
            location: raw.location.unwrap_or_default(),
        }
    }
}

pub fn normalize_all(raws: Vec<RawRecord>) -> Vec<Record> {
    raws.into_iter().map(Record::normalize).collect()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_backfills_defaults() {
        let record = Record::normalize(RawRecord {
            id: 7,
            title: "Pothole cluster".to_string(),
            ..Default::default()
        });
        assert_eq!(record.kind, "other");
        assert_eq!(record.status, Status::Open);
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(record.date, None);
        assert_eq!(record.state, "");
    }

    #[test]
    fn normalize_maps_unknown_enum_strings_to_defaults() {
        let record = Record::normalize(RawRecord {
            status: Some("resolved".to_string()),
            priority: Some("critical".to_string()),
            date: Some("yesterday".to_string()),
            ..Default::default()
        });
        assert_eq!(record.status, Status::Open);
        assert_eq!(record.priority, Priority::Low);
        assert_eq!(record.date, None);
    }

    #[test]
    fn normalize_keeps_well_formed_fields() {
        let record = Record::normalize(RawRecord {
            id: 3,
            kind: Some("road-damage".to_string()),
            status: Some("in-progress".to_string()),
            priority: Some("urgent".to_string()),
            date: Some("2024-03-01".to_string()),
            state: Some("rajasthan".to_string()),
            district: Some("jaipur".to_string()),
            ..Default::default()
        });
        assert_eq!(record.status, Status::InProgress);
        assert_eq!(record.priority, Priority::Urgent);
        assert_eq!(record.date, parse_date("2024-03-01"));
        assert_eq!(record.state, "rajasthan");
    }
}
