use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw `Tasks_` row. The status column stores the literal label, see
/// [`TaskStatus`] for the accepted values.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub area_id: Option<i32>,
    pub responsible_id: Option<i32>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Task lifecycle status. Serialized with the exact labels the database
/// and the clients use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "No iniciada")]
    NotStarted,
    #[serde(rename = "En progreso")]
    InProgress,
    #[serde(rename = "En riesgo")]
    AtRisk,
    #[serde(rename = "Completada")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::AtRisk,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "No iniciada",
            TaskStatus::InProgress => "En progreso",
            TaskStatus::AtRisk => "En riesgo",
            TaskStatus::Completed => "Completada",
        }
    }

    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value {
            "No iniciada" => Some(TaskStatus::NotStarted),
            "En progreso" => Some(TaskStatus::InProgress),
            "En riesgo" => Some(TaskStatus::AtRisk),
            "Completada" => Some(TaskStatus::Completed),
            _ => None,
        }
    }

    /// Lenient variant for values already stored in the database; an
    /// unknown label must not break a whole listing.
    pub fn parse_or_default(value: &str) -> TaskStatus {
        TaskStatus::parse(value).unwrap_or(TaskStatus::NotStarted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(TaskStatus::parse("Hecha"), None);
        assert_eq!(TaskStatus::parse(""), None);
        // but stored values degrade instead of failing
        assert_eq!(TaskStatus::parse_or_default("Hecha"), TaskStatus::NotStarted);
    }

    #[test]
    fn status_serializes_to_label() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"En progreso\"");
        let back: TaskStatus = serde_json::from_str("\"Completada\"").unwrap();
        assert_eq!(back, TaskStatus::Completed);
    }
}
