use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::due_bucket::DueBucket;
use crate::models::task::TaskStatus;

/// `Tasks_` row joined with its area and responsible names.
#[derive(Debug, FromRow)]
pub struct TaskWithNames {
    pub task_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub area_id: Option<i32>,
    pub area_name: Option<String>,
    pub responsible_id: Option<i32>,
    pub responsible_name: Option<String>,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Public representation of a task, with the computed due bucket.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResource {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub area_id: Option<i32>,
    pub area_name: Option<String>,
    pub responsible_id: Option<i32>,
    pub responsible_name: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub due_bucket: DueBucket,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TaskResource {
    /// Resource transformer: raw joined row to the public JSON shape.
    pub fn from_row(row: TaskWithNames, today: NaiveDate) -> Self {
        let status = TaskStatus::parse_or_default(&row.status);
        let due_bucket = DueBucket::classify(status, row.due_date, today);
        Self {
            id: row.task_id,
            title: row.title,
            description: row.description,
            area_id: row.area_id,
            area_name: row.area_name,
            responsible_id: row.responsible_id,
            responsible_name: row.responsible_name,
            status,
            due_date: row.due_date,
            due_bucket,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Deserialize)]
pub struct TaskListQuery {
    pub area_id: Option<i32>,
    pub responsible_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub area_id: Option<i32>,
    pub responsible_id: Option<i32>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

/// Partial update; absent fields keep their current values.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub area_id: Option<i32>,
    pub responsible_id: Option<i32>,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_row(status: &str, due_date: Option<NaiveDate>) -> TaskWithNames {
        let stamp = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        TaskWithNames {
            task_id: 11,
            title: "Cerrar informe mensual".to_string(),
            description: None,
            area_id: Some(2),
            area_name: Some("Finanzas".to_string()),
            responsible_id: Some(5),
            responsible_name: Some("Ana".to_string()),
            status: status.to_string(),
            due_date,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[test]
    fn transformer_computes_the_bucket() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();

        let overdue = TaskResource::from_row(
            sample_row("En progreso", Some(today - Duration::days(3))),
            today,
        );
        assert_eq!(overdue.due_bucket, DueBucket::Overdue);

        let done = TaskResource::from_row(
            sample_row("Completada", Some(today - Duration::days(3))),
            today,
        );
        assert_eq!(done.due_bucket, DueBucket::Completed);
    }

    #[test]
    fn transformer_tolerates_unknown_stored_status() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let resource = TaskResource::from_row(sample_row("???", None), today);
        assert_eq!(resource.status, TaskStatus::NotStarted);
        assert_eq!(resource.due_bucket, DueBucket::NoDueDate);
    }

    #[test]
    fn resource_serializes_camel_case() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let resource = TaskResource::from_row(sample_row("En riesgo", Some(today)), today);
        let json = serde_json::to_value(&resource).unwrap();

        assert_eq!(json["id"], 11);
        assert_eq!(json["areaName"], "Finanzas");
        assert_eq!(json["responsibleName"], "Ana");
        assert_eq!(json["status"], "En riesgo");
        assert_eq!(json["dueBucket"], "DUE_THIS_WEEK");
        assert_eq!(json["dueDate"], "2025-03-10");
        assert!(json.get("task_id").is_none());
    }
}
