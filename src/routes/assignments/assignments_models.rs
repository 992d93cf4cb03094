use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `TaskAssignments_` row joined with the task title and user name.
#[derive(Debug, FromRow)]
pub struct AssignmentWithNames {
    pub assignment_id: i32,
    pub task_id: i32,
    pub task_title: String,
    pub user_id: i32,
    pub user_name: String,
    pub assigned_at: NaiveDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResource {
    pub id: i32,
    pub task_id: i32,
    pub task_title: String,
    pub user_id: i32,
    pub user_name: String,
    pub assigned_at: NaiveDateTime,
}

impl AssignmentResource {
    pub fn from_row(row: AssignmentWithNames) -> Self {
        Self {
            id: row.assignment_id,
            task_id: row.task_id,
            task_title: row.task_title,
            user_id: row.user_id,
            user_name: row.user_name,
            assigned_at: row.assigned_at,
        }
    }
}

#[derive(Deserialize)]
pub struct AssignmentListQuery {
    pub task_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub task_id: i32,
    pub user_id: i32,
}
