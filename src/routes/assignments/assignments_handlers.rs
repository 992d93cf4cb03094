use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::json;
use sqlx::MySqlPool;

use super::assignments_models::{
    AssignmentListQuery, AssignmentResource, AssignmentWithNames, CreateAssignmentRequest,
};
use crate::auth::AuthedUser;

const ASSIGNMENT_SELECT: &str = "SELECT asg.assignment_id, asg.task_id, t.title AS task_title, \
     asg.user_id, u.user_name, asg.assigned_at \
     FROM TaskAssignments_ asg \
     JOIN Tasks_ t ON asg.task_id = t.task_id \
     JOIN Users_ u ON asg.user_id = u.user_id";

// List assignments, filtered by task and/or user.
pub async fn list_assignments(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    query: web::Query<AssignmentListQuery>,
) -> impl Responder {
    let mut conditions: Vec<&str> = Vec::new();
    if query.task_id.is_some() {
        conditions.push("asg.task_id = ?");
    }
    if query.user_id.is_some() {
        conditions.push("asg.user_id = ?");
    }

    let query_str = if conditions.is_empty() {
        format!("{} ORDER BY asg.assignment_id", ASSIGNMENT_SELECT)
    } else {
        format!(
            "{} WHERE {} ORDER BY asg.assignment_id",
            ASSIGNMENT_SELECT,
            conditions.join(" AND ")
        )
    };

    let mut db_query = sqlx::query_as::<_, AssignmentWithNames>(&query_str);
    if let Some(task_id) = query.task_id {
        db_query = db_query.bind(task_id);
    }
    if let Some(user_id) = query.user_id {
        db_query = db_query.bind(user_id);
    }

    match db_query.fetch_all(pool.get_ref()).await {
        Ok(rows) => {
            let assignments: Vec<AssignmentResource> =
                rows.into_iter().map(AssignmentResource::from_row).collect();
            HttpResponse::Ok().json(assignments)
        }
        Err(e) => {
            error!("Failed to fetch assignments: {}", e);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch assignments" }))
        }
    }
}

pub async fn create_assignment(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    req: web::Json<CreateAssignmentRequest>,
) -> impl Responder {
    // Both ends of the link must exist.
    match sqlx::query_as::<_, (i32,)>("SELECT task_id FROM Tasks_ WHERE task_id = ?")
        .bind(req.task_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::BadRequest().json(json!({ "error": "Task not found" }));
        }
        Err(e) => {
            error!("Failed to check task {}: {}", req.task_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check task" }));
        }
    }

    match sqlx::query_as::<_, (i32,)>("SELECT user_id FROM Users_ WHERE user_id = ?")
        .bind(req.user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(_)) => {}
        Ok(None) => {
            return HttpResponse::BadRequest().json(json!({ "error": "User not found" }));
        }
        Err(e) => {
            error!("Failed to check user {}: {}", req.user_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check user" }));
        }
    }

    let duplicate = sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM TaskAssignments_ WHERE task_id = ? AND user_id = ?",
    )
    .bind(req.task_id)
    .bind(req.user_id)
    .fetch_one(pool.get_ref())
    .await;

    match duplicate {
        Ok((0,)) => {}
        Ok(_) => {
            return HttpResponse::Conflict()
                .json(json!({ "error": "User is already assigned to this task" }));
        }
        Err(e) => {
            error!("Failed to check assignment: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check assignment" }));
        }
    }

    let insert_result = sqlx::query(
        "INSERT INTO TaskAssignments_ (task_id, user_id, assigned_at) \
         VALUES (?, ?, UTC_TIMESTAMP())",
    )
    .bind(req.task_id)
    .bind(req.user_id)
    .execute(pool.get_ref())
    .await;

    let assignment_id = match insert_result {
        Ok(result) => result.last_insert_id() as i32,
        Err(e) => {
            error!(
                "Failed to assign user {} to task {}: {}",
                req.user_id, req.task_id, e
            );
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create assignment" }));
        }
    };

    info!(
        "User {} assigned to task {} (assignment {})",
        req.user_id, req.task_id, assignment_id
    );

    let query_str = format!("{} WHERE asg.assignment_id = ?", ASSIGNMENT_SELECT);
    match sqlx::query_as::<_, AssignmentWithNames>(&query_str)
        .bind(assignment_id)
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(row) => HttpResponse::Created().json(AssignmentResource::from_row(row)),
        Err(e) => {
            error!("Failed to fetch assignment {}: {}", assignment_id, e);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch assignment" }))
        }
    }
}

pub async fn delete_assignment(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let assignment_id = path.into_inner();

    match sqlx::query("DELETE FROM TaskAssignments_ WHERE assignment_id = ?")
        .bind(assignment_id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "Assignment not found" }))
        }
        Ok(_) => {
            info!("Assignment {} deleted", assignment_id);
            HttpResponse::Ok().json(json!({ "success": true, "message": "Assignment deleted" }))
        }
        Err(e) => {
            error!("Failed to delete assignment {}: {}", assignment_id, e);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to delete assignment" }))
        }
    }
}
