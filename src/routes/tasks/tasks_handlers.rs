use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use serde_json::json;
use sqlx::MySqlPool;

use super::tasks_models::{
    CreateTaskRequest, TaskListQuery, TaskResource, TaskWithNames, UpdateTaskRequest,
};
use crate::auth::AuthedUser;
use crate::models::task::{Task, TaskStatus};

const TASK_SELECT: &str = "SELECT t.task_id, t.title, t.description, t.area_id, a.area_name, \
     t.responsible_id, u.user_name AS responsible_name, t.status, t.due_date, \
     t.created_at, t.updated_at \
     FROM Tasks_ t \
     LEFT JOIN Areas_ a ON t.area_id = a.area_id \
     LEFT JOIN Users_ u ON t.responsible_id = u.user_id";

// List tasks, optionally filtered by area, responsible or status.
pub async fn list_tasks(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    query: web::Query<TaskListQuery>,
) -> impl Responder {
    if let Some(status) = &query.status {
        if TaskStatus::parse(status).is_none() {
            return HttpResponse::BadRequest().json(json!({ "error": "Unknown status" }));
        }
    }

    // Dynamically construct the WHERE clause from the given filters.
    let mut conditions: Vec<&str> = Vec::new();
    if query.area_id.is_some() {
        conditions.push("t.area_id = ?");
    }
    if query.responsible_id.is_some() {
        conditions.push("t.responsible_id = ?");
    }
    if query.status.is_some() {
        conditions.push("t.status = ?");
    }

    let query_str = if conditions.is_empty() {
        format!("{} ORDER BY t.task_id", TASK_SELECT)
    } else {
        format!(
            "{} WHERE {} ORDER BY t.task_id",
            TASK_SELECT,
            conditions.join(" AND ")
        )
    };

    let mut db_query = sqlx::query_as::<_, TaskWithNames>(&query_str);
    if let Some(area_id) = query.area_id {
        db_query = db_query.bind(area_id);
    }
    if let Some(responsible_id) = query.responsible_id {
        db_query = db_query.bind(responsible_id);
    }
    if let Some(status) = &query.status {
        db_query = db_query.bind(status);
    }

    match db_query.fetch_all(pool.get_ref()).await {
        Ok(rows) => {
            let today = Utc::now().date_naive();
            let tasks: Vec<TaskResource> = rows
                .into_iter()
                .map(|row| TaskResource::from_row(row, today))
                .collect();
            HttpResponse::Ok().json(tasks)
        }
        Err(e) => {
            error!("Failed to fetch tasks: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch tasks" }))
        }
    }
}

pub async fn get_task(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let task_id = path.into_inner();
    let query_str = format!("{} WHERE t.task_id = ?", TASK_SELECT);

    match sqlx::query_as::<_, TaskWithNames>(&query_str)
        .bind(task_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(row)) => {
            HttpResponse::Ok().json(TaskResource::from_row(row, Utc::now().date_naive()))
        }
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "Task not found" })),
        Err(e) => {
            error!("Failed to fetch task {}: {}", task_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch task" }))
        }
    }
}

pub async fn create_task(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    req: web::Json<CreateTaskRequest>,
) -> impl Responder {
    let title = req.title.trim();
    if title.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Title must not be empty" }));
    }

    let status = match &req.status {
        Some(value) => match TaskStatus::parse(value) {
            Some(status) => status,
            None => {
                return HttpResponse::BadRequest().json(json!({ "error": "Unknown status" }));
            }
        },
        None => TaskStatus::NotStarted,
    };

    if let Some(area_id) = req.area_id {
        if let Some(resp) = check_area_exists(pool.get_ref(), area_id).await {
            return resp;
        }
    }
    if let Some(responsible_id) = req.responsible_id {
        if let Some(resp) = check_user_exists(pool.get_ref(), responsible_id).await {
            return resp;
        }
    }

    let insert_result = sqlx::query(
        "INSERT INTO Tasks_ (title, description, area_id, responsible_id, status, due_date, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, UTC_TIMESTAMP(), UTC_TIMESTAMP())",
    )
    .bind(title)
    .bind(&req.description)
    .bind(req.area_id)
    .bind(req.responsible_id)
    .bind(status.as_str())
    .bind(req.due_date)
    .execute(pool.get_ref())
    .await;

    let task_id = match insert_result {
        Ok(result) => result.last_insert_id() as i32,
        Err(e) => {
            error!("Failed to insert task: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create task" }));
        }
    };

    info!("Task {} created", task_id);
    fetch_task_resource(pool.get_ref(), task_id, true).await
}

// Partial update; fields missing from the body keep their current values.
pub async fn update_task(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let task_id = path.into_inner();

    let current = match sqlx::query_as::<_, Task>(
        "SELECT task_id, title, description, area_id, responsible_id, status, due_date, \
         created_at, updated_at FROM Tasks_ WHERE task_id = ?",
    )
    .bind(task_id)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(task)) => task,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({ "error": "Task not found" }));
        }
        Err(e) => {
            error!("Failed to fetch task {}: {}", task_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch task" }));
        }
    };

    let title = match &req.title {
        Some(title) if title.trim().is_empty() => {
            return HttpResponse::BadRequest().json(json!({ "error": "Title must not be empty" }));
        }
        Some(title) => title.trim().to_string(),
        None => current.title,
    };

    let status = match &req.status {
        Some(value) => match TaskStatus::parse(value) {
            Some(status) => status.as_str().to_string(),
            None => {
                return HttpResponse::BadRequest().json(json!({ "error": "Unknown status" }));
            }
        },
        None => current.status,
    };

    if let Some(area_id) = req.area_id {
        if let Some(resp) = check_area_exists(pool.get_ref(), area_id).await {
            return resp;
        }
    }
    if let Some(responsible_id) = req.responsible_id {
        if let Some(resp) = check_user_exists(pool.get_ref(), responsible_id).await {
            return resp;
        }
    }

    let description = req.description.clone().or(current.description);
    let area_id = req.area_id.or(current.area_id);
    let responsible_id = req.responsible_id.or(current.responsible_id);
    let due_date = req.due_date.or(current.due_date);

    let update_result = sqlx::query(
        "UPDATE Tasks_ SET title = ?, description = ?, area_id = ?, responsible_id = ?, \
         status = ?, due_date = ?, updated_at = UTC_TIMESTAMP() WHERE task_id = ?",
    )
    .bind(&title)
    .bind(&description)
    .bind(area_id)
    .bind(responsible_id)
    .bind(&status)
    .bind(due_date)
    .bind(task_id)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = update_result {
        error!("Failed to update task {}: {}", task_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to update task" }));
    }

    fetch_task_resource(pool.get_ref(), task_id, false).await
}

pub async fn delete_task(
    pool: web::Data<MySqlPool>,
    _user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let task_id = path.into_inner();

    // Remove the assignments first, then the task itself.
    if let Err(e) = sqlx::query("DELETE FROM TaskAssignments_ WHERE task_id = ?")
        .bind(task_id)
        .execute(pool.get_ref())
        .await
    {
        error!("Failed to delete assignments for task {}: {}", task_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to delete task assignments" }));
    }

    match sqlx::query("DELETE FROM Tasks_ WHERE task_id = ?")
        .bind(task_id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "Task not found" }))
        }
        Ok(_) => {
            info!("Task {} deleted", task_id);
            HttpResponse::Ok().json(json!({ "success": true, "message": "Task deleted" }))
        }
        Err(e) => {
            error!("Failed to delete task {}: {}", task_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to delete task" }))
        }
    }
}

async fn fetch_task_resource(pool: &MySqlPool, task_id: i32, created: bool) -> HttpResponse {
    let query_str = format!("{} WHERE t.task_id = ?", TASK_SELECT);

    match sqlx::query_as::<_, TaskWithNames>(&query_str)
        .bind(task_id)
        .fetch_one(pool)
        .await
    {
        Ok(row) => {
            let resource = TaskResource::from_row(row, Utc::now().date_naive());
            if created {
                HttpResponse::Created().json(resource)
            } else {
                HttpResponse::Ok().json(resource)
            }
        }
        Err(e) => {
            error!("Failed to fetch task {} after write: {}", task_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch task" }))
        }
    }
}

// FK checks return an error response to hand back, or None when the id exists.
async fn check_area_exists(pool: &MySqlPool, area_id: i32) -> Option<HttpResponse> {
    match sqlx::query_as::<_, (i32,)>("SELECT area_id FROM Areas_ WHERE area_id = ?")
        .bind(area_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(_)) => None,
        Ok(None) => {
            info!("Area not found: {}", area_id);
            Some(HttpResponse::BadRequest().json(json!({ "error": "Area not found" })))
        }
        Err(e) => {
            error!("Failed to check area {}: {}", area_id, e);
            Some(
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to check area" })),
            )
        }
    }
}

async fn check_user_exists(pool: &MySqlPool, user_id: i32) -> Option<HttpResponse> {
    match sqlx::query_as::<_, (i32,)>("SELECT user_id FROM Users_ WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(_)) => None,
        Ok(None) => {
            info!("User not found: {}", user_id);
            Some(HttpResponse::BadRequest().json(json!({ "error": "User not found" })))
        }
        Err(e) => {
            error!("Failed to check user {}: {}", user_id, e);
            Some(
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to check user" })),
            )
        }
    }
}
