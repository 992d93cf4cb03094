use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::error;
use serde_json::json;
use sqlx::MySqlPool;

use super::reports_models::{summarize, ReportTaskRow};
use crate::auth::AuthedUser;

// Dashboard aggregates: task counts by status, due bucket and area.
pub async fn summary(pool: web::Data<MySqlPool>, _user: AuthedUser) -> impl Responder {
    let rows = sqlx::query_as::<_, ReportTaskRow>(
        "SELECT t.status, t.due_date, t.area_id, a.area_name \
         FROM Tasks_ t LEFT JOIN Areas_ a ON t.area_id = a.area_id",
    )
    .fetch_all(pool.get_ref())
    .await;

    match rows {
        Ok(rows) => HttpResponse::Ok().json(summarize(rows, Utc::now().date_naive())),
        Err(e) => {
            error!("Failed to fetch report rows: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to build summary" }))
        }
    }
}
