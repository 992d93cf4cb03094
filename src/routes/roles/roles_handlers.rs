use actix_web::{web, HttpResponse, Responder};
use log::error;
use serde_json::json;
use sqlx::MySqlPool;

use super::roles_models::RoleResource;
use crate::auth::AuthedUser;
use crate::models::role::Role;

pub async fn list_roles(pool: web::Data<MySqlPool>, _user: AuthedUser) -> impl Responder {
    match sqlx::query_as::<_, Role>("SELECT role_id, role_name FROM Roles_ ORDER BY role_id")
        .fetch_all(pool.get_ref())
        .await
    {
        Ok(rows) => {
            let roles: Vec<RoleResource> = rows.into_iter().map(RoleResource::from_row).collect();
            HttpResponse::Ok().json(roles)
        }
        Err(e) => {
            error!("Failed to fetch roles: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch roles" }))
        }
    }
}
