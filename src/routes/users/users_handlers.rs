use actix_web::{web, HttpResponse, Responder};
use bcrypt::{hash, DEFAULT_COST};
use log::{error, info};
use serde_json::json;
use sqlx::MySqlPool;

use super::users_models::{CreateUserRequest, UpdateUserRequest, UserResource, UserWithRole};
use crate::auth::AuthedUser;

const USER_SELECT: &str = "SELECT u.user_id, u.user_name, u.user_email, u.password_hash, \
     u.role_id, r.role_name, u.created_at \
     FROM Users_ u JOIN Roles_ r ON u.role_id = r.role_id";

pub async fn list_users(pool: web::Data<MySqlPool>, user: AuthedUser) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let query_str = format!("{} ORDER BY u.user_name", USER_SELECT);
    match sqlx::query_as::<_, UserWithRole>(&query_str)
        .fetch_all(pool.get_ref())
        .await
    {
        Ok(rows) => {
            let users: Vec<UserResource> = rows.iter().map(UserResource::from_row).collect();
            HttpResponse::Ok().json(users)
        }
        Err(e) => {
            error!("Failed to fetch users: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch users" }))
        }
    }
}

pub async fn get_user(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    let user_id = path.into_inner();
    if !user.is_admin() && user.user_id != user_id {
        return HttpResponse::Forbidden().json(json!({ "error": "Not allowed" }));
    }

    let query_str = format!("{} WHERE u.user_id = ?", USER_SELECT);
    match sqlx::query_as::<_, UserWithRole>(&query_str)
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(row)) => HttpResponse::Ok().json(UserResource::from_row(&row)),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch user" }))
        }
    }
}

pub async fn create_user(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    req: web::Json<CreateUserRequest>,
) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let name = req.name.trim();
    if name.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Name must not be empty" }));
    }
    if req.password.is_empty() {
        return HttpResponse::BadRequest().json(json!({ "error": "Password must not be empty" }));
    }

    match count_by_email(pool.get_ref(), &req.email, None).await {
        Ok(0) => {}
        Ok(_) => {
            return HttpResponse::Conflict().json(json!({ "error": "Email already registered" }));
        }
        Err(e) => {
            error!("Failed to check email {}: {}", req.email, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check email" }));
        }
    }

    if let Some(resp) = check_role_exists(pool.get_ref(), req.role_id).await {
        return resp;
    }

    let hashed_password = match hash(&req.password, DEFAULT_COST) {
        Ok(hp) => hp,
        Err(e) => {
            error!("Failed to hash password: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to hash password" }));
        }
    };

    let insert_result = sqlx::query(
        "INSERT INTO Users_ (user_name, user_email, password_hash, role_id, created_at) \
         VALUES (?, ?, ?, ?, UTC_TIMESTAMP())",
    )
    .bind(name)
    .bind(&req.email)
    .bind(&hashed_password)
    .bind(req.role_id)
    .execute(pool.get_ref())
    .await;

    let user_id = match insert_result {
        Ok(result) => result.last_insert_id() as i32,
        Err(e) => {
            error!("Failed to insert user {}: {}", req.email, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to create user" }));
        }
    };

    info!("User {} ({}) created", user_id, req.email);
    fetch_user_resource(pool.get_ref(), user_id, true).await
}

pub async fn update_user(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    path: web::Path<i32>,
    req: web::Json<UpdateUserRequest>,
) -> impl Responder {
    let user_id = path.into_inner();
    if !user.is_admin() && user.user_id != user_id {
        return HttpResponse::Forbidden().json(json!({ "error": "Not allowed" }));
    }
    // Only admins may move users between roles.
    if req.role_id.is_some() && !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let query_str = format!("{} WHERE u.user_id = ?", USER_SELECT);
    let current = match sqlx::query_as::<_, UserWithRole>(&query_str)
        .bind(user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(row)) => row,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({ "error": "User not found" }));
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", user_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch user" }));
        }
    };

    let name = match &req.name {
        Some(name) if name.trim().is_empty() => {
            return HttpResponse::BadRequest().json(json!({ "error": "Name must not be empty" }));
        }
        Some(name) => name.trim().to_string(),
        None => current.user_name,
    };

    let email = match &req.email {
        Some(email) => {
            match count_by_email(pool.get_ref(), email, Some(user_id)).await {
                Ok(0) => {}
                Ok(_) => {
                    return HttpResponse::Conflict()
                        .json(json!({ "error": "Email already registered" }));
                }
                Err(e) => {
                    error!("Failed to check email {}: {}", email, e);
                    return HttpResponse::InternalServerError()
                        .json(json!({ "error": "Failed to check email" }));
                }
            }
            email.clone()
        }
        None => current.user_email,
    };

    let role_id = match req.role_id {
        Some(role_id) => {
            if let Some(resp) = check_role_exists(pool.get_ref(), role_id).await {
                return resp;
            }
            role_id
        }
        None => current.role_id,
    };

    let password_hash = match &req.password {
        Some(password) if password.is_empty() => {
            return HttpResponse::BadRequest()
                .json(json!({ "error": "Password must not be empty" }));
        }
        Some(password) => match hash(password, DEFAULT_COST) {
            Ok(hp) => hp,
            Err(e) => {
                error!("Failed to hash password: {}", e);
                return HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to hash password" }));
            }
        },
        None => current.password_hash,
    };

    let update_result = sqlx::query(
        "UPDATE Users_ SET user_name = ?, user_email = ?, password_hash = ?, role_id = ? \
         WHERE user_id = ?",
    )
    .bind(&name)
    .bind(&email)
    .bind(&password_hash)
    .bind(role_id)
    .bind(user_id)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = update_result {
        error!("Failed to update user {}: {}", user_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to update user" }));
    }

    fetch_user_resource(pool.get_ref(), user_id, false).await
}

pub async fn delete_user(
    pool: web::Data<MySqlPool>,
    user: AuthedUser,
    path: web::Path<i32>,
) -> impl Responder {
    if !user.is_admin() {
        return HttpResponse::Forbidden().json(json!({ "error": "Admin role required" }));
    }

    let user_id = path.into_inner();
    if user.user_id == user_id {
        return HttpResponse::BadRequest()
            .json(json!({ "error": "Cannot delete your own account" }));
    }

    // Detach everything pointing at the account before removing it.
    let cleanup = [
        "DELETE FROM Sessions_ WHERE user_id = ?",
        "DELETE FROM TaskAssignments_ WHERE user_id = ?",
        "UPDATE Tasks_ SET responsible_id = NULL WHERE responsible_id = ?",
    ];
    for query_str in cleanup {
        if let Err(e) = sqlx::query(query_str)
            .bind(user_id)
            .execute(pool.get_ref())
            .await
        {
            error!("Failed cleanup for user {}: {}", user_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to delete user" }));
        }
    }

    match sqlx::query("DELETE FROM Users_ WHERE user_id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
    {
        Ok(result) if result.rows_affected() == 0 => {
            HttpResponse::NotFound().json(json!({ "error": "User not found" }))
        }
        Ok(_) => {
            info!("User {} deleted", user_id);
            HttpResponse::Ok().json(json!({ "success": true, "message": "User deleted" }))
        }
        Err(e) => {
            error!("Failed to delete user {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to delete user" }))
        }
    }
}

async fn fetch_user_resource(pool: &MySqlPool, user_id: i32, created: bool) -> HttpResponse {
    let query_str = format!("{} WHERE u.user_id = ?", USER_SELECT);
    match sqlx::query_as::<_, UserWithRole>(&query_str)
        .bind(user_id)
        .fetch_one(pool)
        .await
    {
        Ok(row) => {
            let resource = UserResource::from_row(&row);
            if created {
                HttpResponse::Created().json(resource)
            } else {
                HttpResponse::Ok().json(resource)
            }
        }
        Err(e) => {
            error!("Failed to fetch user {} after write: {}", user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch user" }))
        }
    }
}

async fn count_by_email(
    pool: &MySqlPool,
    email: &str,
    exclude_user_id: Option<i32>,
) -> Result<i64, sqlx::Error> {
    let row = match exclude_user_id {
        Some(user_id) => {
            sqlx::query_as::<_, (i64,)>(
                "SELECT COUNT(*) FROM Users_ WHERE user_email = ? AND user_id != ?",
            )
            .bind(email)
            .bind(user_id)
            .fetch_one(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM Users_ WHERE user_email = ?")
                .bind(email)
                .fetch_one(pool)
                .await?
        }
    };
    Ok(row.0)
}

async fn check_role_exists(pool: &MySqlPool, role_id: i32) -> Option<HttpResponse> {
    match sqlx::query_as::<_, (i32,)>("SELECT role_id FROM Roles_ WHERE role_id = ?")
        .bind(role_id)
        .fetch_optional(pool)
        .await
    {
        Ok(Some(_)) => None,
        Ok(None) => {
            info!("Role not found: {}", role_id);
            Some(HttpResponse::BadRequest().json(json!({ "error": "Role not found" })))
        }
        Err(e) => {
            error!("Failed to check role {}: {}", role_id, e);
            Some(
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Failed to check role" })),
            )
        }
    }
}
