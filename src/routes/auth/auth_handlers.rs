use actix_web::{web, HttpResponse, Responder};
use bcrypt::verify;
use chrono::{Duration, Utc};
use log::{error, info};
use serde_json::json;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::auth_models::{
    LoginRequest, LogoutRequest, LogoutResponse, RefreshRequest, TokenPairResponse,
};
use crate::auth::{encode_token, AuthedUser, Claims};
use crate::config::AppConfig;
use crate::models::session::Session;
use crate::routes::users::users_models::{UserResource, UserWithRole};

const USER_BY_EMAIL: &str = "SELECT u.user_id, u.user_name, u.user_email, u.password_hash, \
     u.role_id, r.role_name, u.created_at \
     FROM Users_ u JOIN Roles_ r ON u.role_id = r.role_id \
     WHERE u.user_email = ?";

const USER_BY_ID: &str = "SELECT u.user_id, u.user_name, u.user_email, u.password_hash, \
     u.role_id, r.role_name, u.created_at \
     FROM Users_ u JOIN Roles_ r ON u.role_id = r.role_id \
     WHERE u.user_id = ?";

// Exchange credentials for an access/refresh token pair.
pub async fn login(
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    info!("Received login request for email: {}", req.email);

    let user = match sqlx::query_as::<_, UserWithRole>(USER_BY_EMAIL)
        .bind(&req.email)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Login failed, unknown email: {}", req.email);
            return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", req.email, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch user" }));
        }
    };

    let valid = match verify(&req.password, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!("Error when checking password for {}: {}", req.email, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to verify password" }));
        }
    };

    if !valid {
        info!("Login failed, wrong password for: {}", req.email);
        return HttpResponse::Unauthorized().json(json!({ "error": "Invalid credentials" }));
    }

    // Persist a fresh refresh token for this login.
    let refresh_token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(config.refresh_token_ttl_days);

    let insert_result = sqlx::query(
        "INSERT INTO Sessions_ (refresh_token, user_id, expires_at) VALUES (?, ?, ?)",
    )
    .bind(&refresh_token)
    .bind(user.user_id)
    .bind(expires_at)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = insert_result {
        error!("Failed to insert session for user {}: {}", user.user_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to create session" }));
    }

    match issue_pair(&user, refresh_token, &config) {
        Ok(pair) => {
            info!("User {} logged in successfully", user.user_email);
            HttpResponse::Ok().json(pair)
        }
        Err(e) => {
            error!("Failed to sign access token for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to sign token" }))
        }
    }
}

// Rotate a refresh token and hand back a new pair.
pub async fn refresh(
    pool: web::Data<MySqlPool>,
    config: web::Data<AppConfig>,
    req: web::Json<RefreshRequest>,
) -> impl Responder {
    let session = match sqlx::query_as::<_, Session>(
        "SELECT refresh_token, user_id, expires_at FROM Sessions_ WHERE refresh_token = ?",
    )
    .bind(&req.refresh_token)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(session)) => session,
        Ok(None) => {
            info!("Refresh with unknown token");
            return HttpResponse::Unauthorized().json(json!({ "error": "Invalid refresh token" }));
        }
        Err(e) => {
            error!("Failed to fetch session: {}", e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to check session" }));
        }
    };

    if session.expires_at < Utc::now() {
        let _ = sqlx::query("DELETE FROM Sessions_ WHERE refresh_token = ?")
            .bind(&session.refresh_token)
            .execute(pool.get_ref())
            .await;
        info!("Refresh token expired for user {}", session.user_id);
        return HttpResponse::Unauthorized().json(json!({ "error": "Refresh token expired" }));
    }

    let user = match sqlx::query_as::<_, UserWithRole>(USER_BY_ID)
        .bind(session.user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            // Account removed since the session was created; revoke it.
            let _ = sqlx::query("DELETE FROM Sessions_ WHERE refresh_token = ?")
                .bind(&session.refresh_token)
                .execute(pool.get_ref())
                .await;
            return HttpResponse::Unauthorized().json(json!({ "error": "User no longer exists" }));
        }
        Err(e) => {
            error!("Failed to fetch user {}: {}", session.user_id, e);
            return HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch user" }));
        }
    };

    let new_refresh_token = Uuid::new_v4().to_string();
    let expires_at = Utc::now() + Duration::days(config.refresh_token_ttl_days);

    let update_result = sqlx::query(
        "UPDATE Sessions_ SET refresh_token = ?, expires_at = ? WHERE refresh_token = ?",
    )
    .bind(&new_refresh_token)
    .bind(expires_at)
    .bind(&session.refresh_token)
    .execute(pool.get_ref())
    .await;

    if let Err(e) = update_result {
        error!("Failed to rotate session for user {}: {}", user.user_id, e);
        return HttpResponse::InternalServerError()
            .json(json!({ "error": "Failed to rotate session" }));
    }

    match issue_pair(&user, new_refresh_token, &config) {
        Ok(pair) => HttpResponse::Ok().json(pair),
        Err(e) => {
            error!("Failed to sign access token for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to sign token" }))
        }
    }
}

// Current user, from the bearer token.
pub async fn me(pool: web::Data<MySqlPool>, user: AuthedUser) -> impl Responder {
    match sqlx::query_as::<_, UserWithRole>(USER_BY_ID)
        .bind(user.user_id)
        .fetch_optional(pool.get_ref())
        .await
    {
        Ok(Some(row)) => HttpResponse::Ok().json(UserResource::from_row(&row)),
        Ok(None) => HttpResponse::NotFound().json(json!({ "error": "User not found" })),
        Err(e) => {
            error!("Failed to fetch user {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch user" }))
        }
    }
}

// Revoke a refresh token. Succeeds even if the token is already gone.
pub async fn logout(pool: web::Data<MySqlPool>, req: web::Json<LogoutRequest>) -> impl Responder {
    match sqlx::query("DELETE FROM Sessions_ WHERE refresh_token = ?")
        .bind(&req.refresh_token)
        .execute(pool.get_ref())
        .await
    {
        Ok(_) => HttpResponse::Ok().json(LogoutResponse {
            success: true,
            message: "Logout successful".to_string(),
        }),
        Err(e) => {
            error!("Failed to delete session: {}", e);
            HttpResponse::InternalServerError().json(LogoutResponse {
                success: false,
                message: "Failed to logout".to_string(),
            })
        }
    }
}

fn issue_pair(
    user: &UserWithRole,
    refresh_token: String,
    config: &AppConfig,
) -> Result<TokenPairResponse, jsonwebtoken::errors::Error> {
    let claims = Claims::new(
        user.user_id,
        &user.user_email,
        &user.role_name,
        config.access_token_ttl_secs,
    );
    let access_token = encode_token(&claims, &config.jwt_secret)?;

    Ok(TokenPairResponse {
        access_token,
        refresh_token,
        expires_in: config.access_token_ttl_secs,
        user: UserResource::from_row(user),
    })
}
