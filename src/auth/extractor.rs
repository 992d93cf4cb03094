use std::future::{ready, Ready};

use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use super::{decode_token, AuthError};
use crate::config::AppConfig;

/// The authenticated caller, extracted from the bearer token.
///
/// Adding this as a handler argument makes the route require a valid
/// access token; role checks stay in the handlers.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl AuthedUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl FromRequest for AuthedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthedUser, AuthError> {
    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| AuthError::InvalidToken("Auth is not configured".to_string()))?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidHeader)?
        .trim();

    let claims = decode_token(token, &config.jwt_secret)?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| AuthError::InvalidToken("Subject is not a user id".to_string()))?;

    Ok(AuthedUser {
        user_id,
        email: claims.email,
        role: claims.role,
    })
}
