use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored refresh token. Access tokens are stateless JWTs; only the
/// refresh side of the pair lives in the database so logout can revoke it.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub refresh_token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}
