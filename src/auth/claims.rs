use chrono::Utc;
use serde::{Deserialize, Serialize};

/// JWT claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, email: &str, role: &str, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_carry_subject_and_expiry() {
        let claims = Claims::new(42, "user@example.com", "admin", 900);
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
    }

    #[test]
    fn negative_ttl_is_expired() {
        let claims = Claims::new(1, "user@example.com", "member", -10);
        assert!(claims.is_expired());
    }

    #[test]
    fn non_numeric_subject_has_no_user_id() {
        let mut claims = Claims::new(1, "user@example.com", "member", 900);
        claims.sub = "not-a-number".to_string();
        assert_eq!(claims.user_id(), None);
    }
}
