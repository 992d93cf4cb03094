use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::json;

pub mod claims;
pub mod extractor;

pub use claims::Claims;
pub use extractor::AuthedUser;

/// Authentication errors. All of them map to 401 responses.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Invalid authorization header format")]
    InvalidHeader,
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token expired")]
    TokenExpired,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Sign an access token with the configured HMAC secret.
pub fn encode_token(claims: &Claims, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and verify an access token, mapping the library errors to ours.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 60; // clock skew tolerance
    validation.set_required_spec_claims(&["exp", "sub"]);

    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            AuthError::InvalidToken("Invalid signature".to_string())
        }
        jsonwebtoken::errors::ErrorKind::InvalidToken => {
            AuthError::InvalidToken("Invalid token format".to_string())
        }
        jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::InvalidToken(format!("Missing required claim: {}", claim))
        }
        _ => AuthError::InvalidToken(e.to_string()),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_claims(ttl_secs: i64) -> Claims {
        Claims::new(7, "ana@example.com", "member", ttl_secs)
    }

    #[test]
    fn round_trip_with_correct_secret() {
        let secret = "test-secret-key";
        let token = encode_token(&test_claims(3600), secret).unwrap();

        let decoded = decode_token(&token, secret).unwrap();
        assert_eq!(decoded.sub, "7");
        assert_eq!(decoded.email, "ana@example.com");
        assert_eq!(decoded.role, "member");
        assert_eq!(decoded.user_id(), Some(7));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = encode_token(&test_claims(3600), "correct-secret").unwrap();

        match decode_token(&token, "wrong-secret") {
            Err(AuthError::InvalidToken(_)) => {}
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn rejects_expired_token() {
        // Expired well past the 60s leeway.
        let token = encode_token(&test_claims(-3600), "secret").unwrap();

        match decode_token(&token, "secret") {
            Err(AuthError::TokenExpired) => {}
            other => panic!("expected TokenExpired, got {:?}", other),
        }
    }

    #[test]
    fn rejects_garbage_token() {
        match decode_token("not-a-valid-jwt", "secret") {
            Err(AuthError::InvalidToken(_)) => {}
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[test]
    fn rejects_tampered_token() {
        let secret = "secret";
        let mut token = encode_token(&test_claims(3600), secret).unwrap();
        if let Some(last) = token.pop() {
            token.push(if last == 'a' { 'b' } else { 'a' });
        }

        assert!(decode_token(&token, secret).is_err());
    }
}
