use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// `Users_` joined with its role. Internal shape only; it carries the
/// password hash and must never be serialized as-is.
#[derive(Debug, FromRow)]
pub struct UserWithRole {
    pub user_id: i32,
    pub user_name: String,
    pub user_email: String,
    pub password_hash: String,
    pub role_id: i32,
    pub role_name: String,
    pub created_at: NaiveDateTime,
}

/// Public representation of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role_id: i32,
    pub role_name: String,
    pub created_at: NaiveDateTime,
}

impl UserResource {
    pub fn from_row(row: &UserWithRole) -> Self {
        Self {
            id: row.user_id,
            name: row.user_name.clone(),
            email: row.user_email.clone(),
            role_id: row.role_id,
            role_name: row.role_name.clone(),
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role_id: i32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn resource_never_exposes_the_password_hash() {
        let row = UserWithRole {
            user_id: 3,
            user_name: "Ana".to_string(),
            user_email: "ana@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            role_id: 2,
            role_name: "member".to_string(),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };

        let json = serde_json::to_value(UserResource::from_row(&row)).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["roleName"], "member");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert!(!json.to_string().contains("secret"));
    }
}
