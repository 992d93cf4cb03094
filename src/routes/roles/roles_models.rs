use serde::Serialize;

use crate::models::role::Role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResource {
    pub id: i32,
    pub name: String,
}

impl RoleResource {
    pub fn from_row(row: Role) -> Self {
        Self {
            id: row.role_id,
            name: row.role_name,
        }
    }
}
