use serde::{Deserialize, Serialize};

use crate::models::area::Area;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaResource {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl AreaResource {
    pub fn from_row(row: Area) -> Self {
        Self {
            id: row.area_id,
            name: row.area_name,
            description: row.area_description,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateAreaRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAreaRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}
