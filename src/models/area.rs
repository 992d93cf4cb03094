use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Area {
    pub area_id: i32,
    pub area_name: String,
    pub area_description: Option<String>,
}
