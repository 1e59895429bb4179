use crate::model::RoleId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type UserId = u64;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct User {
    #[schema(value_type = u64)]
    pub user_id: UserId,
    pub username: String,
    pub full_name: String,
    pub active: bool,
    #[serde(default)]
    #[schema(value_type = Vec<u64>)]
    pub role_ids: Vec<RoleId>,
}
