use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::UserEntity,
    value_objects::{enums::user_roles::UserRole, plans::FREE_PLAN_ID},
};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditUserModel {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Public projection of a user row; the credential hash never leaves the
/// domain layer.
#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub plan_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            username: value.username,
            email: value.email,
            role: UserRole::from_str(&value.role),
            plan_id: value.plan_id.unwrap_or(FREE_PLAN_ID),
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkipCountDto {
    pub skips_today: i32,
}
