use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::{domain::value_objects::plans::Entitlements, infra::db::postgres::schema::plans};

#[derive(Debug, Clone)]
pub struct PlanEntity {
    pub id: Uuid,
    pub kind: String,
    pub price_minor: i32,
    pub entitlements: Entitlements,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Raw row used for Diesel queries. Entitlements stay as JSON and are parsed
/// into the value object.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = plans)]
pub struct PlanRow {
    pub id: Uuid,
    pub kind: String,
    pub price_minor: i32,
    pub entitlements: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PlanRow> for PlanEntity {
    fn from(value: PlanRow) -> Self {
        let entitlements = serde_json::from_value(value.entitlements).unwrap_or_default();

        Self {
            id: value.id,
            kind: value.kind,
            price_minor: value.price_minor,
            entitlements,
            is_active: value.is_active,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = plans)]
pub struct NewPlanRow {
    pub id: Uuid,
    pub kind: String,
    pub price_minor: i32,
    pub entitlements: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = plans)]
pub struct EditPlanRow {
    pub kind: Option<String>,
    pub price_minor: Option<i32>,
    pub entitlements: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
