use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Categories {
    #[sea_orm(string_value = "residential")]
    Residential,
    #[sea_orm(string_value = "commercial")]
    Commercial,
    #[sea_orm(string_value = "specialized")]
    Specialized,
}

/// SeaORM entity for the `services` table (the cleaning catalog).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub category: Categories,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Minor currency units.
    pub base_price: i64,
    pub price_unit: String,
    /// Default booking length in minutes.
    pub duration: i32,
    #[sea_orm(column_type = "Json")]
    pub features: StringList,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub category: Categories,
    pub description: String,
    pub base_price: i64,
    pub price_unit: String,
    pub duration: i32,
    #[serde(default)]
    pub features: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateService {
    pub name: Option<String>,
    pub category: Option<Categories>,
    pub description: Option<String>,
    pub base_price: Option<i64>,
    pub price_unit: Option<String>,
    pub duration: Option<i32>,
    pub features: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<Categories>,
    pub is_active: Option<bool>,
}

impl ServiceListQuery {
    /// Stable cache key fragment for this filter combination.
    pub fn cache_fragment(&self) -> String {
        let category = self
            .category
            .map(|c| format!("{c:?}").to_lowercase())
            .unwrap_or_else(|| "any".to_string());
        let active = self
            .is_active
            .map(|a| a.to_string())
            .unwrap_or_else(|| "any".to_string());
        format!("category={category}&active={active}")
    }
}
