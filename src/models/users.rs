use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Roles` enum maps to a Postgres TEXT column stored as lowercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Roles {
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "employee")]
    Employee,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "super_admin")]
    SuperAdmin,
}

impl Roles {
    pub fn is_admin(&self) -> bool {
        matches!(self, Roles::Admin | Roles::SuperAdmin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum UserStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Subject of the identity provider token.
    #[sea_orm(unique)]
    pub auth_uid: String,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub role: Roles,
    pub status: UserStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::customers::Entity")]
    Customer,
    #[sea_orm(has_one = "super::employees::Entity")]
    Employee,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used by `POST /api/auth/register`. Identity fields come from the verified token.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUser {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Used by `PUT /api/users/profile`. Address fields only apply to customers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub photo_url: Option<String>,
    pub role: Roles,
    pub status: UserStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            display_name: m.display_name,
            phone_number: m.phone_number,
            photo_url: m.photo_url,
            role: m.role,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// User plus whichever profile matches their role.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub customer: Option<super::customers::Model>,
    pub employee: Option<super::employees::Model>,
}
