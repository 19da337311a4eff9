use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;

/// SeaORM entity for the `employees` table. One row per EMPLOYEE user.
///
/// `is_available` is owned by the job assignment workflow; no request body
/// writes it directly.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub employee_code: String,
    pub position: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub skills: StringList,
    pub experience: Option<i32>,
    pub hire_date: Option<Date>,
    pub is_available: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::job_assignments::Entity")]
    Assignments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::job_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployee {
    pub auth_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub phone_number: Option<String>,
    pub position: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub experience: Option<i32>,
    pub hire_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEmployee {
    pub position: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience: Option<i32>,
}

/// Employee with the owning user, as listed in the admin console.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeWithUser {
    #[serde(flatten)]
    pub employee: Model,
    pub user: Option<super::users::UserResponse>,
}
