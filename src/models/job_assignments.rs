use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;

/// Assignment status: `Assigned → Started → Completed`.
///
/// `Released` is the terminal state of an assignment voided by cancelling
/// its booking; it is never a valid target for an employee status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AssignmentStatus {
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "started")]
    Started,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "released")]
    Released,
}

impl AssignmentStatus {
    /// Transitions an assigned employee may request.
    pub fn can_advance_to(self, next: AssignmentStatus) -> bool {
        matches!(
            (self, next),
            (AssignmentStatus::Assigned, AssignmentStatus::Started)
                | (AssignmentStatus::Started, AssignmentStatus::Completed)
        )
    }

    pub fn is_active(self) -> bool {
        matches!(self, AssignmentStatus::Assigned | AssignmentStatus::Started)
    }

    pub fn active() -> [AssignmentStatus; 2] {
        [AssignmentStatus::Assigned, AssignmentStatus::Started]
    }
}

/// SeaORM entity for the `job_assignments` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "job_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub employee_id: Uuid,
    pub status: AssignmentStatus,
    pub assigned_at: DateTimeUtc,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub before_images: StringList,
    #[sea_orm(column_type = "Json")]
    pub after_images: StringList,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
    #[sea_orm(
        belongs_to = "super::employees::Entity",
        from = "Column::EmployeeId",
        to = "super::employees::Column::Id"
    )]
    Employee,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::employees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct AssignEmployee {
    pub booking_id: Uuid,
    pub employee_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdvanceJobStatus {
    pub status: AssignmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobImageKind {
    Before,
    After,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachJobImages {
    #[serde(rename = "type")]
    pub kind: JobImageKind,
    pub images: Vec<String>,
}

/// Result of an assignment write: the assignment plus its booking after the change.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentOutcome {
    pub assignment: Model,
    pub booking: super::bookings::Model,
}

/// Assignment with the employee holding it, as embedded in booking views.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentWithEmployee {
    #[serde(flatten)]
    pub assignment: Model,
    pub employee: Option<super::employees::EmployeeWithUser>,
}

/// Assignment with its booking, as shown in the employee's job list.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    #[serde(flatten)]
    pub assignment: Model,
    pub booking: Option<super::bookings::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetails {
    #[serde(flatten)]
    pub assignment: Model,
    pub booking: super::bookings::Model,
    pub customer: Option<super::customers::CustomerWithUser>,
    pub service: Option<super::services::Model>,
    pub uploaded_media: Vec<super::uploaded_media::Model>,
}
