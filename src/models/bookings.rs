use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;

/// Booking status stored as a lowercase string in the database.
///
/// `Pending → Confirmed → InProgress → Completed`, with `Cancelled`
/// reachable from `Pending` or `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum BookingStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl BookingStatus {
    /// The booking transition table. Every status write goes through this.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }

    /// Schedule, location and instructions may only change before work starts.
    pub fn is_editable(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

/// SeaORM entity for the `bookings` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub booking_number: String,
    pub customer_id: Uuid,
    pub service_id: Uuid,
    pub scheduled_date: Date,
    pub scheduled_time: String,
    /// Minutes.
    pub duration: i32,
    pub address: String,
    pub city: String,
    pub postal_code: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_instructions: Option<String>,
    /// Snapshot of the service base price at creation; never recomputed.
    pub estimated_price: i64,
    pub final_price: Option<i64>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[sea_orm(column_type = "Json")]
    pub environment_images: StringList,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Service,
    #[sea_orm(has_many = "super::job_assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::uploaded_media::Entity")]
    UploadedMedia,
    #[sea_orm(has_one = "super::reviews::Entity")]
    Review,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Service.def()
    }
}

impl Related<super::job_assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::uploaded_media::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UploadedMedia.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for `POST /api/bookings`. The customer comes from the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub service_id: Uuid,
    pub scheduled_date: Date,
    pub scheduled_time: String,
    pub duration: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub special_instructions: Option<String>,
}

/// Request body for `PUT /api/bookings/{id}`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBooking {
    pub scheduled_date: Option<Date>,
    pub scheduled_time: Option<String>,
    pub duration: Option<i32>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub special_instructions: Option<String>,
}

impl UpdateBooking {
    pub fn is_empty(&self) -> bool {
        self.scheduled_date.is_none()
            && self.scheduled_time.is_none()
            && self.duration.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
            && self.special_instructions.is_none()
    }
}

/// Query string for `GET /api/admin/bookings`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl BookingListQuery {
    pub fn pagination(&self) -> super::PaginationQuery {
        super::PaginationQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

/// A booking with its customer, service and assigned employees, as shown in listings.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    #[serde(flatten)]
    pub booking: Model,
    pub customer: Option<super::customers::CustomerWithUser>,
    pub service: Option<super::services::Model>,
    pub assignments: Vec<super::job_assignments::AssignmentWithEmployee>,
}

/// Full booking view for `GET /api/bookings/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Model,
    pub customer: Option<super::customers::CustomerWithUser>,
    pub service: Option<super::services::Model>,
    pub assignments: Vec<super::job_assignments::AssignmentWithEmployee>,
    pub uploaded_media: Vec<super::uploaded_media::Model>,
    pub review: Option<super::reviews::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingPage {
    pub results: usize,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub bookings: Vec<BookingSummary>,
}
