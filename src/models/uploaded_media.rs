use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum MediaKind {
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "video")]
    Video,
}

impl MediaKind {
    pub fn from_mime_type(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(m) if m.starts_with("video/") => MediaKind::Video,
            _ => MediaKind::Image,
        }
    }
}

/// SeaORM entity for the `uploaded_media` table.
///
/// `reference` is opaque: a URL or data URL produced by the upload collaborator.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "uploaded_media")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub booking_id: Uuid,
    pub kind: MediaKind,
    #[sea_orm(column_type = "Text")]
    pub reference: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bookings::Entity",
        from = "Column::BookingId",
        to = "super::bookings::Column::Id"
    )]
    Booking,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct MediaUpload {
    pub reference: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
}

/// Request body for `POST /api/bookings/{id}/upload-images`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachEnvironmentImages {
    pub images: Vec<MediaUpload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentImages {
    pub environment_images: Vec<String>,
    pub uploaded: Vec<Model>,
}
