use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum UploadedMedia {
    Table,
    Id,
    BookingId,
    Kind,
    Reference,
    FileName,
    FileSize,
    MimeType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UploadedMedia::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UploadedMedia::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UploadedMedia::BookingId).uuid().not_null())
                    .col(ColumnDef::new(UploadedMedia::Kind).string().not_null())
                    .col(ColumnDef::new(UploadedMedia::Reference).text().not_null())
                    .col(ColumnDef::new(UploadedMedia::FileName).string().null())
                    .col(ColumnDef::new(UploadedMedia::FileSize).big_integer().null())
                    .col(ColumnDef::new(UploadedMedia::MimeType).string().null())
                    .col(
                        ColumnDef::new(UploadedMedia::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_uploaded_media_booking_id")
                            .from(UploadedMedia::Table, UploadedMedia::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UploadedMedia::Table).to_owned())
            .await
    }
}
