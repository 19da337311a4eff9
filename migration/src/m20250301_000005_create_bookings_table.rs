use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
    BookingNumber,
    CustomerId,
    ServiceId,
    ScheduledDate,
    ScheduledTime,
    Duration,
    Address,
    City,
    PostalCode,
    SpecialInstructions,
    EstimatedPrice,
    FinalPrice,
    Status,
    PaymentStatus,
    EnvironmentImages,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Bookings::BookingNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Bookings::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::ScheduledDate).date().not_null())
                    .col(ColumnDef::new(Bookings::ScheduledTime).string().not_null())
                    .col(ColumnDef::new(Bookings::Duration).integer().not_null())
                    .col(ColumnDef::new(Bookings::Address).string().not_null())
                    .col(ColumnDef::new(Bookings::City).string().not_null())
                    .col(ColumnDef::new(Bookings::PostalCode).string().null())
                    .col(ColumnDef::new(Bookings::SpecialInstructions).text().null())
                    .col(
                        ColumnDef::new(Bookings::EstimatedPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::FinalPrice).big_integer().null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(ColumnDef::new(Bookings::PaymentStatus).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::EnvironmentImages)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_customer_id")
                            .from(Bookings::Table, Bookings::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    // A service referenced by any booking cannot be hard-deleted.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_service_id")
                            .from(Bookings::Table, Bookings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}
