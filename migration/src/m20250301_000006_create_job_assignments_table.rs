use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum JobAssignments {
    Table,
    Id,
    BookingId,
    EmployeeId,
    Status,
    AssignedAt,
    StartedAt,
    CompletedAt,
    Notes,
    BeforeImages,
    AfterImages,
}

#[derive(DeriveIden)]
enum Bookings {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobAssignments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobAssignments::BookingId).uuid().not_null())
                    .col(ColumnDef::new(JobAssignments::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(JobAssignments::Status).string().not_null())
                    .col(
                        ColumnDef::new(JobAssignments::AssignedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobAssignments::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(JobAssignments::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(JobAssignments::Notes).text().null())
                    .col(
                        ColumnDef::new(JobAssignments::BeforeImages)
                            .json()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobAssignments::AfterImages)
                            .json()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_assignments_booking_id")
                            .from(JobAssignments::Table, JobAssignments::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_assignments_employee_id")
                            .from(JobAssignments::Table, JobAssignments::EmployeeId)
                            .to(Employees::Table, Employees::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobAssignments::Table).to_owned())
            .await
    }
}
