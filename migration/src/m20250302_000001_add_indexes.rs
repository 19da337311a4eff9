use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Bookings {
    Table,
    CustomerId,
    ServiceId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobAssignments {
    Table,
    EmployeeId,
}

#[derive(DeriveIden)]
enum UploadedMedia {
    Table,
    BookingId,
}

/// Partial unique index: a booking holds at most one assignment in an active status.
const ACTIVE_ASSIGNMENT_INDEX: &str = "CREATE UNIQUE INDEX IF NOT EXISTS \
     idx_job_assignments_active_booking ON job_assignments (booking_id) \
     WHERE status IN ('assigned', 'started')";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on bookings.customer_id for a customer's booking history
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_customer_id")
                    .table(Bookings::Table)
                    .col(Bookings::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Index on bookings.service_id for the service delete guard
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_service_id")
                    .table(Bookings::Table)
                    .col(Bookings::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Composite index for the admin listing filtered by status, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status_created_at")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .col(Bookings::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_assignments_employee_id")
                    .table(JobAssignments::Table)
                    .col(JobAssignments::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_uploaded_media_booking_id")
                    .table(UploadedMedia::Table)
                    .col(UploadedMedia::BookingId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(ACTIVE_ASSIGNMENT_INDEX)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_job_assignments_active_booking")
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_uploaded_media_booking_id")
                    .table(UploadedMedia::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_job_assignments_employee_id")
                    .table(JobAssignments::Table)
                    .to_owned(),
            )
            .await?;
        for name in [
            "idx_bookings_status_created_at",
            "idx_bookings_service_id",
            "idx_bookings_customer_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Bookings::Table).to_owned())
                .await?;
        }

        Ok(())
    }
}
