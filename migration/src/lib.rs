pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_customers_table;
mod m20250301_000003_create_employees_table;
mod m20250301_000004_create_services_table;
mod m20250301_000005_create_bookings_table;
mod m20250301_000006_create_job_assignments_table;
mod m20250301_000007_create_uploaded_media_table;
mod m20250301_000008_create_reviews_table;
mod m20250302_000001_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_customers_table::Migration),
            Box::new(m20250301_000003_create_employees_table::Migration),
            Box::new(m20250301_000004_create_services_table::Migration),
            Box::new(m20250301_000005_create_bookings_table::Migration),
            Box::new(m20250301_000006_create_job_assignments_table::Migration),
            Box::new(m20250301_000007_create_uploaded_media_table::Migration),
            Box::new(m20250301_000008_create_reviews_table::Migration),
            Box::new(m20250302_000001_add_indexes::Migration),
        ]
    }
}
