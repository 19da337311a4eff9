pub mod assignments;
pub mod bookings;
pub mod customers;
pub mod employees;
pub mod services;
pub mod users;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Create a SeaORM database connection pool for `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options.sqlx_logging(false);
    Database::connect(options).await
}
