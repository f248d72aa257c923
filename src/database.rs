use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

/// Postgres pool for movies, seats, bookings and users.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str, pool_size: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;
        info!("Postgres pool ready ({} connections)", pool_size);

        Ok(Database { pool })
    }

    /// Applies the embedded schema under `src/migrations`.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        let migrator = sqlx::migrate!("./src/migrations");
        info!("Applying {} schema migration(s)", migrator.iter().count());
        migrator.run(&self.pool).await?;
        Ok(())
    }
}
