use sqlx::{Sqlite, migrate::MigrateDatabase};
use sqlx_migrator::{Migrate, Plan};

use crate::config::Config;

/// Create the database when missing and apply every pending migration.
pub async fn migrate(config: &Config) -> anyhow::Result<()> {
    let url = &config.database.url;
    if !Sqlite::database_exists(url).await? {
        tracing::info!(url = %url, "Database does not exist, creating");
        Sqlite::create_database(url).await?;
    }

    let pool = crate::db::create_write_pool(url).await?;
    let mut conn = pool.acquire().await?;
    mealplanner_db::migrator()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);
    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop the database and migrate it again from scratch.
pub async fn reset(config: &Config) -> anyhow::Result<()> {
    let url = &config.database.url;
    if Sqlite::database_exists(url).await? {
        tracing::warn!(url = %url, "Dropping existing database");
        Sqlite::drop_database(url).await?;
    }

    migrate(config).await
}
