use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;
use vpmp_migration::{Migrator, MigratorTrait};

use crate::config::DatabaseConfig;

pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.url.clone());
    if let Some(max_connections) = config.max_connections {
        options.max_connections(max_connections);
    }
    options.sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;

    if config.run_migrations {
        info!("running database migrations");
        Migrator::up(&db, None).await?;
    }

    Ok(db)
}
