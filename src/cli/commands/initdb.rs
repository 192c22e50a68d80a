use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use tracing::{debug, error, info, trace};

/// Connects to `database_url` and applies every pending migration.
pub(crate) async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Database URL: {}", database_url);

    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    trace!("Applying pending migrations");
    match Migrator::up(&db, None).await {
        Ok(()) => info!("Database schema is up to date"),
        Err(e) => {
            error!("Failed to run database migrations: {}", e);
            return Err(e.into());
        }
    }

    Ok(db)
}

pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing Salarium database");
    let db = connect_and_migrate(database_url).await?;

    if let Err(e) = db.close().await {
        error!("Failed to close database connection: {}", e);
        return Err(e.into());
    }

    info!("Database initialization completed");
    Ok(())
}
