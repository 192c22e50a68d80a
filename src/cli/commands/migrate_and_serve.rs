use anyhow::Result;
use tracing::info;

use super::initdb::connect_and_migrate;
use super::serve::run_server;
use crate::config::initialize_app_state;

pub async fn migrate_and_serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Applying migrations before starting Salarium");

    // The migrated connection is reused by the server
    let db = connect_and_migrate(database_url).await?;
    run_server(initialize_app_state(db), bind_address).await
}
