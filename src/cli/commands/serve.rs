use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;
use crate::schemas::AppState;

/// Binds `bind_address` and serves the API until the server stops.
pub(crate) async fn run_server(state: AppState, bind_address: &str) -> Result<()> {
    trace!("Creating application router");
    let app = create_router(state);

    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Salarium API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shut down");
    Ok(())
}

pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Salarium starting up");
    debug!("Database URL: {}, bind address: {}", database_url, bind_address);

    let state = match initialize_app_state_with_url(database_url).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    run_server(state, bind_address).await
}
