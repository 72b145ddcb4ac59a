pub mod issuer;
pub mod routes;

use std::future::Future;

use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::errors::Result;
pub use issuer::{IssueError, Participant, TokenIssuer};
pub use routes::{AppState, create_router};

/// Serve the token route and room page on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if config.credentials.is_none() {
        warn!("no API credentials configured; token requests will be refused");
    }

    let app = create_router(AppState::new(TokenIssuer::new(config)));
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
