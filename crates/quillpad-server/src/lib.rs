//! HTTP surface for quillpad.
//!
//! Handlers are thin: they extract the caller, the path id and the raw JSON
//! body, hand them to [`quillpad_service::Blog`], and map the outcome to a
//! status code through [`ApiError`].

pub mod auth;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::io;

use tokio::net::TcpListener;
use tracing::info;

pub use auth::{Claims, TokenError, TokenIssuer};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;

/// Binds `addr` and serves until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
