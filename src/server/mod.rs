mod error;
mod router;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

pub use error::HttpError;
pub use router::build_router;
pub use state::{ServeState, CALLER_HEADER};

use crate::access::AccessCore;

pub async fn serve(core: Arc<AccessCore>, bind: &str) -> Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{bind}'"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "docgate API listening");
    axum::serve(listener, build_router(core).into_make_service())
        .await
        .context("docgate API server exited with error")
}
