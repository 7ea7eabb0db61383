use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::api::v1::{v1_card, v1_cards};
use crate::api::Context;
use crate::loader::CardSource;

pub fn router(ctx: Arc<Context>) -> Router {
    Router::new()
        .route("/v1/card", get(v1_card))
        .route("/v1/cards", get(v1_cards))
        .with_state(ctx)
}

pub async fn run_server(source: Arc<dyn CardSource>, port: u16) -> anyhow::Result<()> {
    let ctx = Arc::new(Context { source });
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Serving cards on {}", addr);
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}
