//! Export API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/export", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/products", get(handler::export_products))
}
