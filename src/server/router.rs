use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use super::state::ServeState;
use crate::access::AccessCore;
use crate::metrics;

mod allocations;
mod approvals;
mod fields;
mod hierarchy;
mod permissions;
mod users;

pub fn build_router(core: Arc<AccessCore>) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(hierarchy::router())
        .merge(fields::router())
        .merge(users::router())
        .merge(allocations::router())
        .merge(approvals::router())
        .merge(permissions::router())
        .layer(cors_layer())
        .with_state(ServeState::new(core))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

async fn health_handler(State(state): State<ServeState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "administrator": state.core().administrator(),
        "departments": state.core().list_departments().len(),
        "started_at": state.started_at,
    }))
}

async fn metrics_handler() -> Response {
    let body = match metrics::render() {
        Ok(body) => body,
        Err(err) => {
            error!(?err, "failed to encode prometheus metrics");
            return (StatusCode::INTERNAL_SERVER_ERROR, "metric encode error").into_response();
        }
    };
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        body,
    )
        .into_response()
}
