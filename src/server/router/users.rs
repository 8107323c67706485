use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use docgate_allocation_engine::UserRecord;
use docgate_core_types::UserId;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route("/v1/users", get(list_users).post(register_user))
        .route("/v1/users/:id", delete(remove_user))
}

#[derive(Debug, Deserialize)]
struct RegisterBody {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
}

async fn list_users(
    State(state): State<ServeState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserRecord>>, HttpError> {
    caller(&headers)?;
    Ok(Json(state.core().users()))
}

async fn register_user(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserRecord>), HttpError> {
    let actor = caller(&headers)?;
    let record = state
        .core()
        .register_user(&actor, UserId::new(body.id), body.display_name)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn remove_user(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, HttpError> {
    let actor = caller(&headers)?;
    let user = UserId::new(id);
    let revoked = state.core().remove_user(&actor, &user)?;
    Ok(Json(json!({ "user": user, "revoked_allocations": revoked })))
}
