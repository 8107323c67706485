use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use docgate_core_types::{Capabilities, DepartmentId, Scope, SubDepartmentId, UserId};
use docgate_permission_evaluator::{AccessRequest, Decision};
use serde::{Deserialize, Serialize};

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route("/v1/permissions/check", post(check))
        .route("/v1/permissions/effective", get(effective))
}

#[derive(Debug, Deserialize)]
struct EffectiveQuery {
    user: String,
    department: u64,
    sub_department: u64,
}

#[derive(Debug, Serialize)]
struct EffectiveBody {
    user: UserId,
    scope: Scope,
    capabilities: Option<Capabilities>,
}

/// Allow/deny for the request body; the document store calls this before acting.
async fn check(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Json(request): Json<AccessRequest>,
) -> Result<Json<Decision>, HttpError> {
    caller(&headers)?;
    Ok(Json(state.core().decide(&request)))
}

async fn effective(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Query(query): Query<EffectiveQuery>,
) -> Result<Json<EffectiveBody>, HttpError> {
    caller(&headers)?;
    let user = UserId::new(query.user);
    let scope = Scope::new(
        DepartmentId(query.department),
        SubDepartmentId(query.sub_department),
    );
    let capabilities = state.core().effective_capabilities(&user, scope);
    Ok(Json(EffectiveBody {
        user,
        scope,
        capabilities,
    }))
}
