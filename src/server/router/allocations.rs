use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{delete, get},
    Json, Router,
};
use docgate_allocation_engine::{Allocation, AllocationRequest};
use docgate_core_types::{DepartmentId, Scope, SubDepartmentId, UserId};
use serde::Deserialize;

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route("/v1/allocations", get(list_allocations).post(allocate))
        .route(
            "/v1/allocations/:user/:department/:sub_department",
            delete(revoke),
        )
}

#[derive(Debug, Default, Deserialize)]
struct AllocationQuery {
    department: Option<u64>,
    sub_department: Option<u64>,
    user: Option<String>,
}

async fn list_allocations(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Query(query): Query<AllocationQuery>,
) -> Result<Json<Vec<Allocation>>, HttpError> {
    caller(&headers)?;
    let core = state.core();
    let rows = match query.user {
        Some(user) => core
            .allocations_for_user(&UserId::new(user))
            .into_iter()
            .filter(|row| {
                query
                    .department
                    .map_or(true, |dept| row.scope.department == DepartmentId(dept))
                    && query
                        .sub_department
                        .map_or(true, |sub| row.scope.sub_department == SubDepartmentId(sub))
            })
            .collect(),
        None => core.list_allocations(
            query.department.map(DepartmentId),
            query.sub_department.map(SubDepartmentId),
        ),
    };
    Ok(Json(rows))
}

/// Upsert: a repeated key replaces the previous capability set and field list.
async fn allocate(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Json(request): Json<AllocationRequest>,
) -> Result<Json<Allocation>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().allocate(&actor, request)?))
}

async fn revoke(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path((user, department, sub_department)): Path<(String, u64, u64)>,
) -> Result<Json<Allocation>, HttpError> {
    let actor = caller(&headers)?;
    let scope = Scope::new(DepartmentId(department), SubDepartmentId(sub_department));
    Ok(Json(state.core().revoke(
        &actor,
        &UserId::new(user),
        scope,
    )?))
}
