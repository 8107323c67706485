use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use docgate_core_types::{DepartmentId, SubDepartmentId};
use docgate_hierarchy_store::{Department, DepartmentTree, SubDepartment};
use serde::Deserialize;

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route(
            "/v1/departments",
            get(list_departments).post(create_department),
        )
        .route(
            "/v1/departments/:id",
            put(update_department).delete(delete_department),
        )
        .route("/v1/departments/:id/active", post(set_department_active))
        .route(
            "/v1/departments/:id/sub-departments",
            post(create_sub_department),
        )
        .route(
            "/v1/sub-departments/:id",
            put(update_sub_department).delete(delete_sub_department),
        )
        .route(
            "/v1/sub-departments/:id/active",
            post(set_sub_department_active),
        )
}

#[derive(Debug, Deserialize)]
struct NamedBody {
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MoveBody {
    department: DepartmentId,
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ActiveBody {
    active: bool,
}

async fn list_departments(
    State(state): State<ServeState>,
    headers: HeaderMap,
) -> Result<Json<Vec<DepartmentTree>>, HttpError> {
    caller(&headers)?;
    Ok(Json(state.core().list_departments()))
}

async fn create_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Json(body): Json<NamedBody>,
) -> Result<(StatusCode, Json<Department>), HttpError> {
    let actor = caller(&headers)?;
    let department = state
        .core()
        .create_department(&actor, &body.code, &body.name)?;
    Ok((StatusCode::CREATED, Json(department)))
}

async fn update_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<NamedBody>,
) -> Result<Json<Department>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().update_department(
        &actor,
        DepartmentId(id),
        &body.code,
        &body.name,
    )?))
}

async fn delete_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<Department>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().delete_department(&actor, DepartmentId(id))?))
}

async fn set_department_active(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<ActiveBody>,
) -> Result<Json<Department>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().set_department_active(
        &actor,
        DepartmentId(id),
        body.active,
    )?))
}

async fn create_sub_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<NamedBody>,
) -> Result<(StatusCode, Json<SubDepartment>), HttpError> {
    let actor = caller(&headers)?;
    let sub = state.core().create_sub_department(
        &actor,
        DepartmentId(id),
        &body.code,
        &body.name,
    )?;
    Ok((StatusCode::CREATED, Json(sub)))
}

async fn update_sub_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<MoveBody>,
) -> Result<Json<SubDepartment>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().update_sub_department(
        &actor,
        SubDepartmentId(id),
        body.department,
        &body.code,
        &body.name,
    )?))
}

async fn delete_sub_department(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Result<Json<SubDepartment>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(
        state
            .core()
            .delete_sub_department(&actor, SubDepartmentId(id))?,
    ))
}

async fn set_sub_department_active(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<ActiveBody>,
) -> Result<Json<SubDepartment>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(state.core().set_sub_department_active(
        &actor,
        SubDepartmentId(id),
        body.active,
    )?))
}
