use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{get, put},
    Json, Router,
};
use docgate_core_types::{DepartmentId, FieldKey, FieldSlot, SubDepartmentId};
use docgate_field_catalog::{FieldDefinition, FieldScope};
use serde::Deserialize;

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route("/v1/fields", get(list_fields))
        .route("/v1/fields/:slot", put(set_field).delete(reset_field))
}

/// Absent ids mean the global scope; a department alone means its override level.
#[derive(Debug, Default, Deserialize)]
struct ScopeQuery {
    department: Option<u64>,
    sub_department: Option<u64>,
    #[serde(default)]
    active_only: bool,
}

impl ScopeQuery {
    fn field_scope(&self) -> Result<FieldScope, HttpError> {
        field_scope(self.department, self.sub_department)
    }
}

#[derive(Debug, Deserialize)]
struct SetFieldBody {
    department: Option<u64>,
    sub_department: Option<u64>,
    label: String,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn field_scope(
    department: Option<u64>,
    sub_department: Option<u64>,
) -> Result<FieldScope, HttpError> {
    match (department, sub_department) {
        (None, None) => Ok(FieldScope::Global),
        (Some(department), None) => Ok(FieldScope::Department {
            department: DepartmentId(department),
        }),
        (Some(department), Some(sub)) => Ok(FieldScope::SubDepartment {
            department: DepartmentId(department),
            sub_department: SubDepartmentId(sub),
        }),
        (None, Some(_)) => Err(HttpError::invalid_argument(
            "sub_department requires department",
        )),
    }
}

fn parse_slot(raw: &str) -> Result<FieldSlot, HttpError> {
    match raw.parse::<FieldKey>() {
        Ok(FieldKey::Slot(slot)) => Ok(slot),
        Ok(FieldKey::System(field)) => Err(HttpError::invalid_argument(format!(
            "system field {} is not configurable",
            field.as_str()
        ))),
        Err(err) => Err(HttpError::invalid_argument(err.to_string())),
    }
}

async fn list_fields(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<Vec<FieldDefinition>>, HttpError> {
    caller(&headers)?;
    let scope = query.field_scope()?;
    let fields = if query.active_only {
        state.core().active_fields(scope)?
    } else {
        state.core().list_fields(scope)?
    };
    Ok(Json(fields))
}

async fn set_field(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(slot): Path<String>,
    Json(body): Json<SetFieldBody>,
) -> Result<Json<FieldDefinition>, HttpError> {
    let actor = caller(&headers)?;
    let slot = parse_slot(&slot)?;
    let scope = field_scope(body.department, body.sub_department)?;
    Ok(Json(state.core().set_field(
        &actor,
        scope,
        slot,
        &body.label,
        body.active,
    )?))
}

async fn reset_field(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(slot): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<FieldDefinition>, HttpError> {
    let actor = caller(&headers)?;
    let slot = parse_slot(&slot)?;
    Ok(Json(
        state
            .core()
            .reset_field(&actor, query.field_scope()?, slot)?,
    ))
}
