use std::collections::HashSet;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use docgate_approval_matrix::{ApprovalMatrixEntry, ApprovalRule, Resolution};
use docgate_core_types::{DepartmentId, DocumentId, ErrorKind, Scope, SubDepartmentId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::server::state::{caller, ServeState};
use crate::server::HttpError;

pub(super) fn router() -> Router<ServeState> {
    Router::new()
        .route("/v1/approval-rules", get(list_rules))
        .route(
            "/v1/approval-rules/:department/:sub_department",
            get(get_rule).put(define_rule).delete(delete_rule),
        )
        .route(
            "/v1/approval-rules/:department/:sub_department/resolve",
            post(resolve),
        )
        .route(
            "/v1/documents/:id/approvals",
            get(list_approvers).post(cast).delete(withdraw),
        )
        .route("/v1/documents/:id/approvals/status", get(document_status))
}

fn scope(department: u64, sub_department: u64) -> Scope {
    Scope::new(DepartmentId(department), SubDepartmentId(sub_department))
}

#[derive(Debug, Deserialize)]
struct DefineRuleBody {
    rule: ApprovalRule,
    /// Kept raw so non-integer counts surface as `invalid_approver_count`.
    #[serde(default)]
    required_approvers: Option<Value>,
}

impl DefineRuleBody {
    /// Integer count, if any. A non-integer is ignored under ALL, which ignores counts.
    fn approver_count(&self) -> Result<Option<i64>, HttpError> {
        match &self.required_approvers {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => match raw.as_i64() {
                Some(count) => Ok(Some(count)),
                None if self.rule == ApprovalRule::All => Ok(None),
                None => Err(HttpError::from_kind(
                    ErrorKind::InvalidApproverCount,
                    format!("approver count must be a positive integer, got {raw}"),
                )),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResolveBody {
    #[serde(default)]
    approvals: Vec<UserId>,
    total_eligible: u32,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    department: u64,
    sub_department: u64,
    total_eligible: u32,
}

#[derive(Debug, Serialize)]
struct ResolutionBody {
    satisfied: bool,
    status: &'static str,
    rule: Option<ApprovalRule>,
    approvals: usize,
    required: Option<usize>,
}

impl From<Resolution> for ResolutionBody {
    fn from(resolution: Resolution) -> Self {
        Self {
            satisfied: resolution.status.is_satisfied(),
            status: resolution.status.as_str(),
            rule: resolution.rule,
            approvals: resolution.approvals,
            required: resolution.required,
        }
    }
}

#[derive(Debug, Serialize)]
struct LedgerBody {
    document: DocumentId,
    changed: bool,
    approvers: Vec<UserId>,
}

async fn list_rules(
    State(state): State<ServeState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ApprovalMatrixEntry>>, HttpError> {
    caller(&headers)?;
    Ok(Json(state.core().list_rules()))
}

async fn get_rule(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path((department, sub_department)): Path<(u64, u64)>,
) -> Result<Json<ApprovalMatrixEntry>, HttpError> {
    caller(&headers)?;
    let scope = scope(department, sub_department);
    state
        .core()
        .rule(scope)
        .map(Json)
        .ok_or_else(|| HttpError::not_found(format!("no approval rule for {scope}")))
}

async fn define_rule(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path((department, sub_department)): Path<(u64, u64)>,
    body: Result<Json<DefineRuleBody>, JsonRejection>,
) -> Result<Json<ApprovalMatrixEntry>, HttpError> {
    let actor = caller(&headers)?;
    let Json(body) = body?;
    let required_approvers = body.approver_count()?;
    Ok(Json(state.core().define_rule(
        &actor,
        scope(department, sub_department),
        body.rule,
        required_approvers,
    )?))
}

async fn delete_rule(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path((department, sub_department)): Path<(u64, u64)>,
) -> Result<Json<ApprovalMatrixEntry>, HttpError> {
    let actor = caller(&headers)?;
    Ok(Json(
        state
            .core()
            .delete_rule(&actor, scope(department, sub_department))?,
    ))
}

async fn resolve(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path((department, sub_department)): Path<(u64, u64)>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<ResolutionBody>, HttpError> {
    caller(&headers)?;
    let approvals: HashSet<UserId> = body.approvals.into_iter().collect();
    let resolution = state.core().evaluate_approvals(
        scope(department, sub_department),
        &approvals,
        body.total_eligible,
    );
    Ok(Json(resolution.into()))
}

async fn list_approvers(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Vec<UserId>>, HttpError> {
    caller(&headers)?;
    Ok(Json(state.core().approvers(&DocumentId::new(id))))
}

/// The caller approves the document. Casting twice is a no-op.
async fn cast(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<LedgerBody>, HttpError> {
    let approver = caller(&headers)?;
    let document = DocumentId::new(id);
    let changed = state.core().cast_approval(&approver, &document)?;
    let approvers = state.core().approvers(&document);
    Ok(Json(LedgerBody {
        document,
        changed,
        approvers,
    }))
}

async fn withdraw(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<LedgerBody>, HttpError> {
    let approver = caller(&headers)?;
    let document = DocumentId::new(id);
    let changed = state.core().withdraw_approval(&approver, &document);
    let approvers = state.core().approvers(&document);
    Ok(Json(LedgerBody {
        document,
        changed,
        approvers,
    }))
}

async fn document_status(
    State(state): State<ServeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ResolutionBody>, HttpError> {
    caller(&headers)?;
    let resolution = state.core().document_status(
        &DocumentId::new(id),
        scope(query.department, query.sub_department),
        query.total_eligible,
    );
    Ok(Json(resolution.into()))
}
