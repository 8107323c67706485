use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use docgate::server::{build_router, CALLER_HEADER};
use docgate::{AccessCore, AdministratorPolicy, Seed};
use serde_json::{json, Value};
use tower::ServiceExt;

const SEED: &str = r#"
users:
  - id: dana
  - id: eli
departments:
  - code: OPS
    name: Operations
    sub_departments:
      - code: PLT
        name: Plant
"#;

fn app() -> Router {
    let core = AccessCore::new(AdministratorPolicy::default());
    core.apply_seed(&Seed::parse(SEED).unwrap()).unwrap();
    build_router(Arc::new(core))
}

fn call(method: &str, uri: &str, caller: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header(CALLER_HEADER, caller);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn healthz_is_public() {
    let router = app();
    let (status, body) = send(&router, call("GET", "/healthz", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["departments"], 1);
}

#[tokio::test]
async fn metrics_are_exposed() {
    let router = app();
    let response = router
        .clone()
        .oneshot(call("GET", "/metrics", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("docgate_allocations_total"));
}

#[tokio::test]
async fn missing_caller_is_unauthorized() {
    let router = app();
    let (status, body) = send(&router, call("GET", "/v1/departments", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn writes_require_administrator() {
    let router = app();
    let (status, body) = send(
        &router,
        call(
            "POST",
            "/v1/departments",
            Some("dana"),
            Some(json!({ "code": "FIN", "name": "Finance" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn duplicate_department_code_is_conflict() {
    let router = app();
    let (status, body) = send(
        &router,
        call(
            "POST",
            "/v1/departments",
            Some("admin"),
            Some(json!({ "code": "ops", "name": "Operations Two" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "duplicate_code");
}

#[tokio::test]
async fn allocate_then_check() {
    let router = app();
    let (status, allocation) = send(
        &router,
        call(
            "POST",
            "/v1/allocations",
            Some("admin"),
            Some(json!({
                "user": "dana",
                "department": 1,
                "sub_department": 1,
                "capabilities": { "edit": true }
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(allocation["capabilities"]["view"], true);

    let check = |action: &str, confidential: bool| {
        json!({
            "user": "dana",
            "action": action,
            "document": { "department": 1, "sub_department": 1, "confidential": confidential }
        })
    };
    let (status, decision) = send(
        &router,
        call("POST", "/v1/permissions/check", Some("docstore"), Some(check("edit", false))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decision["allowed"], true);

    let (_, decision) = send(
        &router,
        call("POST", "/v1/permissions/check", Some("docstore"), Some(check("view", true))),
    )
    .await;
    assert_eq!(decision["allowed"], false);
    assert_eq!(decision["reason"], "missing_confidential");
}

#[tokio::test]
async fn unknown_user_allocation_is_unprocessable() {
    let router = app();
    let (status, body) = send(
        &router,
        call(
            "POST",
            "/v1/allocations",
            Some("admin"),
            Some(json!({ "user": "ghost", "department": 1, "sub_department": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "unknown_user");
}

#[tokio::test]
async fn majority_rule_resolves_with_boolean() {
    let router = app();
    let (status, body) = send(
        &router,
        call(
            "PUT",
            "/v1/approval-rules/1/1",
            Some("admin"),
            Some(json!({ "rule": "MAJORITY" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "missing_approver_count");

    let (status, _) = send(
        &router,
        call(
            "PUT",
            "/v1/approval-rules/1/1",
            Some("admin"),
            Some(json!({ "rule": "MAJORITY", "required_approvers": 2 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &router,
        call(
            "POST",
            "/v1/approval-rules/1/1/resolve",
            Some("dana"),
            Some(json!({ "approvals": ["dana", "dana"], "total_eligible": 3 })),
        ),
    )
    .await;
    assert_eq!(body["satisfied"], false);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["approvals"], 1);
}

#[tokio::test]
async fn non_integer_approver_counts_keep_error_envelope() {
    let router = app();
    for count in [json!(2.5), json!("two"), json!(0)] {
        let (status, body) = send(
            &router,
            call(
                "PUT",
                "/v1/approval-rules/1/1",
                Some("admin"),
                Some(json!({ "rule": "MAJORITY", "required_approvers": count })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "count {count}");
        assert_eq!(body["error"]["code"], "invalid_approver_count", "count {count}");
    }

    let (status, body) = send(
        &router,
        call(
            "PUT",
            "/v1/approval-rules/1/1",
            Some("admin"),
            Some(json!({ "rule": "SOMETIMES" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "invalid_input");

    let (status, body) = send(
        &router,
        call(
            "PUT",
            "/v1/approval-rules/1/1",
            Some("admin"),
            Some(json!({ "rule": "ALL", "required_approvers": "n/a" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rule"], "ALL");
}

#[tokio::test]
async fn document_ledger_tracks_casts() {
    let router = app();
    send(
        &router,
        call(
            "PUT",
            "/v1/approval-rules/1/1",
            Some("admin"),
            Some(json!({ "rule": "MAJORITY", "required_approvers": 2 })),
        ),
    )
    .await;

    let (_, first) = send(&router, call("POST", "/v1/documents/inv-1/approvals", Some("dana"), None)).await;
    assert_eq!(first["changed"], true);
    let (_, again) = send(&router, call("POST", "/v1/documents/inv-1/approvals", Some("dana"), None)).await;
    assert_eq!(again["changed"], false);
    send(&router, call("POST", "/v1/documents/inv-1/approvals", Some("eli"), None)).await;

    let (status, body) = send(
        &router,
        call(
            "GET",
            "/v1/documents/inv-1/approvals/status?department=1&sub_department=1&total_eligible=3",
            Some("dana"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["satisfied"], true);
    assert_eq!(body["rule"], "MAJORITY");
}

#[tokio::test]
async fn delete_department_with_children_is_conflict() {
    let router = app();
    let (status, body) = send(&router, call("DELETE", "/v1/departments/1", Some("admin"), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "conflict");

    let (status, _) = send(&router, call("DELETE", "/v1/sub-departments/1", Some("admin"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, call("DELETE", "/v1/departments/1", Some("admin"), None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn field_slots_are_configurable() {
    let router = app();
    let (status, body) = send(
        &router,
        call(
            "PUT",
            "/v1/fields/text:4",
            Some("admin"),
            Some(json!({ "label": "PO number", "department": 1 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "PO number");

    let (status, fields) = send(
        &router,
        call(
            "GET",
            "/v1/fields?department=1&sub_department=1&active_only=true",
            Some("dana"),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<_> = fields
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["key"].as_str().unwrap().to_string())
        .collect();
    assert!(keys.contains(&"text:4".to_string()));
    assert!(keys.contains(&"system:title".to_string()));

    let (status, _) = send(
        &router,
        call("PUT", "/v1/fields/text:11", Some("admin"), Some(json!({ "label": "x" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
