use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::{DateTime, Utc};
use docgate_core_types::UserId;

use super::HttpError;
use crate::access::AccessCore;

/// Header carrying the identity verified by the upstream identity provider.
pub const CALLER_HEADER: &str = "x-user-id";

#[derive(Clone)]
pub struct ServeState {
    pub(crate) core: Arc<AccessCore>,
    pub(crate) started_at: DateTime<Utc>,
}

impl ServeState {
    pub fn new(core: Arc<AccessCore>) -> Self {
        Self {
            core,
            started_at: Utc::now(),
        }
    }

    pub fn core(&self) -> &AccessCore {
        &self.core
    }
}

/// The caller named by `x-user-id`. Missing or blank headers are rejected.
pub(crate) fn caller(headers: &HeaderMap) -> Result<UserId, HttpError> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::new)
        .ok_or_else(|| HttpError::unauthorized("missing x-user-id header"))
}
