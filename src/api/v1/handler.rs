use super::error::*;
use crate::application_port::IdentityService;
use crate::domain_model::{CanonicalIdentity, ResolveEntry, UnresolvedEntryDiagnostic, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

pub async fn get_identity(
    user_id: UserId,
    identity_service: Arc<dyn IdentityService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity: CanonicalIdentity = identity_service
        .canonical_identity(&user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(identity)))
}

#[derive(Debug, Deserialize)]
pub struct ResolveBatchRequest {
    pub entries: Vec<ResolveEntry>,
}

#[derive(Debug, Serialize)]
pub struct ResolveBatchResponse {
    /// Positionally aligned with the request entries. Unresolved positions
    /// carry their external-facing placeholder; check `diagnostics` before
    /// trusting a position.
    pub results: Vec<String>,
    pub diagnostics: Vec<UnresolvedEntryDiagnostic>,
}

pub async fn resolve_batch(
    body: ResolveBatchRequest,
    identity_service: Arc<dyn IdentityService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let batch = identity_service
        .resolve_batch(body.entries)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let response = ResolveBatchResponse {
        results: batch.results.iter().map(|r| r.as_id().to_string()).collect(),
        diagnostics: batch.diagnostics,
    };
    Ok(warp::reply::json(&ApiResponse::ok(response)))
}
