//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::pagination::PageSource;
use crate::repository::{StudentQuery, StudentStore};
use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
    S: StudentStore + Clone + 'static,
{
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Counts students to prove the store answers queries. Returns 503 Service
/// Unavailable when it does not.
pub async fn readiness<S>(State(state): State<AppState<S>>) -> impl IntoResponse
where
    S: StudentStore + Clone + 'static,
{
    let store = match state.students().store().count(&StudentQuery::new()).await {
        Ok(count) => DependencyStatus {
            healthy: true,
            message: Some(format!("{count} students")),
        },
        Err(e) => {
            tracing::error!("Student store health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(e.kind.to_string()),
            }
        }
    };

    let ready = store.healthy;
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies: HashMap::from([("students".to_string(), store)]),
    };

    (status, Json(response))
}
