//! Health Handlers

use axum::Json;
use serde::Serialize;

use crate::utils::{AppResponse, ok};

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

/// GET /api/health - liveness probe
pub async fn health() -> Json<AppResponse<HealthInfo>> {
    ok(HealthInfo {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "ok",
    })
}
