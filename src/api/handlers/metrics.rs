// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use axum::{http::StatusCode, response::IntoResponse};
use tracing::error;

use crate::metrics;

/// Prometheus scrape endpoint
pub async fn get_metrics() -> impl IntoResponse {
    match metrics::gather() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}
