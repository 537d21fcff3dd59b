// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{ApiResponse, AppState, PaginationParams};
use crate::feed::{FeedPage, PaginationCursor};
use crate::models::EnrichedPost;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub viewer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NextPage {
    pub posts: Vec<EnrichedPost>,
    pub cursor: PaginationCursor,
}

/// First page: ranked, with sponsored items
pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> impl IntoResponse {
    let viewer = state.viewer_id(query.viewer.as_deref()).await;

    match state.assembler.fetch_initial_page(viewer.as_deref()).await {
        Ok(page) => (StatusCode::OK, Json(ApiResponse::<FeedPage>::success(page))),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format!("Failed to load posts: {}", e))),
        ),
    }
}

/// Subsequent pages in reverse-chronological order
pub async fn get_feed_page(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> impl IntoResponse {
    let viewer = state.viewer_id(params.viewer.as_deref()).await;
    let mut cursor = PaginationCursor::at(params.offset(), params.limit(state.assembler.page_size()));

    match state.assembler.fetch_next_page(&mut cursor, viewer.as_deref()).await {
        Ok(posts) => (
            StatusCode::OK,
            Json(ApiResponse::success(NextPage { posts, cursor })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format!("Failed to load more posts: {}", e))),
        ),
    }
}
