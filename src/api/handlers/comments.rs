// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::{ApiResponse, AppState};
use crate::error::{CommentError, IdentityError};
use crate::models::Comment;

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    pub wallet: String,
    pub content: String,
}

fn status_for(err: &CommentError) -> StatusCode {
    match err {
        CommentError::EmptyContent
        | CommentError::TooLong { .. }
        | CommentError::Sponsored
        | CommentError::WalletNotConnected
        | CommentError::Identity(IdentityError::EmptyWallet) => StatusCode::BAD_REQUEST,
        CommentError::Identity(_) | CommentError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Comments on a post, oldest first
pub async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    match state.comments.list_comments(&post_id).await {
        Ok(comments) => (StatusCode::OK, Json(ApiResponse::<Vec<Comment>>::success(comments))),
        Err(e) => (status_for(&e), Json(ApiResponse::error(e.to_string()))),
    }
}

pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Json(request): Json<NewCommentRequest>,
) -> impl IntoResponse {
    match state.comments.add_comment(&post_id, &request.wallet, &request.content).await {
        Ok(comment) => (StatusCode::CREATED, Json(ApiResponse::<Comment>::success(comment))),
        Err(e) => (status_for(&e), Json(ApiResponse::error(e.to_string()))),
    }
}
