// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ApiResponse, AppState};
use crate::error::{IdentityError, ReactionError};
use crate::models::{ReactionCounts, ReactionKind, SPONSORED_ID_PREFIX};
use crate::reactions::ReactionSettlement;

#[derive(Debug, Deserialize)]
pub struct ToggleReactionRequest {
    pub wallet: String,
    pub kind: ReactionKind,
}

#[derive(Debug, Serialize)]
pub struct ToggleReactionResponse {
    pub settlement: ReactionSettlement,
    pub is_active: bool,
    /// Fresh counts, when they could be read back
    pub reactions: Option<ReactionCounts>,
}

fn reject(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse<ToggleReactionResponse>>) {
    (status, Json(ApiResponse::error(message)))
}

/// Toggle one reaction for a wallet. The backend decides add or remove.
pub async fn toggle_reaction(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
    Json(request): Json<ToggleReactionRequest>,
) -> impl IntoResponse {
    if post_id.starts_with(SPONSORED_ID_PREFIX) {
        return reject(StatusCode::BAD_REQUEST, ReactionError::Sponsored.to_string());
    }

    match state.store.find_post(&post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return reject(StatusCode::NOT_FOUND, ReactionError::UnknownPost(post_id).to_string())
        }
        Err(e) => return reject(StatusCode::SERVICE_UNAVAILABLE, format!("Database error: {}", e)),
    }

    let user_id = match state.identity.ensure_user(&request.wallet).await {
        Ok(id) => id,
        Err(e @ IdentityError::EmptyWallet) => return reject(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => return reject(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    match state.reactions.toggle_remote(&post_id, &user_id, request.kind).await {
        Ok(settlement) => {
            let reactions = match state.reactions.counts_for(&post_id).await {
                Ok(counts) => Some(counts),
                Err(e) => {
                    warn!("Reaction settled but counts for {} could not be read: {}", post_id, e);
                    None
                }
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(ToggleReactionResponse {
                    settlement,
                    is_active: settlement.is_active(),
                    reactions,
                })),
            )
        }
        Err(e) => reject(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}
