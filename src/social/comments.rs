// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::{debug, info};

use super::is_sponsored_id;
use crate::error::CommentError;
use crate::identity::IdentityResolver;
use crate::models::{Comment, NewComment, COMMENT_MAX_LENGTH};
use crate::store::Store;

/// Append-only comment threads
#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
    identity: IdentityResolver,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            identity: IdentityResolver::new(store.clone()),
            store,
        }
    }

    pub async fn add_comment(
        &self,
        post_id: &str,
        wallet: &str,
        content: &str,
    ) -> Result<Comment, CommentError> {
        if is_sponsored_id(post_id) {
            return Err(CommentError::Sponsored);
        }
        let content = validate(content)?;
        let user_id = self.identity.ensure_user(wallet).await?;

        let comment = self
            .store
            .insert_comment(NewComment {
                post_id: post_id.to_string(),
                user_id,
                content,
            })
            .await?;

        info!("Added comment {} on post {}", comment.id, post_id);
        Ok(comment)
    }

    /// Oldest first
    pub async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, CommentError> {
        let comments = self.store.list_comments(post_id).await?;
        debug!("Loaded {} comments for post {}", comments.len(), post_id);
        Ok(comments)
    }
}

fn validate(content: &str) -> Result<String, CommentError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CommentError::EmptyContent);
    }
    if content.chars().count() > COMMENT_MAX_LENGTH {
        return Err(CommentError::TooLong { max: COMMENT_MAX_LENGTH });
    }
    Ok(content.to_string())
}
