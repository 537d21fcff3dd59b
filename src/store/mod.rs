// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! The persistence contract the engine depends on.
//!
//! Every mutation is a single row-level operation. The engine never
//! needs a multi-statement transaction; counts are recomputed from rows.

mod memory;
mod pg;

pub use memory::{Fault, InMemoryStore};
pub use pg::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::models::{
    Comment, Like, NewComment, NewLike, NewPost, NewTip, Post, ReactionKind, SponsoredPost, Tip,
    User,
};

/// Tagged result of a like insert.
///
/// `AlreadyExisted` is the unique constraint on
/// `(post_id, user_id, emoji_type)` answering the insert, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExisted,
}

/// Reverse-chronological post query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    /// Only posts created at or after this instant
    pub created_since: Option<DateTime<Utc>>,
    pub limit: usize,
    pub offset: usize,
}

impl PostQuery {
    pub fn latest(limit: usize) -> Self {
        Self { created_since: None, limit, offset: 0 }
    }

    pub fn page(offset: usize, limit: usize) -> Self {
        Self { created_since: None, limit, offset }
    }

    pub fn since(created_since: DateTime<Utc>, limit: usize) -> Self {
        Self { created_since: Some(created_since), limit, offset: 0 }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap liveness probe
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError>;
    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError>;
    /// Fails with [`StoreError::UniqueViolation`] if the wallet is already registered
    async fn insert_user(&self, wallet: &str) -> Result<User, StoreError>;

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError>;
    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError>;
    /// Posts ordered by `created_at` descending
    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError>;

    /// Active sponsored posts ordered by ascending priority
    async fn list_active_sponsored(&self) -> Result<Vec<SponsoredPost>, StoreError>;

    async fn list_likes(&self, post_id: &str) -> Result<Vec<Like>, StoreError>;
    async fn insert_like(&self, like: &NewLike) -> Result<InsertOutcome, StoreError>;
    /// Returns the number of rows removed
    async fn delete_like(
        &self,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
    ) -> Result<usize, StoreError>;

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;
    /// Comments ordered by `created_at` ascending
    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, StoreError>;
    async fn count_comments(&self, post_id: &str) -> Result<u64, StoreError>;

    async fn insert_tip(&self, tip: NewTip) -> Result<Tip, StoreError>;
    async fn count_tips(&self, post_id: &str) -> Result<u64, StoreError>;
}
