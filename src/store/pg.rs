// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::{debug, error};

use super::{InsertOutcome, PostQuery, Store};
use crate::db::{Database, DbConnection};
use crate::error::StoreError;
use crate::models::{
    Comment, Like, NewComment, NewLike, NewPost, NewTip, NewUser, Post, ReactionKind,
    SponsoredPost, Tip, User,
};
use crate::schema::{adtweet, comments, likes, posts, tips, users};

/// [`Store`] backed by Postgres through diesel-async
pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Get a database connection from the pool
    async fn get_connection(&self) -> Result<DbConnection, StoreError> {
        self.db.get_connection().await.map_err(|e| {
            error!("Failed to get database connection: {}", e);
            StoreError::Connection(e.to_string())
        })
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.get_connection().await.map(|_| ())
    }

    async fn find_user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.get_connection().await?;
        let user = users::table
            .filter(users::wallet_address.eq(wallet))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.get_connection().await?;
        let user = users::table
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(user)
    }

    async fn insert_user(&self, wallet: &str) -> Result<User, StoreError> {
        let mut conn = self.get_connection().await?;
        let new_user = NewUser { wallet_address: wallet.to_string() };
        let user = diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(user)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut conn = self.get_connection().await?;
        let post = diesel::insert_into(posts::table)
            .values(&post)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(post)
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let mut conn = self.get_connection().await?;
        let post = posts::table
            .find(id)
            .select(Post::as_select())
            .first(&mut conn)
            .await
            .optional()?;
        Ok(post)
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let limit = i64::try_from(query.limit)
            .map_err(|_| StoreError::Backend(format!("post limit {} out of range", query.limit)))?;
        let offset = i64::try_from(query.offset)
            .map_err(|_| StoreError::Backend(format!("post offset {} out of range", query.offset)))?;

        let mut conn = self.get_connection().await?;

        let mut sql = posts::table.into_boxed();
        if let Some(since) = query.created_since {
            sql = sql.filter(posts::created_at.ge(since));
        }

        let rows = sql
            .order(posts::created_at.desc())
            .then_order_by(posts::id.desc())
            .limit(limit)
            .offset(offset)
            .select(Post::as_select())
            .load(&mut conn)
            .await?;

        debug!("Loaded {} posts (offset {}, limit {})", rows.len(), query.offset, query.limit);
        Ok(rows)
    }

    async fn list_active_sponsored(&self) -> Result<Vec<SponsoredPost>, StoreError> {
        let mut conn = self.get_connection().await?;
        let ads = adtweet::table
            .filter(adtweet::is_active.eq(true))
            .order(adtweet::priority.asc())
            .select(SponsoredPost::as_select())
            .load(&mut conn)
            .await?;
        Ok(ads)
    }

    async fn list_likes(&self, post_id: &str) -> Result<Vec<Like>, StoreError> {
        let mut conn = self.get_connection().await?;
        let rows = likes::table
            .filter(likes::post_id.eq(post_id))
            .select(Like::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn insert_like(&self, like: &NewLike) -> Result<InsertOutcome, StoreError> {
        let mut conn = self.get_connection().await?;
        let result = diesel::insert_into(likes::table)
            .values(like)
            .execute(&mut conn)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Ok(InsertOutcome::AlreadyExisted)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_like(
        &self,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
    ) -> Result<usize, StoreError> {
        let mut conn = self.get_connection().await?;
        let removed = diesel::delete(
            likes::table
                .filter(likes::post_id.eq(post_id))
                .filter(likes::user_id.eq(user_id))
                .filter(likes::emoji_type.eq(kind.as_str())),
        )
        .execute(&mut conn)
        .await?;
        Ok(removed)
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.get_connection().await?;
        let comment = diesel::insert_into(comments::table)
            .values(&comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(comment)
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        let mut conn = self.get_connection().await?;
        let rows = comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::created_at.asc())
            .select(Comment::as_select())
            .load(&mut conn)
            .await?;
        Ok(rows)
    }

    async fn count_comments(&self, post_id: &str) -> Result<u64, StoreError> {
        let mut conn = self.get_connection().await?;
        let count = comments::table
            .filter(comments::post_id.eq(post_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert_tip(&self, tip: NewTip) -> Result<Tip, StoreError> {
        let mut conn = self.get_connection().await?;
        let tip = diesel::insert_into(tips::table)
            .values(&tip)
            .returning(Tip::as_returning())
            .get_result(&mut conn)
            .await?;
        Ok(tip)
    }

    async fn count_tips(&self, post_id: &str) -> Result<u64, StoreError> {
        let mut conn = self.get_connection().await?;
        let count = tips::table
            .filter(tips::post_id.eq(post_id))
            .count()
            .get_result::<i64>(&mut conn)
            .await?;
        Ok(count.max(0) as u64)
    }
}
