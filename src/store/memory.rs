// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::trace;

use super::{InsertOutcome, PostQuery, Store};
use crate::error::StoreError;
use crate::models::{
    Comment, Like, NewComment, NewLike, NewPost, NewTip, Post, ReactionKind, SponsoredPost, Tip,
    User,
};

/// Failure points that can be injected into an [`InMemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    FindUser,
    /// `find_user_by_wallet` reports the wallet as absent even if it exists
    StaleUserLookup(String),
    InsertUser,
    InsertPost,
    /// Any `list_posts` call
    ListPosts,
    /// Only `list_posts` calls bounded by `created_since`
    ListRecentPosts,
    ListSponsored,
    ListLikes(String),
    InsertLike,
    DeleteLike,
    CountComments(String),
    InsertComment,
    InsertTip,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    users: Vec<User>,
    posts: Vec<Post>,
    likes: Vec<Like>,
    comments: Vec<Comment>,
    sponsored: Vec<SponsoredPost>,
    tips: Vec<Tip>,
    /// Injected faults; the flag marks one-shot faults
    faults: Vec<(Fault, bool)>,
}

impl Inner {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn check(&mut self, matches: impl Fn(&Fault) -> bool) -> Result<(), StoreError> {
        if let Some(pos) = self.faults.iter().position(|(fault, _)| matches(fault)) {
            let (fault, once) = self.faults[pos].clone();
            if once {
                self.faults.remove(pos);
            }
            trace!("Injected store fault triggered: {:?}", fault);
            return Err(StoreError::Backend(format!("injected fault: {:?}", fault)));
        }
        Ok(())
    }

    fn take_stale_lookup(&mut self, wallet: &str) -> bool {
        let pos = self
            .faults
            .iter()
            .position(|(fault, _)| matches!(fault, Fault::StaleUserLookup(w) if w == wallet));
        match pos {
            Some(pos) => {
                if self.faults[pos].1 {
                    self.faults.remove(pos);
                }
                true
            }
            None => false,
        }
    }
}

/// Process-local [`Store`] with the same uniqueness rules as the Postgres schema.
///
/// Used for tests and local runs without a database.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every matching call until [`clear_faults`](Self::clear_faults)
    pub async fn inject(&self, fault: Fault) {
        self.inner.lock().await.faults.push((fault, false));
    }

    /// Fail the next matching call only
    pub async fn inject_once(&self, fault: Fault) {
        self.inner.lock().await.faults.push((fault, true));
    }

    pub async fn clear_faults(&self) {
        self.inner.lock().await.faults.clear();
    }

    pub async fn seed_user(&self, wallet: &str) -> User {
        let mut inner = self.inner.lock().await;
        let user = User {
            id: inner.next_id("user"),
            wallet_address: wallet.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        user
    }

    pub async fn seed_post(&self, user_id: &str, content: &str, created_at: DateTime<Utc>) -> Post {
        let mut inner = self.inner.lock().await;
        let post = Post {
            id: inner.next_id("post"),
            user_id: user_id.to_string(),
            content: content.to_string(),
            twitter_embed: None,
            website: None,
            facebook: None,
            telegram: None,
            created_at,
        };
        inner.posts.push(post.clone());
        post
    }

    pub async fn seed_sponsored(&self, sponsor: &str, priority: i32, is_active: bool) -> SponsoredPost {
        let mut inner = self.inner.lock().await;
        let ad = SponsoredPost {
            id: inner.next_id("ad"),
            content: format!("Brought to you by {}", sponsor),
            twitter_embed: None,
            website: None,
            facebook: None,
            telegram: None,
            sponsor_name: sponsor.to_string(),
            priority,
            is_active,
            created_at: Utc::now(),
        };
        inner.sponsored.push(ad.clone());
        ad
    }

    pub async fn seed_like(&self, post_id: &str, user_id: &str, kind: ReactionKind) {
        let mut inner = self.inner.lock().await;
        let like = Like {
            id: inner.next_id("like"),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            emoji_type: kind.as_str().to_string(),
            created_at: Utc::now(),
        };
        inner.likes.push(like);
    }

    pub async fn seed_comment(&self, post_id: &str, user_id: &str, content: &str, created_at: DateTime<Utc>) {
        let mut inner = self.inner.lock().await;
        let comment = Comment {
            id: inner.next_id("comment"),
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            created_at,
        };
        inner.comments.push(comment);
    }

    /// Number of like rows for `(post_id, kind)`
    pub async fn like_rows(&self, post_id: &str, kind: ReactionKind) -> usize {
        let inner = self.inner.lock().await;
        inner
            .likes
            .iter()
            .filter(|like| like.post_id == post_id && like.emoji_type == kind.as_str())
            .count()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.lock().await.users.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user_by_wallet(&self, wallet: &str) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::FindUser))?;
        if inner.take_stale_lookup(wallet) {
            return Ok(None);
        }
        Ok(inner.users.iter().find(|u| u.wallet_address == wallet).cloned())
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::FindUser))?;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert_user(&self, wallet: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::InsertUser))?;
        if inner.users.iter().any(|u| u.wallet_address == wallet) {
            return Err(StoreError::UniqueViolation("users_wallet_address_key".to_string()));
        }
        let user = User {
            id: inner.next_id("user"),
            wallet_address: wallet.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn insert_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::InsertPost))?;
        let post = Post {
            id: inner.next_id("post"),
            user_id: post.user_id,
            content: post.content,
            twitter_embed: post.twitter_embed,
            website: post.website,
            facebook: post.facebook,
            telegram: post.telegram,
            created_at: Utc::now(),
        };
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<Vec<Post>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| match f {
            Fault::ListPosts => true,
            Fault::ListRecentPosts => query.created_since.is_some(),
            _ => false,
        })?;

        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| query.created_since.map_or(true, |since| p.created_at >= since))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(posts.into_iter().skip(query.offset).take(query.limit).collect())
    }

    async fn list_active_sponsored(&self) -> Result<Vec<SponsoredPost>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::ListSponsored))?;
        let mut ads: Vec<SponsoredPost> = inner.sponsored.iter().filter(|a| a.is_active).cloned().collect();
        ads.sort_by_key(|a| a.priority);
        Ok(ads)
    }

    async fn list_likes(&self, post_id: &str) -> Result<Vec<Like>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::ListLikes(id) if id == post_id))?;
        Ok(inner.likes.iter().filter(|l| l.post_id == post_id).cloned().collect())
    }

    async fn insert_like(&self, like: &NewLike) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::InsertLike))?;
        let exists = inner.likes.iter().any(|l| {
            l.post_id == like.post_id && l.user_id == like.user_id && l.emoji_type == like.emoji_type
        });
        if exists {
            return Ok(InsertOutcome::AlreadyExisted);
        }
        let row = Like {
            id: inner.next_id("like"),
            post_id: like.post_id.clone(),
            user_id: like.user_id.clone(),
            emoji_type: like.emoji_type.clone(),
            created_at: Utc::now(),
        };
        inner.likes.push(row);
        Ok(InsertOutcome::Inserted)
    }

    async fn delete_like(
        &self,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
    ) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::DeleteLike))?;
        let before = inner.likes.len();
        inner.likes.retain(|l| {
            !(l.post_id == post_id && l.user_id == user_id && l.emoji_type == kind.as_str())
        });
        Ok(before - inner.likes.len())
    }

    async fn insert_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::InsertComment))?;
        let comment = Comment {
            id: inner.next_id("comment"),
            post_id: comment.post_id,
            user_id: comment.user_id,
            content: comment.content,
            created_at: Utc::now(),
        };
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<Comment>, StoreError> {
        let inner = self.inner.lock().await;
        let mut comments: Vec<Comment> = inner.comments.iter().filter(|c| c.post_id == post_id).cloned().collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn count_comments(&self, post_id: &str) -> Result<u64, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::CountComments(id) if id == post_id))?;
        Ok(inner.comments.iter().filter(|c| c.post_id == post_id).count() as u64)
    }

    async fn insert_tip(&self, tip: NewTip) -> Result<Tip, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.check(|f| matches!(f, Fault::InsertTip))?;
        if inner.tips.iter().any(|t| t.signature == tip.signature) {
            return Err(StoreError::UniqueViolation("tips_signature_key".to_string()));
        }
        let tip = Tip {
            id: inner.next_id("tip"),
            post_id: tip.post_id,
            sender_id: tip.sender_id,
            recipient_wallet: tip.recipient_wallet,
            amount_lamports: tip.amount_lamports,
            signature: tip.signature,
            created_at: Utc::now(),
        };
        inner.tips.push(tip.clone());
        Ok(tip)
    }

    async fn count_tips(&self, post_id: &str) -> Result<u64, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.tips.iter().filter(|t| t.post_id == post_id).count() as u64)
    }
}
