// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! One viewer's feed: what is shown, who is looking, and what they were told.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{FeedAssembler, FeedState, SharedFeedState};
use crate::config::{FeedConfig, NotificationConfig};
use crate::error::{CommentError, FeedError, IdentityError, ReactionError};
use crate::identity::IdentityResolver;
use crate::models::{Comment, EnrichedPost, ReactionKind, UserId};
use crate::notifications::{Notification, NotificationCenter};
use crate::reactions::{ReactionStore, SettledReaction};
use crate::social::CommentService;
use crate::store::Store;

#[derive(Debug, Clone)]
struct Viewer {
    wallet: String,
    user_id: UserId,
}

pub struct FeedSession {
    state: SharedFeedState,
    assembler: Arc<FeedAssembler>,
    reactions: ReactionStore,
    identity: IdentityResolver,
    comments: CommentService,
    notifications: NotificationCenter,
    viewer: RwLock<Option<Viewer>>,
}

impl FeedSession {
    pub fn new(store: Arc<dyn Store>, feed: FeedConfig, notifications: NotificationConfig) -> Self {
        Self {
            state: FeedState::shared(feed.page_size),
            assembler: Arc::new(FeedAssembler::new(store.clone(), feed)),
            reactions: ReactionStore::new(store.clone()),
            identity: IdentityResolver::new(store.clone()),
            comments: CommentService::new(store),
            notifications: NotificationCenter::new(notifications),
            viewer: RwLock::new(None),
        }
    }

    /// Resolve (or create) the user behind `wallet` and make it the viewer
    pub async fn connect_wallet(&self, wallet: &str) -> Result<UserId, IdentityError> {
        match self.identity.ensure_user(wallet).await {
            Ok(user_id) => {
                info!("Wallet {} connected as user {}", wallet, user_id);
                *self.viewer.write().await = Some(Viewer {
                    wallet: wallet.trim().to_string(),
                    user_id: user_id.clone(),
                });
                Ok(user_id)
            }
            Err(e) => {
                self.notifications.error(format!("Could not sign in: {}", e)).await;
                Err(e)
            }
        }
    }

    pub async fn disconnect_wallet(&self) {
        *self.viewer.write().await = None;
    }

    pub async fn viewer_id(&self) -> Option<UserId> {
        self.viewer.read().await.as_ref().map(|v| v.user_id.clone())
    }

    /// Replace the feed with a fresh first page. Returns the number of items shown.
    ///
    /// On failure the previously shown posts stay in place.
    pub async fn load_initial(&self) -> Result<usize, FeedError> {
        let viewer = self.viewer_id().await;
        match self.assembler.fetch_initial_page(viewer.as_deref()).await {
            Ok(page) => {
                let shown = page.posts.len();
                self.state.lock().await.replace(page);
                Ok(shown)
            }
            Err(e) => {
                warn!("Initial feed load failed, keeping current posts: {}", e);
                self.notifications.error("Failed to load posts").await;
                Err(e)
            }
        }
    }

    /// Append the next page. Returns how many new posts were added.
    pub async fn load_more(&self) -> Result<usize, FeedError> {
        let viewer = self.viewer_id().await;
        let mut cursor = self.state.lock().await.cursor();
        if !cursor.has_more() {
            return Ok(0);
        }

        match self.assembler.fetch_next_page(&mut cursor, viewer.as_deref()).await {
            Ok(posts) => {
                let mut state = self.state.lock().await;
                state.set_cursor(cursor);
                let added = state.append(posts);
                debug!("Appended {} posts, has_more={}", added, cursor.has_more());
                Ok(added)
            }
            Err(e) => {
                self.notifications.error("Failed to load more posts").await;
                Err(e)
            }
        }
    }

    pub async fn toggle_reaction(
        &self,
        post_id: &str,
        kind: ReactionKind,
    ) -> Result<SettledReaction, ReactionError> {
        let Some(user_id) = self.viewer_id().await else {
            self.notifications.error("Connect your wallet to react").await;
            return Err(ReactionError::WalletNotConnected);
        };

        let result = self.reactions.toggle(&self.state, post_id, &user_id, kind).await;
        match &result {
            // A second click on a pending control is simply ignored
            Err(ReactionError::InFlight) => {}
            Err(e) => {
                self.notifications.error(format!("Failed to update reaction: {}", e)).await;
            }
            Ok(_) => {}
        }
        result
    }

    pub async fn add_comment(&self, post_id: &str, content: &str) -> Result<Comment, CommentError> {
        let wallet = self.viewer.read().await.as_ref().map(|v| v.wallet.clone());
        let Some(wallet) = wallet else {
            self.notifications.error("Connect your wallet to comment").await;
            return Err(CommentError::WalletNotConnected);
        };

        match self.comments.add_comment(post_id, &wallet, content).await {
            Ok(comment) => {
                if let Some(post) = self.state.lock().await.post_mut(post_id) {
                    post.comments_count = post.comments_count.saturating_add(1);
                }
                self.notifications.success("Comment posted", None).await;
                Ok(comment)
            }
            Err(e) => {
                self.notifications.error(format!("Failed to post comment: {}", e)).await;
                Err(e)
            }
        }
    }

    pub async fn posts(&self) -> Vec<EnrichedPost> {
        self.state.lock().await.posts().to_vec()
    }

    pub async fn has_more(&self) -> bool {
        self.state.lock().await.has_more()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.visible().await
    }

    pub async fn dismiss(&self, id: u64) -> bool {
        self.notifications.dismiss(id).await
    }

    pub fn notification_center(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Shared handle to the underlying feed state
    pub fn state(&self) -> SharedFeedState {
        self.state.clone()
    }
}
