use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::config::FeedConfig;
use crate::feed::FeedAssembler;
use crate::identity::IdentityResolver;
use crate::models::UserId;
use crate::reactions::ReactionStore;
use crate::social::CommentService;
use crate::store::Store;

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination parameters for "load more"
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    /// Wallet of the viewer, for their own reactions
    pub viewer: Option<String>,
}

impl PaginationParams {
    pub fn limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, 100)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// Everything the handlers share
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub assembler: FeedAssembler,
    pub reactions: ReactionStore,
    pub identity: IdentityResolver,
    pub comments: CommentService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, feed: FeedConfig) -> Self {
        Self {
            assembler: FeedAssembler::new(store.clone(), feed),
            reactions: ReactionStore::new(store.clone()),
            identity: IdentityResolver::new(store.clone()),
            comments: CommentService::new(store.clone()),
            store,
        }
    }

    /// Resolve an optional viewer wallet without creating a user.
    /// Anything that fails to resolve is served anonymously.
    pub async fn viewer_id(&self, wallet: Option<&str>) -> Option<UserId> {
        let wallet = wallet?;
        match self.identity.lookup(wallet).await {
            Ok(user_id) => user_id,
            Err(e) => {
                warn!("Serving feed anonymously, viewer lookup failed: {}", e);
                None
            }
        }
    }
}
