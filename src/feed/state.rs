// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::{FeedPage, PaginationCursor};
use crate::models::{EnrichedPost, PostId, ReactionKind, ReactionView, SponsoredPost};

pub type SharedFeedState = Arc<Mutex<FeedState>>;

/// Everything one viewer's feed currently shows.
///
/// Owned by the caller and passed to the engine explicitly; nothing here
/// lives in module-level state.
#[derive(Debug, Clone)]
pub struct FeedState {
    posts: Vec<EnrichedPost>,
    cursor: PaginationCursor,
    /// Sponsored items from the last initial load
    sponsored: Vec<SponsoredPost>,
    seen: HashSet<PostId>,
    /// Reaction controls with a toggle in flight
    pending: HashSet<(PostId, ReactionKind)>,
}

impl FeedState {
    pub fn new(page_size: usize) -> Self {
        Self {
            posts: Vec::new(),
            cursor: PaginationCursor::new(page_size),
            sponsored: Vec::new(),
            seen: HashSet::new(),
            pending: HashSet::new(),
        }
    }

    pub fn shared(page_size: usize) -> SharedFeedState {
        Arc::new(Mutex::new(Self::new(page_size)))
    }

    pub fn posts(&self) -> &[EnrichedPost] {
        &self.posts
    }

    pub fn cursor(&self) -> PaginationCursor {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: PaginationCursor) {
        self.cursor = cursor;
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    pub fn sponsored(&self) -> &[SponsoredPost] {
        &self.sponsored
    }

    /// Swap in a freshly assembled first page
    pub fn replace(&mut self, page: FeedPage) {
        self.seen = page.posts.iter().map(|p| p.id.clone()).collect();
        self.posts = page.posts;
        self.cursor = page.cursor;
        self.sponsored = page.sponsored;
    }

    /// Append a "load more" page, skipping posts already shown.
    /// Returns how many posts were added.
    pub fn append(&mut self, posts: Vec<EnrichedPost>) -> usize {
        let before = self.posts.len();
        for post in posts {
            if self.seen.insert(post.id.clone()) {
                self.posts.push(post);
            }
        }
        self.posts.len() - before
    }

    pub fn post(&self, id: &str) -> Option<&EnrichedPost> {
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn post_mut(&mut self, id: &str) -> Option<&mut EnrichedPost> {
        self.posts.iter_mut().find(|p| p.id == id)
    }

    pub fn reaction_view(&self, id: &str, kind: ReactionKind) -> Option<ReactionView> {
        self.post(id).map(|p| p.reaction_view(kind))
    }

    /// Returns `false` if the post is no longer shown
    pub fn set_reaction_view(&mut self, id: &str, kind: ReactionKind, view: ReactionView) -> bool {
        match self.post_mut(id) {
            Some(post) => {
                post.set_reaction_view(kind, view);
                true
            }
            None => false,
        }
    }

    /// Claim a reaction control. `false` if a toggle on it is still in flight.
    pub fn begin_reaction(&mut self, id: &str, kind: ReactionKind) -> bool {
        self.pending.insert((id.to_string(), kind))
    }

    pub fn finish_reaction(&mut self, id: &str, kind: ReactionKind) {
        self.pending.remove(&(id.to_string(), kind));
    }

    pub fn is_reaction_pending(&self, id: &str, kind: ReactionKind) -> bool {
        self.pending.contains(&(id.to_string(), kind))
    }
}
