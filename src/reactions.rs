// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Per-post emoji reactions.
//!
//! Each `(post, user, kind)` is either ABSENT or PRESENT. A toggle always
//! tries the insert first; the unique constraint answering "already
//! existed" is what turns the click into a delete. The locally cached
//! `is_active` flag only drives the optimistic guess.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ReactionError, StoreError};
use crate::feed::{FeedState, SharedFeedState};
use crate::metrics;
use crate::models::{NewLike, ReactionCounts, ReactionKind, ReactionView};
use crate::optimistic::{OptimisticError, OptimisticMutationController};
use crate::store::{InsertOutcome, Store};

/// Where a toggle ended up after the backend answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionSettlement {
    /// The row was inserted: PRESENT
    Added,
    /// The insert conflicted and the existing row was deleted: ABSENT
    Removed,
}

impl ReactionSettlement {
    pub fn is_active(&self) -> bool {
        matches!(self, ReactionSettlement::Added)
    }

    /// The view to show once settled, derived from the view before the click
    pub fn settled_view(&self, pre: ReactionView) -> ReactionView {
        match self {
            ReactionSettlement::Added => ReactionView {
                count: if pre.is_active { pre.count } else { pre.count.saturating_add(1) },
                is_active: true,
            },
            ReactionSettlement::Removed => ReactionView {
                count: if pre.is_active { pre.count.saturating_sub(1) } else { pre.count },
                is_active: false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettledReaction {
    pub settlement: ReactionSettlement,
    pub view: ReactionView,
}

#[derive(Clone)]
pub struct ReactionStore {
    store: Arc<dyn Store>,
}

impl ReactionStore {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Toggle `kind` on `post_id` for `user_id`, updating `state` optimistically.
    ///
    /// On any remote failure the control is restored to exactly what it
    /// showed before the call.
    pub async fn toggle(
        &self,
        state: &SharedFeedState,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
    ) -> Result<SettledReaction, ReactionError> {
        let pre = {
            let mut feed = state.lock().await;
            let post = feed
                .post(post_id)
                .ok_or_else(|| ReactionError::UnknownPost(post_id.to_string()))?;
            if post.is_sponsored {
                return Err(ReactionError::Sponsored);
            }
            let pre = post.reaction_view(kind);
            if !feed.begin_reaction(post_id, kind) {
                return Err(ReactionError::InFlight);
            }
            pre
        };

        let controller = OptimisticMutationController::new(state);
        let result = controller
            .apply(
                |feed: &mut FeedState| {
                    feed.set_reaction_view(post_id, kind, pre.flipped());
                    pre
                },
                |feed: &mut FeedState, pre| {
                    feed.set_reaction_view(post_id, kind, pre);
                },
                self.toggle_remote(post_id, user_id, kind),
            )
            .await;

        match result {
            Ok(settlement) => {
                let view = settlement.settled_view(pre);
                controller
                    .settle(|feed| {
                        feed.set_reaction_view(post_id, kind, view);
                        feed.finish_reaction(post_id, kind);
                    })
                    .await;
                Ok(SettledReaction { settlement, view })
            }
            Err(OptimisticError::Remote(e)) => {
                metrics::record_reaction("rolled_back");
                controller.settle(|feed| feed.finish_reaction(post_id, kind)).await;
                Err(e)
            }
            Err(OptimisticError::Detached) => Err(ReactionError::Detached),
        }
    }

    /// The backend half of a toggle: insert, and on conflict delete.
    pub async fn toggle_remote(
        &self,
        post_id: &str,
        user_id: &str,
        kind: ReactionKind,
    ) -> Result<ReactionSettlement, ReactionError> {
        let like = NewLike::new(post_id, user_id, kind);

        let outcome = match self.store.insert_like(&like).await {
            Ok(outcome) => outcome,
            // Adapters that surface the constraint as an error mean the same thing
            Err(StoreError::UniqueViolation(_)) => InsertOutcome::AlreadyExisted,
            Err(e) => {
                warn!("Failed to add {} reaction on post {}: {}", kind, post_id, e);
                return Err(ReactionError::RemoteMutationFailure(e));
            }
        };

        match outcome {
            InsertOutcome::Inserted => {
                debug!("Added {} reaction on post {} for user {}", kind, post_id, user_id);
                metrics::record_reaction("added");
                Ok(ReactionSettlement::Added)
            }
            InsertOutcome::AlreadyExisted => {
                debug!(
                    "Reaction {} on post {} already existed for user {}, removing it",
                    kind, post_id, user_id
                );
                match self.store.delete_like(post_id, user_id, kind).await {
                    Ok(removed) => {
                        if removed == 0 {
                            info!("Reaction {} on post {} was already gone when deleting", kind, post_id);
                        }
                        metrics::record_reaction("removed");
                        Ok(ReactionSettlement::Removed)
                    }
                    Err(e) => {
                        warn!("Failed to remove {} reaction on post {}: {}", kind, post_id, e);
                        Err(ReactionError::RemoteMutationFailure(e))
                    }
                }
            }
        }
    }

    /// Counts per kind and the viewer's own reactions, from one scan of the post's rows
    pub async fn aggregate(
        &self,
        post_id: &str,
        viewer: Option<&str>,
    ) -> Result<(ReactionCounts, BTreeSet<ReactionKind>), StoreError> {
        let rows = self.store.list_likes(post_id).await?;

        let mut counts = ReactionCounts::default();
        let mut mine = BTreeSet::new();
        for row in &rows {
            let Some(kind) = row.kind() else {
                continue;
            };
            counts.increment(kind);
            if viewer == Some(row.user_id.as_str()) {
                mine.insert(kind);
            }
        }

        Ok((counts, mine))
    }

    pub async fn counts_for(&self, post_id: &str) -> Result<ReactionCounts, StoreError> {
        self.aggregate(post_id, None).await.map(|(counts, _)| counts)
    }

    pub async fn user_reactions_for(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<BTreeSet<ReactionKind>, StoreError> {
        self.aggregate(post_id, Some(user_id)).await.map(|(_, mine)| mine)
    }
}
