// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::likes;

use super::{PostId, UserId};

/// The fixed set of emoji reactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ThumbsUp,
    Smiley,
    Shit,
    Heart,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::ThumbsUp,
        ReactionKind::Smiley,
        ReactionKind::Shit,
        ReactionKind::Heart,
    ];

    /// Value stored in the `emoji_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "thumbs_up",
            ReactionKind::Smiley => "smiley",
            ReactionKind::Shit => "shit",
            ReactionKind::Heart => "heart",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reaction kind: {0}")]
pub struct UnknownReactionKind(pub String);

impl FromStr for ReactionKind {
    type Err = UnknownReactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownReactionKind(s.to_string()))
    }
}

/// Per-kind reaction totals for one post. Every kind is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionCounts {
    pub thumbs_up: u32,
    pub smiley: u32,
    pub shit: u32,
    pub heart: u32,
}

impl ReactionCounts {
    pub fn get(&self, kind: ReactionKind) -> u32 {
        match kind {
            ReactionKind::ThumbsUp => self.thumbs_up,
            ReactionKind::Smiley => self.smiley,
            ReactionKind::Shit => self.shit,
            ReactionKind::Heart => self.heart,
        }
    }

    fn slot_mut(&mut self, kind: ReactionKind) -> &mut u32 {
        match kind {
            ReactionKind::ThumbsUp => &mut self.thumbs_up,
            ReactionKind::Smiley => &mut self.smiley,
            ReactionKind::Shit => &mut self.shit,
            ReactionKind::Heart => &mut self.heart,
        }
    }

    pub fn set(&mut self, kind: ReactionKind, count: u32) {
        *self.slot_mut(kind) = count;
    }

    pub fn increment(&mut self, kind: ReactionKind) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(1);
    }

    /// Decrement, clamped at zero
    pub fn decrement(&mut self, kind: ReactionKind) {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_sub(1);
    }

    pub fn total(&self) -> u32 {
        ReactionKind::ALL.iter().map(|kind| self.get(*kind)).sum()
    }
}

/// What one reaction control shows: the visible count and whether the
/// viewer holds that reaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionView {
    pub count: u32,
    pub is_active: bool,
}

impl ReactionView {
    /// The optimistic guess for a click: flip `is_active` and move the count by one.
    pub fn flipped(self) -> Self {
        if self.is_active {
            Self { count: self.count.saturating_sub(1), is_active: false }
        } else {
            Self { count: self.count.saturating_add(1), is_active: true }
        }
    }
}

/// A row in the `likes` table
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Like {
    pub id: String,
    pub post_id: PostId,
    pub user_id: UserId,
    pub emoji_type: String,
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// `None` for rows written with an emoji outside the fixed set
    pub fn kind(&self) -> Option<ReactionKind> {
        self.emoji_type.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Insertable, Serialize, Deserialize)]
#[diesel(table_name = likes)]
pub struct NewLike {
    pub post_id: PostId,
    pub user_id: UserId,
    pub emoji_type: String,
}

impl NewLike {
    pub fn new(post_id: &str, user_id: &str, kind: ReactionKind) -> Self {
        Self {
            post_id: post_id.to_string(),
            user_id: user_id.to_string(),
            emoji_type: kind.as_str().to_string(),
        }
    }
}
