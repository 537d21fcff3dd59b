// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::posts;

use super::{ReactionCounts, ReactionKind, ReactionView, SponsoredPost, UserId};

/// Opaque post id
pub type PostId = String;

/// Longest accepted post body, in characters
pub const POST_MAX_LENGTH: usize = 160;

/// Prefix that marks a sponsored item's id inside the feed
pub const SPONSORED_ID_PREFIX: &str = "sponsored-";

/// Organic post as stored
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: PostId,
    /// Author
    pub user_id: UserId,
    pub content: String,
    pub twitter_embed: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub telegram: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize, Deserialize)]
#[diesel(table_name = posts)]
pub struct NewPost {
    pub user_id: UserId,
    pub content: String,
    pub twitter_embed: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub telegram: Option<String>,
}

/// Optional external links attached to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostLinks {
    pub twitter_embed: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub telegram: Option<String>,
}

impl PostLinks {
    /// Trim every link and drop the blank ones
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            twitter_embed: clean(self.twitter_embed),
            website: clean(self.website),
            facebook: clean(self.facebook),
            telegram: clean(self.telegram),
        }
    }
}

/// User input for a new post, before payment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub content: String,
    #[serde(flatten)]
    pub links: PostLinks,
}

/// The normalized view-model every fetch path produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPost {
    pub id: PostId,
    pub user_id: UserId,
    pub content: String,
    #[serde(flatten)]
    pub links: PostLinks,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionCounts,
    pub user_reactions: BTreeSet<ReactionKind>,
    pub comments_count: u32,
    pub tip_count: u32,
    pub engagement_score: f64,
    pub is_sponsored: bool,
    pub sponsor_name: Option<String>,
}

impl EnrichedPost {
    /// Wrap a stored post with zeroed aggregates
    pub fn from_post(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            content: post.content,
            links: PostLinks {
                twitter_embed: post.twitter_embed,
                website: post.website,
                facebook: post.facebook,
                telegram: post.telegram,
            },
            created_at: post.created_at,
            reactions: ReactionCounts::default(),
            user_reactions: BTreeSet::new(),
            comments_count: 0,
            tip_count: 0,
            engagement_score: 0.0,
            is_sponsored: false,
            sponsor_name: None,
        }
    }

    pub fn from_sponsored(ad: &SponsoredPost) -> Self {
        Self {
            id: format!("{}{}", SPONSORED_ID_PREFIX, ad.id),
            user_id: "sponsored".to_string(),
            content: ad.content.clone(),
            links: ad.links(),
            created_at: ad.created_at,
            reactions: ReactionCounts::default(),
            user_reactions: BTreeSet::new(),
            comments_count: 0,
            tip_count: 0,
            engagement_score: 0.0,
            is_sponsored: true,
            sponsor_name: Some(ad.sponsor_name.clone()),
        }
    }

    /// Drop every derived aggregate back to its default
    pub fn clear_aggregates(&mut self) {
        self.reactions = ReactionCounts::default();
        self.user_reactions.clear();
        self.comments_count = 0;
        self.tip_count = 0;
    }

    pub fn reaction_view(&self, kind: ReactionKind) -> ReactionView {
        ReactionView {
            count: self.reactions.get(kind),
            is_active: self.user_reactions.contains(&kind),
        }
    }

    pub fn set_reaction_view(&mut self, kind: ReactionKind, view: ReactionView) {
        self.reactions.set(kind, view.count);
        if view.is_active {
            self.user_reactions.insert(kind);
        } else {
            self.user_reactions.remove(&kind);
        }
    }
}
