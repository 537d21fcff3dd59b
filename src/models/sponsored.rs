// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use crate::schema::adtweet;

use super::PostLinks;

/// Promotional content injected into the first feed page.
///
/// Lower `priority` values are shown first.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = adtweet)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SponsoredPost {
    pub id: String,
    pub content: String,
    pub twitter_embed: Option<String>,
    pub website: Option<String>,
    pub facebook: Option<String>,
    pub telegram: Option<String>,
    pub sponsor_name: String,
    pub priority: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SponsoredPost {
    pub fn links(&self) -> PostLinks {
        PostLinks {
            twitter_embed: self.twitter_embed.clone(),
            website: self.website.clone(),
            facebook: self.facebook.clone(),
            telegram: self.telegram.clone(),
        }
    }
}
