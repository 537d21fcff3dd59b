// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! User-generated content around the feed: comments, paid posts and tips.

pub mod comments;
pub mod posts;
pub mod tips;

pub use comments::CommentService;
pub use posts::{PostComposer, SubmittedPost};
pub use tips::{SentTip, TipJar, MIN_TIP_SOL};

use crate::models::SPONSORED_ID_PREFIX;

pub(crate) fn is_sponsored_id(post_id: &str) -> bool {
    post_id.starts_with(SPONSORED_ID_PREFIX)
}
