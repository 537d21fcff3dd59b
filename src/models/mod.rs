// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod user;
pub mod post;
pub mod reaction;
pub mod comment;
pub mod sponsored;
pub mod tip;

pub use user::{NewUser, User, UserId};
pub use post::{
    EnrichedPost, NewPost, Post, PostDraft, PostId, PostLinks, POST_MAX_LENGTH, SPONSORED_ID_PREFIX,
};
pub use reaction::{Like, NewLike, ReactionCounts, ReactionKind, ReactionView, UnknownReactionKind};
pub use comment::{Comment, NewComment, COMMENT_MAX_LENGTH};
pub use sponsored::SponsoredPost;
pub use tip::{NewTip, Tip};
