// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod assembler;
pub mod cursor;
pub mod interleave;
pub mod session;
pub mod state;

pub use assembler::{FeedAssembler, FeedPage};
pub use cursor::PaginationCursor;
pub use interleave::interleave;
pub use session::FeedSession;
pub use state::{FeedState, SharedFeedState};
