// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Offset cursor for "load more".
///
/// Once a short page has been seen `has_more` stays `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationCursor {
    offset: usize,
    page_size: usize,
    has_more: bool,
}

impl PaginationCursor {
    pub fn new(page_size: usize) -> Self {
        Self::at(0, page_size)
    }

    /// A cursor resumed from a client-supplied offset
    pub fn at(offset: usize, page_size: usize) -> Self {
        Self {
            offset,
            page_size,
            has_more: true,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Record a fetched page of `fetched` organic posts
    pub fn advance(&mut self, fetched: usize) {
        self.offset = self.offset.saturating_add(self.page_size);
        if fetched < self.page_size {
            self.has_more = false;
        }
    }
}
