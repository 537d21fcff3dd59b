// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod comments;
pub mod feed;
pub mod health;
pub mod metrics;
pub mod reactions;
