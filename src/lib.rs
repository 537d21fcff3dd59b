// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod identity;
pub mod metrics;
pub mod models;
pub mod notifications;
pub mod optimistic;
pub mod payment;
pub mod reactions;
pub mod schema;
pub mod scoring;
pub mod social;
pub mod store;
