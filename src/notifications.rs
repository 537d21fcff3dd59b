// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Transient user-facing messages with a per-kind lifetime.

use std::sync::{Arc, Weak};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    /// Optional link target, e.g. a transaction signature
    pub external_ref: Option<String>,
    #[serde(skip)]
    pub inserted_at: Instant,
    #[serde(skip)]
    pub ttl: Duration,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.inserted_at + self.ttl
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now <= self.expires_at()
    }
}

/// Ordered set of live notifications. Time is always passed in.
#[derive(Debug)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
    next_id: u64,
    config: NotificationConfig,
}

impl NotificationQueue {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
            config,
        }
    }

    pub fn ttl_for(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::Error => self.config.error_ttl(),
            _ => self.config.default_ttl(),
        }
    }

    pub fn push(
        &mut self,
        kind: NotificationKind,
        message: impl Into<String>,
        external_ref: Option<String>,
        now: Instant,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            kind,
            message: message.into(),
            external_ref,
            inserted_at: now,
            ttl: self.ttl_for(kind),
        });
        id
    }

    /// Dismiss by id. Removing an id that is already gone is a no-op.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|n| n.id != id);
        self.entries.len() != before
    }

    pub fn visible(&self, now: Instant) -> Vec<Notification> {
        self.entries.iter().filter(|n| n.is_visible(now)).cloned().collect()
    }

    /// Drop everything past its lifetime, returning how many went
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|n| n.is_visible(now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared queue that removes its own entries when they lapse.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct NotificationCenter {
    queue: Arc<Mutex<NotificationQueue>>,
}

impl NotificationCenter {
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            queue: Arc::new(Mutex::new(NotificationQueue::new(config))),
        }
    }

    pub async fn notify(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        external_ref: Option<String>,
    ) -> u64 {
        let now = Instant::now();
        let (id, deadline) = {
            let mut queue = self.queue.lock().await;
            let id = queue.push(kind, message, external_ref, now);
            (id, now + queue.ttl_for(kind))
        };

        let queue: Weak<Mutex<NotificationQueue>> = Arc::downgrade(&self.queue);
        tokio::spawn(async move {
            // Entries stay visible through the deadline itself
            tokio::time::sleep_until(deadline + Duration::from_millis(1)).await;
            if let Some(queue) = queue.upgrade() {
                if queue.lock().await.remove(id) {
                    debug!("Notification {} expired", id);
                }
            }
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>, external_ref: Option<String>) -> u64 {
        self.notify(NotificationKind::Success, message, external_ref).await
    }

    pub async fn error(&self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message, None).await
    }

    pub async fn dismiss(&self, id: u64) -> bool {
        self.queue.lock().await.remove(id)
    }

    pub async fn visible(&self) -> Vec<Notification> {
        self.queue.lock().await.visible(Instant::now())
    }

    pub async fn len(&self) -> usize {
        self.queue.lock().await.len()
    }
}
