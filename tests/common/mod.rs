// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use fanpage_feed::config::{FeedConfig, NotificationConfig};
use fanpage_feed::error::PaymentError;
use fanpage_feed::feed::FeedSession;
use fanpage_feed::models::Post;
use fanpage_feed::payment::{Signature, Signer, TransferSpec};
use fanpage_feed::store::InMemoryStore;

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn feed_config(page_size: usize) -> FeedConfig {
    FeedConfig {
        page_size,
        ..FeedConfig::default()
    }
}

pub fn session(store: &Arc<InMemoryStore>, page_size: usize) -> FeedSession {
    FeedSession::new(store.clone(), feed_config(page_size), NotificationConfig::default())
}

/// Seed `count` posts by one author, one minute apart, newest first in id order
pub async fn seed_posts(store: &InMemoryStore, count: usize, base: DateTime<Utc>) -> Vec<Post> {
    let author = store.seed_user("author-wallet").await;
    let mut posts = Vec::with_capacity(count);
    for i in 0..count {
        let created_at = base - Duration::minutes(i as i64);
        posts.push(store.seed_post(&author.id, &format!("post {}", i), created_at).await);
    }
    posts
}

/// Wallet stand-in that records transfers and answers from a script
pub struct FakeSigner {
    send_error: Mutex<Option<PaymentError>>,
    confirm_error: Mutex<Option<PaymentError>>,
    sent: Mutex<Vec<TransferSpec>>,
    counter: AtomicU64,
}

impl FakeSigner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            send_error: Mutex::new(None),
            confirm_error: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            counter: AtomicU64::new(0),
        })
    }

    pub fn fail_send(&self, err: PaymentError) {
        *self.send_error.lock().unwrap() = Some(err);
    }

    pub fn fail_confirm(&self, err: PaymentError) {
        *self.confirm_error.lock().unwrap() = Some(err);
    }

    pub fn sent(&self) -> Vec<TransferSpec> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Signer for FakeSigner {
    async fn sign_and_send(&self, transfer: &TransferSpec) -> Result<Signature, PaymentError> {
        if let Some(err) = self.send_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.sent.lock().unwrap().push(transfer.clone());
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Signature(format!("sig-{}", n)))
    }

    async fn confirm(&self, _signature: &Signature) -> Result<(), PaymentError> {
        match self.confirm_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
