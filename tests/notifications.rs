// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use std::sync::Arc;
use std::time::Duration;

use fanpage_feed::models::ReactionKind;
use fanpage_feed::notifications::NotificationKind;
use fanpage_feed::store::{Fault, InMemoryStore};

use common::session;

#[tokio::test(start_paused = true)]
async fn session_errors_expire_on_their_own() {
    let store = Arc::new(InMemoryStore::new());
    store.inject(Fault::ListPosts).await;
    let session = session(&store, 10);

    assert!(session.load_initial().await.is_err());
    assert!(session.toggle_reaction("post-1", ReactionKind::Heart).await.is_err());
    assert_eq!(session.notifications().await.len(), 2);

    tokio::time::sleep(Duration::from_secs(14)).await;
    assert_eq!(session.notifications().await.len(), 2);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(session.notifications().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn dismissed_entries_do_not_come_back() {
    let store = Arc::new(InMemoryStore::new());
    let session = session(&store, 10);
    let center = session.notification_center();

    let info = center.notify(NotificationKind::Info, "Wallet connected", None).await;
    let error = center.error("Transaction failed").await;
    assert!(session.dismiss(error).await);
    assert!(!session.dismiss(error).await);

    let visible = session.notifications().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, info);
    assert_eq!(visible[0].kind, NotificationKind::Info);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert!(session.notifications().await.is_empty());
}
