// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio_test::{assert_err, assert_ok};

use fanpage_feed::config::PaymentConfig;
use fanpage_feed::error::{CommentError, PaymentError, SubmissionError, TipError};
use fanpage_feed::feed::FeedAssembler;
use fanpage_feed::models::{PostDraft, PostLinks};
use fanpage_feed::notifications::NotificationKind;
use fanpage_feed::social::{PostComposer, TipJar};
use fanpage_feed::store::{Fault, InMemoryStore, Store};

use common::{feed_config, fixed_now, seed_posts, session, FakeSigner};

fn draft(content: &str) -> PostDraft {
    PostDraft {
        content: content.to_string(),
        links: PostLinks {
            website: Some("  https://example.org ".into()),
            telegram: Some("   ".into()),
            ..PostLinks::default()
        },
    }
}

#[tokio::test]
async fn submitted_post_pays_the_fee_then_appears() {
    let store = Arc::new(InMemoryStore::new());
    let signer = FakeSigner::new();
    let payments = PaymentConfig::default();
    let composer = PostComposer::new(store.clone(), signer.clone(), payments.clone());

    let submitted = composer.submit_post("author-wallet", draft(" to the moon ")).await.unwrap();

    assert_eq!(submitted.post.content, "to the moon");
    assert_eq!(submitted.post.website.as_deref(), Some("https://example.org"));
    assert_eq!(submitted.post.telegram, None);
    assert_eq!(submitted.signature.as_str(), "sig-1");

    let sent = signer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, payments.platform_fee_address);
    assert_eq!(sent[0].lamports, 50_000_000);

    assert!(store.find_post(&submitted.post.id).await.unwrap().is_some());
}

#[tokio::test]
async fn payment_failure_writes_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let signer = FakeSigner::new();
    signer.fail_send(PaymentError::InsufficientFunds);
    let composer = PostComposer::new(store.clone(), signer.clone(), PaymentConfig::default());

    let err = composer.submit_post("author-wallet", draft("gm")).await.unwrap_err();

    assert!(matches!(err, SubmissionError::Payment(PaymentError::InsufficientFunds)));
    assert_eq!(store.user_count().await, 0);
}

#[tokio::test]
async fn saved_failure_after_payment_keeps_the_signature() {
    let store = Arc::new(InMemoryStore::new());
    store.inject(Fault::InsertPost).await;
    let composer = PostComposer::new(store.clone(), FakeSigner::new(), PaymentConfig::default());

    match composer.submit_post("author-wallet", draft("gm")).await {
        Err(SubmissionError::Save { signature, .. }) => assert_eq!(signature, "sig-1"),
        other => panic!("expected a save failure, got {:?}", other.map(|s| s.post.id)),
    }
}

#[tokio::test]
async fn unresolved_author_after_payment_keeps_the_signature() {
    let store = Arc::new(InMemoryStore::new());
    store.inject(Fault::FindUser).await;
    store.inject(Fault::InsertUser).await;
    let signer = FakeSigner::new();
    let composer = PostComposer::new(store.clone(), signer.clone(), PaymentConfig::default());

    match composer.submit_post("author-wallet", draft("gm")).await {
        Err(SubmissionError::Identity { signature, .. }) => assert_eq!(signature, "sig-1"),
        other => panic!("expected an identity failure, got {:?}", other.map(|s| s.post.id)),
    }
    assert_eq!(signer.sent().len(), 1);
}

#[tokio::test]
async fn post_length_is_validated_before_paying() {
    let store = Arc::new(InMemoryStore::new());
    let signer = FakeSigner::new();
    let composer = PostComposer::new(store.clone(), signer.clone(), PaymentConfig::default());

    assert!(matches!(
        composer.submit_post("w", draft("   ")).await,
        Err(SubmissionError::EmptyContent)
    ));
    assert!(matches!(
        composer.submit_post("w", draft(&"x".repeat(161))).await,
        Err(SubmissionError::TooLong { max: 160 })
    ));
    assert_ok!(composer.submit_post("w", draft(&"x".repeat(160))).await);
    assert_eq!(signer.sent().len(), 1);
}

#[tokio::test]
async fn tips_reach_the_author_and_count_towards_the_post() {
    let store = Arc::new(InMemoryStore::new());
    let post = seed_posts(&store, 1, fixed_now()).await.remove(0);
    let signer = FakeSigner::new();
    let jar = TipJar::new(store.clone(), signer.clone());

    let sent = jar.send_tip(&post.id, "fan-wallet", 0.25).await.unwrap();

    assert_eq!(sent.tip.amount_lamports, 250_000_000);
    assert_eq!(signer.sent()[0].to, "author-wallet");
    assert_eq!(store.count_tips(&post.id).await.unwrap(), 1);

    let page = FeedAssembler::new(store.clone(), feed_config(10))
        .fetch_initial_page_at(None, fixed_now())
        .await
        .unwrap();
    assert_eq!(page.posts[0].tip_count, 1);
    assert_eq!(page.posts[0].engagement_score, 5.0);
}

#[tokio::test]
async fn invalid_tips_are_rejected() {
    let store = Arc::new(InMemoryStore::new());
    let post = seed_posts(&store, 1, fixed_now()).await.remove(0);
    let signer = FakeSigner::new();
    let jar = TipJar::new(store.clone(), signer.clone());

    assert!(matches!(jar.send_tip(&post.id, "fan", 0.0).await, Err(TipError::NonPositive)));
    assert!(matches!(
        jar.send_tip(&post.id, "fan", 0.0005).await,
        Err(TipError::BelowMinimum { .. })
    ));
    assert!(matches!(jar.send_tip("sponsored-ad-1", "fan", 1.0).await, Err(TipError::Sponsored)));
    assert!(matches!(jar.send_tip("missing", "fan", 1.0).await, Err(TipError::UnknownAuthor)));

    signer.fail_confirm(PaymentError::Unconfirmed("sig-1".into()));
    assert_err!(jar.send_tip(&post.id, "fan", 1.0).await);
    assert_eq!(store.count_tips(&post.id).await.unwrap(), 0);
}

#[tokio::test]
async fn session_comments_bump_the_shown_count() {
    let store = Arc::new(InMemoryStore::new());
    let post = seed_posts(&store, 1, Utc::now() - Duration::minutes(1)).await.remove(0);
    let session = session(&store, 10);

    assert!(matches!(
        session.add_comment(&post.id, "hello").await,
        Err(CommentError::WalletNotConnected)
    ));

    session.connect_wallet("fan-wallet").await.unwrap();
    session.load_initial().await.unwrap();
    session.add_comment(&post.id, "hello").await.unwrap();

    assert_eq!(session.posts().await[0].comments_count, 1);
    let kinds: Vec<NotificationKind> = session.notifications().await.into_iter().map(|n| n.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Error, NotificationKind::Success]);
}

#[test]
fn comment_validation_runs_outside_any_session() {
    let store = Arc::new(InMemoryStore::new());
    let service = fanpage_feed::social::CommentService::new(store);

    let result = tokio_test::block_on(service.add_comment("post-1", "fan", ""));
    assert!(matches!(result, Err(CommentError::EmptyContent)));
}
