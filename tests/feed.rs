// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

mod common;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, Utc};

use fanpage_feed::feed::FeedAssembler;
use fanpage_feed::models::ReactionKind;
use fanpage_feed::notifications::NotificationKind;
use fanpage_feed::store::{Fault, InMemoryStore};

use common::{feed_config, fixed_now, seed_posts, session};

#[tokio::test]
async fn pages_never_repeat_or_reorder_shown_posts() {
    let store = Arc::new(InMemoryStore::new());
    let seeded = seed_posts(&store, 25, Utc::now()).await;
    let session = session(&store, 10);

    assert_eq!(session.load_initial().await.unwrap(), 10);
    let first_page: Vec<String> = session.posts().await.into_iter().map(|p| p.id).collect();
    assert!(session.has_more().await);

    assert_eq!(session.load_more().await.unwrap(), 10);
    assert!(session.has_more().await);
    assert_eq!(session.load_more().await.unwrap(), 5);
    assert!(!session.has_more().await);

    let all: Vec<String> = session.posts().await.into_iter().map(|p| p.id).collect();
    assert_eq!(&all[..10], &first_page[..]);
    assert_eq!(all.len(), 25);
    assert_eq!(all.iter().collect::<HashSet<_>>().len(), 25);

    let expected: Vec<String> = seeded.into_iter().map(|p| p.id).collect();
    assert_eq!(all, expected);

    // Exhausted cursor does not fetch again
    store.inject(Fault::ListPosts).await;
    assert_eq!(session.load_more().await.unwrap(), 0);
}

#[tokio::test]
async fn has_more_clears_only_on_a_short_page() {
    let store = Arc::new(InMemoryStore::new());
    seed_posts(&store, 20, Utc::now()).await;
    let session = session(&store, 10);

    session.load_initial().await.unwrap();
    assert!(session.has_more().await);
    assert_eq!(session.load_more().await.unwrap(), 10);
    assert!(session.has_more().await);
    assert_eq!(session.load_more().await.unwrap(), 0);
    assert!(!session.has_more().await);
}

#[tokio::test]
async fn sponsored_items_follow_the_interleave_pattern() {
    let store = Arc::new(InMemoryStore::new());
    seed_posts(&store, 7, fixed_now()).await;
    let second = store.seed_sponsored("beta", 2, true).await;
    let first = store.seed_sponsored("alpha", 1, true).await;
    store.seed_sponsored("paused", 0, false).await;

    let assembler = FeedAssembler::new(store.clone(), feed_config(10));
    let page = assembler.fetch_initial_page_at(None, fixed_now()).await.unwrap();

    let layout: String = page
        .posts
        .iter()
        .map(|p| if p.is_sponsored { 'S' } else { 'O' })
        .collect();
    assert_eq!(layout, "OSOOSOOOO");

    let organic: Vec<usize> = page
        .posts
        .iter()
        .enumerate()
        .filter(|(_, p)| !p.is_sponsored)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(organic, vec![0, 2, 3, 5, 6, 7, 8]);

    assert_eq!(page.posts[1].id, format!("sponsored-{}", first.id));
    assert_eq!(page.posts[4].id, format!("sponsored-{}", second.id));
    assert_eq!(page.posts[1].sponsor_name.as_deref(), Some("alpha"));
}

#[test_log::test(tokio::test)]
async fn one_failing_aggregate_does_not_drop_the_post() {
    let store = Arc::new(InMemoryStore::new());
    let posts = seed_posts(&store, 3, fixed_now()).await;
    for post in &posts {
        store.seed_like(&post.id, "fan", ReactionKind::Heart).await;
        store.seed_comment(&post.id, "fan", "nice", fixed_now()).await;
    }
    store.inject(Fault::CountComments(posts[1].id.clone())).await;

    let assembler = FeedAssembler::new(store.clone(), feed_config(10));
    let page = assembler.fetch_initial_page_at(Some("fan"), fixed_now()).await.unwrap();

    assert_eq!(page.posts.len(), 3);
    let broken = page.posts.iter().find(|p| p.id == posts[1].id).unwrap();
    assert_eq!(broken.reactions.total(), 0);
    assert!(broken.user_reactions.is_empty());
    assert_eq!(broken.comments_count, 0);

    for healthy in page.posts.iter().filter(|p| p.id != posts[1].id) {
        assert_eq!(healthy.reactions.get(ReactionKind::Heart), 1);
        assert_eq!(healthy.comments_count, 1);
        assert!(healthy.user_reactions.contains(&ReactionKind::Heart));
    }
}

#[tokio::test]
async fn higher_scores_never_sort_after_lower_ones() {
    let store = Arc::new(InMemoryStore::new());
    let posts = seed_posts(&store, 6, fixed_now()).await;
    for (i, post) in posts.iter().enumerate() {
        for n in 0..(i % 3) {
            store.seed_like(&post.id, &format!("fan-{}", n), ReactionKind::ThumbsUp).await;
        }
    }
    store
        .seed_comment(&posts[5].id, "fan", "first!", fixed_now() - Duration::minutes(1))
        .await;

    let assembler = FeedAssembler::new(store.clone(), feed_config(10));
    let page = assembler.fetch_initial_page_at(None, fixed_now()).await.unwrap();
    let again = assembler.fetch_initial_page_at(None, fixed_now()).await.unwrap();

    for pair in page.posts.windows(2) {
        assert!(pair[0].engagement_score >= pair[1].engagement_score);
    }
    let ids: Vec<&str> = page.posts.iter().map(|p| p.id.as_str()).collect();
    let ids_again: Vec<&str> = again.posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ids_again);
}

#[tokio::test]
async fn failed_reload_keeps_the_current_feed() {
    let store = Arc::new(InMemoryStore::new());
    seed_posts(&store, 4, Utc::now()).await;
    let session = session(&store, 10);
    session.load_initial().await.unwrap();

    store.inject(Fault::ListPosts).await;
    assert!(session.load_initial().await.is_err());

    assert_eq!(session.posts().await.len(), 4);
    let notes = session.notifications().await;
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].kind, NotificationKind::Error);

    store.clear_faults().await;
    assert_eq!(session.load_initial().await.unwrap(), 4);
}
