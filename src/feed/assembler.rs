// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{interleave, PaginationCursor};
use crate::config::FeedConfig;
use crate::error::{FeedError, StoreError};
use crate::metrics;
use crate::models::{EnrichedPost, Post, SponsoredPost};
use crate::reactions::ReactionStore;
use crate::scoring::EngagementScorer;
use crate::store::{PostQuery, Store};

/// Result of an initial load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    /// Ranked organic posts with sponsored items interleaved
    pub posts: Vec<EnrichedPost>,
    pub has_more: bool,
    /// Positioned after the organic posts of this page
    pub cursor: PaginationCursor,
    /// Sponsored items fetched for this load
    pub sponsored: Vec<SponsoredPost>,
}

/// Builds feed pages from the store
pub struct FeedAssembler {
    store: Arc<dyn Store>,
    reactions: ReactionStore,
    scorer: EngagementScorer,
    config: FeedConfig,
}

impl FeedAssembler {
    pub fn new(store: Arc<dyn Store>, config: FeedConfig) -> Self {
        Self {
            reactions: ReactionStore::new(store.clone()),
            store,
            scorer: EngagementScorer::new(),
            config,
        }
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Active sponsored items by ascending priority. A failed fetch yields none.
    pub async fn fetch_sponsored(&self) -> Vec<SponsoredPost> {
        match self.store.list_active_sponsored().await {
            Ok(ads) => ads,
            Err(e) => {
                warn!("Failed to fetch sponsored posts, continuing without them: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_initial_page(&self, viewer: Option<&str>) -> Result<FeedPage, FeedError> {
        self.fetch_initial_page_at(viewer, Utc::now()).await
    }

    /// Assemble the first page as of `now`: ranked by engagement, sponsored interleaved
    pub async fn fetch_initial_page_at(
        &self,
        viewer: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<FeedPage, FeedError> {
        let sponsored = self.fetch_sponsored().await;
        let organic = self.fetch_first_posts(now).await?;
        let fetched = organic.len();

        let mut ranked = self.enrich(organic, viewer, now).await;
        self.scorer.rank(&mut ranked, now);

        let mut cursor = PaginationCursor::new(self.config.page_size);
        cursor.advance(fetched);

        let posts = interleave(ranked, &sponsored);
        info!(
            "Assembled initial feed page: {} organic, {} sponsored available, has_more={}",
            fetched,
            sponsored.len(),
            cursor.has_more()
        );
        metrics::record_feed_page("initial");

        Ok(FeedPage {
            posts,
            has_more: cursor.has_more(),
            cursor,
            sponsored,
        })
    }

    /// Next reverse-chronological page. No ranking, no sponsored items.
    ///
    /// The cursor only moves when the fetch succeeds.
    pub async fn fetch_next_page(
        &self,
        cursor: &mut PaginationCursor,
        viewer: Option<&str>,
    ) -> Result<Vec<EnrichedPost>, FeedError> {
        if !cursor.has_more() {
            debug!("Cursor exhausted at offset {}, skipping fetch", cursor.offset());
            return Ok(Vec::new());
        }

        let query = PostQuery::page(cursor.offset(), cursor.page_size());
        let rows = self.store.list_posts(&query).await.map_err(|e| {
            warn!("Failed to fetch feed page at offset {}: {}", cursor.offset(), e);
            FeedError::Unavailable(e)
        })?;

        let fetched = rows.len();
        let posts = self.enrich(rows, viewer, Utc::now()).await;
        cursor.advance(fetched);
        metrics::record_feed_page("next");

        debug!("Fetched {} posts, next offset {}", fetched, cursor.offset());
        Ok(posts)
    }

    /// Organic posts for the first page.
    ///
    /// Fresh posts first, then topped up from the most recent ones. A
    /// failing tier is skipped; only when every tier fails is the load an error.
    async fn fetch_first_posts(&self, now: DateTime<Utc>) -> Result<Vec<Post>, FeedError> {
        let page_size = self.config.page_size;
        let tiers = [
            (
                "recent",
                PostQuery::since(now - self.config.recent_window(), self.config.recent_limit),
            ),
            ("latest-wide", PostQuery::latest(page_size * 2)),
            ("latest", PostQuery::latest(page_size)),
        ];

        let mut posts: Vec<Post> = Vec::with_capacity(page_size);
        let mut seen: HashSet<String> = HashSet::new();
        let mut succeeded = 0;
        let mut last_error: Option<StoreError> = None;

        for (tier, query) in tiers {
            if posts.len() >= page_size {
                break;
            }
            match self.store.list_posts(&query).await {
                Ok(batch) => {
                    succeeded += 1;
                    let before = posts.len();
                    for post in batch {
                        if posts.len() >= page_size {
                            break;
                        }
                        if seen.insert(post.id.clone()) {
                            posts.push(post);
                        }
                    }
                    debug!("Tier {} contributed {} posts", tier, posts.len() - before);
                }
                Err(e) => {
                    warn!("Tier {} post query failed: {}", tier, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if succeeded == 0 => Err(FeedError::Unavailable(e)),
            _ => Ok(posts),
        }
    }

    /// Attach aggregates and scores, keeping input order.
    ///
    /// A post whose aggregates cannot be loaded is kept with zeroed stats.
    pub async fn enrich(
        &self,
        posts: Vec<Post>,
        viewer: Option<&str>,
        now: DateTime<Utc>,
    ) -> Vec<EnrichedPost> {
        join_all(posts.into_iter().map(|post| self.enrich_one(post, viewer, now))).await
    }

    async fn enrich_one(&self, post: Post, viewer: Option<&str>, now: DateTime<Utc>) -> EnrichedPost {
        let mut enriched = EnrichedPost::from_post(post);

        let aggregates = futures::try_join!(
            self.reactions.aggregate(&enriched.id, viewer),
            self.store.count_comments(&enriched.id),
            self.store.count_tips(&enriched.id),
        );

        match aggregates {
            Ok(((counts, mine), comments, tips)) => {
                enriched.reactions = counts;
                enriched.user_reactions = mine;
                enriched.comments_count = u32::try_from(comments).unwrap_or(u32::MAX);
                enriched.tip_count = u32::try_from(tips).unwrap_or(u32::MAX);
                enriched.engagement_score = self.scorer.score(&enriched, now);
            }
            Err(e) => {
                warn!("Aggregate fetch failed for post {}, serving zeroed stats: {}", enriched.id, e);
                metrics::record_aggregate_failure();
                enriched.clear_aggregates();
                enriched.engagement_score = 0.0;
            }
        }

        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReactionKind;
    use crate::store::{Fault, InMemoryStore};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn assembler(store: &Arc<InMemoryStore>, page_size: usize) -> FeedAssembler {
        FeedAssembler::new(
            store.clone(),
            FeedConfig {
                page_size,
                recent_window_minutes: 120,
                recent_limit: 5,
            },
        )
    }

    #[tokio::test]
    async fn ranks_first_page_by_engagement() {
        let store = Arc::new(InMemoryStore::new());
        let author = store.seed_user("author").await;
        let quiet = store.seed_post(&author.id, "quiet", now() - Duration::minutes(10)).await;
        let busy = store.seed_post(&author.id, "busy", now() - Duration::minutes(30)).await;
        store.seed_like(&busy.id, "fan-1", ReactionKind::Heart).await;
        store.seed_like(&busy.id, "fan-2", ReactionKind::Heart).await;

        let page = assembler(&store, 10).fetch_initial_page_at(None, now()).await.unwrap();

        let ids: Vec<&str> = page.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![busy.id.as_str(), quiet.id.as_str()]);
        assert_eq!(page.posts[0].reactions.get(ReactionKind::Heart), 2);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn fills_first_page_past_the_recent_window() {
        let store = Arc::new(InMemoryStore::new());
        let author = store.seed_user("author").await;
        for i in 0..4 {
            store.seed_post(&author.id, "old", now() - Duration::days(3 + i)).await;
        }
        store.seed_post(&author.id, "fresh", now() - Duration::minutes(5)).await;

        let page = assembler(&store, 3).fetch_initial_page_at(None, now()).await.unwrap();

        assert_eq!(page.posts.len(), 3);
        assert_eq!(page.posts.iter().filter(|p| p.content == "fresh").count(), 1);
        assert!(page.has_more);
        assert_eq!(page.cursor.offset(), 3);
    }

    #[tokio::test]
    async fn failed_recent_tier_falls_back() {
        let store = Arc::new(InMemoryStore::new());
        let author = store.seed_user("author").await;
        store.seed_post(&author.id, "fresh", now() - Duration::minutes(5)).await;
        store.inject(Fault::ListRecentPosts).await;

        let page = assembler(&store, 10).fetch_initial_page_at(None, now()).await.unwrap();
        assert_eq!(page.posts.len(), 1);
    }

    #[tokio::test]
    async fn every_tier_failing_is_an_error() {
        let store = Arc::new(InMemoryStore::new());
        store.inject(Fault::ListPosts).await;

        let result = assembler(&store, 10).fetch_initial_page_at(None, now()).await;
        assert!(matches!(result, Err(FeedError::Unavailable(_))));
    }

    #[tokio::test]
    async fn sponsored_failure_still_serves_organic() {
        let store = Arc::new(InMemoryStore::new());
        let author = store.seed_user("author").await;
        store.seed_post(&author.id, "gm", now()).await;
        store.seed_sponsored("acme", 1, true).await;
        store.inject(Fault::ListSponsored).await;

        let page = assembler(&store, 10).fetch_initial_page_at(None, now()).await.unwrap();
        assert_eq!(page.posts.len(), 1);
        assert!(page.sponsored.is_empty());
    }

    #[tokio::test]
    async fn viewer_reactions_are_resolved() {
        let store = Arc::new(InMemoryStore::new());
        let viewer = store.seed_user("viewer").await;
        let post = store.seed_post(&viewer.id, "gm", now()).await;
        store.seed_like(&post.id, &viewer.id, ReactionKind::Smiley).await;

        let page = assembler(&store, 10)
            .fetch_initial_page_at(Some(viewer.id.as_str()), now())
            .await
            .unwrap();
        assert!(page.posts[0].user_reactions.contains(&ReactionKind::Smiley));

        let anonymous = assembler(&store, 10).fetch_initial_page_at(None, now()).await.unwrap();
        assert!(anonymous.posts[0].user_reactions.is_empty());
    }

    #[tokio::test]
    async fn failed_next_page_leaves_cursor_in_place() {
        let store = Arc::new(InMemoryStore::new());
        store.inject(Fault::ListPosts).await;
        let mut cursor = PaginationCursor::at(10, 10);

        let result = assembler(&store, 10).fetch_next_page(&mut cursor, None).await;

        assert!(result.is_err());
        assert_eq!(cursor, PaginationCursor::at(10, 10));
    }
}
