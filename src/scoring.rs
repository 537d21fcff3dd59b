// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

//! Engagement ranking for the first feed page.

use chrono::{DateTime, Utc};

use crate::models::EnrichedPost;

const REACTION_WEIGHT: f64 = 2.0;
const COMMENT_WEIGHT: f64 = 3.0;
const TIP_WEIGHT: f64 = 5.0;
/// Hours over which recency decays linearly to the floor
const DECAY_HOURS: f64 = 24.0;
/// Old posts keep this share of their engagement weight
const RECENCY_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementScorer;

impl EngagementScorer {
    pub fn new() -> Self {
        Self
    }

    /// Weighted engagement, decayed by age. Pure in `(post, now)`.
    pub fn score(&self, post: &EnrichedPost, now: DateTime<Utc>) -> f64 {
        let total_reactions = post.reactions.total() as f64;
        let engagement = total_reactions * REACTION_WEIGHT
            + post.comments_count as f64 * COMMENT_WEIGHT
            + post.tip_count as f64 * TIP_WEIGHT;

        engagement * recency_multiplier(post.created_at, now)
    }

    /// Score every post and sort descending. Ties keep their fetch order.
    pub fn rank(&self, posts: &mut [EnrichedPost], now: DateTime<Utc>) {
        for post in posts.iter_mut() {
            post.engagement_score = self.score(post, now);
        }
        posts.sort_by(|a, b| b.engagement_score.total_cmp(&a.engagement_score));
    }
}

fn recency_multiplier(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    // Future-dated rows (clock skew) count as brand new
    let age_ms = (now - created_at).num_milliseconds().max(0);
    let hours = age_ms as f64 / 3_600_000.0;
    (1.0 - hours / DECAY_HOURS).max(RECENCY_FLOOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, ReactionKind};
    use chrono::{Duration, TimeZone};

    fn post(id: &str, created_at: DateTime<Utc>) -> EnrichedPost {
        EnrichedPost::from_post(Post {
            id: id.into(),
            user_id: "author".into(),
            content: format!("post {}", id),
            twitter_embed: None,
            website: None,
            facebook: None,
            telegram: None,
            created_at,
        })
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_post_scores_full_weight() {
        let mut p = post("a", now());
        p.reactions.increment(ReactionKind::Heart);
        p.reactions.increment(ReactionKind::Smiley);
        p.comments_count = 1;
        p.tip_count = 1;

        // (2*2 + 1*3 + 1*5) * 1.0
        assert_eq!(EngagementScorer.score(&p, now()), 12.0);
    }

    #[test]
    fn recency_decays_linearly_and_floors() {
        let mut half = post("a", now() - Duration::hours(12));
        half.comments_count = 2;
        assert!((EngagementScorer.score(&half, now()) - 3.0).abs() < 1e-9);

        let mut old = post("b", now() - Duration::days(30));
        old.comments_count = 2;
        assert!((EngagementScorer.score(&old, now()) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn future_posts_are_not_boosted() {
        let mut p = post("a", now() + Duration::hours(3));
        p.tip_count = 1;
        assert_eq!(EngagementScorer.score(&p, now()), 5.0);
    }

    #[test]
    fn score_is_deterministic() {
        let mut p = post("a", now() - Duration::minutes(95));
        p.reactions.increment(ReactionKind::ThumbsUp);
        p.comments_count = 4;

        let first = EngagementScorer.score(&p, now());
        for _ in 0..10 {
            assert_eq!(EngagementScorer.score(&p, now()).to_bits(), first.to_bits());
        }
    }

    #[test]
    fn rank_sorts_descending_and_keeps_ties_stable() {
        let mut quiet_a = post("quiet-a", now());
        let mut busy = post("busy", now());
        let mut quiet_b = post("quiet-b", now());
        quiet_a.comments_count = 1;
        busy.comments_count = 5;
        quiet_b.comments_count = 1;

        let mut posts = vec![quiet_a, busy, quiet_b];
        EngagementScorer.rank(&mut posts, now());

        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["busy", "quiet-a", "quiet-b"]);
        for pair in posts.windows(2) {
            assert!(pair[0].engagement_score >= pair[1].engagement_score);
        }
    }
}
