// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use crate::models::{EnrichedPost, SponsoredPost};

/// Organic posts placed after each sponsored slot
const ORGANIC_PER_SPONSORED: usize = 2;

/// Merge sponsored items into a ranked organic page.
///
/// Layout: the first organic post, then `[sponsored, organic, organic]`
/// while both streams last, then whatever organic posts remain. Leftover
/// sponsored items are dropped. Without sponsored items the organic order
/// is returned untouched.
pub fn interleave(organic: Vec<EnrichedPost>, sponsored: &[SponsoredPost]) -> Vec<EnrichedPost> {
    if sponsored.is_empty() {
        return organic;
    }

    let mut result = Vec::with_capacity(organic.len() + sponsored.len());
    let mut organic = organic.into_iter().peekable();
    let mut ads = sponsored.iter();

    if let Some(first) = organic.next() {
        result.push(first);
    }

    while organic.peek().is_some() {
        let Some(ad) = ads.next() else { break };
        result.push(EnrichedPost::from_sponsored(ad));
        result.extend(organic.by_ref().take(ORGANIC_PER_SPONSORED));
    }

    result.extend(organic);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Post;
    use chrono::Utc;

    fn organic(n: usize) -> Vec<EnrichedPost> {
        (0..n)
            .map(|i| {
                EnrichedPost::from_post(Post {
                    id: format!("o{}", i),
                    user_id: "author".into(),
                    content: String::new(),
                    twitter_embed: None,
                    website: None,
                    facebook: None,
                    telegram: None,
                    created_at: Utc::now(),
                })
            })
            .collect()
    }

    fn ads(n: usize) -> Vec<SponsoredPost> {
        (0..n)
            .map(|i| SponsoredPost {
                id: format!("{}", i),
                content: "ad".into(),
                twitter_embed: None,
                website: None,
                facebook: None,
                telegram: None,
                sponsor_name: format!("sponsor {}", i),
                priority: i as i32,
                is_active: true,
                created_at: Utc::now(),
            })
            .collect()
    }

    fn layout(feed: &[EnrichedPost]) -> String {
        feed.iter().map(|p| if p.is_sponsored { 'S' } else { 'O' }).collect()
    }

    #[test]
    fn seven_organic_two_sponsored() {
        let feed = interleave(organic(7), &ads(2));

        assert_eq!(feed.len(), 9);
        let organic_positions: Vec<usize> = feed
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_sponsored)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(organic_positions, vec![0, 2, 3, 5, 6, 7, 8]);
        assert_eq!(layout(&feed), "OSOOSOOOO");

        let ids: Vec<&str> = feed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["o0", "sponsored-0", "o1", "o2", "sponsored-1", "o3", "o4", "o5", "o6"]
        );
    }

    #[test]
    fn no_sponsored_keeps_ranking() {
        let ranked = organic(4);
        assert_eq!(interleave(ranked.clone(), &[]), ranked);
    }

    #[test]
    fn surplus_sponsored_items_are_dropped() {
        assert_eq!(layout(&interleave(organic(3), &ads(5))), "OSOO");
        assert_eq!(layout(&interleave(organic(1), &ads(2))), "O");
        assert!(interleave(Vec::new(), &ads(2)).is_empty());
    }

    #[test]
    fn short_tail_after_last_sponsored() {
        assert_eq!(layout(&interleave(organic(4), &ads(3))), "OSOOSO");
    }
}
