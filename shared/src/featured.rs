//! Featured rotation
//!
//! At most [`MAX_FEATURED_RIGS`] rigs are featured at once. Featuring one
//! more evicts the rig that has been featured the longest (smallest
//! `featured_order`).

use crate::models::Rig;

/// Featured slots on the home page
pub const MAX_FEATURED_RIGS: usize = 3;

/// Outcome of a featured toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedToggle {
    /// New featured state of the toggled rig
    pub featured: bool,
    /// Rigs that lost their slot, oldest first
    pub evicted: Vec<String>,
}

/// Currently featured rigs, oldest first.
pub fn featured_rigs(rigs: &[Rig]) -> Vec<&Rig> {
    let mut featured: Vec<&Rig> = rigs.iter().filter(|r| r.featured).collect();
    featured.sort_by_key(|r| r.featured_order.unwrap_or(0));
    featured
}

/// Flip the featured flag of rig `id`, evicting the oldest featured rigs
/// when the cap would be exceeded.
///
/// The new `featured_order` is `now_ms`, bumped past every existing order so
/// that toggles within the same millisecond still sort. Returns `None` when
/// `id` is unknown.
pub fn toggle_featured(rigs: &mut [Rig], id: &str, now_ms: i64) -> Option<FeaturedToggle> {
    let target = rigs.iter().position(|r| r.id == id)?;

    if rigs[target].featured {
        rigs[target].featured = false;
        rigs[target].featured_order = None;
        return Some(FeaturedToggle {
            featured: false,
            evicted: Vec::new(),
        });
    }

    let mut featured: Vec<usize> = (0..rigs.len()).filter(|&i| rigs[i].featured).collect();
    featured.sort_by_key(|&i| rigs[i].featured_order.unwrap_or(0));

    let excess = (featured.len() + 1).saturating_sub(MAX_FEATURED_RIGS);
    let mut evicted = Vec::with_capacity(excess);
    for &i in featured.iter().take(excess) {
        rigs[i].featured = false;
        rigs[i].featured_order = None;
        evicted.push(rigs[i].id.clone());
    }

    let newest = rigs.iter().filter_map(|r| r.featured_order).max();
    let order = match newest {
        Some(newest) if newest >= now_ms => newest + 1,
        _ => now_ms,
    };
    rigs[target].featured = true;
    rigs[target].featured_order = Some(order);

    Some(FeaturedToggle {
        featured: true,
        evicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rig(id: &str, featured_order: Option<i64>) -> Rig {
        serde_json::from_value(json!({
            "id": id,
            "title": id,
            "featured": featured_order.is_some(),
            "featuredOrder": featured_order,
        }))
        .unwrap()
    }

    fn featured_ids(rigs: &[Rig]) -> Vec<String> {
        featured_rigs(rigs).into_iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_fourth_feature_evicts_oldest() {
        let mut rigs = vec![
            rig("b", Some(200)),
            rig("a", Some(100)),
            rig("c", Some(300)),
            rig("d", None),
        ];
        let outcome = toggle_featured(&mut rigs, "d", 1_000).unwrap();
        assert!(outcome.featured);
        assert_eq!(outcome.evicted, vec!["a".to_string()]);
        assert_eq!(featured_ids(&rigs), vec!["b", "c", "d"]);
        assert!(rigs.iter().find(|r| r.id == "a").unwrap().featured_order.is_none());
    }

    #[test]
    fn test_sequential_toggles_keep_three() {
        let mut rigs = vec![rig("a", None), rig("b", None), rig("c", None), rig("d", None)];
        for id in ["a", "b", "c", "d"] {
            // Same clock reading for every toggle
            toggle_featured(&mut rigs, id, 42).unwrap();
            assert!(featured_rigs(&rigs).len() <= MAX_FEATURED_RIGS);
        }
        assert_eq!(featured_ids(&rigs), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_unfeature_clears_order() {
        let mut rigs = vec![rig("a", Some(10))];
        let outcome = toggle_featured(&mut rigs, "a", 50).unwrap();
        assert!(!outcome.featured);
        assert!(!rigs[0].featured);
        assert_eq!(rigs[0].featured_order, None);
    }

    #[test]
    fn test_over_cap_state_is_repaired() {
        let mut rigs = vec![
            rig("a", Some(1)),
            rig("b", Some(2)),
            rig("c", Some(3)),
            rig("d", Some(4)),
            rig("e", None),
        ];
        let outcome = toggle_featured(&mut rigs, "e", 100).unwrap();
        assert_eq!(outcome.evicted, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(featured_ids(&rigs), vec!["c", "d", "e"]);
    }

    #[test]
    fn test_unknown_id() {
        let mut rigs = vec![rig("a", None)];
        assert!(toggle_featured(&mut rigs, "zzz", 1).is_none());
    }
}
