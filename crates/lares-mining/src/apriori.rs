//! Level-wise frequent-itemset mining.
//!
//! Based on "Fast Algorithms for Mining Association Rules"
//! (Agrawal & Srikant, VLDB 1994).
//!
//! Level k candidates are joins of two frequent (k-1)-itemsets sharing a
//! (k-2)-prefix, pruned by the anti-monotonicity of support: a candidate
//! with any infrequent (k-1)-subset cannot itself be frequent. Survivors
//! are counted against the baskets and seed the next level. The loop
//! terminates when a level yields no survivors or the itemset length
//! reaches the number of distinct devices.

use crate::basket::{BasketTable, ItemId};
use crate::error::{MiningError, MiningResult};
use crate::itemset::{count_support, FrequentItemsets, ItemSet, Items};
use crate::limits::{MAX_CANDIDATES_PER_LEVEL, MAX_ITEMSET_LEN};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

/// Mine all frequent itemsets of the basket table.
///
/// `min_support` is a fraction of the basket total; an itemset is frequent
/// when its basket count reaches `ceil(min_support * basket_total)`.
/// Comparing integer counts keeps the threshold exact for every basket
/// total, where comparing recomputed fractions would wobble at the edge.
///
/// # Errors
///
/// Returns [`MiningError::BudgetExceeded`] when candidate generation
/// outgrows [`MAX_CANDIDATES_PER_LEVEL`] or extends past
/// [`MAX_ITEMSET_LEN`]. An empty table mines successfully to an empty
/// result.
pub fn mine_frequent(table: &BasketTable, min_support: f64) -> MiningResult<FrequentItemsets> {
    let basket_total = table.basket_count();
    let mut frequent = FrequentItemsets::new(basket_total);
    if basket_total == 0 {
        return Ok(frequent);
    }
    let min_count = min_count_for(min_support, basket_total);

    // Level 1: one scan over the baskets.
    let mut singleton_counts: FxHashMap<ItemId, u64> = FxHashMap::default();
    for basket in table.baskets() {
        for &id in basket.iter() {
            *singleton_counts.entry(id).or_insert(0) += 1;
        }
    }
    let mut level: Vec<Items> = Vec::new();
    let mut ids: Vec<ItemId> = singleton_counts.keys().copied().collect();
    ids.sort_unstable();
    for id in ids {
        let count = singleton_counts[&id];
        if count >= min_count {
            let items: Items = std::iter::once(id).collect();
            frequent.push(ItemSet::new(items.clone(), count));
            level.push(items);
        }
    }
    debug!(
        level = 1,
        candidates = singleton_counts.len(),
        frequent = level.len(),
        "apriori level complete"
    );

    let device_total = table.distinct_devices();
    let mut k = 2;
    while !level.is_empty() && k <= device_total {
        if k > MAX_ITEMSET_LEN {
            return Err(MiningError::BudgetExceeded {
                stage: "itemset extension",
                size: k,
                limit: MAX_ITEMSET_LEN,
            });
        }
        let candidates = join_level(&level, k)?;
        let candidate_total = candidates.len();
        let prev: FxHashSet<&Items> = level.iter().collect();
        let mut next_level: Vec<Items> = Vec::new();
        for candidate in candidates {
            if !all_subsets_frequent(&candidate, &prev) {
                continue;
            }
            let count = count_support(&candidate, table.baskets());
            if count >= min_count {
                frequent.push(ItemSet::new(candidate.clone(), count));
                next_level.push(candidate);
            }
        }
        debug!(
            level = k,
            candidates = candidate_total,
            frequent = next_level.len(),
            "apriori level complete"
        );
        level = next_level;
        k += 1;
    }
    Ok(frequent)
}

/// Smallest basket count satisfying `count / total >= min_support`.
///
/// The epsilon absorbs representation error in products like
/// `0.7 * 20 = 13.999999999999998` without admitting genuinely
/// under-threshold counts. Never less than one: a frequent itemset must
/// occur.
fn min_count_for(min_support: f64, basket_total: usize) -> u64 {
    ((min_support * basket_total as f64) - 1e-9).ceil().max(1.0) as u64
}

/// Join frequent (k-1)-itemsets into level-k candidates.
///
/// The level is sorted lexicographically, so itemsets sharing a
/// (k-2)-prefix are adjacent and the two differing last members arrive in
/// ascending order; appending the larger one yields a sorted candidate
/// without re-sorting.
fn join_level(level: &[Items], k: usize) -> MiningResult<Vec<Items>> {
    let prefix_len = k - 2;
    let mut candidates: Vec<Items> = Vec::new();
    for (i, left) in level.iter().enumerate() {
        for right in &level[i + 1..] {
            if left[..prefix_len] != right[..prefix_len] {
                break;
            }
            let mut candidate = left.clone();
            candidate.push(right[prefix_len]);
            candidates.push(candidate);
            if candidates.len() > MAX_CANDIDATES_PER_LEVEL {
                return Err(MiningError::BudgetExceeded {
                    stage: "candidate generation",
                    size: candidates.len(),
                    limit: MAX_CANDIDATES_PER_LEVEL,
                });
            }
        }
    }
    Ok(candidates)
}

/// Anti-monotone prune: every (k-1)-subset must be frequent.
fn all_subsets_frequent(candidate: &Items, prev: &FxHashSet<&Items>) -> bool {
    let mut subset: Items = Items::with_capacity(candidate.len() - 1);
    for skip in 0..candidate.len() {
        subset.clear();
        for (idx, &item) in candidate.iter().enumerate() {
            if idx != skip {
                subset.push(item);
            }
        }
        if !prev.contains(&subset) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basket::BasketTable;
    use crate::window::WindowSpec;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use lares_core::record::UsageEvent;
    use smallvec::smallvec;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    /// One basket per inner slice: basket i holds the named devices, all
    /// used by actor 1 inside window i.
    fn table_from(baskets: &[&[&str]]) -> BasketTable {
        let spec = WindowSpec::quarter_hour();
        let mut events = Vec::new();
        let mut usage_id = 0;
        for (i, names) in baskets.iter().enumerate() {
            let start = base() + Duration::minutes(15 * i as i64);
            for name in names.iter() {
                usage_id += 1;
                events.push(UsageEvent::new(usage_id, 0, 1, *name, start));
            }
        }
        BasketTable::build(&events, &spec)
    }

    fn named_count(table: &BasketTable, frequent: &FrequentItemsets, names: &[&str]) -> Option<u64> {
        let mut items: Items = names
            .iter()
            .map(|n| table.catalog().id_of(n).unwrap())
            .collect();
        items.sort_unstable();
        frequent.count_of(&items)
    }

    // ========================================================================
    // Threshold arithmetic
    // ========================================================================

    #[test]
    fn min_count_rounds_up_exactly() {
        assert_eq!(min_count_for(0.5, 20), 10);
        assert_eq!(min_count_for(0.7, 20), 14);
        assert_eq!(min_count_for(0.1, 10), 1);
        assert_eq!(min_count_for(0.34, 3), 2);
        assert_eq!(min_count_for(1.0, 7), 7);
        assert_eq!(min_count_for(0.001, 5), 1);
    }

    // ========================================================================
    // Join and prune
    // ========================================================================

    #[test]
    fn join_pairs_singletons() {
        let level: Vec<Items> = vec![smallvec![0], smallvec![1], smallvec![2]];
        let candidates = join_level(&level, 2).unwrap();
        assert_eq!(
            candidates,
            vec![
                Items::from_slice(&[0, 1]),
                Items::from_slice(&[0, 2]),
                Items::from_slice(&[1, 2])
            ]
        );
    }

    #[test]
    fn join_requires_shared_prefix() {
        let level: Vec<Items> = vec![smallvec![0, 1], smallvec![0, 2], smallvec![1, 2]];
        let candidates = join_level(&level, 3).unwrap();
        assert_eq!(candidates, vec![Items::from_slice(&[0, 1, 2])]);
    }

    #[test]
    fn prune_drops_candidate_with_infrequent_subset() {
        let level: Vec<Items> = vec![smallvec![0, 1], smallvec![0, 2]];
        let prev: FxHashSet<&Items> = level.iter().collect();
        // {1, 2} is missing from the previous level.
        let candidate: Items = smallvec![0, 1, 2];
        assert!(!all_subsets_frequent(&candidate, &prev));
    }

    // ========================================================================
    // End-to-end mining
    // ========================================================================

    #[test]
    fn empty_table_mines_to_empty_result() {
        let table = table_from(&[]);
        let frequent = mine_frequent(&table, 0.5).unwrap();
        assert!(frequent.is_empty());
    }

    #[test]
    fn pair_support_is_counted_across_baskets() {
        // 12 of 20 baskets hold {A, B}; the rest hold {C, D}.
        let mut baskets: Vec<&[&str]> = vec![&["A", "B"]; 12];
        baskets.extend(std::iter::repeat(&["C", "D"] as &[&str]).take(8));
        let table = table_from(&baskets);
        assert_eq!(table.basket_count(), 20);

        let frequent = mine_frequent(&table, 0.5).unwrap();
        assert_eq!(named_count(&table, &frequent, &["A", "B"]), Some(12));
        assert_eq!(named_count(&table, &frequent, &["A"]), Some(12));
        assert_eq!(named_count(&table, &frequent, &["C", "D"]), None);
        assert_eq!(named_count(&table, &frequent, &["C"]), None);
    }

    #[test]
    fn raising_support_excludes_the_pair() {
        let mut baskets: Vec<&[&str]> = vec![&["A", "B"]; 12];
        baskets.extend(std::iter::repeat(&["C", "D"] as &[&str]).take(8));
        let table = table_from(&baskets);

        let frequent = mine_frequent(&table, 0.7).unwrap();
        assert_eq!(named_count(&table, &frequent, &["A", "B"]), None);
        assert!(frequent.is_empty(), "0.6 support misses a 0.7 threshold");
    }

    #[test]
    fn triple_survives_when_all_subsets_do() {
        let baskets: Vec<&[&str]> = vec![
            &["A", "B", "C"],
            &["A", "B", "C"],
            &["A", "B", "C"],
            &["A", "B"],
            &["D"],
        ];
        let table = table_from(&baskets);
        let frequent = mine_frequent(&table, 0.6).unwrap();
        assert_eq!(named_count(&table, &frequent, &["A", "B", "C"]), Some(3));
        assert_eq!(named_count(&table, &frequent, &["A", "B"]), Some(4));
        assert_eq!(named_count(&table, &frequent, &["D"]), None);
    }

    #[test]
    fn every_subset_of_a_frequent_set_is_recorded() {
        let baskets: Vec<&[&str]> = vec![&["A", "B", "C", "D"]; 6];
        let table = table_from(&baskets);
        let frequent = mine_frequent(&table, 0.5).unwrap();
        // 4 singletons + 6 pairs + 4 triples + 1 quad.
        assert_eq!(frequent.len(), 15);
        assert_eq!(frequent.max_len(), 4);
        for set in &frequent.sets {
            assert_eq!(set.count, 6);
        }
    }

    #[test]
    fn mining_result_is_independent_of_event_order() {
        let baskets: Vec<&[&str]> = vec![
            &["A", "B"],
            &["B", "C"],
            &["A", "B", "C"],
            &["A"],
            &["B"],
        ];
        let table = table_from(&baskets);
        let reversed = table_from(&baskets.iter().rev().copied().collect::<Vec<_>>());

        let a = mine_frequent(&table, 0.4).unwrap();
        let b = mine_frequent(&reversed, 0.4).unwrap();
        assert_eq!(a.len(), b.len());
        for set in &a.sets {
            let names: Vec<&str> = set.items.iter().map(|&id| table.catalog().name(id)).collect();
            assert_eq!(named_count(&reversed, &b, &names), Some(set.count));
        }
    }
}
