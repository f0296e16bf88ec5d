//! Itemsets and support counting.
//!
//! Itemsets are kept sorted so that value equality, subset tests and the
//! Apriori prefix join all work on plain slice comparisons. Support is
//! stored as an exact basket count; fractions are derived on demand, which
//! keeps confidence an exact ratio of two counts.

use crate::basket::{Basket, ItemId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Sorted set of item ids forming one itemset.
pub type Items = SmallVec<[ItemId; 4]>;

/// A frequent itemset with its basket-membership count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSet {
    /// Member ids, sorted ascending, never empty.
    pub items: Items,
    /// Number of baskets containing every member.
    pub count: u64,
}

impl ItemSet {
    pub fn new(items: Items, count: u64) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self { items, count }
    }

    /// Support fraction relative to the basket total.
    pub fn support(&self, basket_total: usize) -> f64 {
        if basket_total == 0 {
            return 0.0;
        }
        self.count as f64 / basket_total as f64
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// True when sorted `items` is a subset of sorted `basket`.
pub fn is_subset(items: &[ItemId], basket: &[ItemId]) -> bool {
    let mut pos = 0;
    for &item in items {
        // Advance through the basket; both sides are sorted.
        loop {
            match basket.get(pos) {
                Some(&b) if b < item => pos += 1,
                Some(&b) if b == item => {
                    pos += 1;
                    break;
                }
                _ => return false,
            }
        }
    }
    true
}

/// Count the baskets containing `items` as a subset.
pub fn count_support<'a, I>(items: &[ItemId], baskets: I) -> u64
where
    I: IntoIterator<Item = &'a Basket>,
{
    baskets
        .into_iter()
        .filter(|basket| is_subset(items, basket))
        .count() as u64
}

/// Every frequent itemset found by one mining run.
///
/// Anti-monotonicity guarantees each subset of a frequent itemset is
/// itself frequent, so the count table can resolve the support of any
/// antecedent or consequent during rule generation without re-scanning
/// the baskets.
#[derive(Debug, Default)]
pub struct FrequentItemsets {
    /// All levels in discovery order: singletons first, then pairs, and so on.
    pub sets: Vec<ItemSet>,
    counts: FxHashMap<Items, u64>,
    basket_total: usize,
}

impl FrequentItemsets {
    pub fn new(basket_total: usize) -> Self {
        Self {
            sets: Vec::new(),
            counts: FxHashMap::default(),
            basket_total,
        }
    }

    /// Record one frequent itemset.
    pub fn push(&mut self, set: ItemSet) {
        self.counts.insert(set.items.clone(), set.count);
        self.sets.push(set);
    }

    /// Basket count of a frequent itemset, `None` for infrequent sets.
    pub fn count_of(&self, items: &[ItemId]) -> Option<u64> {
        self.counts.get(items).copied()
    }

    /// Support fraction of a frequent itemset.
    pub fn support_of(&self, items: &[ItemId]) -> Option<f64> {
        if self.basket_total == 0 {
            return None;
        }
        self.count_of(items)
            .map(|count| count as f64 / self.basket_total as f64)
    }

    /// Denominator of every support fraction in this run.
    pub fn basket_total(&self) -> usize {
        self.basket_total
    }

    /// Length of the largest frequent itemset.
    pub fn max_len(&self) -> usize {
        self.sets.iter().map(ItemSet::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}
