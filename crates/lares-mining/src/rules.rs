//! Association-rule generation.
//!
//! Every non-empty proper subset of a frequent itemset of size two or more
//! becomes a candidate antecedent, with the remaining members as the
//! consequent. Confidence is the exact ratio of two basket counts, so a
//! rule at precisely the confidence floor is retained rather than lost to
//! fraction re-rounding.

use crate::basket::ItemCatalog;
use crate::itemset::{FrequentItemsets, Items};
use serde::Serialize;
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::debug;

/// One mined rule, rendered for the reporting layer.
///
/// Device names in `antecedents` and `consequents` are alphabetical and
/// joined with `", "`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule {
    pub antecedents: String,
    pub consequents: String,
    /// Fraction of baskets holding antecedents and consequents together.
    pub support: f64,
    /// `support(rule) / support(antecedents)`.
    pub confidence: f64,
    /// `confidence / support(consequents)`; above 1 means the antecedents
    /// genuinely raise the chance of seeing the consequents.
    pub lift: f64,
}

/// Derive all rules meeting `min_confidence` from the frequent itemsets.
///
/// Results are ordered by descending confidence, then descending lift,
/// then antecedent and consequent labels, which makes the report stable
/// across runs and input orderings.
pub fn generate_rules(
    frequent: &FrequentItemsets,
    catalog: &ItemCatalog,
    min_confidence: f64,
) -> Vec<AssociationRule> {
    let basket_total = frequent.basket_total() as f64;
    let mut rules = Vec::new();
    if frequent.basket_total() == 0 {
        return rules;
    }

    for set in frequent.sets.iter().filter(|s| s.len() >= 2) {
        let k = set.len();
        // Masks 1 .. 2^k-1 exclusive keep both sides non-empty.
        for mask in 1u32..(1u32 << k) - 1 {
            let mut antecedent: Items = SmallVec::new();
            let mut consequent: Items = SmallVec::new();
            for (bit, &item) in set.items.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    antecedent.push(item);
                } else {
                    consequent.push(item);
                }
            }
            // Anti-monotonicity guarantees both halves are themselves
            // frequent, so the lookups cannot miss.
            let Some(antecedent_count) = frequent.count_of(&antecedent) else {
                continue;
            };
            let Some(consequent_count) = frequent.count_of(&consequent) else {
                continue;
            };
            let confidence = set.count as f64 / antecedent_count as f64;
            if confidence < min_confidence {
                continue;
            }
            let lift = confidence * basket_total / consequent_count as f64;
            rules.push(AssociationRule {
                antecedents: label(catalog, &antecedent),
                consequents: label(catalog, &consequent),
                support: set.count as f64 / basket_total,
                confidence,
                lift,
            });
        }
    }

    rules.sort_by(compare_rules);
    debug!(rules = rules.len(), min_confidence, "generated association rules");
    rules
}

fn compare_rules(a: &AssociationRule, b: &AssociationRule) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then(b.lift.total_cmp(&a.lift))
        .then_with(|| a.antecedents.cmp(&b.antecedents))
        .then_with(|| a.consequents.cmp(&b.consequents))
}

/// Alphabetical `", "`-joined device names of an itemset.
fn label(catalog: &ItemCatalog, items: &Items) -> String {
    let mut names: Vec<&str> = items.iter().map(|&id| catalog.name(id)).collect();
    names.sort_unstable();
    names.join(", ")
}
