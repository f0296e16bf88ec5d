//! Request-scoped mining orchestrator.
//!
//! [`PatternMiner`] runs one request end to end: fetch a snapshot through
//! the store boundary, bucket it into baskets, mine frequent itemsets,
//! derive rules. The snapshot fetch is the only await; everything after it
//! is synchronous computation on request-local state, so concurrent
//! requests share nothing but the store handle.

use crate::apriori::mine_frequent;
use crate::basket::BasketTable;
use crate::error::MiningResult;
use crate::limits::DEFAULT_STORE_TIMEOUT;
use crate::rules::{generate_rules, AssociationRule};
use crate::store::{StoreError, UsageStore};
use crate::window::WindowSpec;
use lares_core::params::MiningParams;
use lares_core::record::UsageEvent;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Why a run produced no rules.
///
/// These are expected outcomes of thin or weakly-patterned data, not
/// faults; the request still succeeds and reports the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientData {
    /// Fewer events than the minimum viable count.
    NotEnoughEvents { observed: usize, required: usize },
    /// Baskets never span two distinct devices.
    TooFewDevices { observed: usize },
    /// Nothing reached the support threshold.
    NoFrequentItemsets,
    /// Frequent itemsets existed but no rule met the confidence floor.
    NoQualifyingRules,
}

impl InsufficientData {
    /// Human-readable reason, the `message` field of the wire shape.
    pub fn message(&self) -> String {
        match self {
            InsufficientData::NotEnoughEvents { observed, required } => format!(
                "not enough usage data to mine patterns ({observed} events, need {required})"
            ),
            InsufficientData::TooFewDevices { observed } => format!(
                "usage involves {observed} distinct device(s); patterns need at least 2"
            ),
            InsufficientData::NoFrequentItemsets => {
                "no frequent itemsets met the minimum support".to_string()
            }
            InsufficientData::NoQualifyingRules => {
                "no association rules met the minimum confidence".to_string()
            }
        }
    }
}

impl fmt::Display for InsufficientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl Serialize for InsufficientData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("InsufficientData", 1)?;
        state.serialize_field("message", &self.message())?;
        state.end()
    }
}

/// Rules found by a successful run, with the threshold they were mined at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFindings {
    pub rules: Vec<AssociationRule>,
    pub min_support: f64,
}

/// Outcome of one mining request.
///
/// Serializes to the wire shape the reporting layer emits: either
/// `{"rules": [...], "min_support": ...}` or `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PatternOutcome {
    Rules(RuleFindings),
    Insufficient(InsufficientData),
}

impl PatternOutcome {
    pub fn is_insufficient(&self) -> bool {
        matches!(self, PatternOutcome::Insufficient(_))
    }

    /// The mined rules, empty for insufficient outcomes.
    pub fn rules(&self) -> &[AssociationRule] {
        match self {
            PatternOutcome::Rules(findings) => &findings.rules,
            PatternOutcome::Insufficient(_) => &[],
        }
    }
}

fn insufficient(reason: InsufficientData) -> MiningResult<PatternOutcome> {
    warn!(%reason, "mining run ended without rules");
    Ok(PatternOutcome::Insufficient(reason))
}

/// One-request-at-a-time miner over a shared store handle.
///
/// Cheap to clone per request; holds no snapshot state of its own.
#[derive(Clone)]
pub struct PatternMiner {
    store: Arc<dyn UsageStore>,
    params: MiningParams,
    store_timeout: Duration,
}

impl PatternMiner {
    pub fn new(store: Arc<dyn UsageStore>) -> Self {
        Self {
            store,
            params: MiningParams::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_params(mut self, params: MiningParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn params(&self) -> &MiningParams {
        &self.params
    }

    /// Run one mining request end to end.
    ///
    /// # Errors
    ///
    /// Fails on invalid parameters, an unreachable or timed-out store, or
    /// a snapshot that blows the enumeration budget. Thin data is not an
    /// error; it resolves to [`PatternOutcome::Insufficient`].
    pub async fn mine(&self) -> MiningResult<PatternOutcome> {
        self.params.validate()?;
        let events = self.fetch_snapshot().await?;
        info!(events = events.len(), "fetched usage snapshot");
        self.mine_snapshot(&events)
    }

    /// Pure computation over an already-fetched snapshot.
    pub fn mine_snapshot(&self, events: &[UsageEvent]) -> MiningResult<PatternOutcome> {
        self.params.validate()?;
        let windows = WindowSpec::new(self.params.granularity())?;

        if events.len() < self.params.min_events {
            return insufficient(InsufficientData::NotEnoughEvents {
                observed: events.len(),
                required: self.params.min_events,
            });
        }

        let table = BasketTable::build(events, &windows);
        if table.distinct_devices() < 2 {
            return insufficient(InsufficientData::TooFewDevices {
                observed: table.distinct_devices(),
            });
        }

        let frequent = mine_frequent(&table, self.params.min_support)?;
        if frequent.is_empty() {
            return insufficient(InsufficientData::NoFrequentItemsets);
        }

        let rules = generate_rules(&frequent, table.catalog(), self.params.min_confidence);
        if rules.is_empty() {
            return insufficient(InsufficientData::NoQualifyingRules);
        }

        info!(
            baskets = table.basket_count(),
            itemsets = frequent.len(),
            rules = rules.len(),
            "mining run complete"
        );
        Ok(PatternOutcome::Rules(RuleFindings {
            rules,
            min_support: self.params.min_support,
        }))
    }

    async fn fetch_snapshot(&self) -> Result<Vec<UsageEvent>, StoreError> {
        match tokio::time::timeout(self.store_timeout, self.store.fetch_usage()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "snapshot fetch exceeded {:?}",
                self.store_timeout
            ))),
        }
    }
}
