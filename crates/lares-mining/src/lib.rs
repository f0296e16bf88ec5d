//! # Lares Mining
//!
//! Usage-pattern mining over smart-home device events.
//!
//! The pipeline turns a raw snapshot of usage events into association
//! rules in four deterministic stages:
//!
//! 1. **Bucketing** ([`window`], [`basket`]): floor each event onto a
//!    fixed time grid and collect the distinct devices each actor used
//!    per window into baskets.
//! 2. **Frequent itemsets** ([`apriori`], [`itemset`]): level-wise Apriori
//!    enumeration with anti-monotone pruning.
//! 3. **Rules** ([`rules`]): antecedent/consequent splits scored by
//!    support, confidence and lift.
//! 4. **Orchestration** ([`engine`]): fetch through the async [`store`]
//!    boundary, then run stages 1-3 synchronously per request.
//!
//! Alongside the miner, [`report`] and [`stats`] provide the aggregation
//! reports (usage frequency, time-of-day histograms, floor-area impact,
//! security summaries, feedback summaries, usage anomalies).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lares_mining::{PatternMiner, store::JsonlStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(JsonlStore::new("usage.jsonl"));
//! let outcome = PatternMiner::new(store).mine().await?;
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! ```

pub mod apriori;
pub mod basket;
pub mod engine;
pub mod error;
pub mod itemset;
pub mod limits;
pub mod report;
pub mod rules;
pub mod stats;
pub mod store;
pub mod window;

pub use basket::{Basket, BasketTable, ItemCatalog, ItemId};
pub use engine::{InsufficientData, PatternMiner, PatternOutcome, RuleFindings};
pub use error::{MiningError, MiningResult};
pub use itemset::{FrequentItemsets, ItemSet};
pub use rules::AssociationRule;
pub use stats::{StdMode, Summary};
pub use store::{JsonlStore, MemoryStore, StoreError, UsageStore};
pub use window::{WindowKey, WindowSpec};
