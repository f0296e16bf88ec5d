//! Resource limits bounding a mining run.
//!
//! Candidate enumeration grows combinatorially with the number of distinct
//! devices in a snapshot. These constants turn a pathological snapshot into
//! a descriptive fault instead of an unbounded loop; the engine reports
//! [`MiningError::BudgetExceeded`](crate::error::MiningError) when one is hit.

use std::time::Duration;

/// Maximum candidate itemsets generated at any single Apriori level.
/// The join step fails before counting supports when it would exceed this.
pub const MAX_CANDIDATES_PER_LEVEL: usize = 250_000;

/// Maximum itemset length the miner will extend to.
/// Rule generation enumerates every antecedent subset (2^k per itemset),
/// so depth stays well below the subset-mask width.
pub const MAX_ITEMSET_LEN: usize = 20;

/// Default deadline for the snapshot fetch, the only blocking stage of a
/// mining request. Everything downstream is pure computation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(30);
