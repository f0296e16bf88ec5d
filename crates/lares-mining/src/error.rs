//! Engine error taxonomy.

use crate::store::StoreError;
use lares_core::error::ConfigError;
use thiserror::Error;

/// A fault that aborts a mining request.
///
/// Expected no-result conditions (too few events, too few devices, nothing
/// met a threshold) are not faults. They surface as a successful
/// [`PatternOutcome::Insufficient`](crate::engine::PatternOutcome) so
/// callers can distinguish "nothing to report" from "the run broke".
#[derive(Debug, Error)]
pub enum MiningError {
    /// Caller-supplied parameters failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The snapshot could not be fetched.
    #[error(transparent)]
    Upstream(#[from] StoreError),

    /// A combinatorial stage outgrew its resource limit.
    #[error("{stage} exceeded its budget: {size} (limit {limit})")]
    BudgetExceeded {
        stage: &'static str,
        size: usize,
        limit: usize,
    },
}

pub type MiningResult<T> = Result<T, MiningError>;
