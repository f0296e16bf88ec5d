//! Co-occurrence basket construction.
//!
//! A basket is the unit of "used together": the set of distinct devices one
//! actor operated within one time window. Presence is binary, so repeated
//! use of the same device inside a window contributes one membership.
//! Device names are interned to compact ids once per snapshot; everything
//! downstream works on ids and resolves names only when rendering rules.

use crate::window::{WindowKey, WindowSpec};
use lares_core::record::UsageEvent;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use tracing::debug;

/// Compact identifier for an interned device name.
pub type ItemId = u32;

/// Sorted set of distinct item ids in one basket.
pub type Basket = SmallVec<[ItemId; 8]>;

/// Basket identity: the actor and the floored window start.
pub type BasketKey = (u64, WindowKey);

/// Bidirectional device-name registry.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    name_to_id: FxHashMap<String, ItemId>,
    id_to_name: Vec<String>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device name and return its id.
    /// Returns the existing id if already registered.
    pub fn intern(&mut self, name: &str) -> ItemId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = self.id_to_name.len() as ItemId;
        self.id_to_name.push(name.to_string());
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Look up an id by device name.
    pub fn id_of(&self, name: &str) -> Option<ItemId> {
        self.name_to_id.get(name).copied()
    }

    /// Resolve an id back to its device name.
    ///
    /// Ids handed out by [`intern`](Self::intern) always resolve; indexing
    /// with a foreign id panics.
    pub fn name(&self, id: ItemId) -> &str {
        &self.id_to_name[id as usize]
    }

    /// Number of distinct device names registered.
    pub fn len(&self) -> usize {
        self.id_to_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_name.is_empty()
    }
}

/// All baskets of one snapshot, keyed by `(actor, window)`.
///
/// Keys live in a `BTreeMap`, so iteration order is a deterministic
/// function of basket identity rather than of event arrival order.
#[derive(Debug, Default)]
pub struct BasketTable {
    catalog: ItemCatalog,
    baskets: BTreeMap<BasketKey, Basket>,
}

impl BasketTable {
    /// Bucket a snapshot of usage events into baskets.
    ///
    /// Every event lands in exactly one basket (its actor plus the floored
    /// `start_time`); open events participate like closed ones because
    /// bucketing only reads the start.
    pub fn build(events: &[UsageEvent], windows: &WindowSpec) -> Self {
        let mut table = Self::default();
        for event in events {
            let window = windows.floor(event.start_time);
            let id = table.catalog.intern(&event.device_name);
            let basket = table.baskets.entry((event.actor_id, window)).or_default();
            if let Err(pos) = basket.binary_search(&id) {
                basket.insert(pos, id);
            }
        }
        debug!(
            baskets = table.baskets.len(),
            devices = table.catalog.len(),
            "built basket table"
        );
        table
    }

    /// Number of baskets, the denominator of every support fraction.
    pub fn basket_count(&self) -> usize {
        self.baskets.len()
    }

    /// Number of distinct devices across the snapshot.
    pub fn distinct_devices(&self) -> usize {
        self.catalog.len()
    }

    /// Iterate baskets in deterministic key order.
    pub fn baskets(&self) -> impl Iterator<Item = &Basket> {
        self.baskets.values()
    }

    /// Iterate `(key, basket)` pairs in deterministic key order.
    pub fn entries(&self) -> impl Iterator<Item = (&BasketKey, &Basket)> {
        self.baskets.iter()
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }
}
