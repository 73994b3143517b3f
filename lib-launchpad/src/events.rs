//! Launch Registry Events
//!
//! Every committed state change emits an event for downstream indexing.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use lib_types::{Address, Amount, AssetId, Timestamp};

use crate::config::LaunchConfig;

/// Registry events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LaunchEvent {
    /// New asset launched
    Launched {
        asset_id: AssetId,
        creator: Address,
        symbol: String,
        curve_supply: Amount,
        graduation_threshold: Amount,
        timestamp: Timestamp,
    },

    /// Tokens bought from the curve
    Purchased {
        asset_id: AssetId,
        buyer: Address,
        /// Gross base paid, fee included
        base_in: Amount,
        fee: Amount,
        token_out: Amount,
        /// Spot price after the trade
        price: Amount,
        timestamp: Timestamp,
    },

    /// Tokens sold back to the curve
    Sold {
        asset_id: AssetId,
        seller: Address,
        token_in: Amount,
        /// Net base paid out
        base_out: Amount,
        fee: Amount,
        price: Amount,
        timestamp: Timestamp,
    },

    /// Asset reached its graduation threshold
    Graduated {
        asset_id: AssetId,
        final_real_base: Amount,
        final_real_token: Amount,
        market_cap: Amount,
        timestamp: Timestamp,
    },

    /// Platform configuration changed
    ConfigUpdated {
        admin: Address,
        previous: LaunchConfig,
        current: LaunchConfig,
        timestamp: Timestamp,
    },
}

impl LaunchEvent {
    /// Asset the event refers to, if any
    pub fn asset_id(&self) -> Option<&AssetId> {
        match self {
            LaunchEvent::Launched { asset_id, .. } => Some(asset_id),
            LaunchEvent::Purchased { asset_id, .. } => Some(asset_id),
            LaunchEvent::Sold { asset_id, .. } => Some(asset_id),
            LaunchEvent::Graduated { asset_id, .. } => Some(asset_id),
            LaunchEvent::ConfigUpdated { .. } => None,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            LaunchEvent::Launched { timestamp, .. } => *timestamp,
            LaunchEvent::Purchased { timestamp, .. } => *timestamp,
            LaunchEvent::Sold { timestamp, .. } => *timestamp,
            LaunchEvent::Graduated { timestamp, .. } => *timestamp,
            LaunchEvent::ConfigUpdated { timestamp, .. } => *timestamp,
        }
    }

    /// Get event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            LaunchEvent::Launched { .. } => "launched",
            LaunchEvent::Purchased { .. } => "purchased",
            LaunchEvent::Sold { .. } => "sold",
            LaunchEvent::Graduated { .. } => "graduated",
            LaunchEvent::ConfigUpdated { .. } => "config_updated",
        }
    }
}

/// Event indexer interface
///
/// Called after each commit, while the asset's settlement lock is held.
pub trait EventIndexer: Send + Sync {
    /// Index a new event
    fn index_event(&self, event: LaunchEvent);

    /// Get all events for an asset, in emission order
    fn asset_events(&self, asset_id: &AssetId) -> Vec<LaunchEvent>;

    /// Get events of one type (see [`LaunchEvent::event_type`])
    fn events_of_type(&self, event_type: &str) -> Vec<LaunchEvent>;

    fn event_count(&self) -> usize;
}

/// In-memory event indexer for testing
#[derive(Debug, Default)]
pub struct InMemoryEventIndexer {
    events: RwLock<Vec<LaunchEvent>>,
}

impl InMemoryEventIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LaunchEvent> {
        self.events.read().clone()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl EventIndexer for InMemoryEventIndexer {
    fn index_event(&self, event: LaunchEvent) {
        self.events.write().push(event);
    }

    fn asset_events(&self, asset_id: &AssetId) -> Vec<LaunchEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.asset_id() == Some(asset_id))
            .cloned()
            .collect()
    }

    fn events_of_type(&self, event_type: &str) -> Vec<LaunchEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type() == event_type)
            .cloned()
            .collect()
    }

    fn event_count(&self) -> usize {
        self.events.read().len()
    }
}
