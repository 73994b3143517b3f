//! Fee and settlement ledger
//!
//! Append-only records consumed by external accounting. The registry writes
//! one entry per launch and per settled trade and never reads them back.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use lib_types::{Address, Amount, AssetId, OperationId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerKind {
    Launch,
    Buy,
    Sell,
}

/// One fee/settlement record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Registry-wide, strictly increasing
    pub sequence: u64,
    pub asset_id: AssetId,
    pub kind: LedgerKind,
    /// Launch fee paid, gross base in (buy) or gross base out (sell)
    pub gross_amount: Amount,
    pub fee_amount: Amount,
    pub fee_recipient: Address,
    pub timestamp: Timestamp,
    pub operation_id: Option<OperationId>,
}

/// Receiver of ledger entries
///
/// Delivery is not verified; implementations must not block for long since
/// entries are recorded while the asset's settlement lock is held.
pub trait LedgerSink: Send + Sync {
    fn record(&self, entry: &LedgerEntry);
}

/// In-memory ledger for testing
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.read().clone()
    }

    pub fn entries_for(&self, asset_id: &AssetId) -> Vec<LedgerEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| &e.asset_id == asset_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Sum of all recorded fees, `None` on overflow
    pub fn total_fees(&self) -> Option<Amount> {
        self.entries
            .read()
            .iter()
            .try_fold(0, |acc: Amount, e| acc.checked_add(e.fee_amount))
    }
}

impl LedgerSink for InMemoryLedger {
    fn record(&self, entry: &LedgerEntry) {
        self.entries.write().push(entry.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sequence: u64, asset: u8, fee: Amount) -> LedgerEntry {
        LedgerEntry {
            sequence,
            asset_id: AssetId::new([asset; 32]),
            kind: LedgerKind::Buy,
            gross_amount: fee * 100,
            fee_amount: fee,
            fee_recipient: Address::new([7; 32]),
            timestamp: 1_700_000_000,
            operation_id: None,
        }
    }

    #[test]
    fn test_in_memory_ledger() {
        let ledger = InMemoryLedger::new();
        assert!(ledger.is_empty());

        ledger.record(&entry(1, 1, 10));
        ledger.record(&entry(2, 2, 20));
        ledger.record(&entry(3, 1, 30));

        assert_eq!(ledger.len(), 3);
        assert_eq!(ledger.total_fees(), Some(60));

        let for_first = ledger.entries_for(&AssetId::new([1; 32]));
        assert_eq!(for_first.len(), 2);
        assert_eq!(for_first[1].sequence, 3);
    }
}
