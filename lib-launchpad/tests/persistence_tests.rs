//! Persistence Tests
//!
//! Registry state written through a sled store survives a reopen.

use std::sync::Arc;

use lib_curve::SCALE;
use lib_launchpad::{
    AssetStore, InMemoryLedger, LaunchConfig, LaunchError, LaunchParams, LaunchRegistry,
    Lifecycle, SledAssetStore,
};
use lib_types::Address;

const ADMIN: Address = Address::new([0xAA; 32]);
const CREATOR: Address = Address::new([0x01; 32]);
const TRADER: Address = Address::new([0x02; 32]);
const T0: u64 = 1_700_000_000;

fn open(path: &std::path::Path) -> LaunchRegistry {
    let store = SledAssetStore::open(path).unwrap();
    LaunchRegistry::open(LaunchConfig::default(), ADMIN, Arc::new(store)).unwrap()
}

fn params(symbol: &str) -> LaunchParams {
    LaunchParams::new("Persisted", symbol, "ipfs://persisted", 1_000_000_000 * SCALE)
}

#[test]
fn test_assets_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (active_id, graduated_id, before_stats, last_sequence) = {
        let registry = open(dir.path());
        let active = registry.launch(params("KEEP"), CREATOR, SCALE / 100, T0).unwrap();
        let graduated = registry.launch(params("GRAD"), CREATOR, SCALE / 100, T0).unwrap();

        registry.buy(&active.asset_id, TRADER, 3 * SCALE, 0, T0 + 1).unwrap();
        let fill = registry.buy(&graduated.asset_id, TRADER, 20 * SCALE, 0, T0 + 2).unwrap();
        assert!(fill.graduated());

        registry.flush().unwrap();
        (
            active.asset_id,
            graduated.asset_id,
            registry.stats().unwrap(),
            fill.ledger_sequence,
        )
    };

    let ledger = Arc::new(InMemoryLedger::new());
    let registry = open(dir.path()).with_ledger(ledger.clone());
    assert_eq!(registry.asset_count(), 2);
    assert_eq!(registry.stats().unwrap(), before_stats);

    let graduated = registry.asset(&graduated_id).unwrap();
    assert_eq!(graduated.lifecycle, Lifecycle::Graduated);
    assert_eq!(graduated.graduated_at(), Some(T0 + 2));
    assert_eq!(
        registry.buy(&graduated_id, TRADER, SCALE, 0, T0 + 3),
        Err(LaunchError::TradingClosed(graduated_id))
    );

    // Trading resumes and ledger sequences keep increasing
    let fill = registry.buy(&active_id, TRADER, SCALE, 0, T0 + 4).unwrap();
    assert!(fill.ledger_sequence > last_sequence);
    assert_eq!(ledger.len(), 1);

    // Launch uniqueness also survives
    assert_eq!(
        registry.launch(params("KEEP"), CREATOR, SCALE / 100, T0),
        Err(LaunchError::DuplicateAsset(active_id))
    );
}

#[test]
fn test_every_settlement_is_written_through() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledAssetStore::open(dir.path()).unwrap());
    let registry = LaunchRegistry::open(LaunchConfig::default(), ADMIN, store.clone()).unwrap();

    let asset = registry.launch(params("WRIT"), CREATOR, SCALE / 100, T0).unwrap();
    assert_eq!(store.get_asset(&asset.asset_id).unwrap(), Some(asset.clone()));

    let fill = registry.buy(&asset.asset_id, TRADER, SCALE, 0, T0).unwrap();
    let stored = store.get_asset(&asset.asset_id).unwrap().unwrap();
    assert_eq!(stored, registry.asset(&asset.asset_id).unwrap());
    assert_eq!(stored.curve.sold_token, fill.token_amount);
    assert_eq!(stored.last_sequence, fill.ledger_sequence);

    // Rejected trades leave the stored row alone
    assert!(registry.buy(&asset.asset_id, TRADER, SCALE, u128::MAX, T0).is_err());
    assert_eq!(store.get_asset(&asset.asset_id).unwrap(), Some(stored));
}
