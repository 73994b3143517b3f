//! Concurrency Tests
//!
//! Settlements on one asset linearize; settlements on different assets run
//! side by side; `settle_once` mutates once per operation id under contention.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use lib_curve::SCALE;
use lib_launchpad::{
    InMemoryLedger, LaunchConfig, LaunchParams, LaunchRegistry, SettlementResult, TradeOrder,
};
use lib_types::{Address, AssetId, OperationId};

const ADMIN: Address = Address::new([0xAA; 32]);
const TREASURY: Address = Address::new([0xFE; 32]);
const T0: u64 = 1_700_000_000;

fn registry() -> (Arc<LaunchRegistry>, Arc<InMemoryLedger>) {
    let ledger = Arc::new(InMemoryLedger::new());
    let registry = LaunchRegistry::new(LaunchConfig::with_fee_recipient(TREASURY), ADMIN)
        .unwrap()
        .with_ledger(ledger.clone());
    (Arc::new(registry), ledger)
}

fn launch(registry: &LaunchRegistry, creator: u8, symbol: &str) -> AssetId {
    // High threshold so nothing graduates mid-test
    let params = LaunchParams::new("Stress", symbol, "ipfs://stress", 1_000_000_000 * SCALE)
        .with_graduation_threshold(10_000 * SCALE);
    registry
        .launch(params, Address::new([creator; 32]), SCALE / 100, T0)
        .unwrap()
        .asset_id
}

#[test]
fn test_concurrent_buys_on_one_asset_linearize() {
    let (registry, ledger) = registry();
    let id = launch(&registry, 1, "ONE");

    let handles: Vec<_> = (0..8u8)
        .map(|t| {
            let registry = registry.clone();
            thread::spawn(move || {
                let trader = Address::new([t + 10; 32]);
                (0..25)
                    .map(|i| {
                        registry
                            .buy(&id, trader, SCALE / 20 + i as u128, 0, T0 + i)
                            .unwrap()
                    })
                    .collect::<Vec<SettlementResult>>()
            })
        })
        .collect();

    let results: Vec<SettlementResult> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(results.len(), 200);

    let asset = registry.asset(&id).unwrap();
    let base_used: u128 = results.iter().map(|r| r.base_amount).sum();
    let tokens_out: u128 = results.iter().map(|r| r.token_amount).sum();
    let fees: u128 = results.iter().map(|r| r.fee).sum();

    assert_eq!(asset.curve.real_base, base_used);
    assert_eq!(asset.curve.sold_token, tokens_out);
    assert_eq!(asset.fees_collected, fees);
    assert_eq!(asset.trade_count, 200);
    assert!(asset.curve.verify_invariants().is_ok());

    let sequences: HashSet<u64> = results.iter().map(|r| r.ledger_sequence).collect();
    assert_eq!(sequences.len(), 200);
    assert_eq!(ledger.len(), 201);
}

#[test]
fn test_mixed_buys_and_sells_keep_invariants() {
    let (registry, _) = registry();
    let id = launch(&registry, 1, "MIX");

    let handles: Vec<_> = (0..6u8)
        .map(|t| {
            let registry = registry.clone();
            thread::spawn(move || {
                let trader = Address::new([t + 20; 32]);
                let mut held = 0u128;
                for i in 0..20u64 {
                    let fill = registry.buy(&id, trader, SCALE / 10, 0, T0 + i).unwrap();
                    held += fill.token_amount;
                    if i % 3 == 2 {
                        let fill = registry.sell(&id, trader, held / 2, 0, T0 + i).unwrap();
                        held -= fill.token_amount;
                    }
                }
                held
            })
        })
        .collect();

    let held: u128 = handles.into_iter().map(|h| h.join().unwrap()).sum();
    let asset = registry.asset(&id).unwrap();
    assert_eq!(asset.curve.sold_token, held);
    assert!(asset.curve.verify_invariants().is_ok());
    assert_eq!(asset.trade_count, 6 * (20 + 6));
}

#[test]
fn test_assets_trade_in_parallel() {
    let (registry, _) = registry();
    let ids: Vec<AssetId> = (0..4u8)
        .map(|i| launch(&registry, i + 1, &format!("A{}", i)))
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .copied()
        .map(|id| {
            let registry = registry.clone();
            thread::spawn(move || {
                for i in 0..30u64 {
                    registry
                        .buy(&id, Address::new([7; 32]), SCALE / 10, 0, T0 + i)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Identical order flow on identical curves lands in identical states
    let first = registry.asset(&ids[0]).unwrap();
    for id in &ids {
        let asset = registry.asset(id).unwrap();
        assert_eq!(asset.trade_count, 30);
        assert_eq!(asset.curve.real_base, first.curve.real_base);
        assert_eq!(asset.curve.sold_token, first.curve.sold_token);
    }
    assert_eq!(registry.stats().unwrap().active, 4);
}

#[test]
fn test_settle_once_under_contention() {
    let (registry, ledger) = registry();
    let id = launch(&registry, 1, "ONCE");
    let op = OperationId::new([0x42; 32]);
    let order = TradeOrder::buy(id, Address::new([9; 32]), SCALE, 0, T0);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            let order = order.clone();
            thread::spawn(move || registry.settle_once(op, &order).unwrap())
        })
        .collect();

    let results: Vec<SettlementResult> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| w[0] == w[1]));

    let asset = registry.asset(&id).unwrap();
    assert_eq!(asset.trade_count, 1);
    assert_eq!(asset.curve.sold_token, results[0].token_amount);
    assert_eq!(ledger.len(), 2);
}
