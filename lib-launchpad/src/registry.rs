//! Launch Registry
//!
//! Owns every launched asset and is the only component that mutates a
//! [`CurveState`].
//!
//! # Concurrency
//!
//! Each asset lives in its own slot behind a `parking_lot::Mutex`, so all
//! settlement for one asset is linearized while different assets trade in
//! parallel. The slot map is behind a `RwLock` held only to look up or insert
//! a slot. No operation locks two slots.
//!
//! # Commit discipline
//!
//! A settlement builds the complete next [`Asset`] on a copy, verifies the
//! curve invariants, writes it to the store (when attached) and only then
//! swaps it into the slot. Any failure before the swap leaves state untouched.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, info, warn};
use lib_curve::{math, BuyQuote, CurveState, SellQuote};
use lib_types::{Address, Amount, AssetId, OperationId, Timestamp, BPS_DENOMINATOR};

use crate::config::{ConfigChange, ConfigUpdate, LaunchConfig, MAX_SYMBOL_LEN};
use crate::errors::{LaunchError, LaunchResult};
use crate::events::{EventIndexer, LaunchEvent};
use crate::ledger::{LedgerEntry, LedgerKind, LedgerSink};
use crate::store::AssetStore;
use crate::types::{
    Asset, CurveStats, GraduationRecord, LaunchParams, Lifecycle, RegistryStats,
    SettlementInstruction, SettlementResult, TradeOrder, TradeQuote, TradeSide,
};

/// Domain separator for asset id derivation
pub const ASSET_ID_DOMAIN: &[u8] = b"LAUNCHPAD_ASSET_V1";

/// Derive an asset id: `blake3(ASSET_ID_DOMAIN || creator || symbol)`
pub fn derive_asset_id(creator: &Address, symbol: &str) -> AssetId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ASSET_ID_DOMAIN);
    hasher.update(creator.as_bytes());
    hasher.update(symbol.as_bytes());
    AssetId::new(*hasher.finalize().as_bytes())
}

/// Settled operation ids remembered per asset by `settle_once`
pub const SETTLEMENT_CACHE_CAPACITY: usize = 1024;

/// Per-asset critical section
struct AssetSlot {
    asset: Asset,
    /// Orders and results of `settle_once` calls, by operation id
    settlements: HashMap<OperationId, (TradeOrder, SettlementResult)>,
    /// Insertion order of `settlements`, oldest first
    settled_ids: VecDeque<OperationId>,
}

impl AssetSlot {
    fn new(asset: Asset) -> Self {
        Self {
            asset,
            settlements: HashMap::new(),
            settled_ids: VecDeque::new(),
        }
    }

    fn remember(
        &mut self,
        operation_id: OperationId,
        order: &TradeOrder,
        result: &SettlementResult,
    ) {
        while self.settled_ids.len() >= SETTLEMENT_CACHE_CAPACITY {
            match self.settled_ids.pop_front() {
                Some(oldest) => {
                    self.settlements.remove(&oldest);
                }
                None => break,
            }
        }
        self.settled_ids.push_back(operation_id);
        self.settlements
            .insert(operation_id, (order.clone(), result.clone()));
    }
}

type SlotRef = Arc<Mutex<AssetSlot>>;

/// Priced buy, before commit
struct PricedBuy {
    fee: Amount,
    quote: BuyQuote,
}

/// Priced sell, before commit
struct PricedSell {
    fee: Amount,
    payout: Amount,
    quote: SellQuote,
}

/// Launch Registry
pub struct LaunchRegistry {
    assets: RwLock<HashMap<AssetId, SlotRef>>,
    config: RwLock<LaunchConfig>,
    admin: RwLock<Address>,
    store: Option<Arc<dyn AssetStore>>,
    ledger: Option<Arc<dyn LedgerSink>>,
    events: Option<Arc<dyn EventIndexer>>,
    next_sequence: AtomicU64,
}

impl std::fmt::Debug for LaunchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchRegistry")
            .field("assets", &self.assets.read().len())
            .field("config", &*self.config.read())
            .field("admin", &*self.admin.read())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl LaunchRegistry {
    /// Create an empty in-memory registry
    pub fn new(config: LaunchConfig, admin: Address) -> LaunchResult<Self> {
        config.validate()?;
        if admin.is_zero() {
            return Err(LaunchError::InvalidParameters(
                "Admin address cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            assets: RwLock::new(HashMap::new()),
            config: RwLock::new(config),
            admin: RwLock::new(admin),
            store: None,
            ledger: None,
            events: None,
            next_sequence: AtomicU64::new(1),
        })
    }

    /// Create a registry backed by `store`, restoring every stored asset
    pub fn open(
        config: LaunchConfig,
        admin: Address,
        store: Arc<dyn AssetStore>,
    ) -> LaunchResult<Self> {
        let mut registry = Self::new(config, admin)?;
        let assets = store.load_assets().map_err(|e| {
            error!("Failed to load launchpad assets: {}", e);
            e
        })?;

        let mut last_sequence = 0;
        {
            let mut slots = registry.assets.write();
            for asset in assets {
                last_sequence = last_sequence.max(asset.last_sequence);
                slots.insert(asset.asset_id, Arc::new(Mutex::new(AssetSlot::new(asset))));
            }
            info!(
                "Restored {} launchpad assets (last ledger sequence {})",
                slots.len(),
                last_sequence
            );
        }

        registry.next_sequence = AtomicU64::new(last_sequence + 1);
        registry.store = Some(store);
        Ok(registry)
    }

    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerSink>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventIndexer>) -> Self {
        self.events = Some(events);
        self
    }

    // ========================================================================
    // LAUNCH
    // ========================================================================

    /// Launch a new asset
    ///
    /// # Errors
    /// - `InvalidParameters` for empty fields, an oversized symbol or
    ///   parameters the curve cannot price
    /// - `InsufficientFee` if `fee_paid` is below the configured launch fee
    /// - `DuplicateAsset` if `creator` already launched `symbol`
    pub fn launch(
        &self,
        params: LaunchParams,
        creator: Address,
        fee_paid: Amount,
        timestamp: Timestamp,
    ) -> LaunchResult<Asset> {
        validate_params(&params)?;

        let config = self.config();
        if fee_paid < config.launch_fee {
            return Err(LaunchError::InsufficientFee {
                required: config.launch_fee,
                paid: fee_paid,
            });
        }

        let asset_id = derive_asset_id(&creator, &params.symbol);
        let threshold = params
            .graduation_threshold
            .unwrap_or(config.graduation_threshold_default);
        let curve_supply = math::mul_div_floor(
            params.total_supply,
            Amount::from(config.curve_supply_bps),
            Amount::from(BPS_DENOMINATOR),
        )?;
        let curve = CurveState::initialize(curve_supply, threshold)?;

        let mut slots = self.assets.write();
        if slots.contains_key(&asset_id) {
            return Err(LaunchError::DuplicateAsset(asset_id));
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        let asset = Asset {
            asset_id,
            creator,
            name: params.name,
            symbol: params.symbol,
            metadata_uri: params.metadata_uri,
            created_at: timestamp,
            total_supply: params.total_supply,
            curve,
            lifecycle: Lifecycle::Active,
            launch_fee_paid: fee_paid,
            fees_collected: 0,
            trade_count: 0,
            last_sequence: sequence,
            graduation: None,
        };

        self.persist(&asset)?;
        slots.insert(asset_id, Arc::new(Mutex::new(AssetSlot::new(asset.clone()))));
        drop(slots);

        info!(
            "Launched asset {} ({}) by {}: curve supply {}, graduation threshold {}",
            asset.symbol,
            asset_id.short(),
            creator,
            curve_supply,
            threshold
        );

        self.record_ledger(LedgerEntry {
            sequence,
            asset_id,
            kind: LedgerKind::Launch,
            gross_amount: fee_paid,
            fee_amount: fee_paid,
            fee_recipient: config.fee_recipient,
            timestamp,
            operation_id: None,
        });
        self.emit(LaunchEvent::Launched {
            asset_id,
            creator,
            symbol: asset.symbol.clone(),
            curve_supply,
            graduation_threshold: threshold,
            timestamp,
        });

        Ok(asset)
    }

    // ========================================================================
    // SETTLEMENT
    // ========================================================================

    /// Buy tokens with `base_in` (fee included)
    ///
    /// # Errors
    /// - `AssetNotFound`, `TradingClosed`
    /// - `ZeroAmount` if `base_in` is zero or buys no tokens
    /// - `SlippageExceeded` if fewer than `min_token_out` tokens would be released
    pub fn buy(
        &self,
        asset_id: &AssetId,
        trader: Address,
        base_in: Amount,
        min_token_out: Amount,
        timestamp: Timestamp,
    ) -> LaunchResult<SettlementResult> {
        let order = TradeOrder::buy(*asset_id, trader, base_in, min_token_out, timestamp);
        self.with_slot(asset_id, |slot| self.execute(slot, &order, None))
    }

    /// Sell `token_in` tokens back to the curve
    ///
    /// # Errors
    /// - `AssetNotFound`, `TradingClosed`
    /// - `InsufficientHistory` if more tokens are offered than were sold
    /// - `ZeroAmount` if `token_in` is zero or pays out nothing
    /// - `SlippageExceeded` if the net payout is below `min_base_out`
    pub fn sell(
        &self,
        asset_id: &AssetId,
        trader: Address,
        token_in: Amount,
        min_base_out: Amount,
        timestamp: Timestamp,
    ) -> LaunchResult<SettlementResult> {
        let order = TradeOrder::sell(*asset_id, trader, token_in, min_base_out, timestamp);
        self.with_slot(asset_id, |slot| self.execute(slot, &order, None))
    }

    /// Settle `order` at most once per `operation_id`
    ///
    /// A repeated id carrying the same trade returns the stored result without
    /// touching state; a repeated id carrying a different trade is rejected.
    /// Failed settlements are not stored and may be retried with the same id.
    /// Each asset remembers its last [`SETTLEMENT_CACHE_CAPACITY`] operation
    /// ids; an id older than that settles as new.
    pub fn settle_once(
        &self,
        operation_id: OperationId,
        order: &TradeOrder,
    ) -> LaunchResult<SettlementResult> {
        self.with_slot(&order.asset_id, |slot| {
            if let Some((settled, previous)) = slot.settlements.get(&operation_id) {
                if !settled.same_trade(order) {
                    warn!(
                        "Operation {} reused with a different order for asset {}",
                        operation_id,
                        order.asset_id.short()
                    );
                    return Err(LaunchError::InvalidParameters(format!(
                        "Operation {} already settled a different order",
                        operation_id
                    )));
                }
                debug!(
                    "Operation {} already settled for asset {}",
                    operation_id,
                    order.asset_id.short()
                );
                return Ok(previous.clone());
            }
            let result = self.execute(slot, order, Some(operation_id))?;
            slot.remember(operation_id, order, &result);
            Ok(result)
        })
    }

    fn execute(
        &self,
        slot: &mut AssetSlot,
        order: &TradeOrder,
        operation_id: Option<OperationId>,
    ) -> LaunchResult<SettlementResult> {
        match order.side {
            TradeSide::Buy => self.execute_buy(slot, order, operation_id),
            TradeSide::Sell => self.execute_sell(slot, order, operation_id),
        }
    }

    fn execute_buy(
        &self,
        slot: &mut AssetSlot,
        order: &TradeOrder,
        operation_id: Option<OperationId>,
    ) -> LaunchResult<SettlementResult> {
        let config = self.config();
        let current = &slot.asset;
        require_active(current)?;

        let PricedBuy { fee, quote } = price_buy(&current.curve, &config, order.amount)?;
        if quote.token_out < order.min_out {
            return Err(LaunchError::SlippageExceeded {
                minimum: order.min_out,
                actual: quote.token_out,
            });
        }
        if quote.clamped {
            warn!(
                "Buy on {} clamped to real token reserve, refunding {}",
                current.asset_id.short(),
                quote.base_refund
            );
        }

        let mut next = current.clone();
        next.curve = current.curve.apply_buy(&quote)?;
        next.fees_collected = math::checked_add(next.fees_collected, fee)?;
        next.trade_count += 1;

        let graduation = if next.curve.threshold_reached() {
            let record = GraduationRecord::snapshot(next.asset_id, &next.curve, order.timestamp)?;
            next.lifecycle = Lifecycle::Graduated;
            next.graduation = Some(record.clone());
            Some(record)
        } else {
            None
        };

        let sequence = self.commit(slot, next)?;
        let asset = &slot.asset;
        let price_after = asset.curve.price()?;

        let mut instructions = vec![SettlementInstruction::Mint {
            asset_id: asset.asset_id,
            to: order.trader,
            amount: quote.token_out,
        }];
        if fee > 0 {
            instructions.push(SettlementInstruction::FeeTransfer {
                to: config.fee_recipient,
                amount: fee,
            });
        }
        if quote.base_refund > 0 {
            instructions.push(SettlementInstruction::Refund {
                to: order.trader,
                amount: quote.base_refund,
            });
        }

        debug!(
            "Buy on {}: {} base in, {} fee, {} tokens out, price {}",
            asset.asset_id.short(),
            order.amount,
            fee,
            quote.token_out,
            price_after
        );

        self.record_ledger(LedgerEntry {
            sequence,
            asset_id: asset.asset_id,
            kind: LedgerKind::Buy,
            gross_amount: order.amount,
            fee_amount: fee,
            fee_recipient: config.fee_recipient,
            timestamp: order.timestamp,
            operation_id,
        });
        self.emit(LaunchEvent::Purchased {
            asset_id: asset.asset_id,
            buyer: order.trader,
            base_in: order.amount,
            fee,
            token_out: quote.token_out,
            price: price_after,
            timestamp: order.timestamp,
        });

        if let Some(record) = &graduation {
            info!(
                "Asset {} graduated: real base {}, sold {}, market cap {}",
                asset.symbol, record.final_real_base, record.sold_token, record.market_cap
            );
            self.emit(LaunchEvent::Graduated {
                asset_id: asset.asset_id,
                final_real_base: record.final_real_base,
                final_real_token: record.final_real_token,
                market_cap: record.market_cap,
                timestamp: record.timestamp,
            });
        }

        Ok(SettlementResult {
            asset_id: asset.asset_id,
            side: TradeSide::Buy,
            trader: order.trader,
            operation_id,
            gross_amount: order.amount,
            fee,
            token_amount: quote.token_out,
            base_amount: quote.base_used,
            refund: quote.base_refund,
            price_after,
            instructions,
            graduation,
            ledger_sequence: sequence,
            timestamp: order.timestamp,
        })
    }

    fn execute_sell(
        &self,
        slot: &mut AssetSlot,
        order: &TradeOrder,
        operation_id: Option<OperationId>,
    ) -> LaunchResult<SettlementResult> {
        let config = self.config();
        let current = &slot.asset;
        require_active(current)?;

        let PricedSell { fee, payout, quote } = price_sell(&current.curve, &config, order.amount)?;
        if payout < order.min_out {
            return Err(LaunchError::SlippageExceeded {
                minimum: order.min_out,
                actual: payout,
            });
        }
        if quote.clamped {
            warn!(
                "Sell on {} clamped to real base reserve {}",
                current.asset_id.short(),
                current.curve.real_base
            );
        }

        let mut next = current.clone();
        next.curve = current.curve.apply_sell(&quote)?;
        next.fees_collected = math::checked_add(next.fees_collected, fee)?;
        next.trade_count += 1;

        let sequence = self.commit(slot, next)?;
        let asset = &slot.asset;
        let price_after = asset.curve.price()?;

        let mut instructions = vec![
            SettlementInstruction::Burn {
                asset_id: asset.asset_id,
                from: order.trader,
                amount: quote.token_in,
            },
            SettlementInstruction::Payout {
                to: order.trader,
                amount: payout,
            },
        ];
        if fee > 0 {
            instructions.push(SettlementInstruction::FeeTransfer {
                to: config.fee_recipient,
                amount: fee,
            });
        }

        debug!(
            "Sell on {}: {} tokens in, {} base out, {} fee, price {}",
            asset.asset_id.short(),
            quote.token_in,
            payout,
            fee,
            price_after
        );

        self.record_ledger(LedgerEntry {
            sequence,
            asset_id: asset.asset_id,
            kind: LedgerKind::Sell,
            gross_amount: quote.base_out,
            fee_amount: fee,
            fee_recipient: config.fee_recipient,
            timestamp: order.timestamp,
            operation_id,
        });
        self.emit(LaunchEvent::Sold {
            asset_id: asset.asset_id,
            seller: order.trader,
            token_in: quote.token_in,
            base_out: payout,
            fee,
            price: price_after,
            timestamp: order.timestamp,
        });

        Ok(SettlementResult {
            asset_id: asset.asset_id,
            side: TradeSide::Sell,
            trader: order.trader,
            operation_id,
            gross_amount: quote.token_in,
            fee,
            token_amount: quote.token_in,
            base_amount: payout,
            refund: 0,
            price_after,
            instructions,
            graduation: None,
            ledger_sequence: sequence,
            timestamp: order.timestamp,
        })
    }

    /// Persist `next` and swap it into the slot, returning its ledger sequence
    fn commit(&self, slot: &mut AssetSlot, mut next: Asset) -> LaunchResult<u64> {
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);
        next.last_sequence = sequence;
        self.persist(&next)?;
        slot.asset = next;
        Ok(sequence)
    }

    fn persist(&self, asset: &Asset) -> LaunchResult<()> {
        if let Some(store) = &self.store {
            store.put_asset(asset).map_err(|e| {
                error!("Failed to persist asset {}: {}", asset.asset_id.short(), e);
                e
            })?;
        }
        Ok(())
    }

    fn record_ledger(&self, entry: LedgerEntry) {
        if let Some(ledger) = &self.ledger {
            ledger.record(&entry);
        }
    }

    fn emit(&self, event: LaunchEvent) {
        if let Some(events) = &self.events {
            events.index_event(event);
        }
    }

    fn slot(&self, asset_id: &AssetId) -> LaunchResult<SlotRef> {
        self.assets
            .read()
            .get(asset_id)
            .cloned()
            .ok_or(LaunchError::AssetNotFound(*asset_id))
    }

    /// Run `f` inside the asset's critical section, releasing it fairly
    fn with_slot<T>(
        &self,
        asset_id: &AssetId,
        f: impl FnOnce(&mut AssetSlot) -> LaunchResult<T>,
    ) -> LaunchResult<T> {
        let slot = self.slot(asset_id)?;
        let mut guard = slot.lock();
        let result = f(&mut *guard);
        MutexGuard::unlock_fair(guard);
        result
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Fee-aware preview of a buy; matches what `buy` would commit
    pub fn quote_buy(&self, asset_id: &AssetId, base_in: Amount) -> LaunchResult<TradeQuote> {
        let config = self.config();
        let curve = self.snapshot(asset_id, require_active)?;
        let PricedBuy { fee, quote } = price_buy(&curve, &config, base_in)?;
        let after = curve.apply_buy(&quote)?;
        Ok(TradeQuote {
            side: TradeSide::Buy,
            amount_in: base_in,
            fee,
            amount_out: quote.token_out,
            base_moved: quote.base_used,
            refund: quote.base_refund,
            price_after: after.price()?,
            clamped: quote.clamped,
        })
    }

    /// Fee-aware preview of a sell; matches what `sell` would commit
    pub fn quote_sell(&self, asset_id: &AssetId, token_in: Amount) -> LaunchResult<TradeQuote> {
        let config = self.config();
        let curve = self.snapshot(asset_id, require_active)?;
        let PricedSell { fee, payout, quote } = price_sell(&curve, &config, token_in)?;
        let after = curve.apply_sell(&quote)?;
        Ok(TradeQuote {
            side: TradeSide::Sell,
            amount_in: token_in,
            fee,
            amount_out: payout,
            base_moved: quote.base_out,
            refund: 0,
            price_after: after.price()?,
            clamped: quote.clamped,
        })
    }

    pub fn market_cap(&self, asset_id: &AssetId) -> LaunchResult<Amount> {
        let curve = self.snapshot(asset_id, |_| Ok(()))?;
        Ok(curve.market_cap()?)
    }

    /// Snapshot of one asset
    pub fn asset(&self, asset_id: &AssetId) -> LaunchResult<Asset> {
        let slot = self.slot(asset_id)?;
        let asset = slot.lock().asset.clone();
        Ok(asset)
    }

    pub fn curve_stats(&self, asset_id: &AssetId) -> LaunchResult<CurveStats> {
        let asset = self.asset(asset_id)?;
        let curve = &asset.curve;
        Ok(CurveStats {
            asset_id: asset.asset_id,
            price: curve.price()?,
            market_cap: curve.market_cap()?,
            real_base: curve.real_base,
            real_token: curve.real_token,
            sold_token: curve.sold_token,
            graduation_threshold: curve.graduation_threshold,
            graduation_progress_percent: curve.graduation_progress_percent()?,
            lifecycle: asset.lifecycle,
            trade_count: asset.trade_count,
        })
    }

    /// Snapshot of every asset in `lifecycle`, oldest first
    pub fn assets_by_lifecycle(&self, lifecycle: Lifecycle) -> Vec<Asset> {
        let mut assets: Vec<Asset> = self
            .all_assets()
            .into_iter()
            .filter(|a| a.lifecycle == lifecycle)
            .collect();
        assets.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.asset_id.cmp(&b.asset_id))
        });
        assets
    }

    /// Registry-wide totals
    ///
    /// # Errors
    /// `ArithmeticOverflow` if any amount total leaves the `Amount` range
    pub fn stats(&self) -> LaunchResult<RegistryStats> {
        self.all_assets()
            .iter()
            .try_fold(RegistryStats::default(), |mut stats, asset| {
                stats.total_launched += 1;
                match asset.lifecycle {
                    Lifecycle::Active => stats.active += 1,
                    Lifecycle::Graduated => stats.graduated += 1,
                }
                stats.total_base_raised =
                    math::checked_add(stats.total_base_raised, asset.base_raised())?;
                stats.total_launch_fees =
                    math::checked_add(stats.total_launch_fees, asset.launch_fee_paid)?;
                stats.total_trading_fees =
                    math::checked_add(stats.total_trading_fees, asset.fees_collected)?;
                Ok(stats)
            })
    }

    pub fn asset_count(&self) -> usize {
        self.assets.read().len()
    }

    /// Current configuration snapshot
    pub fn config(&self) -> LaunchConfig {
        self.config.read().clone()
    }

    pub fn admin(&self) -> Address {
        *self.admin.read()
    }

    fn all_assets(&self) -> Vec<Asset> {
        let slots: Vec<SlotRef> = self.assets.read().values().cloned().collect();
        slots.iter().map(|slot| slot.lock().asset.clone()).collect()
    }

    /// Copy of the asset's curve after `check` passes on the asset
    fn snapshot(
        &self,
        asset_id: &AssetId,
        check: impl FnOnce(&Asset) -> LaunchResult<()>,
    ) -> LaunchResult<CurveState> {
        let slot = self.slot(asset_id)?;
        let guard = slot.lock();
        check(&guard.asset)?;
        Ok(guard.asset.curve)
    }

    // ========================================================================
    // ADMINISTRATION
    // ========================================================================

    /// Fail with `Unauthorized` unless `caller` is the admin
    pub fn require_admin(&self, caller: &Address) -> LaunchResult<()> {
        if *caller != *self.admin.read() {
            warn!("Rejected privileged call from {}", caller);
            return Err(LaunchError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Apply a privileged configuration update
    ///
    /// Changes apply to settlements that start after this call returns.
    pub fn update_config(
        &self,
        caller: &Address,
        update: ConfigUpdate,
        timestamp: Timestamp,
    ) -> LaunchResult<ConfigChange> {
        self.require_admin(caller)?;

        let change = {
            let mut config = self.config.write();
            let next = update.apply_to(&config)?;
            let previous = std::mem::replace(&mut *config, next.clone());
            ConfigChange {
                previous,
                current: next,
            }
        };

        info!(
            "Launch config updated by {}: launch fee {} -> {}, trading fee {} -> {} bps",
            caller,
            change.previous.launch_fee,
            change.current.launch_fee,
            change.previous.trading_fee_bps,
            change.current.trading_fee_bps
        );
        self.emit(LaunchEvent::ConfigUpdated {
            admin: *caller,
            previous: change.previous.clone(),
            current: change.current.clone(),
            timestamp,
        });

        Ok(change)
    }

    /// Hand the admin capability to `new_admin`, returning the previous admin
    pub fn transfer_admin(&self, caller: &Address, new_admin: Address) -> LaunchResult<Address> {
        self.require_admin(caller)?;
        if new_admin.is_zero() {
            return Err(LaunchError::InvalidParameters(
                "Admin address cannot be zero".to_string(),
            ));
        }
        let previous = std::mem::replace(&mut *self.admin.write(), new_admin);
        info!("Registry admin transferred from {} to {}", previous, new_admin);
        Ok(previous)
    }

    /// Flush the attached store, if any
    pub fn flush(&self) -> LaunchResult<()> {
        match &self.store {
            Some(store) => store.flush(),
            None => Ok(()),
        }
    }
}

fn validate_params(params: &LaunchParams) -> LaunchResult<()> {
    if params.name.trim().is_empty() {
        return Err(LaunchError::InvalidParameters("Name cannot be empty".to_string()));
    }
    if params.symbol.trim().is_empty() {
        return Err(LaunchError::InvalidParameters("Symbol cannot be empty".to_string()));
    }
    if params.symbol.len() > MAX_SYMBOL_LEN {
        return Err(LaunchError::InvalidParameters(format!(
            "Symbol longer than {} bytes",
            MAX_SYMBOL_LEN
        )));
    }
    if params.metadata_uri.trim().is_empty() {
        return Err(LaunchError::InvalidParameters(
            "Metadata reference cannot be empty".to_string(),
        ));
    }
    if params.total_supply == 0 {
        return Err(LaunchError::InvalidParameters(
            "Total supply must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn require_active(asset: &Asset) -> LaunchResult<()> {
    if !asset.lifecycle.is_active() {
        return Err(LaunchError::TradingClosed(asset.asset_id));
    }
    Ok(())
}

/// Fee off the gross input, then quote the net amount
fn price_buy(curve: &CurveState, config: &LaunchConfig, base_in: Amount) -> LaunchResult<PricedBuy> {
    if base_in == 0 {
        return Err(LaunchError::ZeroAmount);
    }
    let fee = math::bps_of(base_in, config.trading_fee_bps)?;
    let net = math::checked_sub(base_in, fee)?;
    let quote = curve.quote_buy(net)?;
    if quote.token_out == 0 {
        return Err(LaunchError::ZeroAmount);
    }
    Ok(PricedBuy { fee, quote })
}

/// Quote the gross output, then take the fee from it
fn price_sell(curve: &CurveState, config: &LaunchConfig, token_in: Amount) -> LaunchResult<PricedSell> {
    let quote = curve.quote_sell(token_in)?;
    let fee = math::bps_of(quote.base_out, config.trading_fee_bps)?;
    let payout = math::checked_sub(quote.base_out, fee)?;
    if payout == 0 {
        return Err(LaunchError::ZeroAmount);
    }
    Ok(PricedSell { fee, payout, quote })
}
