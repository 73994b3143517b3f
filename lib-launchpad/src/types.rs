//! Launch Registry Types
//!
//! # State Machine
//! ```text
//!   ┌────────┐   real_base >= threshold   ┌───────────┐
//!   │ Active │ ─────────────────────────▶ │ Graduated │
//!   └────────┘       (irreversible)       └───────────┘
//! ```
//!
//! Graduation freezes the curve reserves; there is no pause or delist state.

use serde::{Deserialize, Serialize};
use lib_curve::{CurveResult, CurveState};
use lib_types::{Address, Amount, AssetId, OperationId, Timestamp};

/// Asset lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Curve-priced trading is open
    Active,
    /// Funding threshold met, curve frozen
    Graduated,
}

impl Lifecycle {
    /// Check if the curve accepts buys and sells
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    pub fn is_graduated(&self) -> bool {
        matches!(self, Lifecycle::Graduated)
    }
}

impl std::fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifecycle::Active => write!(f, "active"),
            Lifecycle::Graduated => write!(f, "graduated"),
        }
    }
}

/// Caller-supplied launch parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchParams {
    pub name: String,
    pub symbol: String,
    /// Opaque content address (e.g. `ipfs://...`), never fetched
    pub metadata_uri: String,
    /// Total token supply, scaled by `S`
    pub total_supply: Amount,
    /// Overrides the configured default when set
    pub graduation_threshold: Option<Amount>,
}

impl LaunchParams {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        metadata_uri: impl Into<String>,
        total_supply: Amount,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            metadata_uri: metadata_uri.into(),
            total_supply,
            graduation_threshold: None,
        }
    }

    pub fn with_graduation_threshold(mut self, threshold: Amount) -> Self {
        self.graduation_threshold = Some(threshold);
        self
    }
}

/// One launched asset and its curve
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: AssetId,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
    pub created_at: Timestamp,

    /// Total token supply, including the share held back for post-graduation liquidity
    pub total_supply: Amount,

    /// Pricing and custody state
    pub curve: CurveState,
    pub lifecycle: Lifecycle,

    /// Fee paid at launch
    pub launch_fee_paid: Amount,
    /// Cumulative trading fees
    pub fees_collected: Amount,
    pub trade_count: u64,

    /// Ledger sequence of the last entry written for this asset
    pub last_sequence: u64,

    /// Set once, on the graduating buy
    pub graduation: Option<GraduationRecord>,
}

impl Asset {
    /// Base asset currently raised by the curve
    pub fn base_raised(&self) -> Amount {
        self.curve.real_base
    }

    /// Supply not allotted to the curve
    pub fn reserved_supply(&self) -> Amount {
        self.total_supply.saturating_sub(self.curve.curve_supply)
    }

    pub fn graduated_at(&self) -> Option<Timestamp> {
        self.graduation.as_ref().map(|g| g.timestamp)
    }
}

/// Snapshot taken when an asset graduates
///
/// Carries the frozen reserves handed to liquidity provisioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraduationRecord {
    pub asset_id: AssetId,
    pub final_real_base: Amount,
    pub final_real_token: Amount,
    pub sold_token: Amount,
    pub price: Amount,
    pub market_cap: Amount,
    pub timestamp: Timestamp,
}

impl GraduationRecord {
    pub fn snapshot(
        asset_id: AssetId,
        curve: &CurveState,
        timestamp: Timestamp,
    ) -> CurveResult<Self> {
        Ok(Self {
            asset_id,
            final_real_base: curve.real_base,
            final_real_token: curve.real_token,
            sold_token: curve.sold_token,
            price: curve.price()?,
            market_cap: curve.market_cap()?,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "buy"),
            TradeSide::Sell => write!(f, "sell"),
        }
    }
}

/// A buy or sell request, as submitted through `settle_once`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeOrder {
    pub asset_id: AssetId,
    pub trader: Address,
    pub side: TradeSide,
    /// Gross base in for a buy, tokens in for a sell
    pub amount: Amount,
    /// Minimum tokens out for a buy, minimum net base out for a sell
    pub min_out: Amount,
    pub timestamp: Timestamp,
}

impl TradeOrder {
    /// Same asset, trader, side, amount and limit; timestamps may differ
    pub fn same_trade(&self, other: &TradeOrder) -> bool {
        self.asset_id == other.asset_id
            && self.trader == other.trader
            && self.side == other.side
            && self.amount == other.amount
            && self.min_out == other.min_out
    }

    pub fn buy(
        asset_id: AssetId,
        trader: Address,
        base_in: Amount,
        min_token_out: Amount,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            asset_id,
            trader,
            side: TradeSide::Buy,
            amount: base_in,
            min_out: min_token_out,
            timestamp,
        }
    }

    pub fn sell(
        asset_id: AssetId,
        trader: Address,
        token_in: Amount,
        min_base_out: Amount,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            asset_id,
            trader,
            side: TradeSide::Sell,
            amount: token_in,
            min_out: min_base_out,
            timestamp,
        }
    }
}

/// Side effect the custody layer must execute for a settlement
///
/// The registry only declares these; it never moves funds itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementInstruction {
    /// Mint launched tokens to the buyer
    Mint {
        asset_id: AssetId,
        to: Address,
        amount: Amount,
    },
    /// Burn launched tokens returned by the seller
    Burn {
        asset_id: AssetId,
        from: Address,
        amount: Amount,
    },
    /// Pay base out of the curve reserve
    Payout { to: Address, amount: Amount },
    /// Return escrowed base the curve could not use
    Refund { to: Address, amount: Amount },
    /// Route a fee to the platform fee recipient
    FeeTransfer { to: Address, amount: Amount },
}

/// Outcome of one committed buy or sell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    pub asset_id: AssetId,
    pub side: TradeSide,
    pub trader: Address,
    pub operation_id: Option<OperationId>,
    /// Gross base in (buy) or tokens in (sell)
    pub gross_amount: Amount,
    /// Trading fee in base
    pub fee: Amount,
    /// Tokens minted (buy) or burned (sell)
    pub token_amount: Amount,
    /// Base entering the reserve (buy) or net base paid out (sell)
    pub base_amount: Amount,
    /// Unused base returned to the buyer
    pub refund: Amount,
    /// Spot price after the trade
    pub price_after: Amount,
    pub instructions: Vec<SettlementInstruction>,
    /// Present only on the buy that graduated the asset
    pub graduation: Option<GraduationRecord>,
    pub ledger_sequence: u64,
    pub timestamp: Timestamp,
}

impl SettlementResult {
    pub fn graduated(&self) -> bool {
        self.graduation.is_some()
    }
}

/// Fee-aware preview of a trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeQuote {
    pub side: TradeSide,
    /// Gross base in (buy) or tokens in (sell)
    pub amount_in: Amount,
    pub fee: Amount,
    /// Tokens out (buy) or net base out (sell)
    pub amount_out: Amount,
    /// Base consumed by the curve (buy) or gross base released (sell)
    pub base_moved: Amount,
    pub refund: Amount,
    pub price_after: Amount,
    pub clamped: bool,
}

/// Read-only view of one curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveStats {
    pub asset_id: AssetId,
    pub price: Amount,
    pub market_cap: Amount,
    pub real_base: Amount,
    pub real_token: Amount,
    pub sold_token: Amount,
    pub graduation_threshold: Amount,
    /// 0-100
    pub graduation_progress_percent: u8,
    pub lifecycle: Lifecycle,
    pub trade_count: u64,
}

/// Registry-wide totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_launched: u64,
    pub active: u64,
    pub graduated: u64,
    pub total_base_raised: Amount,
    pub total_launch_fees: Amount,
    pub total_trading_fees: Amount,
}

impl RegistryStats {
    /// Launch and trading fees combined, `None` on overflow
    pub fn total_fees(&self) -> Option<Amount> {
        self.total_launch_fees.checked_add(self.total_trading_fees)
    }
}
