//! Launch Registry
//!
//! Lifecycle and settlement authority for curve-priced assets. The registry
//! launches assets, settles buys and sells against each asset's
//! [`lib_curve::CurveState`], and graduates an asset once its real base
//! reserve reaches the funding threshold.
//!
//! # Side effects
//!
//! The registry never moves funds. Each settlement returns
//! [`SettlementInstruction`]s (mint, burn, payout, refund, fee transfer) for
//! the custody layer, writes a [`LedgerEntry`] to the attached
//! [`LedgerSink`] and emits a [`LaunchEvent`] to the attached
//! [`EventIndexer`].
//!
//! # Usage
//!
//! ```ignore
//! use lib_launchpad::{LaunchConfig, LaunchParams, LaunchRegistry};
//!
//! let registry = LaunchRegistry::new(LaunchConfig::with_fee_recipient(treasury), admin)?;
//! let asset = registry.launch(
//!     LaunchParams::new("Moon Cat", "MCAT", "ipfs://bafy...", 1_000_000_000 * SCALE),
//!     creator,
//!     fee_paid,
//!     now,
//! )?;
//! let fill = registry.buy(&asset.asset_id, trader, SCALE, min_out, now)?;
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod store;
pub mod types;

pub use config::{ConfigChange, ConfigUpdate, LaunchConfig, MAX_SYMBOL_LEN};
pub use errors::{LaunchError, LaunchResult};
pub use events::{EventIndexer, InMemoryEventIndexer, LaunchEvent};
pub use ledger::{InMemoryLedger, LedgerEntry, LedgerKind, LedgerSink};
pub use registry::{
    derive_asset_id, LaunchRegistry, ASSET_ID_DOMAIN, SETTLEMENT_CACHE_CAPACITY,
};
pub use store::{AssetStore, SledAssetStore};
pub use types::{
    Asset, CurveStats, GraduationRecord, LaunchParams, Lifecycle, RegistryStats,
    SettlementInstruction, SettlementResult, TradeOrder, TradeQuote, TradeSide,
};
