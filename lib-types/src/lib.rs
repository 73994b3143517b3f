//! Launchpad primitives.
//! Stable, engine-neutral, behavior-free.
//!
//! Rule: identities are fixed-size byte arrays, never strings.

pub mod primitives;

pub use primitives::{Address, Amount, AssetId, Bps, OperationId, Timestamp, BPS_DENOMINATOR};
