//! Reserve Curve
//!
//! Pure pricing math for the launch engine. A curve is a constant-product
//! market maker over a virtual reserve pair:
//!
//! ```text
//!   virtual_base * virtual_token = k * S        (S = 10^18)
//! ```
//!
//! # Design Principles
//!
//! 1. **Pure functions** - a quote never mutates the state it was computed from
//! 2. **Deterministic** - integer arithmetic only, fixed order of operations
//! 3. **No silent overflow** - 256-bit intermediates, every narrowing is checked
//! 4. **Rounding favours the curve** - the reserve recomputed from `k` is rounded up
//!
//! # Usage
//!
//! ```ignore
//! use lib_curve::{CurveState, SCALE};
//!
//! let curve = CurveState::initialize(500_000_000 * SCALE, 18 * SCALE)?;
//! let quote = curve.quote_buy(SCALE)?;
//! let next = curve.apply_buy(&quote)?;
//! ```

pub mod curve;
pub mod errors;
pub mod math;

pub use curve::{BuyQuote, CurveState, SellQuote};
pub use errors::{CurveError, CurveResult};
pub use math::U256;

use lib_types::Amount;

/// Fixed-point scale factor shared by every curve amount
pub const SCALE: Amount = 1_000_000_000_000_000_000;

/// Initial virtual base reserve as a fraction of the graduation threshold
/// (13 / 180, roughly 7.22%)
pub const VIRTUAL_BASE_NUMERATOR: Amount = 13;

/// See [`VIRTUAL_BASE_NUMERATOR`]
pub const VIRTUAL_BASE_DENOMINATOR: Amount = 180;
