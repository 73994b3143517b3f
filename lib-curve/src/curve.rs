//! Constant-product reserve curve
//!
//! # Invariants
//! - `k` is fixed at initialization and never recomputed
//! - `k * S <= virtual_base * virtual_token` after every committed quote
//! - `sold_token + real_token == curve_supply`
//! - a sell never pays out more than `real_base`
//! - while the threshold is unreached, `virtual_token >= virtual_base` and
//!   `virtual_token >= S`, so one unit of rounding never favours a trader

use serde::{Deserialize, Serialize};
use lib_types::Amount;

use crate::errors::{CurveError, CurveResult};
use crate::math::{self, U256};
use crate::{SCALE, VIRTUAL_BASE_DENOMINATOR, VIRTUAL_BASE_NUMERATOR};

/// Reserve state of one asset's bonding curve
///
/// Every field shares the fixed-point scale [`SCALE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
    /// Synthetic base reserve used only for pricing
    pub virtual_base: Amount,
    /// Synthetic token reserve used only for pricing
    pub virtual_token: Amount,
    /// Invariant constant: `virtual_base * virtual_token / S` at initialization
    pub k: Amount,
    /// Base asset actually custodied by the curve
    pub real_base: Amount,
    /// Tokens still available for sale through the curve
    pub real_token: Amount,
    /// Tokens distributed through the curve, net of sell-backs
    pub sold_token: Amount,
    /// Supply allotted to the curve at launch
    pub curve_supply: Amount,
    /// Real base reserve at which the asset graduates
    pub graduation_threshold: Amount,
}

/// Result of pricing a buy against a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyQuote {
    /// Net base offered (after fees)
    pub base_in: Amount,
    /// Tokens released to the buyer
    pub token_out: Amount,
    /// Base that enters the real reserve
    pub base_used: Amount,
    /// Base returned to the buyer because the real token reserve ran short
    pub base_refund: Amount,
    pub new_virtual_base: Amount,
    pub new_virtual_token: Amount,
    /// Whether `token_out` was limited by `real_token`
    pub clamped: bool,
}

/// Result of pricing a sell against a curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellQuote {
    /// Tokens returned to the curve
    pub token_in: Amount,
    /// Gross base paid out of the real reserve (before fees)
    pub base_out: Amount,
    pub new_virtual_base: Amount,
    pub new_virtual_token: Amount,
    /// Whether `base_out` was limited by `real_base`
    pub clamped: bool,
}

impl CurveState {
    /// Create a fresh curve
    ///
    /// # Arguments
    /// * `total_supply_for_curve` - Tokens allotted to the curve's real reserve
    /// * `graduation_threshold` - Real base reserve that triggers graduation
    ///
    /// # Errors
    /// `InvalidParameters` if either input is zero or too small to price, or
    /// if the supply is too small for the threshold. Every pre-graduation
    /// state must keep `virtual_token` at or above both `virtual_base` and
    /// `S`; with `virtual_base < virtual_base_0 + threshold` before
    /// graduation that holds when `k >= ceiling` and `k * S >= ceiling^2`.
    pub fn initialize(
        total_supply_for_curve: Amount,
        graduation_threshold: Amount,
    ) -> CurveResult<Self> {
        if total_supply_for_curve == 0 {
            return Err(CurveError::InvalidParameters(
                "Curve supply must be greater than zero".to_string(),
            ));
        }
        if graduation_threshold == 0 {
            return Err(CurveError::InvalidParameters(
                "Graduation threshold must be greater than zero".to_string(),
            ));
        }

        let virtual_base = math::mul_div_floor(
            graduation_threshold,
            VIRTUAL_BASE_NUMERATOR,
            VIRTUAL_BASE_DENOMINATOR,
        )?;
        let virtual_token = total_supply_for_curve;
        let k = math::mul_div_floor(virtual_base, virtual_token, SCALE)?;

        if virtual_base == 0 || k == 0 {
            return Err(CurveError::InvalidParameters(
                "Supply and threshold too small to price".to_string(),
            ));
        }

        let ceiling = math::checked_add(virtual_base, graduation_threshold)?;
        let k_scaled = math::product(k, SCALE)?;
        if k < ceiling || k_scaled < math::product(ceiling, ceiling)? {
            return Err(CurveError::InvalidParameters(format!(
                "Curve supply {} too small for graduation threshold {}",
                total_supply_for_curve, graduation_threshold
            )));
        }

        Ok(Self {
            virtual_base,
            virtual_token,
            k,
            real_base: 0,
            real_token: total_supply_for_curve,
            sold_token: 0,
            curve_supply: total_supply_for_curve,
            graduation_threshold,
        })
    }

    /// Spot price in base per whole token, scaled by `S`
    ///
    /// Returns 0 for a curve without a token reserve.
    pub fn price(&self) -> CurveResult<Amount> {
        if self.virtual_token == 0 {
            return Ok(0);
        }
        math::mul_div_floor(self.virtual_base, SCALE, self.virtual_token)
    }

    /// Market capitalisation of the tokens sold so far: `sold_token * price / S`
    pub fn market_cap(&self) -> CurveResult<Amount> {
        math::mul_div_floor(self.sold_token, self.price()?, SCALE)
    }

    /// Price a buy of `base_in` (already net of fees)
    pub fn quote_buy(&self, base_in: Amount) -> CurveResult<BuyQuote> {
        if base_in == 0 {
            return Err(CurveError::ZeroAmount);
        }

        let new_virtual_base = math::checked_add(self.virtual_base, base_in)?;
        let new_virtual_token = math::div_ceil(self.k_scaled()?, new_virtual_base)?;
        // Floor at zero: a reserve above the current one means no sale
        let token_out = self.virtual_token.saturating_sub(new_virtual_token);

        if token_out <= self.real_token {
            return Ok(BuyQuote {
                base_in,
                token_out,
                base_used: base_in,
                base_refund: 0,
                new_virtual_base,
                new_virtual_token,
                clamped: false,
            });
        }

        // Only real_token can leave the curve; charge for exactly that much
        let token_out = self.real_token;
        let remaining = math::checked_sub(self.virtual_token, token_out)?;
        let required_base = math::div_ceil(self.k_scaled()?, remaining)?;
        let base_used = required_base.saturating_sub(self.virtual_base).min(base_in);
        let base_refund = math::checked_sub(base_in, base_used)?;

        Ok(BuyQuote {
            base_in,
            token_out,
            base_used,
            base_refund,
            new_virtual_base: math::checked_add(self.virtual_base, base_used)?,
            new_virtual_token: remaining,
            clamped: true,
        })
    }

    /// Price a sell of `token_in` back into the curve
    ///
    /// The post-sell base reserve is kept strictly above `k * S / new_virtual_token`,
    /// so before graduation a buy followed by a full sell never returns more
    /// than was paid in.
    ///
    /// # Errors
    /// `InsufficientHistory` if more tokens are offered than were ever sold
    pub fn quote_sell(&self, token_in: Amount) -> CurveResult<SellQuote> {
        if token_in == 0 {
            return Err(CurveError::ZeroAmount);
        }
        if token_in > self.sold_token {
            return Err(CurveError::InsufficientHistory {
                requested: token_in,
                sold: self.sold_token,
            });
        }

        let new_virtual_token = math::checked_add(self.virtual_token, token_in)?;
        let curve_base = math::checked_add(
            math::div_floor(self.k_scaled()?, new_virtual_token)?,
            1,
        )?;
        let raw_out = self.virtual_base.saturating_sub(curve_base);
        let base_out = raw_out.min(self.real_base);

        Ok(SellQuote {
            token_in,
            base_out,
            new_virtual_base: math::checked_sub(self.virtual_base, base_out)?,
            new_virtual_token,
            clamped: raw_out > self.real_base,
        })
    }

    /// State after committing `quote`
    ///
    /// The virtual reserves are taken from the quote verbatim, never recomputed.
    pub fn apply_buy(&self, quote: &BuyQuote) -> CurveResult<Self> {
        let mut next = *self;
        next.virtual_base = quote.new_virtual_base;
        next.virtual_token = quote.new_virtual_token;
        next.real_base = math::checked_add(self.real_base, quote.base_used)?;
        next.real_token = math::checked_sub(self.real_token, quote.token_out)?;
        next.sold_token = math::checked_add(self.sold_token, quote.token_out)?;
        next.verify_invariants()?;
        Ok(next)
    }

    /// State after committing `quote`
    pub fn apply_sell(&self, quote: &SellQuote) -> CurveResult<Self> {
        let mut next = *self;
        next.virtual_base = quote.new_virtual_base;
        next.virtual_token = quote.new_virtual_token;
        next.real_base = math::checked_sub(self.real_base, quote.base_out)?;
        next.real_token = math::checked_add(self.real_token, quote.token_in)?;
        next.sold_token = math::checked_sub(self.sold_token, quote.token_in)?;
        next.verify_invariants()?;
        Ok(next)
    }

    /// Pre-commit check of the reserve invariants
    pub fn verify_invariants(&self) -> CurveResult<()> {
        if self.reserve_product()? < self.k_scaled()? {
            return Err(CurveError::InvariantViolation(
                "virtual reserve product fell below k".to_string(),
            ));
        }
        if self.real_token > self.curve_supply {
            return Err(CurveError::InvariantViolation(
                "real token reserve exceeds curve supply".to_string(),
            ));
        }
        if math::checked_add(self.sold_token, self.real_token)? != self.curve_supply {
            return Err(CurveError::InvariantViolation(
                "sold and real token reserves do not sum to curve supply".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the real base reserve has reached the graduation threshold
    pub fn threshold_reached(&self) -> bool {
        self.real_base >= self.graduation_threshold
    }

    /// Graduation progress (0-100)
    pub fn graduation_progress_percent(&self) -> CurveResult<u8> {
        if self.graduation_threshold == 0 {
            return Ok(100);
        }
        let percent = math::mul_div_floor(self.real_base, 100, self.graduation_threshold)?;
        Ok(percent.min(100) as u8)
    }

    /// `k * S`
    pub fn k_scaled(&self) -> CurveResult<U256> {
        math::product(self.k, SCALE)
    }

    /// `virtual_base * virtual_token`
    pub fn reserve_product(&self) -> CurveResult<U256> {
        math::product(self.virtual_base, self.virtual_token)
    }
}
