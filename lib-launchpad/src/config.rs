//! Launch Registry Configuration
//!
//! Platform-wide fee and curve parameters. Mutated only through
//! `LaunchRegistry::update_config`, which validates every value against its cap.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use lib_curve::SCALE;
use lib_types::{Address, Amount, Bps, BPS_DENOMINATOR};

use crate::errors::{bps_too_high, LaunchError, LaunchResult};

/// Default launch fee: 0.01 base
pub const DEFAULT_LAUNCH_FEE: Amount = SCALE / 100;

/// Launch fee cap: 1 base
pub const MAX_LAUNCH_FEE: Amount = SCALE;

/// Default trading fee: 1%
pub const DEFAULT_TRADING_FEE_BPS: Bps = 100;

/// Trading fee cap: 5%
pub const MAX_TRADING_FEE_BPS: Bps = 500;

/// Default graduation threshold: 18 base
pub const DEFAULT_GRADUATION_THRESHOLD: Amount = 18 * SCALE;

/// Default share of total supply sold through the curve: 50%
pub const DEFAULT_CURVE_SUPPLY_BPS: Bps = 5_000;

/// Longest accepted ticker symbol, in bytes
pub const MAX_SYMBOL_LEN: usize = 10;

/// Launch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Fee required to launch an asset
    #[serde(serialize_with = "serialize_amount", deserialize_with = "deserialize_amount")]
    pub launch_fee: Amount,

    /// Fee taken from every trade, in basis points
    pub trading_fee_bps: Bps,

    /// Threshold used when launch parameters do not set one
    #[serde(serialize_with = "serialize_amount", deserialize_with = "deserialize_amount")]
    pub graduation_threshold_default: Amount,

    /// Share of total supply allotted to the curve, in basis points
    pub curve_supply_bps: Bps,

    /// Destination of launch and trading fees
    #[serde(serialize_with = "serialize_address", deserialize_with = "deserialize_address")]
    pub fee_recipient: Address,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            launch_fee: DEFAULT_LAUNCH_FEE,
            trading_fee_bps: DEFAULT_TRADING_FEE_BPS,
            graduation_threshold_default: DEFAULT_GRADUATION_THRESHOLD,
            curve_supply_bps: DEFAULT_CURVE_SUPPLY_BPS,
            fee_recipient: Address::zero(),
        }
    }
}

impl LaunchConfig {
    /// Default configuration routing fees to `fee_recipient`
    pub fn with_fee_recipient(fee_recipient: Address) -> Self {
        Self {
            fee_recipient,
            ..Self::default()
        }
    }

    /// Check every value against its cap
    pub fn validate(&self) -> LaunchResult<()> {
        if self.launch_fee > MAX_LAUNCH_FEE {
            return Err(LaunchError::FeeTooHigh {
                field: "launch_fee",
                value: self.launch_fee,
                cap: MAX_LAUNCH_FEE,
            });
        }
        if self.trading_fee_bps > MAX_TRADING_FEE_BPS {
            return Err(bps_too_high(
                "trading_fee_bps",
                self.trading_fee_bps,
                MAX_TRADING_FEE_BPS,
            ));
        }
        if self.graduation_threshold_default == 0 {
            return Err(LaunchError::InvalidParameters(
                "graduation_threshold_default must be greater than zero".to_string(),
            ));
        }
        if self.curve_supply_bps == 0 || self.curve_supply_bps > BPS_DENOMINATOR {
            return Err(LaunchError::InvalidParameters(format!(
                "curve_supply_bps must be in 1..={}, got {}",
                BPS_DENOMINATOR, self.curve_supply_bps
            )));
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: LaunchConfig =
            toml::from_str(content).context("Failed to parse launch config TOML")?;
        config
            .validate()
            .context("Launch config failed validation")?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read launch config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid launch config {}", path.display()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).context("Failed to encode launch config")
    }
}

/// Partial configuration change
///
/// Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub launch_fee: Option<Amount>,
    pub trading_fee_bps: Option<Bps>,
    pub graduation_threshold_default: Option<Amount>,
    pub curve_supply_bps: Option<Bps>,
    pub fee_recipient: Option<Address>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Configuration resulting from applying this update to `current`
    pub fn apply_to(&self, current: &LaunchConfig) -> LaunchResult<LaunchConfig> {
        let next = LaunchConfig {
            launch_fee: self.launch_fee.unwrap_or(current.launch_fee),
            trading_fee_bps: self.trading_fee_bps.unwrap_or(current.trading_fee_bps),
            graduation_threshold_default: self
                .graduation_threshold_default
                .unwrap_or(current.graduation_threshold_default),
            curve_supply_bps: self.curve_supply_bps.unwrap_or(current.curve_supply_bps),
            fee_recipient: self.fee_recipient.unwrap_or(current.fee_recipient),
        };
        next.validate()?;
        Ok(next)
    }
}

/// Audit record of a configuration update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChange {
    pub previous: LaunchConfig,
    pub current: LaunchConfig,
}

// Amounts exceed the 64-bit TOML integer range, so human-readable formats
// carry them as decimal strings.
fn serialize_amount<S>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&value.to_string())
    } else {
        value.serialize(serializer)
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return Amount::deserialize(deserializer);
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Integer(value) => Ok(Amount::from(value)),
        Raw::Text(text) => text.trim().replace('_', "").parse::<Amount>().map_err(|e| {
            serde::de::Error::custom(format!("invalid amount {:?}: {}", text, e))
        }),
    }
}

fn serialize_address<S>(value: &Address, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if serializer.is_human_readable() {
        serializer.serialize_str(&value.to_string())
    } else {
        value.serialize(serializer)
    }
}

fn deserialize_address<'de, D>(deserializer: D) -> Result<Address, D::Error>
where
    D: Deserializer<'de>,
{
    if !deserializer.is_human_readable() {
        return Address::deserialize(deserializer);
    }
    let text = String::deserialize(deserializer)?;
    text.parse::<Address>()
        .map_err(|e| serde::de::Error::custom(format!("invalid address {:?}: {}", text, e)))
}
