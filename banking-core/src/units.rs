//! Conversion between human token amounts and integer base units.

use alloy_primitives::utils::{self, ParseUnits};
use alloy_primitives::U256;
use banking::BankingError;
use thiserror::Error;

/// Widest decimal that always fits in a `U256`.
const MAX_DIGITS: usize = 77;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a valid decimal amount")]
    Malformed(String),
    #[error("'{amount}' has more than {decimals} fractional digits")]
    TooPrecise { amount: String, decimals: u8 },
    #[error("'{0}' does not fit in 256 bits")]
    Overflow(String),
    #[error("unit conversion failed: {0}")]
    Conversion(String),
}

impl From<UnitsError> for BankingError {
    fn from(e: UnitsError) -> Self {
        BankingError::InvalidInput(e.to_string())
    }
}

impl From<utils::UnitsError> for UnitsError {
    fn from(e: utils::UnitsError) -> Self {
        UnitsError::Conversion(e.to_string())
    }
}

/// Parses a non-negative decimal string into base units, exactly.
///
/// `parse_units("12.5", 6)` is `12_500_000`. Trailing fractional zeros beyond
/// `decimals` are accepted; significant ones are rejected rather than truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, UnitsError> {
    let amount = amount.trim();
    validate_decimal(amount)?;

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if fraction.trim_end_matches('0').len() > decimals as usize {
        return Err(UnitsError::TooPrecise {
            amount: amount.to_string(),
            decimals,
        });
    }
    if whole.trim_start_matches('0').len() + decimals as usize > MAX_DIGITS {
        return Err(UnitsError::Overflow(amount.to_string()));
    }

    match utils::parse_units(amount, decimals)? {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(UnitsError::Malformed(amount.to_string())),
    }
}

/// Checks that `amount` is a plain non-negative decimal ("12", "12.5", ".5").
pub fn validate_decimal(amount: &str) -> Result<(), UnitsError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(UnitsError::Empty);
    }
    let well_formed = amount.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && amount.bytes().filter(|&b| b == b'.').count() <= 1
        && amount.bytes().any(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(UnitsError::Malformed(amount.to_string()));
    }
    Ok(())
}

/// Converts base units into a display value (`raw / 10^decimals`).
pub fn format_units(raw: U256, decimals: u8) -> Result<f64, UnitsError> {
    let text = utils::format_units(raw, decimals)?;
    text.parse::<f64>()
        .map_err(|_| UnitsError::Malformed(text))
}
