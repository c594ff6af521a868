//! Conversions between decimal token amounts and 18 decimals base units.

use alloy::primitives::{
    utils::{format_units, parse_units},
    U256,
};

use crate::{constants::TOKEN_DECIMALS, errors::ScriptError};

/// Decimal amount (e.g. `"1000.5"`) to base units
pub fn to_wei(amount: &str) -> Result<U256, ScriptError> {
    let parsed = parse_units(amount.trim(), TOKEN_DECIMALS)
        .map_err(|e| ScriptError::Units(format!("{}: {}", amount, e)))?;
    if parsed.is_negative() {
        return Err(ScriptError::Units(format!("{}: negative amount", amount)));
    }
    Ok(parsed.get_absolute())
}

/// Float amount to base units, used for prices fetched from the API
pub fn to_wei_f64(amount: f64) -> Result<U256, ScriptError> {
    if !amount.is_finite() {
        return Err(ScriptError::Units(format!("{}: not a finite amount", amount)));
    }
    // Display of f64 never uses exponents, but may carry more decimals than we support
    let rendered = amount.to_string();
    let truncated = match rendered.split_once('.') {
        Some((whole, fraction)) if fraction.len() > TOKEN_DECIMALS as usize => {
            format!("{}.{}", whole, &fraction[..TOKEN_DECIMALS as usize])
        }
        _ => rendered,
    };
    to_wei(&truncated)
}

/// Base units to a float amount
pub fn from_wei(amount: U256) -> f64 {
    format_units(amount, TOKEN_DECIMALS)
        .ok()
        .and_then(|rendered| rendered.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ether(whole: u64) -> U256 {
        U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(to_wei("10000").unwrap(), ether(10_000));
        assert_eq!(to_wei("0.5").unwrap(), ether(1) / U256::from(2u64));
        assert_eq!(to_wei("0.000000001").unwrap(), U256::from(1_000_000_000u64));
    }

    #[test]
    fn rejects_garbage_and_negative_amounts() {
        assert!(to_wei("abc").is_err());
        assert!(to_wei("-1").is_err());
    }

    #[test]
    fn float_prices() {
        assert_eq!(to_wei_f64(3000.0).unwrap(), ether(3000));
        assert_eq!(to_wei_f64(0.1).unwrap(), U256::from(100_000_000_000_000_000u64));
        assert_eq!(to_wei_f64(1e-20).unwrap(), U256::ZERO);
        assert!(to_wei_f64(f64::NAN).is_err());
    }

    #[test]
    fn back_to_decimal() {
        assert_eq!(from_wei(ether(5_000)), 5_000.0);
        assert_eq!(from_wei(U256::from(500_000_000_000_000_000u64)), 0.5);
        assert_eq!(from_wei(U256::ZERO), 0.0);
    }
}
