// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Conversion between display units (SOL, ETH) and smallest units
//! (lamports, wei).

use std::borrow::Cow;

use super::gateway::ChainError;

/// Decimals of SOL (1 SOL = 10^9 lamports).
pub const SOL_DECIMALS: u8 = 9;

/// Decimals of ETH (1 ETH = 10^18 wei).
pub const ETH_DECIMALS: u8 = 18;

/// Largest exponent magnitude accepted in scientific notation.
const MAX_EXPONENT: u32 = 64;

fn digits_only(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

fn not_decimal(amount: &str) -> ChainError {
    ChainError::InvalidAmount(format!("`{amount}` is not a decimal number"))
}

/// Rewrite scientific notation as a plain decimal, exactly.
///
/// `1.5e-7` becomes `0.00000015`; inputs without an exponent are returned
/// unchanged. JSON numbers such as `0.0000001` reach us in this form.
fn expand_exponent(amount: &str) -> Result<Cow<'_, str>, ChainError> {
    let Some((mantissa, exponent)) = amount.split_once(['e', 'E']) else {
        return Ok(Cow::Borrowed(amount));
    };

    let exponent: i64 = exponent.parse().map_err(|_| not_decimal(amount))?;
    if exponent.unsigned_abs() > MAX_EXPONENT as u64 {
        return Err(ChainError::InvalidAmount(format!(
            "Exponent of `{amount}` is out of range"
        )));
    }

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(not_decimal(amount));
    }

    let digits = format!("{whole}{fraction}");
    let point = whole.len() as i64 + exponent;
    let plain = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(point.unsigned_abs() as usize))
    } else if point as usize >= digits.len() {
        format!("{digits}{}", "0".repeat(point as usize - digits.len()))
    } else {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    };

    // Trailing fractional zeros carry no precision.
    let plain = if plain.contains('.') {
        plain.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        plain
    };
    Ok(Cow::Owned(plain))
}

/// Parse a positive human-readable amount into smallest units.
///
/// Plain decimals and scientific notation (`1e-7`) are both accepted.
///
/// # Arguments
/// * `amount` - Amount as a string (e.g., "1.5")
/// * `decimals` - Number of decimals (9 for SOL, 18 for ETH)
///
/// # Returns
/// * `Ok(u128)` - Amount in smallest unit, always greater than zero
/// * `Err` - If the amount is malformed, not positive, or too precise
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u128, ChainError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ChainError::InvalidAmount("Amount is empty".to_string()));
    }
    if amount.starts_with('-') {
        return Err(ChainError::InvalidAmount(
            "Amount must be greater than zero".to_string(),
        ));
    }

    let expanded = expand_exponent(amount)?;
    let (whole_str, frac_str) = match expanded.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (&*expanded, ""),
    };

    if (whole_str.is_empty() && frac_str.is_empty())
        || !digits_only(whole_str)
        || !digits_only(frac_str)
    {
        return Err(not_decimal(amount));
    }

    if frac_str.len() > decimals as usize {
        return Err(ChainError::InvalidAmount(format!(
            "Too many decimal places (max {decimals})"
        )));
    }

    let whole: u128 = if whole_str.is_empty() {
        0
    } else {
        whole_str
            .parse()
            .map_err(|_| ChainError::InvalidAmount("Amount overflow".to_string()))?
    };

    let fraction: u128 = if frac_str.is_empty() {
        0
    } else {
        // Pad with zeros to match decimals
        format!("{:0<width$}", frac_str, width = decimals as usize)
            .parse()
            .map_err(|_| ChainError::InvalidAmount("Invalid decimal".to_string()))?
    };

    let multiplier = 10u128.pow(decimals as u32);
    let total = whole
        .checked_mul(multiplier)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| ChainError::InvalidAmount("Amount overflow".to_string()))?;

    if total == 0 {
        return Err(ChainError::InvalidAmount(
            "Amount must be greater than zero".to_string(),
        ));
    }

    Ok(total)
}

/// Format a smallest-unit integer (given as decimal digits) with exactly
/// `decimals` fractional digits.
///
/// `format_units("1000000000", 9)` is `"1.000000000"`.
pub fn format_units(raw: &str, decimals: u8) -> String {
    let digits = raw.trim_start_matches('0');
    let width = decimals as usize;

    if width == 0 {
        return if digits.is_empty() { "0".to_string() } else { digits.to_string() };
    }

    let padded = format!("{:0>width$}", digits, width = width + 1);
    let (whole, fraction) = padded.split_at(padded.len() - width);
    format!("{whole}.{fraction}")
}

/// Lamports to SOL with 9 decimals.
pub fn lamports_to_sol(lamports: u64) -> String {
    format_units(&lamports.to_string(), SOL_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sol_has_nine_decimals() {
        assert_eq!(lamports_to_sol(1_000_000_000), "1.000000000");
    }

    #[test]
    fn format_pads_small_and_zero_values() {
        assert_eq!(lamports_to_sol(0), "0.000000000");
        assert_eq!(lamports_to_sol(5), "0.000000005");
        assert_eq!(lamports_to_sol(1_234_567_891), "1.234567891");
        assert_eq!(format_units("1500000000000000000", ETH_DECIMALS), "1.500000000000000000");
        assert_eq!(format_units("0", ETH_DECIMALS), "0.000000000000000000");
    }

    #[test]
    fn format_handles_values_wider_than_u128() {
        let raw = "1".repeat(45);
        let formatted = format_units(&raw, ETH_DECIMALS);
        assert_eq!(formatted.len(), 46);
        assert!(formatted.ends_with(&format!(".{}", "1".repeat(18))));
    }

    #[test]
    fn parse_whole_and_fractional_amounts() {
        assert_eq!(parse_amount("1", SOL_DECIMALS).unwrap(), 1_000_000_000);
        assert_eq!(parse_amount("1.5", SOL_DECIMALS).unwrap(), 1_500_000_000);
        assert_eq!(parse_amount("0.000000001", SOL_DECIMALS).unwrap(), 1);
        assert_eq!(parse_amount(".25", SOL_DECIMALS).unwrap(), 250_000_000);
        assert_eq!(
            parse_amount("0.001", ETH_DECIMALS).unwrap(),
            1_000_000_000_000_000
        );
    }

    #[test]
    fn parse_rejects_non_positive_amounts() {
        for amount in ["0", "0.0", "-1", "-0.5", "000"] {
            assert!(
                matches!(parse_amount(amount, SOL_DECIMALS), Err(ChainError::InvalidAmount(_))),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn parse_rejects_malformed_amounts() {
        for amount in ["", ".", "abc", "1.2.3", "1e", "e5", "1e5.5", "1,5", " 1 . 5"] {
            assert!(parse_amount(amount, SOL_DECIMALS).is_err(), "{amount} should be rejected");
        }
    }

    #[test]
    fn parse_expands_scientific_notation() {
        assert_eq!(parse_amount("1e-7", SOL_DECIMALS).unwrap(), 100);
        assert_eq!(parse_amount("1.5e-8", SOL_DECIMALS).unwrap(), 15);
        assert_eq!(parse_amount("1E-9", SOL_DECIMALS).unwrap(), 1);
        assert_eq!(parse_amount("2.5e3", SOL_DECIMALS).unwrap(), 2_500_000_000_000);
        assert_eq!(parse_amount("1e+2", SOL_DECIMALS).unwrap(), 100_000_000_000);
        assert_eq!(parse_amount("1.20e1", SOL_DECIMALS).unwrap(), 12_000_000_000);
        assert_eq!(parse_amount("1e-18", ETH_DECIMALS).unwrap(), 1);
    }

    #[test]
    fn parse_rejects_scientific_notation_beyond_precision() {
        let err = parse_amount("1e-10", SOL_DECIMALS).unwrap_err();
        assert!(err.to_string().contains("max 9"));
        assert!(parse_amount("0e-3", SOL_DECIMALS).is_err());
        assert!(parse_amount("1e-1000", SOL_DECIMALS).is_err());
        assert!(parse_amount("1e40", ETH_DECIMALS).is_err());
    }

    #[test]
    fn parse_rejects_excess_precision() {
        let err = parse_amount("0.0000000001", SOL_DECIMALS).unwrap_err();
        assert!(err.to_string().contains("max 9"));
    }

    #[test]
    fn parse_rejects_overflow() {
        let huge = "9".repeat(40);
        assert!(parse_amount(&huge, ETH_DECIMALS).is_err());
    }
}
