//! Fixed-point collateral amounts and basis-point arithmetic.
//!
//! Every quantity the router touches (collateral, shares, reserves) is an
//! integer count of base units. Prices, fees and spreads are integer bps.
//! Division always names its rounding direction so results stay bit-exact
//! with an on-chain counterpart.
//!
//! Exposes a `Decimal` boundary API (`to_units` / `from_units`) so callers
//! can speak in collateral dollars without touching base units.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Collateral or share quantity in base units.
pub type Amount = u128;

/// Basis points (1/100 of a percent).
pub type Bps = u32;

/// Number of decimals carried by collateral base units.
pub const COLLATERAL_DECIMALS: u32 = 6;

/// Base units per whole collateral unit.
pub const UNITS_PER_COLLATERAL: Amount = 1_000_000;

/// Denominator for all bps ratios.
pub const BPS_DENOMINATOR: Bps = 10_000;

/// Probability midpoint (50%) in bps.
pub const HALF_BPS: Bps = 5_000;

/// Direction of an integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Truncate toward zero.
    Down,
    /// Ceiling.
    Up,
    /// Round half up.
    Nearest,
}

/// Computes `a * b / d` with an explicit rounding direction.
///
/// Returns `None` if `d` is zero or the intermediate product overflows.
pub fn mul_div(a: u128, b: u128, d: u128, rounding: Rounding) -> Option<u128> {
    if d == 0 {
        return None;
    }
    let product = a.checked_mul(b)?;
    let quotient = product / d;
    let remainder = product % d;
    match rounding {
        Rounding::Down => Some(quotient),
        Rounding::Up if remainder > 0 => quotient.checked_add(1),
        Rounding::Up => Some(quotient),
        // remainder < d, so comparing 2r >= d avoids overflowing the sum
        Rounding::Nearest if remainder >= d - remainder => quotient.checked_add(1),
        Rounding::Nearest => Some(quotient),
    }
}

/// Share of `part` in `whole`, expressed in bps.
///
/// Returns `None` when `whole` is zero so callers can apply their own
/// empty-state convention. When `part * 10000` would overflow, `whole` is
/// first divided down to one bps step and the result truncates.
pub fn ratio_bps(part: Amount, whole: Amount, rounding: Rounding) -> Option<Bps> {
    if whole == 0 {
        return None;
    }
    let denominator = Amount::from(BPS_DENOMINATOR);
    let bps = match mul_div(part, denominator, whole, rounding) {
        Some(bps) => bps,
        // only reachable for part > u128::MAX / 10000, so the step is large
        None => part / (whole / denominator).max(1),
    };
    Bps::try_from(bps).ok()
}

/// Converts a collateral value (e.g. `dec!(12.5)`) to base units.
///
/// Digits beyond `COLLATERAL_DECIMALS` are truncated. Negative values
/// are not representable and yield `None`.
pub fn to_units(value: Decimal) -> Option<Amount> {
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    let scaled = value.checked_mul(Decimal::from(UNITS_PER_COLLATERAL))?;
    scaled.trunc().to_u128()
}

/// Converts base units back to a collateral value.
pub fn from_units(units: Amount) -> Decimal {
    match i128::try_from(units) {
        Ok(raw) => Decimal::try_from_i128_with_scale(raw, COLLATERAL_DECIMALS)
            .unwrap_or(Decimal::MAX),
        Err(_) => Decimal::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_mul_div_rounding_directions() {
        assert_eq!(mul_div(7, 1, 2, Rounding::Down), Some(3));
        assert_eq!(mul_div(7, 1, 2, Rounding::Up), Some(4));
        assert_eq!(mul_div(7, 1, 2, Rounding::Nearest), Some(4));
        assert_eq!(mul_div(10, 1, 3, Rounding::Nearest), Some(3));
        assert_eq!(mul_div(10, 1, 5, Rounding::Up), Some(2));
    }

    #[test]
    fn test_mul_div_rejects_zero_divisor_and_overflow() {
        assert_eq!(mul_div(1, 1, 0, Rounding::Down), None);
        assert_eq!(mul_div(u128::MAX, 2, 1, Rounding::Down), None);
    }

    #[test]
    fn test_ratio_bps() {
        assert_eq!(ratio_bps(1, 3, Rounding::Down), Some(3333));
        assert_eq!(ratio_bps(2, 3, Rounding::Nearest), Some(6667));
        assert_eq!(ratio_bps(5, 0, Rounding::Down), None);
    }

    #[test]
    fn test_ratio_bps_survives_overflowing_product() {
        let whole = u128::MAX / 2;
        assert_eq!(ratio_bps(whole, whole, Rounding::Nearest), Some(10_000));
        assert_eq!(ratio_bps(whole / 4, whole, Rounding::Nearest), Some(2_500));
        assert_eq!(ratio_bps(whole / 4 * 3, whole, Rounding::Down), Some(7_500));
    }

    #[test]
    fn test_decimal_boundary() {
        assert_eq!(to_units(dec!(12.5)), Some(12_500_000));
        assert_eq!(to_units(dec!(0.0000019)), Some(1));
        assert_eq!(to_units(dec!(-1)), None);
        assert_eq!(from_units(75_750_000), dec!(75.75));
    }
}
