//! Constant-product swap primitive over a YES/NO pool.
//!
//! Buying an outcome through the pool mints a YES+NO pair from the
//! collateral, then swaps the unwanted half for more of the wanted side.
//! The fee is taken from the input side, in bps.
//!
//! The pool snapshot is never mutated here: every call simulates against
//! the reserves it was built from.

use serde::Serialize;

use super::amount::{Amount, BPS_DENOMINATOR, Bps};
use super::market::{PoolState, Side};

/// Price impact reported for a swap that would drain the output reserve.
pub const INFEASIBLE_IMPACT_BPS: Bps = BPS_DENOMINATOR + 1;

/// Outcome of a simulated AMM buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmmQuote {
    /// Wanted-side shares received from the swap leg.
    pub swap_out: Amount,
    /// Total shares delivered: the minted leg plus the swap leg.
    pub shares_out: Amount,
    /// Absolute change of the implied YES probability.
    pub price_impact_bps: Bps,
}

/// Read-only constant-product view over a pool snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AmmPool<'a> {
    state: &'a PoolState,
}

impl<'a> AmmPool<'a> {
    pub const fn new(state: &'a PoolState) -> Self {
        Self { state }
    }

    /// Output of swapping `amount_in` of the opposite side for `side`.
    ///
    /// Returns `None` when the swap is not executable: an empty reserve,
    /// an output that would drain the reserve, or arithmetic overflow.
    /// A zero output from a tiny input is `Some(0)`.
    pub fn swap(&self, amount_in: Amount, side: Side, fee_bps: Bps) -> Option<Amount> {
        let (reserve_in, reserve_out) = self.state.swap_reserves(side);
        if reserve_in == 0 || reserve_out == 0 {
            return None;
        }
        let fee_bps = fee_bps.min(BPS_DENOMINATOR);
        let denominator_bps = Amount::from(BPS_DENOMINATOR);
        let amount_in_with_fee =
            amount_in.checked_mul(Amount::from(BPS_DENOMINATOR - fee_bps))?;
        let numerator = amount_in_with_fee.checked_mul(reserve_out)?;
        let denominator = reserve_in
            .checked_mul(denominator_bps)?
            .checked_add(amount_in_with_fee)?;
        let swap_out = numerator / denominator;

        if swap_out >= reserve_out {
            return None;
        }
        Some(swap_out)
    }

    /// Pool state after a buy of `side` with `collateral_in`.
    ///
    /// Returns `None` when the swap is not executable.
    pub fn pool_after(&self, collateral_in: Amount, side: Side, fee_bps: Bps) -> Option<PoolState> {
        let swap_out = self.swap(collateral_in, side, fee_bps)?;
        let s = self.state;
        let after = match side {
            Side::Yes => PoolState::new(
                s.yes_reserve - swap_out,
                s.no_reserve.checked_add(collateral_in)?,
            ),
            Side::No => PoolState::new(
                s.yes_reserve.checked_add(collateral_in)?,
                s.no_reserve - swap_out,
            ),
        };
        Some(after)
    }

    /// Absolute YES-probability move caused by buying `side`.
    ///
    /// A non-executable swap reports `INFEASIBLE_IMPACT_BPS`, which exceeds
    /// any cap, so "infeasible" never reads as "no impact".
    pub fn price_impact(&self, collateral_in: Amount, side: Side, fee_bps: Bps) -> Bps {
        self.pool_after(collateral_in, side, fee_bps)
            .map_or(INFEASIBLE_IMPACT_BPS, |after| {
                after.p_yes_bps().abs_diff(self.state.p_yes_bps())
            })
    }

    /// Simulates a full buy: split, swap, and measure the impact.
    pub fn buy(&self, collateral_in: Amount, side: Side, fee_bps: Bps) -> Option<AmmQuote> {
        let after = self.pool_after(collateral_in, side, fee_bps)?;
        let swap_out = self.state.reserve(side) - after.reserve(side);
        Some(AmmQuote {
            swap_out,
            shares_out: collateral_in.checked_add(swap_out)?,
            price_impact_bps: after.p_yes_bps().abs_diff(self.state.p_yes_bps()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Amount = 1_000_000;

    #[test]
    fn test_swap_matches_constant_product() {
        let pool = PoolState::balanced(500);
        let amm = AmmPool::new(&pool);
        // 100 * 9970 * 500 / (500 * 10000 + 100 * 9970) = 83.12.. -> 83
        assert_eq!(amm.swap(100, Side::Yes, 30), Some(83));
    }

    #[test]
    fn test_empty_reserve_cannot_swap() {
        let pool = PoolState::new(0, 500);
        let amm = AmmPool::new(&pool);
        assert_eq!(amm.swap(10, Side::Yes, 30), None);
        assert_eq!(amm.price_impact(10, Side::Yes, 30), INFEASIBLE_IMPACT_BPS);
        assert!(amm.buy(10, Side::No, 30).is_none());
    }

    #[test]
    fn test_swap_that_would_drain_is_rejected() {
        // a 1-unit reserve_out with a large input floors to 0, never 1
        let pool = PoolState::new(1, 1);
        let amm = AmmPool::new(&pool);
        assert_eq!(amm.swap(1_000_000, Side::Yes, 0), Some(0));
        let pool = PoolState::new(2, 1);
        let amm = AmmPool::new(&pool);
        assert!(amm.swap(1_000_000, Side::Yes, 0).unwrap_or(0) < 2);
    }

    #[test]
    fn test_buy_yes_raises_p_yes() {
        let pool = PoolState::balanced(500 * UNIT);
        let amm = AmmPool::new(&pool);
        let after = amm.pool_after(50 * UNIT, Side::Yes, 74).unwrap();
        assert!(after.p_yes_bps() > pool.p_yes_bps());
        assert!(after.yes_reserve < pool.yes_reserve);
        assert_eq!(after.no_reserve, 550 * UNIT);
    }

    #[test]
    fn test_buy_returns_minted_plus_swapped() {
        let pool = PoolState::balanced(500 * UNIT);
        let amm = AmmPool::new(&pool);
        let quote = amm.buy(50 * UNIT, Side::No, 74).unwrap();
        assert_eq!(quote.shares_out, 50 * UNIT + quote.swap_out);
        assert_eq!(quote.price_impact_bps, amm.price_impact(50 * UNIT, Side::No, 74));
        assert!(quote.price_impact_bps > 0);
    }

    #[test]
    fn test_price_impact_does_not_mutate() {
        let pool = PoolState::balanced(500 * UNIT);
        let amm = AmmPool::new(&pool);
        let first = amm.price_impact(120 * UNIT, Side::Yes, 74);
        let second = amm.price_impact(120 * UNIT, Side::Yes, 74);
        assert_eq!(first, second);
        assert_eq!(pool, PoolState::balanced(500 * UNIT));
    }
}
