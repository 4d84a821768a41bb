//! Price-impact bounded partial fill search.
//!
//! Finds the largest collateral amount that can be pushed through the AMM
//! without moving the implied YES probability by more than a cap. Impact is
//! non-decreasing in trade size for a constant-product pool, so a bisection
//! over `[0, max_collateral]` converges on the boundary. The iteration count
//! is fixed, which bounds latency regardless of the amount's magnitude.

use serde::{Deserialize, Serialize};

use super::amm_pool::AmmPool;
use super::amount::{Amount, Bps};
use super::market::{PoolState, Side};

/// Bisection steps used when none is configured.
pub const DEFAULT_SEARCH_ITERATIONS: u32 = 16;

/// Bisection search for the largest trade under an impact cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceImpactBounder {
    iterations: u32,
}

impl Default for PriceImpactBounder {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_ITERATIONS)
    }
}

impl PriceImpactBounder {
    pub const fn new(iterations: u32) -> Self {
        Self { iterations }
    }

    /// Largest amount in `[0, max_collateral]` whose impact is within `cap_bps`.
    ///
    /// The result is always feasible; it may undershoot the exact boundary
    /// by up to `max_collateral / 2^iterations`.
    pub fn max_under_impact(
        &self,
        pool: &PoolState,
        side: Side,
        max_collateral: Amount,
        fee_bps: Bps,
        cap_bps: Bps,
    ) -> Amount {
        if cap_bps == 0 || max_collateral == 0 {
            return 0;
        }
        let amm = AmmPool::new(pool);
        let within_cap = |amount: Amount| amm.price_impact(amount, side, fee_bps) <= cap_bps;

        if within_cap(max_collateral) {
            return max_collateral;
        }

        // lo: known feasible, hi: known infeasible
        let mut lo: Amount = 0;
        let mut hi = max_collateral;
        for _ in 0..self.iterations {
            let mid = lo + (hi - lo) / 2;
            if mid == lo {
                break;
            }
            if within_cap(mid) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amm_pool::INFEASIBLE_IMPACT_BPS;

    const UNIT: Amount = 1_000_000;

    #[test]
    fn test_zero_cap_returns_zero() {
        let pool = PoolState::balanced(500 * UNIT);
        let b = PriceImpactBounder::default();
        assert_eq!(b.max_under_impact(&pool, Side::Yes, 10 * UNIT, 74, 0), 0);
    }

    #[test]
    fn test_fast_path_returns_full_amount() {
        let pool = PoolState::balanced(500 * UNIT);
        let b = PriceImpactBounder::default();
        assert_eq!(b.max_under_impact(&pool, Side::Yes, 10 * UNIT, 74, 1200), 10 * UNIT);
    }

    #[test]
    fn test_search_result_is_feasible_and_tight() {
        let pool = PoolState::balanced(500 * UNIT);
        let b = PriceImpactBounder::default();
        let max = 300 * UNIT;
        let safe = b.max_under_impact(&pool, Side::Yes, max, 74, 1200);
        let amm = AmmPool::new(&pool);
        assert!(safe > 0 && safe < max);
        assert!(amm.price_impact(safe, Side::Yes, 74) <= 1200);
        // one resolution step further must break the cap
        let step = max >> 16;
        assert!(amm.price_impact(safe + 2 * step, Side::Yes, 74) > 1200);
    }

    #[test]
    fn test_empty_pool_admits_nothing() {
        let pool = PoolState::new(0, 0);
        let amm = AmmPool::new(&pool);
        assert_eq!(amm.price_impact(UNIT, Side::No, 74), INFEASIBLE_IMPACT_BPS);
        let b = PriceImpactBounder::default();
        assert_eq!(b.max_under_impact(&pool, Side::No, 50 * UNIT, 74, 1200), 0);
    }

    #[test]
    fn test_fewer_iterations_never_exceed_cap() {
        let pool = PoolState::new(300 * UNIT, 700 * UNIT);
        let coarse = PriceImpactBounder::new(4);
        let safe = coarse.max_under_impact(&pool, Side::No, 400 * UNIT, 50, 800);
        assert!(AmmPool::new(&pool).price_impact(safe, Side::No, 50) <= 800);
    }
}
