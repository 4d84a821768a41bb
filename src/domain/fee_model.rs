//! Dynamic AMM fee curve.
//!
//! The fee charged by the pool is the sum of three terms, capped:
//! - bootstrap: decays linearly from `max_fee_bps` to `min_fee_bps` over
//!   the bootstrap window, then stays at the floor
//! - skew: quadratic in the pool's distance from 50%, saturating at
//!   `skew_ref_bps`
//! - asymmetric: linear in the same distance
//!
//! Every division truncates.

use serde::{Deserialize, Serialize};

use super::amount::{Bps, HALF_BPS};
use super::market::PoolState;

/// Fee curve parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// Steady-state fee once the bootstrap window has elapsed.
    pub min_fee_bps: Bps,
    /// Fee at pool creation.
    pub max_fee_bps: Bps,
    /// Length of the linear decay.
    pub bootstrap_window_seconds: u64,
    /// Skew fee once skew reaches `skew_ref_bps`.
    pub max_skew_fee_bps: Bps,
    /// Distance from 50% at which the skew fee saturates.
    pub skew_ref_bps: Bps,
    /// Asymmetric fee at a fully one-sided pool.
    pub asymmetric_fee_bps: Bps,
    /// Hard cap on the total.
    pub fee_cap_bps: Bps,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            min_fee_bps: 10,
            max_fee_bps: 75,
            bootstrap_window_seconds: 2 * 24 * 3600,
            max_skew_fee_bps: 80,
            skew_ref_bps: 4000,
            asymmetric_fee_bps: 20,
            fee_cap_bps: 300,
        }
    }
}

/// Per-term fee decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeeBreakdown {
    pub bootstrap_bps: Bps,
    pub skew_bps: Bps,
    pub asymmetric_bps: Bps,
    /// Sum of the terms after the cap.
    pub total_bps: Bps,
}

/// Pure fee function over a pool snapshot and the bootstrap clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeModel {
    schedule: FeeSchedule,
}

impl FeeModel {
    pub const fn new(schedule: FeeSchedule) -> Self {
        Self { schedule }
    }

    pub const fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Total fee in bps, within `[0, fee_cap_bps]`.
    pub fn fee(&self, pool: &PoolState, elapsed_seconds: u64) -> Bps {
        self.breakdown(pool, elapsed_seconds).total_bps
    }

    /// Fee with each term reported separately.
    pub fn breakdown(&self, pool: &PoolState, elapsed_seconds: u64) -> FeeBreakdown {
        let skew = pool.p_yes_bps().abs_diff(HALF_BPS);
        let bootstrap_bps = self.bootstrap_fee(elapsed_seconds);
        let skew_bps = self.skew_fee(skew);
        let asymmetric_bps = self.asymmetric_fee(skew);

        let total_bps = bootstrap_bps
            .saturating_add(skew_bps)
            .saturating_add(asymmetric_bps)
            .min(self.schedule.fee_cap_bps);

        FeeBreakdown {
            bootstrap_bps,
            skew_bps,
            asymmetric_bps,
            total_bps,
        }
    }

    /// Linearly decaying launch fee.
    pub fn bootstrap_fee(&self, elapsed_seconds: u64) -> Bps {
        let s = &self.schedule;
        let window = s.bootstrap_window_seconds;
        if elapsed_seconds >= window {
            return s.min_fee_bps;
        }
        let range = u64::from(s.max_fee_bps.saturating_sub(s.min_fee_bps));
        // elapsed < window, so the decay is strictly below `range`
        let decay = range * elapsed_seconds / window;
        s.max_fee_bps - Bps::try_from(decay).unwrap_or(0)
    }

    /// Quadratic skew fee, saturating at `max_skew_fee_bps`.
    pub fn skew_fee(&self, skew_bps: Bps) -> Bps {
        let s = &self.schedule;
        if skew_bps >= s.skew_ref_bps {
            return s.max_skew_fee_bps;
        }
        let skew = u64::from(skew_bps);
        let reference = u64::from(s.skew_ref_bps);
        let fee = u64::from(s.max_skew_fee_bps) * skew * skew / (reference * reference);
        Bps::try_from(fee).unwrap_or(s.max_skew_fee_bps)
    }

    /// Linear asymmetric fee.
    pub fn asymmetric_fee(&self, skew_bps: Bps) -> Bps {
        let fee = u64::from(self.schedule.asymmetric_fee_bps) * u64::from(skew_bps)
            / u64::from(HALF_BPS);
        Bps::try_from(fee).unwrap_or(Bps::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> FeeModel {
        FeeModel::default()
    }

    #[test]
    fn test_bootstrap_decay_truncates() {
        let m = model();
        assert_eq!(m.bootstrap_fee(0), 75);
        // 65 * 3600 / 172800 = 1.35 -> 1
        assert_eq!(m.bootstrap_fee(3600), 74);
        // 65 * 86400 / 172800 = 32.5 -> 32
        assert_eq!(m.bootstrap_fee(24 * 3600), 43);
        assert_eq!(m.bootstrap_fee(172_800), 10);
        assert_eq!(m.bootstrap_fee(10_000_000), 10);
    }

    #[test]
    fn test_zero_window_is_steady_state() {
        let m = FeeModel::new(FeeSchedule {
            bootstrap_window_seconds: 0,
            ..FeeSchedule::default()
        });
        assert_eq!(m.bootstrap_fee(0), 10);
    }

    #[test]
    fn test_balanced_pool_has_no_skew_terms() {
        let b = model().breakdown(&PoolState::balanced(500), 3600);
        assert_eq!(b.skew_bps, 0);
        assert_eq!(b.asymmetric_bps, 0);
        assert_eq!(b.total_bps, 74);
    }

    #[test]
    fn test_skew_fee_is_quadratic() {
        let m = model();
        // skew 2000 of ref 4000 -> 80 * 1/4
        assert_eq!(m.skew_fee(2000), 20);
        assert_eq!(m.skew_fee(1000), 5);
        assert_eq!(m.skew_fee(4000), 80);
        assert_eq!(m.skew_fee(4500), 80);
    }

    #[test]
    fn test_skewed_pool_post_bootstrap() {
        // p_yes = 8000 -> skew 3000: 80 * 9/16 = 45, asym 20 * 3000/5000 = 12
        let pool = PoolState::new(200, 800);
        let b = model().breakdown(&pool, 172_801);
        assert_eq!(b.bootstrap_bps, 10);
        assert_eq!(b.skew_bps, 45);
        assert_eq!(b.asymmetric_bps, 12);
        assert_eq!(b.total_bps, 67);
    }

    #[test]
    fn test_total_is_capped() {
        let m = FeeModel::new(FeeSchedule {
            fee_cap_bps: 50,
            ..FeeSchedule::default()
        });
        assert_eq!(m.fee(&PoolState::new(50, 950), 0), 50);
    }
}
