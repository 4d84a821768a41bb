//! Market state snapshots and the trade request.
//!
//! `PoolState` and `VaultState` are owned by the settlement layer and handed
//! to the router by reference. The router never mutates the pool; the vault
//! is debited only by an executed OTC fill.

use serde::{Deserialize, Serialize};

use super::amount::{Amount, BPS_DENOMINATOR, Bps, HALF_BPS, Rounding, ratio_bps};

pub const SECONDS_PER_HOUR: u64 = 3600;

/// Outcome side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    /// Returns the opposite outcome.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Price of this side given the YES probability.
    pub const fn price_bps(self, p_yes_bps: Bps) -> Bps {
        match self {
            Self::Yes => p_yes_bps,
            Self::No => BPS_DENOMINATOR.saturating_sub(p_yes_bps),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yes => write!(f, "YES"),
            Self::No => write!(f, "NO"),
        }
    }
}

/// Constant-product pool reserves.
///
/// The implied YES probability is `no / (yes + no)`: a scarce YES reserve
/// means YES is expensive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    pub yes_reserve: Amount,
    pub no_reserve: Amount,
}

impl PoolState {
    pub const fn new(yes_reserve: Amount, no_reserve: Amount) -> Self {
        Self {
            yes_reserve,
            no_reserve,
        }
    }

    /// Balanced pool holding `per_side` of each outcome.
    pub const fn balanced(per_side: Amount) -> Self {
        Self::new(per_side, per_side)
    }

    pub const fn total(&self) -> Amount {
        self.yes_reserve.saturating_add(self.no_reserve)
    }

    /// Implied YES probability, 5000 for an empty pool.
    pub fn p_yes_bps(&self) -> Bps {
        ratio_bps(self.no_reserve, self.total(), Rounding::Nearest).unwrap_or(HALF_BPS)
    }

    /// Reserve of the given side.
    pub const fn reserve(&self, side: Side) -> Amount {
        match side {
            Side::Yes => self.yes_reserve,
            Side::No => self.no_reserve,
        }
    }

    /// `(reserve_in, reserve_out)` for buying `side`: the unwanted half of
    /// the split goes in, the wanted side comes out.
    pub const fn swap_reserves(&self, side: Side) -> (Amount, Amount) {
        (self.reserve(side.opposite()), self.reserve(side))
    }

    /// Both reserves are non-zero.
    pub const fn is_initialized(&self) -> bool {
        self.yes_reserve > 0 && self.no_reserve > 0
    }
}

/// Vault inventory of outcome shares available for OTC fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VaultState {
    pub yes_shares: Amount,
    pub no_shares: Amount,
}

impl VaultState {
    pub const fn new(yes_shares: Amount, no_shares: Amount) -> Self {
        Self {
            yes_shares,
            no_shares,
        }
    }

    pub const fn total(&self) -> Amount {
        self.yes_shares.saturating_add(self.no_shares)
    }

    /// Larger side's share of total inventory: 5000 balanced, 10000 one-sided.
    pub fn imbalance_bps(&self) -> Bps {
        let larger = self.yes_shares.max(self.no_shares);
        ratio_bps(larger, self.total(), Rounding::Nearest).unwrap_or(HALF_BPS)
    }

    /// Inventory of the given side.
    pub const fn available(&self, side: Side) -> Amount {
        match side {
            Side::Yes => self.yes_shares,
            Side::No => self.no_shares,
        }
    }

    /// Whether `side` is strictly the smaller inventory.
    pub const fn is_scarce(&self, side: Side) -> bool {
        self.available(side) < self.available(side.opposite())
    }

    /// Removes `shares` from `side`, saturating at zero.
    pub(crate) fn debit(&mut self, side: Side, shares: Amount) {
        let balance = match side {
            Side::Yes => &mut self.yes_shares,
            Side::No => &mut self.no_shares,
        };
        *balance = balance.saturating_sub(shares);
    }
}

/// A single collateral order to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRequest {
    /// Collateral offered, in base units. Must be positive.
    pub collateral_in: Amount,
    /// Outcome being bought.
    pub side: Side,
    /// Seconds since the pool opened (drives the bootstrap fee).
    pub elapsed_seconds: u64,
    /// Seconds until the market closes (drives the OTC time boost).
    pub seconds_to_close: u64,
    /// Oracle TWAP probability of YES, 0..=10000.
    pub twap_p_yes_bps: Bps,
}

impl TradeRequest {
    pub const fn new(collateral_in: Amount, side: Side) -> Self {
        Self {
            collateral_in,
            side,
            elapsed_seconds: 0,
            seconds_to_close: 168 * SECONDS_PER_HOUR,
            twap_p_yes_bps: HALF_BPS,
        }
    }

    /// Buy YES when `buy_yes`, NO otherwise.
    pub const fn buy_yes(collateral_in: Amount, buy_yes: bool) -> Self {
        Self::new(collateral_in, if buy_yes { Side::Yes } else { Side::No })
    }

    pub const fn with_elapsed_seconds(mut self, elapsed_seconds: u64) -> Self {
        self.elapsed_seconds = elapsed_seconds;
        self
    }

    pub const fn with_seconds_to_close(mut self, seconds_to_close: u64) -> Self {
        self.seconds_to_close = seconds_to_close;
        self
    }

    /// Whole-hour shorthand for `with_seconds_to_close`.
    pub const fn with_hours_to_close(self, hours_to_close: u64) -> Self {
        self.with_seconds_to_close(hours_to_close.saturating_mul(SECONDS_PER_HOUR))
    }

    pub const fn with_twap(mut self, twap_p_yes_bps: Bps) -> Self {
        self.twap_p_yes_bps = twap_p_yes_bps;
        self
    }
}
