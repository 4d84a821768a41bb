//! Vault OTC pricing and depletion-capped fills.
//!
//! The vault sells outcome shares from standing inventory at the oracle
//! TWAP plus a spread. The relative spread widens when the buyer consumes
//! the already-scarce side and in the final day before close. A hybrid
//! absolute floor keeps cheap shares from trading at a near-zero edge.
//!
//! A single fill releases at most `max_depletion_pct` of the side's
//! inventory. When that cap binds, the vault charges only for the shares it
//! releases (rounded up) and hands the rest of the collateral back.

use serde::{Deserialize, Serialize};

use super::amount::{Amount, BPS_DENOMINATOR, Bps, HALF_BPS, Rounding, mul_div};
use super::market::{SECONDS_PER_HOUR, Side, VaultState};

/// Time before close in which the time boost applies.
pub const CLOSE_WINDOW_SECONDS: u64 = 24 * SECONDS_PER_HOUR;

/// OTC spread and depletion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultParams {
    /// Absolute spread floor, in price bps.
    pub min_absolute_spread_bps: Bps,
    /// Relative spread before boosts.
    pub base_relative_spread_bps: Bps,
    /// Boost at a fully one-sided inventory.
    pub max_imbalance_boost_bps: Bps,
    /// Boost at the moment of close.
    pub max_time_boost_bps: Bps,
    /// Cap on the relative spread.
    pub max_spread_bps: Bps,
    /// Share of one side's inventory a single fill may release.
    pub max_depletion_pct: u8,
}

impl Default for VaultParams {
    fn default() -> Self {
        Self {
            min_absolute_spread_bps: 20,
            base_relative_spread_bps: 100,
            max_imbalance_boost_bps: 400,
            max_time_boost_bps: 200,
            max_spread_bps: 500,
            max_depletion_pct: 30,
        }
    }
}

/// Relative spread and the boosts it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SpreadQuote {
    pub base_bps: Bps,
    pub imbalance_boost_bps: Bps,
    pub time_boost_bps: Bps,
    /// Sum after `max_spread_bps`.
    pub total_bps: Bps,
}

/// A priced OTC fill, not yet applied to the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct OtcQuote {
    pub shares_out: Amount,
    pub collateral_used: Amount,
    /// Price paid per share, in bps of the 1.0 payout.
    pub effective_price_bps: Bps,
    /// Relative spread applied.
    pub spread_bps: Bps,
    /// Whether the depletion cap or inventory limited the fill.
    pub capped: bool,
}

impl OtcQuote {
    pub const fn is_empty(&self) -> bool {
        self.shares_out == 0
    }
}

/// OTC pricing engine over a vault inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultInventory {
    params: VaultParams,
}

impl VaultInventory {
    pub const fn new(params: VaultParams) -> Self {
        Self { params }
    }

    pub const fn params(&self) -> &VaultParams {
        &self.params
    }

    /// Relative spread for selling `side` out of `vault`.
    pub fn spread(&self, vault: &VaultState, side: Side, seconds_to_close: u64) -> SpreadQuote {
        let p = &self.params;

        let imbalance = vault.imbalance_bps();
        let imbalance_boost_bps = if vault.is_scarce(side) && imbalance > HALF_BPS {
            let excess = u64::from(imbalance - HALF_BPS);
            let boost = u64::from(p.max_imbalance_boost_bps) * excess / u64::from(HALF_BPS);
            Bps::try_from(boost)
                .unwrap_or(Bps::MAX)
                .min(p.max_imbalance_boost_bps)
        } else {
            0
        };

        let time_boost_bps = if seconds_to_close < CLOSE_WINDOW_SECONDS {
            let remaining = CLOSE_WINDOW_SECONDS - seconds_to_close;
            let boost = u64::from(p.max_time_boost_bps) * remaining / CLOSE_WINDOW_SECONDS;
            Bps::try_from(boost).unwrap_or(Bps::MAX).min(p.max_time_boost_bps)
        } else {
            0
        };

        let total_bps = p
            .base_relative_spread_bps
            .saturating_add(imbalance_boost_bps)
            .saturating_add(time_boost_bps)
            .min(p.max_spread_bps);

        SpreadQuote {
            base_bps: p.base_relative_spread_bps,
            imbalance_boost_bps,
            time_boost_bps,
            total_bps,
        }
    }

    /// Price paid per share: TWAP side price plus the hybrid spread,
    /// never above certainty.
    pub fn effective_price_bps(&self, side: Side, twap_p_yes_bps: Bps, spread_bps: Bps) -> Bps {
        let share_price = side.price_bps(twap_p_yes_bps.min(BPS_DENOMINATOR));
        let relative = u64::from(share_price) * u64::from(spread_bps) / u64::from(BPS_DENOMINATOR);
        let spread = Bps::try_from(relative)
            .unwrap_or(Bps::MAX)
            .max(self.params.min_absolute_spread_bps);
        share_price.saturating_add(spread).min(BPS_DENOMINATOR)
    }

    /// Most shares of `side` a single fill may release.
    ///
    /// Truncates, so an inventory too small to yield a whole base unit at
    /// `max_depletion_pct` releases nothing.
    pub fn depletion_cap(&self, vault: &VaultState, side: Side) -> Amount {
        let available = vault.available(side);
        let pct = Amount::from(self.params.max_depletion_pct.min(100));
        mul_div(available, pct, 100, Rounding::Down).unwrap_or(available / 100 * pct)
    }

    /// Prices a fill without touching the inventory.
    pub fn quote(
        &self,
        vault: &VaultState,
        collateral_in: Amount,
        side: Side,
        twap_p_yes_bps: Bps,
        seconds_to_close: u64,
    ) -> OtcQuote {
        let available = vault.available(side);
        if available == 0 || collateral_in == 0 {
            return OtcQuote::default();
        }

        let spread = self.spread(vault, side, seconds_to_close);
        let price = self.effective_price_bps(side, twap_p_yes_bps, spread.total_bps);
        let Some(raw_shares) = mul_div(
            collateral_in,
            Amount::from(BPS_DENOMINATOR),
            Amount::from(price),
            Rounding::Down,
        ) else {
            return OtcQuote::default();
        };
        let cap = self.depletion_cap(vault, side);
        if raw_shares == 0 || cap == 0 {
            return OtcQuote::default();
        }

        let shares_out = raw_shares.min(cap).min(available);
        let capped = shares_out < raw_shares;
        let collateral_used = if capped {
            // shares_out < floor(c * 10000 / price), so the ceiling stays <= c
            mul_div(shares_out, Amount::from(price), Amount::from(BPS_DENOMINATOR), Rounding::Up)
                .map_or(collateral_in, |used| used.min(collateral_in))
        } else {
            collateral_in
        };

        OtcQuote {
            shares_out,
            collateral_used,
            effective_price_bps: price,
            spread_bps: spread.total_bps,
            capped,
        }
    }

    /// Prices a fill and debits the released shares from `vault`.
    pub fn fill(
        &self,
        vault: &mut VaultState,
        collateral_in: Amount,
        side: Side,
        twap_p_yes_bps: Bps,
        seconds_to_close: u64,
    ) -> OtcQuote {
        let quote = self.quote(vault, collateral_in, side, twap_p_yes_bps, seconds_to_close);
        if !quote.is_empty() {
            vault.debit(side, quote.shares_out);
        }
        quote
    }
}
