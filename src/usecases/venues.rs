//! Venues - Vault OTC, AMM and Mint Handlers
//!
//! Concrete `Venue` implementations wired to the domain pricing
//! engines. Each one is built for a single routing call and borrows the
//! market snapshot it prices against.

use tracing::debug;

use crate::domain::amm_pool::AmmPool;
use crate::domain::amount::{Amount, Bps};
use crate::domain::market::{PoolState, Side, VaultState};
use crate::domain::price_impact::PriceImpactBounder;
use crate::domain::trade::{VenueFill, VenueKind};
use crate::domain::vault::VaultInventory;
use crate::ports::venue::{FillOutcome, SkipReason, Venue};

/// Sells vault inventory at TWAP plus spread, debiting the vault.
pub struct OtcVenue<'a> {
  inventory: &'a VaultInventory,
  vault: &'a mut VaultState,
  side: Side,
  twap_p_yes_bps: Bps,
  seconds_to_close: u64,
}

impl<'a> OtcVenue<'a> {
  pub fn new(
    inventory: &'a VaultInventory,
    vault: &'a mut VaultState,
    side: Side,
    twap_p_yes_bps: Bps,
    seconds_to_close: u64,
  ) -> Self {
    Self {
      inventory,
      vault,
      side,
      twap_p_yes_bps,
      seconds_to_close,
    }
  }
}

impl Venue for OtcVenue<'_> {
  fn kind(&self) -> VenueKind {
    VenueKind::Otc
  }

  fn attempt_fill(&mut self, remaining: Amount) -> FillOutcome {
    if self.vault.available(self.side) == 0 {
      return FillOutcome::Skipped(SkipReason::NoLiquidity);
    }

    let quote = self.inventory.fill(
      self.vault,
      remaining,
      self.side,
      self.twap_p_yes_bps,
      self.seconds_to_close,
    );
    if quote.is_empty() {
      return FillOutcome::Skipped(SkipReason::Dust);
    }

    debug!(
      shares = %quote.shares_out,
      collateral = %quote.collateral_used,
      price_bps = quote.effective_price_bps,
      spread_bps = quote.spread_bps,
      capped = quote.capped,
      "Vault OTC fill"
    );

    FillOutcome::Filled(VenueFill {
      spread_bps: quote.spread_bps,
      ..VenueFill::new(quote.shares_out, quote.collateral_used)
    })
  }
}

/// Buys through the constant-product pool up to the price-impact cap.
///
/// The pool is only simulated; settlement applies the swap afterwards.
pub struct AmmVenue<'a> {
  pool: &'a PoolState,
  side: Side,
  fee_bps: Bps,
  max_impact_bps: Bps,
  bounder: PriceImpactBounder,
}

impl<'a> AmmVenue<'a> {
  pub const fn new(
    pool: &'a PoolState,
    side: Side,
    fee_bps: Bps,
    max_impact_bps: Bps,
    bounder: PriceImpactBounder,
  ) -> Self {
    Self {
      pool,
      side,
      fee_bps,
      max_impact_bps,
      bounder,
    }
  }
}

impl Venue for AmmVenue<'_> {
  fn kind(&self) -> VenueKind {
    VenueKind::Amm
  }

  fn attempt_fill(&mut self, remaining: Amount) -> FillOutcome {
    if !self.pool.is_initialized() {
      return FillOutcome::Skipped(SkipReason::NoLiquidity);
    }

    let safe = self.bounder.max_under_impact(
      self.pool,
      self.side,
      remaining,
      self.fee_bps,
      self.max_impact_bps,
    );
    if safe == 0 {
      return FillOutcome::Skipped(SkipReason::PriceImpactExceeded);
    }

    let Some(quote) = AmmPool::new(self.pool).buy(safe, self.side, self.fee_bps) else {
      return FillOutcome::Skipped(SkipReason::PriceImpactExceeded);
    };
    if quote.shares_out == 0 {
      return FillOutcome::Skipped(SkipReason::Dust);
    }

    debug!(
      collateral = %safe,
      shares = %quote.shares_out,
      fee_bps = self.fee_bps,
      impact_bps = quote.price_impact_bps,
      "AMM partial fill"
    );

    FillOutcome::Filled(VenueFill {
      fee_bps: self.fee_bps,
      price_impact_bps: quote.price_impact_bps,
      ..VenueFill::new(quote.shares_out, safe)
    })
  }
}

/// Mints a fresh share pair 1:1 for whatever collateral is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct MintVenue;

impl Venue for MintVenue {
  fn kind(&self) -> VenueKind {
    VenueKind::Mint
  }

  fn attempt_fill(&mut self, remaining: Amount) -> FillOutcome {
    if remaining == 0 {
      return FillOutcome::Skipped(SkipReason::Dust);
    }
    FillOutcome::Filled(VenueFill::new(remaining, remaining))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::market::SECONDS_PER_HOUR;

  const UNIT: Amount = 1_000_000;
  const WEEK: u64 = 168 * SECONDS_PER_HOUR;

  #[test]
  fn test_otc_skips_empty_side() {
    let inventory = VaultInventory::default();
    let mut vault = VaultState::new(0, 0);
    let mut venue = OtcVenue::new(&inventory, &mut vault, Side::Yes, 5000, WEEK);
    assert_eq!(
      venue.attempt_fill(10 * UNIT),
      FillOutcome::Skipped(SkipReason::NoLiquidity)
    );
  }

  #[test]
  fn test_otc_fill_debits_vault() {
    let inventory = VaultInventory::default();
    let mut vault = VaultState::new(500 * UNIT, 500 * UNIT);
    let fill = {
      let mut venue = OtcVenue::new(&inventory, &mut vault, Side::Yes, 5000, WEEK);
      venue.attempt_fill(300 * UNIT).fill().unwrap()
    };
    assert_eq!(fill.shares, 150 * UNIT);
    assert_eq!(fill.spread_bps, 100);
    assert_eq!(vault.yes_shares, 350 * UNIT);
  }

  #[test]
  fn test_amm_reports_impact_skip() {
    let pool = PoolState::balanced(500 * UNIT);
    let mut venue = AmmVenue::new(&pool, Side::Yes, 74, 0, PriceImpactBounder::default());
    assert_eq!(
      venue.attempt_fill(10 * UNIT),
      FillOutcome::Skipped(SkipReason::PriceImpactExceeded)
    );
  }

  #[test]
  fn test_amm_skips_uninitialized_pool() {
    let pool = PoolState::new(500 * UNIT, 0);
    let mut venue = AmmVenue::new(&pool, Side::No, 74, 1200, PriceImpactBounder::default());
    assert_eq!(
      venue.attempt_fill(10 * UNIT),
      FillOutcome::Skipped(SkipReason::NoLiquidity)
    );
  }

  #[test]
  fn test_amm_fill_stays_under_cap() {
    let pool = PoolState::balanced(500 * UNIT);
    let mut venue = AmmVenue::new(&pool, Side::Yes, 74, 1200, PriceImpactBounder::default());
    let fill = venue.attempt_fill(224 * UNIT).fill().unwrap();
    assert!(fill.collateral < 224 * UNIT);
    assert!(fill.price_impact_bps <= 1200);
    assert!(fill.shares > fill.collateral);
    assert_eq!(fill.fee_bps, 74);
  }

  #[test]
  fn test_mint_absorbs_everything() {
    let mut venue = MintVenue;
    assert_eq!(venue.attempt_fill(7).fill(), Some(VenueFill::new(7, 7)));
    assert_eq!(venue.attempt_fill(0), FillOutcome::Skipped(SkipReason::Dust));
  }
}
