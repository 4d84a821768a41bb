//! Router - Multi-Venue Order Sequencing
//!
//! Routes one collateral order across an ordered chain of venues:
//! - Vault OTC (spread pricing, depletion-capped)
//! - AMM (partial fill bounded by price impact)
//! - Mint (1:1 absorber for the remainder)
//!
//! Venue selection is strictly priority-based: each venue sees only what
//! the previous ones left, and no cross-venue price comparison is made.
//! The router tracks a single remaining-collateral accumulator and
//! enforces collateral conservation after every stage.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::amount::{Amount, BPS_DENOMINATOR, Bps};
use crate::domain::fee_model::{FeeModel, FeeSchedule};
use crate::domain::market::{PoolState, Side, TradeRequest, VaultState};
use crate::domain::price_impact::{DEFAULT_SEARCH_ITERATIONS, PriceImpactBounder};
use crate::domain::trade::{RejectionReason, TradeResult};
use crate::domain::vault::{VaultInventory, VaultParams};
use crate::error::{Result, RouteError};
use crate::ports::venue::{FillOutcome, SkipReason, Venue};
use crate::usecases::venues::{AmmVenue, MintVenue, OtcVenue};

/// Router-level parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterParams {
  /// Largest probability move a single AMM fill may cause.
  pub max_price_impact_bps: Bps,
  /// Bisection steps of the impact-bounded search.
  pub search_iterations: u32,
  /// Absorb the remainder by minting. Without it an order can be rejected.
  pub mint_fallback: bool,
}

impl Default for RouterParams {
  fn default() -> Self {
    Self {
      max_price_impact_bps: 1200,
      search_iterations: DEFAULT_SEARCH_ITERATIONS,
      mint_fallback: true,
    }
  }
}

/// Complete configuration of one market's router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
  pub fees: FeeSchedule,
  pub vault: VaultParams,
  pub router: RouterParams,
}

/// Sequences an order through OTC, AMM and mint.
///
/// Holds only configuration, so one instance per market can be shared
/// freely; all market state arrives with each call.
#[derive(Debug, Clone)]
pub struct Router {
  fees: FeeModel,
  inventory: VaultInventory,
  bounder: PriceImpactBounder,
  params: RouterParams,
}

impl Default for Router {
  fn default() -> Self {
    Self::new(RouterConfig::default())
  }
}

impl Router {
  /// Create a router from its configuration.
  pub const fn new(config: RouterConfig) -> Self {
    Self {
      fees: FeeModel::new(config.fees),
      inventory: VaultInventory::new(config.vault),
      bounder: PriceImpactBounder::new(config.router.search_iterations),
      params: config.router,
    }
  }

  pub const fn fee_model(&self) -> &FeeModel {
    &self.fees
  }

  pub const fn inventory(&self) -> &VaultInventory {
    &self.inventory
  }

  pub const fn bounder(&self) -> &PriceImpactBounder {
    &self.bounder
  }

  pub const fn params(&self) -> &RouterParams {
    &self.params
  }

  /// Route `request` against the given snapshots.
  ///
  /// The pool is read only. The vault is debited by exactly the shares an
  /// OTC fill released.
  ///
  /// # Errors
  /// `InvalidAmount` for zero collateral and `InvalidProbability` for a
  /// TWAP above 10000 bps. Nothing is mutated when validation fails.
  #[instrument(
    skip(self, pool, vault),
    fields(
      collateral = %request.collateral_in,
      side = %request.side,
      p_yes = pool.p_yes_bps(),
    )
  )]
  pub fn route(
    &self,
    pool: &PoolState,
    vault: &mut VaultState,
    request: &TradeRequest,
  ) -> Result<TradeResult> {
    validate(request)?;

    let fee_bps = self.fees.fee(pool, request.elapsed_seconds);
    debug!(fee_bps, "AMM fee computed");

    let mut otc = OtcVenue::new(
      &self.inventory,
      vault,
      request.side,
      request.twap_p_yes_bps,
      request.seconds_to_close,
    );
    let mut amm = AmmVenue::new(
      pool,
      request.side,
      fee_bps,
      self.params.max_price_impact_bps,
      self.bounder,
    );
    let mut mint = MintVenue;

    let mut chain: Vec<&mut dyn Venue> = Vec::with_capacity(3);
    chain.push(&mut otc);
    chain.push(&mut amm);
    if self.params.mint_fallback {
      chain.push(&mut mint);
    }

    self.execute(&mut chain, request.side, request.collateral_in)
  }

  /// Run `collateral_in` through `venues` in order.
  ///
  /// Stops as soon as nothing remains. Venues that pass are skipped; a
  /// result where every venue passed carries a `RejectionReason`.
  ///
  /// # Errors
  /// `InvalidAmount` for zero collateral, `VenueOverfill` if a venue
  /// reports consuming more than it was offered.
  pub fn execute(
    &self,
    venues: &mut [&mut dyn Venue],
    side: Side,
    collateral_in: Amount,
  ) -> Result<TradeResult> {
    if collateral_in == 0 {
      return Err(RouteError::InvalidAmount);
    }

    let mut result = TradeResult::new(side, collateral_in);
    let mut impact_limited = false;

    for venue in venues.iter_mut() {
      let remaining = result.remaining_collateral;
      if remaining == 0 {
        break;
      }

      let kind = venue.kind();
      match venue.attempt_fill(remaining) {
        FillOutcome::Filled(fill) if fill.shares > 0 => {
          if fill.collateral > remaining {
            return Err(RouteError::VenueOverfill {
              venue: kind,
              used: fill.collateral,
              remaining,
            });
          }
          result.record(kind, fill);
          debug!(
            venue = %kind,
            shares = %fill.shares,
            collateral = %fill.collateral,
            remaining = %result.remaining_collateral,
            "Venue filled"
          );
        }
        FillOutcome::Filled(_) => {
          debug!(venue = %kind, "Venue returned an empty fill");
        }
        FillOutcome::Skipped(reason) => {
          impact_limited |= reason == SkipReason::PriceImpactExceeded;
          debug!(venue = %kind, ?reason, "Venue skipped");
        }
      }
    }

    debug_assert!(result.is_conserved());

    if result.venues_used.is_empty() {
      let reason = if impact_limited {
        RejectionReason::PriceImpactExceeded
      } else {
        RejectionReason::NoLiquidity
      };
      warn!(code = reason.code(), collateral = %collateral_in, "Order rejected");
      result.rejection = Some(reason);
    } else if result.remaining_collateral > 0 {
      warn!(
        remaining = %result.remaining_collateral,
        route = %result.route_label(),
        "Order partially filled"
      );
    }

    Ok(result)
  }
}

/// Reject malformed requests before any venue runs.
fn validate(request: &TradeRequest) -> Result<()> {
  if request.collateral_in == 0 {
    return Err(RouteError::InvalidAmount);
  }
  if request.twap_p_yes_bps > BPS_DENOMINATOR {
    return Err(RouteError::InvalidProbability(request.twap_p_yes_bps));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::trade::VenueKind;

  const UNIT: Amount = 1_000_000;

  fn market() -> (PoolState, VaultState) {
    (
      PoolState::balanced(500 * UNIT),
      VaultState::new(500 * UNIT, 500 * UNIT),
    )
  }

  fn request(dollars: Amount) -> TradeRequest {
    TradeRequest::buy_yes(dollars * UNIT, true)
      .with_elapsed_seconds(3600)
      .with_twap(5000)
  }

  #[test]
  fn test_small_order_fills_from_vault() {
    let (pool, mut vault) = market();
    let r = Router::default().route(&pool, &mut vault, &request(50)).unwrap();
    assert_eq!(r.venues_used, vec![VenueKind::Otc]);
    assert_eq!(r.otc_collateral, 50 * UNIT);
    assert_eq!(r.remaining_collateral, 0);
    assert_eq!(vault.yes_shares, 500 * UNIT - r.otc_shares);
  }

  #[test]
  fn test_large_order_uses_all_three_venues() {
    let (pool, mut vault) = market();
    let r = Router::default().route(&pool, &mut vault, &request(300)).unwrap();
    assert_eq!(r.venues_used, vec![VenueKind::Otc, VenueKind::Amm, VenueKind::Mint]);
    assert_eq!(r.otc_shares, 150 * UNIT);
    assert!(r.amm_shares > 0);
    assert!(r.amm_price_impact_bps <= 1200);
    assert_eq!(r.fee_bps, 74);
    assert_eq!(r.mint_shares, r.mint_collateral);
    assert!(r.is_conserved());
    assert!(r.is_filled());
  }

  #[test]
  fn test_pool_is_not_mutated() {
    let (pool, mut vault) = market();
    let before = pool;
    Router::default().route(&pool, &mut vault, &request(300)).unwrap();
    assert_eq!(pool, before);
  }

  #[test]
  fn test_zero_collateral_rejected_before_routing() {
    let (pool, mut vault) = market();
    let err = Router::default()
      .route(&pool, &mut vault, &request(0))
      .unwrap_err();
    assert_eq!(err, RouteError::InvalidAmount);
    assert_eq!(vault, VaultState::new(500 * UNIT, 500 * UNIT));
  }

  #[test]
  fn test_bad_twap_rejected() {
    let (pool, mut vault) = market();
    let err = Router::default()
      .route(&pool, &mut vault, &request(10).with_twap(10_001))
      .unwrap_err();
    assert_eq!(err.code(), "INVALID_PROBABILITY");
  }

  #[test]
  fn test_without_mint_reports_rejection_reason() {
    let config = RouterConfig {
      router: RouterParams {
        mint_fallback: false,
        max_price_impact_bps: 0,
        ..RouterParams::default()
      },
      ..RouterConfig::default()
    };
    let router = Router::new(config);
    let pool = PoolState::balanced(500 * UNIT);
    let mut vault = VaultState::default();
    let r = router.route(&pool, &mut vault, &request(10)).unwrap();
    assert_eq!(r.rejection, Some(RejectionReason::PriceImpactExceeded));
    assert_eq!(r.remaining_collateral, 10 * UNIT);

    let empty_pool = PoolState::default();
    let r = router.route(&empty_pool, &mut vault, &request(10)).unwrap();
    assert_eq!(r.rejection, Some(RejectionReason::NoLiquidity));
    assert!(r.is_conserved());
  }

  #[test]
  fn test_without_mint_leaves_remainder() {
    let config = RouterConfig {
      router: RouterParams {
        mint_fallback: false,
        ..RouterParams::default()
      },
      ..RouterConfig::default()
    };
    let (pool, mut vault) = market();
    let r = Router::new(config).route(&pool, &mut vault, &request(300)).unwrap();
    assert_eq!(r.venues_used, vec![VenueKind::Otc, VenueKind::Amm]);
    assert!(r.remaining_collateral > 0);
    assert!(r.rejection.is_none());
    assert!(!r.is_filled());
    assert!(r.is_conserved());
  }
}
