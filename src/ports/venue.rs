//! Venue Port - Uniform Fill Capability
//!
//! Every liquidity source the router can draw on implements `Venue`.
//! The router hands each venue the collateral still unfilled and records
//! whatever the venue reports back. Venues are tried in a fixed order, so
//! adding a source means inserting one more handler into the chain.

use crate::domain::amount::Amount;
use crate::domain::trade::{VenueFill, VenueKind};

/// Why a venue contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
  /// The venue holds nothing to sell on the requested side.
  NoLiquidity,
  /// Liquidity exists but the impact cap admits no collateral.
  PriceImpactExceeded,
  /// The remaining amount is too small to produce a share.
  Dust,
}

/// Result of offering collateral to a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
  /// The venue absorbed part or all of the collateral.
  Filled(VenueFill),
  /// The venue passed.
  Skipped(SkipReason),
}

impl FillOutcome {
  /// Fill details, if any shares were delivered.
  pub fn fill(&self) -> Option<VenueFill> {
    match self {
      Self::Filled(fill) if fill.shares > 0 => Some(*fill),
      _ => None,
    }
  }
}

/// A liquidity source that can absorb collateral for shares.
pub trait Venue {
  /// Tag recorded in `TradeResult::venues_used`.
  fn kind(&self) -> VenueKind;

  /// Offers `remaining` collateral to the venue.
  ///
  /// Implementations must never report consuming more than `remaining`.
  fn attempt_fill(&mut self, remaining: Amount) -> FillOutcome;
}
