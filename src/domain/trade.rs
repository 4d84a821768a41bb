//! Routing outcome types.
//!
//! A `TradeResult` is built up stage by stage while the router walks its
//! venue chain. Its central invariant is collateral conservation:
//! `otc + amm + mint + remaining == collateral_in` after every stage.

use serde::{Deserialize, Serialize};

use super::amount::{Amount, BPS_DENOMINATOR, Bps, Rounding, mul_div};
use super::market::Side;

/// Liquidity source a fill came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueKind {
    /// Vault inventory sold over the counter.
    Otc,
    /// Constant-product pool.
    Amm,
    /// 1:1 mint of a fresh share pair.
    Mint,
}

impl std::fmt::Display for VenueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Otc => write!(f, "OTC"),
            Self::Amm => write!(f, "AMM"),
            Self::Mint => write!(f, "MINT"),
        }
    }
}

/// Shares delivered and collateral consumed by one venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VenueFill {
    pub shares: Amount,
    pub collateral: Amount,
    /// Fee the venue charged, in bps (AMM only).
    pub fee_bps: Bps,
    /// Probability move caused by the fill (AMM only).
    pub price_impact_bps: Bps,
    /// Relative spread applied (OTC only).
    pub spread_bps: Bps,
}

impl VenueFill {
    pub const fn new(shares: Amount, collateral: Amount) -> Self {
        Self {
            shares,
            collateral,
            fee_bps: 0,
            price_impact_bps: 0,
            spread_bps: 0,
        }
    }
}

/// Why an order could not be filled at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The pool had liquidity but the impact cap admitted no collateral.
    PriceImpactExceeded,
    /// No venue held anything to sell.
    NoLiquidity,
}

impl RejectionReason {
    /// Stable machine-readable code.
    pub const fn code(self) -> &'static str {
        match self {
            Self::PriceImpactExceeded => "PRICE_IMPACT_EXCEEDED",
            Self::NoLiquidity => "NO_LIQUIDITY",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-venue breakdown of a routed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeResult {
    pub side: Side,
    pub collateral_in: Amount,
    pub otc_shares: Amount,
    pub otc_collateral: Amount,
    pub amm_shares: Amount,
    pub amm_collateral: Amount,
    pub mint_shares: Amount,
    pub mint_collateral: Amount,
    pub total_shares: Amount,
    /// Collateral no venue absorbed; zero whenever the mint stage runs.
    pub remaining_collateral: Amount,
    /// Venues that contributed, in the order they filled.
    pub venues_used: Vec<VenueKind>,
    /// AMM fee charged (0 when the AMM did not fill).
    pub fee_bps: Bps,
    /// AMM probability move (0 when the AMM did not fill).
    pub amm_price_impact_bps: Bps,
    /// OTC relative spread (0 when the vault did not fill).
    pub otc_spread_bps: Bps,
    /// Set when nothing was filled.
    pub rejection: Option<RejectionReason>,
}

impl TradeResult {
    /// Empty result holding the whole order as remaining collateral.
    pub const fn new(side: Side, collateral_in: Amount) -> Self {
        Self {
            side,
            collateral_in,
            otc_shares: 0,
            otc_collateral: 0,
            amm_shares: 0,
            amm_collateral: 0,
            mint_shares: 0,
            mint_collateral: 0,
            total_shares: 0,
            remaining_collateral: collateral_in,
            venues_used: Vec::new(),
            fee_bps: 0,
            amm_price_impact_bps: 0,
            otc_spread_bps: 0,
            rejection: None,
        }
    }

    /// Records a venue's fill, moving its collateral out of `remaining`.
    ///
    /// The caller guarantees `fill.collateral <= remaining_collateral`.
    pub(crate) fn record(&mut self, venue: VenueKind, fill: VenueFill) {
        match venue {
            VenueKind::Otc => {
                self.otc_shares += fill.shares;
                self.otc_collateral += fill.collateral;
                self.otc_spread_bps = fill.spread_bps;
            }
            VenueKind::Amm => {
                self.amm_shares += fill.shares;
                self.amm_collateral += fill.collateral;
                self.fee_bps = fill.fee_bps;
                self.amm_price_impact_bps = fill.price_impact_bps;
            }
            VenueKind::Mint => {
                self.mint_shares += fill.shares;
                self.mint_collateral += fill.collateral;
            }
        }
        self.total_shares += fill.shares;
        self.remaining_collateral -= fill.collateral;
        if !self.venues_used.contains(&venue) {
            self.venues_used.push(venue);
        }
    }

    /// Collateral absorbed by all venues.
    pub const fn collateral_filled(&self) -> Amount {
        self.otc_collateral + self.amm_collateral + self.mint_collateral
    }

    /// `otc + amm + mint + remaining == collateral_in`.
    pub const fn is_conserved(&self) -> bool {
        self.collateral_filled() + self.remaining_collateral == self.collateral_in
    }

    /// The whole order was absorbed.
    pub const fn is_filled(&self) -> bool {
        self.remaining_collateral == 0 && self.rejection.is_none()
    }

    /// Average collateral paid per share, in bps.
    pub fn effective_price_bps(&self) -> Option<Bps> {
        let price = mul_div(
            self.collateral_filled(),
            Amount::from(BPS_DENOMINATOR),
            self.total_shares,
            Rounding::Down,
        )?;
        Bps::try_from(price).ok()
    }

    /// Venue tags joined with `+`, e.g. `OTC+AMM+MINT`.
    pub fn route_label(&self) -> String {
        if self.venues_used.is_empty() {
            return self
                .rejection
                .map_or_else(|| "none".to_string(), |r| r.code().to_string());
        }
        self.venues_used
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("+")
    }
}
