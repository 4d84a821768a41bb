//! Simulation - Liquidity Scenario Sweeps
//!
//! Runs the router and its pricing components over a grid of market
//! sizes and order sizes and collects the results as serializable rows.
//! Every trade starts from a fresh snapshot so rows are independent.
//!
//! Reports:
//! - AMM-only price impact per market and order size
//! - Vault OTC against a pure AMM buy on the reference market
//! - Venue breakdown per order size for the reference market
//! - Venue mix per market size
//! - Largest AMM-only order under the impact cap
//! - OTC spread by vault imbalance and by time to close
//! - Fee decay over the bootstrap window and fee by pool skew

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::AppConfig;
use crate::domain::amm_pool::{AmmPool, INFEASIBLE_IMPACT_BPS};
use crate::domain::amount::{
  Amount, BPS_DENOMINATOR, Bps, HALF_BPS, Rounding, UNITS_PER_COLLATERAL, ratio_bps, to_units,
};
use crate::domain::fee_model::FeeBreakdown;
use crate::domain::market::{PoolState, SECONDS_PER_HOUR, Side, TradeRequest, VaultState};
use crate::domain::trade::{TradeResult, VenueKind};
use crate::domain::vault::SpreadQuote;
use crate::usecases::router::Router;

/// Vault compositions for the imbalance table, as YES share of 1000.
const IMBALANCE_MIX: [Amount; 5] = [500, 400, 300, 200, 100];

/// Order sizes for the OTC against AMM table, in collateral units.
const COMPARISON_SIZES: [Amount; 5] = [10, 25, 50, 100, 200];

/// Time-to-close points for the time table, in seconds.
const CLOSE_POINTS: [u64; 7] = [
  168 * SECONDS_PER_HOUR,
  48 * SECONDS_PER_HOUR,
  24 * SECONDS_PER_HOUR,
  12 * SECONDS_PER_HOUR,
  6 * SECONDS_PER_HOUR,
  SECONDS_PER_HOUR,
  SECONDS_PER_HOUR / 2,
];

/// Elapsed-time points for the fee decay table, in hours.
const ELAPSED_HOURS: [u64; 7] = [0, 1, 12, 24, 36, 48, 72];

/// Pool probabilities for the skew fee table.
const SKEW_POINTS_BPS: [Bps; 6] = [5000, 6000, 7000, 8000, 9000, 9500];

/// One routed order.
#[derive(Debug, Clone, Serialize)]
pub struct RouteRow {
  pub pool_size: Amount,
  pub trade_size: Amount,
  pub result: TradeResult,
}

/// One AMM-only buy against a balanced market.
#[derive(Debug, Clone, Serialize)]
pub struct AmmImpactRow {
  pub pool_size: Amount,
  pub trade_size: Amount,
  pub fee_bps: Bps,
  /// `INFEASIBLE_IMPACT_BPS` when the swap would drain the pool.
  pub price_impact_bps: Bps,
  pub within_cap: bool,
  pub shares_out: Amount,
}

/// Vault OTC quote against a pure AMM buy for one order.
#[derive(Debug, Clone, Serialize)]
pub struct VenueComparisonRow {
  pub trade_size: Amount,
  /// `None` when the buy breaks the impact cap.
  pub amm_shares: Option<Amount>,
  pub otc_shares: Amount,
  pub otc_collateral: Amount,
  /// Venue delivering more shares; `None` when neither fills.
  pub better: Option<VenueKind>,
}

/// Largest AMM-only order under the impact cap.
#[derive(Debug, Clone, Serialize)]
pub struct MaxTradeRow {
  pub pool_size: Amount,
  pub max_trade: Amount,
  /// `max_trade` as a share of pool liquidity.
  pub share_of_pool_bps: Bps,
  pub impact_bps: Bps,
}

/// OTC spread for one vault composition.
#[derive(Debug, Clone, Serialize)]
pub struct ImbalanceRow {
  pub vault: VaultState,
  pub imbalance_bps: Bps,
  pub spread: SpreadQuote,
  pub effective_price_bps: Bps,
}

/// OTC spread at one distance from close.
#[derive(Debug, Clone, Serialize)]
pub struct TimeSpreadRow {
  pub seconds_to_close: u64,
  pub spread: SpreadQuote,
}

/// AMM fee at one point of the bootstrap clock.
#[derive(Debug, Clone, Serialize)]
pub struct FeeDecayRow {
  pub elapsed_seconds: u64,
  pub fee: FeeBreakdown,
}

/// Post-bootstrap AMM fee at one pool probability.
#[derive(Debug, Clone, Serialize)]
pub struct SkewFeeRow {
  pub p_yes_bps: Bps,
  pub skew_bps: Bps,
  pub fee: FeeBreakdown,
}

/// All simulation tables.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
  pub name: String,
  /// Impact cap the AMM tables were judged against.
  pub max_price_impact_bps: Bps,
  pub amm_impact: Vec<AmmImpactRow>,
  pub venue_comparison: Vec<VenueComparisonRow>,
  pub venue_breakdown: Vec<RouteRow>,
  pub pool_sweep: Vec<RouteRow>,
  pub max_amm_trade: Vec<MaxTradeRow>,
  pub spread_by_imbalance: Vec<ImbalanceRow>,
  pub spread_by_time: Vec<TimeSpreadRow>,
  pub fee_decay: Vec<FeeDecayRow>,
  pub fee_by_skew: Vec<SkewFeeRow>,
}

/// Scenario sweep driver.
pub struct Simulation {
  router: Router,
  name: String,
  side: Side,
  elapsed_seconds: u64,
  seconds_to_close: u64,
  twap_p_yes_bps: Option<Bps>,
  trade_sizes: Vec<Amount>,
  pool_sizes: Vec<Amount>,
  reference_pool_size: Amount,
}

impl Simulation {
  /// Create a simulation from config.
  pub fn new(config: &AppConfig) -> Self {
    let sim = &config.simulation;
    Self {
      router: Router::new(config.router_config()),
      name: sim.name.clone(),
      side: sim.side,
      elapsed_seconds: sim.elapsed_seconds,
      seconds_to_close: sim.seconds_to_close(),
      twap_p_yes_bps: sim.twap_p_yes_bps,
      trade_sizes: units(&sim.trade_sizes),
      pool_sizes: units(&sim.pool_sizes),
      reference_pool_size: to_units(sim.reference_pool_size).unwrap_or_default(),
    }
  }

  /// Run every table.
  #[instrument(skip(self), fields(name = %self.name))]
  pub fn run(&self) -> SimulationReport {
    let report = SimulationReport {
      name: self.name.clone(),
      max_price_impact_bps: self.router.params().max_price_impact_bps,
      amm_impact: self.amm_impact(),
      venue_comparison: self.venue_comparison(),
      venue_breakdown: self.venue_breakdown(),
      pool_sweep: self.pool_sweep(),
      max_amm_trade: self.max_amm_trade(),
      spread_by_imbalance: self.spread_by_imbalance(),
      spread_by_time: self.spread_by_time(),
      fee_decay: self.fee_decay(),
      fee_by_skew: self.fee_by_skew(),
    };
    info!(
      routes = report.venue_breakdown.len() + report.pool_sweep.len(),
      "Simulation complete"
    );
    report
  }

  /// Route one order against a fresh balanced market of `pool_size`.
  pub fn route_fresh(&self, pool_size: Amount, trade_size: Amount) -> Option<RouteRow> {
    let pool = PoolState::balanced(pool_size / 2);
    let mut vault = VaultState::new(pool_size / 2, pool_size / 2);
    let request = TradeRequest::new(trade_size, self.side)
      .with_elapsed_seconds(self.elapsed_seconds)
      .with_seconds_to_close(self.seconds_to_close)
      .with_twap(self.twap_p_yes_bps.unwrap_or_else(|| pool.p_yes_bps()));

    match self.router.route(&pool, &mut vault, &request) {
      Ok(result) => Some(RouteRow {
        pool_size,
        trade_size,
        result,
      }),
      Err(e) => {
        warn!(error = %e, code = e.code(), trade_size = %trade_size, "Route failed");
        None
      }
    }
  }

  /// AMM-only buys for every market and order size, vault left out.
  ///
  /// Orders above twice a market's liquidity are skipped.
  pub fn amm_impact(&self) -> Vec<AmmImpactRow> {
    let cap_bps = self.router.params().max_price_impact_bps;
    let mut rows = Vec::new();
    for &pool_size in &self.pool_sizes {
      let pool = PoolState::balanced(pool_size / 2);
      let fee_bps = self.router.fee_model().fee(&pool, self.elapsed_seconds);
      let amm = AmmPool::new(&pool);
      for &trade_size in &self.trade_sizes {
        if trade_size > pool_size.saturating_mul(2) {
          continue;
        }
        let (price_impact_bps, shares_out) = amm
          .buy(trade_size, self.side, fee_bps)
          .map_or((INFEASIBLE_IMPACT_BPS, 0), |q| (q.price_impact_bps, q.shares_out));
        rows.push(AmmImpactRow {
          pool_size,
          trade_size,
          fee_bps,
          price_impact_bps,
          within_cap: price_impact_bps <= cap_bps,
          shares_out,
        });
      }
    }
    rows
  }

  /// OTC quote and pure AMM buy side by side on the reference market.
  pub fn venue_comparison(&self) -> Vec<VenueComparisonRow> {
    let half = self.reference_pool_size / 2;
    let pool = PoolState::balanced(half);
    let vault = VaultState::new(half, half);
    let fee_bps = self.router.fee_model().fee(&pool, self.elapsed_seconds);
    let cap_bps = self.router.params().max_price_impact_bps;
    let twap = self.twap_p_yes_bps.unwrap_or_else(|| pool.p_yes_bps());
    let amm = AmmPool::new(&pool);

    COMPARISON_SIZES
      .iter()
      .map(|&size| {
        let trade_size = size * UNITS_PER_COLLATERAL;
        let amm_shares = amm
          .buy(trade_size, self.side, fee_bps)
          .filter(|q| q.price_impact_bps <= cap_bps)
          .map(|q| q.shares_out);
        let otc =
          self
            .router
            .inventory()
            .quote(&vault, trade_size, self.side, twap, self.seconds_to_close);
        let better = match (amm_shares, otc.is_empty()) {
          (Some(amm), false) if otc.shares_out > amm => Some(VenueKind::Otc),
          (Some(_), _) => Some(VenueKind::Amm),
          (None, false) => Some(VenueKind::Otc),
          (None, true) => None,
        };
        VenueComparisonRow {
          trade_size,
          amm_shares,
          otc_shares: otc.shares_out,
          otc_collateral: otc.collateral_used,
          better,
        }
      })
      .collect()
  }

  /// Every configured order size against the reference market.
  pub fn venue_breakdown(&self) -> Vec<RouteRow> {
    self
      .trade_sizes
      .iter()
      .filter_map(|&size| self.route_fresh(self.reference_pool_size, size))
      .collect()
  }

  /// The smallest and largest order size against every market size.
  pub fn pool_sweep(&self) -> Vec<RouteRow> {
    let (Some(&smallest), Some(&largest)) =
      (self.trade_sizes.iter().min(), self.trade_sizes.iter().max())
    else {
      return Vec::new();
    };
    let mut rows = Vec::new();
    for &pool_size in &self.pool_sizes {
      for size in [smallest, largest] {
        if let Some(row) = self.route_fresh(pool_size, size) {
          rows.push(row);
        }
        if smallest == largest {
          break;
        }
      }
    }
    rows
  }

  /// Largest AMM-only order at the fee floor, searched up to 3x liquidity.
  pub fn max_amm_trade(&self) -> Vec<MaxTradeRow> {
    let fee_bps = self.router.fee_model().schedule().min_fee_bps;
    let cap_bps = self.router.params().max_price_impact_bps;
    self
      .pool_sizes
      .iter()
      .map(|&pool_size| {
        let pool = PoolState::balanced(pool_size / 2);
        let ceiling = pool_size.saturating_mul(3);
        let max_trade =
          self
            .router
            .bounder()
            .max_under_impact(&pool, self.side, ceiling, fee_bps, cap_bps);
        let impact_bps = if max_trade == 0 {
          0
        } else {
          AmmPool::new(&pool).price_impact(max_trade, self.side, fee_bps)
        };
        debug!(pool_size = %pool_size, max_trade = %max_trade, impact_bps, "Max AMM trade");
        MaxTradeRow {
          pool_size,
          max_trade,
          share_of_pool_bps: ratio_bps(max_trade, pool_size, Rounding::Down).unwrap_or(0),
          impact_bps,
        }
      })
      .collect()
  }

  /// OTC spread for YES buyers as the vault tilts toward NO.
  pub fn spread_by_imbalance(&self) -> Vec<ImbalanceRow> {
    let inventory = self.router.inventory();
    let twap = self.twap_p_yes_bps.unwrap_or(HALF_BPS);
    IMBALANCE_MIX
      .iter()
      .map(|&yes| {
        let vault = VaultState::new(yes, 1000 - yes);
        let spread = inventory.spread(&vault, Side::Yes, self.seconds_to_close);
        ImbalanceRow {
          vault,
          imbalance_bps: vault.imbalance_bps(),
          spread,
          effective_price_bps: inventory.effective_price_bps(Side::Yes, twap, spread.total_bps),
        }
      })
      .collect()
  }

  /// OTC spread on a balanced vault as close approaches.
  pub fn spread_by_time(&self) -> Vec<TimeSpreadRow> {
    let vault = VaultState::new(500, 500);
    CLOSE_POINTS
      .iter()
      .map(|&seconds_to_close| TimeSpreadRow {
        seconds_to_close,
        spread: self.router.inventory().spread(&vault, Side::Yes, seconds_to_close),
      })
      .collect()
  }

  /// Fee on a balanced pool across the bootstrap window.
  pub fn fee_decay(&self) -> Vec<FeeDecayRow> {
    let pool = PoolState::balanced(500);
    ELAPSED_HOURS
      .iter()
      .map(|&hours| {
        let elapsed_seconds = hours * SECONDS_PER_HOUR;
        FeeDecayRow {
          elapsed_seconds,
          fee: self.router.fee_model().breakdown(&pool, elapsed_seconds),
        }
      })
      .collect()
  }

  /// Post-bootstrap fee as the pool skews toward YES.
  pub fn fee_by_skew(&self) -> Vec<SkewFeeRow> {
    let fees = self.router.fee_model();
    let after_bootstrap = fees.schedule().bootstrap_window_seconds + 1;
    SKEW_POINTS_BPS
      .iter()
      .map(|&p_yes_bps| {
        let total = Amount::from(BPS_DENOMINATOR);
        let no_reserve = Amount::from(p_yes_bps);
        let pool = PoolState::new(total - no_reserve, no_reserve);
        SkewFeeRow {
          p_yes_bps,
          skew_bps: p_yes_bps.abs_diff(HALF_BPS),
          fee: fees.breakdown(&pool, after_bootstrap),
        }
      })
      .collect()
  }
}

fn units(values: &[Decimal]) -> Vec<Amount> {
  values.iter().filter_map(|&v| to_units(v)).filter(|&u| u > 0).collect()
}
