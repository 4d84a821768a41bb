//! Configuration Module - TOML-based Router Configuration
//!
//! Loads and validates configuration from `config.toml`. Every pricing
//! constant of the fee curve, the vault spread model and the router lives
//! here, so independently configured markets can run side by side and
//! nothing is hardcoded in the domain layer. Each field falls back to the
//! production default when omitted.

pub mod loader;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::domain::fee_model::FeeSchedule;
use crate::domain::market::{SECONDS_PER_HOUR, Side};
use crate::domain::vault::VaultParams;
use crate::usecases::router::{RouterConfig, RouterParams};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  /// Simulation run settings.
  pub simulation: SimulationConfig,
  /// AMM fee curve.
  pub fees: FeeSchedule,
  /// Vault OTC spread and depletion.
  pub vault: VaultParams,
  /// Impact cap, search depth, mint fallback.
  pub router: RouterParams,
}

impl AppConfig {
  /// Pricing configuration handed to `Router::new`.
  pub const fn router_config(&self) -> RouterConfig {
    RouterConfig {
      fees: self.fees,
      vault: self.vault,
      router: self.router,
    }
  }
}

/// Settings for the `router-sim` analysis run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
  /// Human-readable run name.
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  pub log_level: String,
  /// Emit JSON structured logs.
  pub json_logs: bool,
  /// Bootstrap clock used for every simulated trade.
  pub elapsed_seconds: u64,
  /// Hours to close used for every simulated trade. Fractions allowed.
  pub hours_to_close: Decimal,
  /// Side bought in the venue tables.
  pub side: Side,
  /// Oracle TWAP; the pool spot probability when absent.
  pub twap_p_yes_bps: Option<u32>,
  /// Order sizes, in collateral units.
  pub trade_sizes: Vec<Decimal>,
  /// Total liquidity per market (split evenly across both sides
  /// of the pool and of the vault), in collateral units.
  pub pool_sizes: Vec<Decimal>,
  /// Liquidity of the market used by the single-market venue table.
  pub reference_pool_size: Decimal,
}

impl Default for SimulationConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
      json_logs: false,
      elapsed_seconds: 3600,
      hours_to_close: dec!(168),
      side: Side::Yes,
      twap_p_yes_bps: None,
      trade_sizes: vec![dec!(50), dec!(100), dec!(150), dec!(200), dec!(300), dec!(500)],
      pool_sizes: vec![dec!(100), dec!(500), dec!(1000), dec!(5000), dec!(10000)],
      reference_pool_size: dec!(1000),
    }
  }
}

impl SimulationConfig {
  /// `hours_to_close` in whole seconds, truncated.
  pub fn seconds_to_close(&self) -> u64 {
    self
      .hours_to_close
      .checked_mul(Decimal::from(SECONDS_PER_HOUR))
      .and_then(|seconds| seconds.trunc().to_u64())
      .unwrap_or(u64::MAX)
  }
}

// Default value functions

fn default_name() -> String {
  "router-sim".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}
