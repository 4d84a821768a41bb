//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::AppConfig;
use crate::domain::amount::BPS_DENOMINATOR;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    name = %config.simulation.name,
    max_impact_bps = config.router.max_price_impact_bps,
    depletion_pct = config.vault.max_depletion_pct,
    mint_fallback = config.router.mint_fallback,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Load `path` if it exists, otherwise validated defaults.
///
/// # Errors
/// Fails only when the file exists but cannot be read or is invalid.
pub fn load_config_or_default(path: &str) -> Result<AppConfig> {
  if Path::new(path).exists() {
    return load_config(path);
  }
  warn!(path, "Config file not found, using defaults");
  let config = AppConfig::default();
  validate_config(&config)?;
  Ok(config)
}

/// Parse and validate a TOML document.
///
/// # Errors
/// Fails on malformed TOML or a validation failure.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Ordered fee bounds and bps values within 0..=10000
/// - Depletion percentage in 1..=100
/// - A usable search depth
/// - Non-negative simulation sizes and time to close
fn validate_config(config: &AppConfig) -> Result<()> {
  // Fee validation
  let fees = &config.fees;
  anyhow::ensure!(
    fees.min_fee_bps <= fees.max_fee_bps,
    "min_fee_bps ({}) must not exceed max_fee_bps ({})",
    fees.min_fee_bps,
    fees.max_fee_bps
  );
  for (name, value) in [
    ("max_fee_bps", fees.max_fee_bps),
    ("fee_cap_bps", fees.fee_cap_bps),
    ("skew_ref_bps", fees.skew_ref_bps),
  ] {
    anyhow::ensure!(
      value <= BPS_DENOMINATOR,
      "{name} must be <= {BPS_DENOMINATOR}, got {value}"
    );
  }
  anyhow::ensure!(fees.skew_ref_bps > 0, "skew_ref_bps must be positive");

  // Vault validation
  let vault = &config.vault;
  anyhow::ensure!(
    (1..=100).contains(&vault.max_depletion_pct),
    "max_depletion_pct must be in [1, 100], got {}",
    vault.max_depletion_pct
  );
  for (name, value) in [
    ("min_absolute_spread_bps", vault.min_absolute_spread_bps),
    ("base_relative_spread_bps", vault.base_relative_spread_bps),
    ("max_spread_bps", vault.max_spread_bps),
  ] {
    anyhow::ensure!(
      value <= BPS_DENOMINATOR,
      "{name} must be <= {BPS_DENOMINATOR}, got {value}"
    );
  }

  // Router validation
  let router = &config.router;
  anyhow::ensure!(
    router.max_price_impact_bps <= BPS_DENOMINATOR,
    "max_price_impact_bps must be <= {BPS_DENOMINATOR}, got {}",
    router.max_price_impact_bps
  );
  anyhow::ensure!(
    (1..=64).contains(&router.search_iterations),
    "search_iterations must be in [1, 64], got {}",
    router.search_iterations
  );

  // Simulation validation
  let sim = &config.simulation;
  if let Some(twap) = sim.twap_p_yes_bps {
    anyhow::ensure!(
      twap <= BPS_DENOMINATOR,
      "twap_p_yes_bps must be <= {BPS_DENOMINATOR}, got {twap}"
    );
  }
  anyhow::ensure!(
    sim
      .trade_sizes
      .iter()
      .chain(&sim.pool_sizes)
      .all(|size| !size.is_sign_negative()),
    "Simulation sizes must not be negative"
  );
  anyhow::ensure!(
    !sim.hours_to_close.is_sign_negative(),
    "hours_to_close must not be negative, got {}",
    sim.hours_to_close
  );
  anyhow::ensure!(
    sim.reference_pool_size > rust_decimal::Decimal::ZERO,
    "reference_pool_size must be positive"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_missing_file_falls_back_to_defaults() {
    let config = load_config_or_default("nonexistent.toml").unwrap();
    assert_eq!(config.fees.max_fee_bps, 75);
    assert_eq!(config.router.max_price_impact_bps, 1200);
    assert_eq!(config.vault.max_depletion_pct, 30);
  }

  #[test]
  fn test_empty_document_uses_defaults() {
    let config = parse_config("").unwrap();
    assert_eq!(config.fees.bootstrap_window_seconds, 172_800);
    assert_eq!(config.router.search_iterations, 16);
    assert!(config.router.mint_fallback);
  }

  #[test]
  fn test_partial_override() {
    let config = parse_config(
      r#"
        [fees]
        min_fee_bps = 5

        [vault]
        max_depletion_pct = 50

        [router]
        mint_fallback = false

        [simulation]
        trade_sizes = [10, 20.5]
      "#,
    )
    .unwrap();
    assert_eq!(config.fees.min_fee_bps, 5);
    assert_eq!(config.fees.max_fee_bps, 75);
    assert_eq!(config.vault.max_depletion_pct, 50);
    assert_eq!(config.vault.max_spread_bps, 500);
    assert!(!config.router.mint_fallback);
    assert_eq!(config.simulation.trade_sizes.len(), 2);
  }

  #[test]
  fn test_rejects_inverted_fee_bounds() {
    let err = parse_config("[fees]\nmin_fee_bps = 100\nmax_fee_bps = 50\n").unwrap_err();
    assert!(err.to_string().contains("min_fee_bps"));
  }

  #[test]
  fn test_fractional_hours_to_close() {
    let config = parse_config("[simulation]\nhours_to_close = 0.5\n").unwrap();
    assert_eq!(config.simulation.seconds_to_close(), 1800);
    assert!(parse_config("[simulation]\nhours_to_close = -1\n").is_err());
  }

  #[test]
  fn test_rejects_zero_depletion() {
    assert!(parse_config("[vault]\nmax_depletion_pct = 0\n").is_err());
  }
}
