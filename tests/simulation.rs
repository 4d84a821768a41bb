//! Simulation Sweep - Liquidity Scenario Checks
//!
//! Runs the full scenario sweep from a TOML configuration and checks
//! the shape of each report table against the routing rules.

use prediction_market_router::config::loader::parse_config;
use prediction_market_router::domain::amount::Amount;
use prediction_market_router::domain::trade::VenueKind;
use prediction_market_router::usecases::simulation::Simulation;

const UNIT: Amount = 1_000_000;

#[test]
fn test_default_sweep_matches_reference_market() {
    let config = parse_config("").unwrap();
    let report = Simulation::new(&config).run();

    assert_eq!(report.venue_breakdown.len(), 6);
    let first = &report.venue_breakdown[0];
    assert_eq!(first.trade_size, 50 * UNIT);
    assert_eq!(first.result.venues_used, vec![VenueKind::Otc]);

    let big = report
        .venue_breakdown
        .iter()
        .find(|row| row.trade_size == 300 * UNIT)
        .unwrap();
    assert_eq!(big.result.route_label(), "OTC+AMM+MINT");

    for row in report.venue_breakdown.iter().chain(&report.pool_sweep) {
        assert!(row.result.is_conserved());
        assert_eq!(row.result.remaining_collateral, 0);
    }
}

#[test]
fn test_pool_sweep_covers_every_market() {
    let config = parse_config("").unwrap();
    let report = Simulation::new(&config).run();
    // smallest and largest order for each of the five markets
    assert_eq!(report.pool_sweep.len(), 10);

    // a $500 order on a $100 market cannot avoid minting
    let tiny = &report.pool_sweep[1];
    assert_eq!(tiny.pool_size, 100 * UNIT);
    assert!(tiny.result.venues_used.contains(&VenueKind::Mint));
}

#[test]
fn test_max_amm_trade_is_about_fourteen_percent() {
    let config = parse_config("").unwrap();
    let report = Simulation::new(&config).run();
    for row in &report.max_amm_trade {
        assert!(row.impact_bps <= 1200);
        assert!(
            (1_200..=1_600).contains(&row.share_of_pool_bps),
            "pool {} admits {} bps",
            row.pool_size,
            row.share_of_pool_bps
        );
    }
}

#[test]
fn test_amm_impact_table_flags_orders_over_cap() {
    let config = parse_config("").unwrap();
    let report = Simulation::new(&config).run();
    assert_eq!(report.amm_impact.len(), 28);

    let row = |pool: Amount, trade: Amount| {
        report
            .amm_impact
            .iter()
            .find(|r| r.pool_size == pool * UNIT && r.trade_size == trade * UNIT)
            .unwrap()
    };
    let deep = row(1000, 50);
    assert!(deep.within_cap);
    assert_eq!(deep.price_impact_bps, 473);
    assert_eq!(deep.fee_bps, 74);
    assert!(deep.shares_out > 50 * UNIT);

    let shallow = row(100, 50);
    assert!(!shallow.within_cap);
    assert!(shallow.price_impact_bps > 1200);

    for r in &report.amm_impact {
        assert_eq!(r.within_cap, r.price_impact_bps <= report.max_price_impact_bps);
    }
}

#[test]
fn test_configured_sweep_without_mint() {
    let config = parse_config(
        r#"
            [simulation]
            trade_sizes = [25, 400]
            pool_sizes = [1000]

            [router]
            mint_fallback = false
        "#,
    )
    .unwrap();
    let report = Simulation::new(&config).run();

    assert_eq!(report.venue_breakdown.len(), 2);
    let large = &report.venue_breakdown[1];
    assert!(large.result.remaining_collateral > 0);
    assert!(!large.result.venues_used.contains(&VenueKind::Mint));
    assert!(large.result.is_conserved());
}

#[test]
fn test_report_serializes() {
    let config = parse_config("[simulation]\nname = \"ci\"\n").unwrap();
    let report = Simulation::new(&config).run();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["name"], "ci");
    assert_eq!(json["venue_breakdown"][0]["result"]["venues_used"][0], "OTC");
}
