//! Router Simulator — Entry Point
//!
//! Runs the routing core over a grid of liquidity scenarios and prints
//! the resulting tables.
//!
//! Wiring sequence:
//! 1. Parse CLI flags (`--config <path>`, `--json`)
//! 2. Load config.toml + validate (defaults when absent)
//! 3. Init tracing (plain or JSON structured logging)
//! 4. Run the simulation sweep
//! 5. Print tables, or the whole report as JSON

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;

use prediction_market_router::config::loader::load_config_or_default;
use prediction_market_router::domain::amount::{Amount, Bps, from_units};
use prediction_market_router::domain::market::SECONDS_PER_HOUR;
use prediction_market_router::domain::trade::TradeResult;
use prediction_market_router::usecases::simulation::{RouteRow, Simulation, SimulationReport};

fn main() -> Result<()> {
    // ── 1. CLI flags ────────────────────────────────────────
    let mut config_path = "config.toml".to_string();
    let mut json = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--config" => {
                config_path = args.next().context("--config requires a path")?;
            }
            other => anyhow::bail!("Unknown argument: {other}"),
        }
    }

    // ── 2. Load configuration ───────────────────────────────
    let config =
        load_config_or_default(&config_path).context("Failed to load configuration")?;

    // ── 3. Initialize logging ───────────────────────────────
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.simulation.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.simulation.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    info!(
        name = %config.simulation.name,
        version = env!("CARGO_PKG_VERSION"),
        max_impact_bps = config.router.max_price_impact_bps,
        depletion_pct = config.vault.max_depletion_pct,
        "Starting router simulation"
    );

    // ── 4. Run ──────────────────────────────────────────────
    let report = Simulation::new(&config).run();

    // ── 5. Output ───────────────────────────────────────────
    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{out}");
    } else {
        print_report(&report);
    }

    Ok(())
}

fn pct(bps: Bps) -> String {
    format!("{:.2}%", f64::from(bps) / 100.0)
}

fn venue_cell(shares: Amount, collateral: Amount) -> String {
    if shares == 0 {
        return "-".to_string();
    }
    format!("{:.1} (${:.2})", from_units(shares), from_units(collateral))
}

fn print_route(row: &RouteRow) {
    let r: &TradeResult = &row.result;
    println!(
        "${:<8} | {:<20} | {:<20} | {:<20} | {:<10.1} | {}",
        from_units(row.trade_size),
        venue_cell(r.otc_shares, r.otc_collateral),
        venue_cell(r.amm_shares, r.amm_collateral),
        venue_cell(r.mint_shares, r.mint_collateral),
        from_units(r.total_shares),
        r.route_label(),
    );
}

fn header(title: &str) {
    println!("\n{}", "=".repeat(80));
    println!(" {title}");
    println!("{}", "=".repeat(80));
}

fn hours(seconds: u64) -> Decimal {
    (Decimal::from(seconds) / Decimal::from(SECONDS_PER_HOUR)).normalize()
}

fn print_report(report: &SimulationReport) {
    header("AMM price impact (balanced pool, no vault)");
    println!(
        "{:<10} | {:<10} | {:<10} | {:<12} | {:<8} | Shares out",
        "Pool", "Trade", "Impact", "Status", "Fee"
    );
    for row in &report.amm_impact {
        let (status, shares) = if row.within_cap {
            ("OK".to_string(), format!("{:.1}", from_units(row.shares_out)))
        } else {
            (format!(">{}bps", report.max_price_impact_bps), "-".to_string())
        };
        println!(
            "${:<9} | ${:<9} | {:<10} | {:<12} | {:<8} | {}",
            from_units(row.pool_size),
            from_units(row.trade_size),
            format!("{}bps", row.price_impact_bps),
            status,
            format!("{}bps", row.fee_bps),
            shares,
        );
    }

    header("Vault OTC against AMM (reference market)");
    println!(
        "{:<10} | {:<12} | {:<12} | {:<10} | Better",
        "Trade", "AMM shares", "OTC shares", "OTC used"
    );
    for row in &report.venue_comparison {
        let amm = row
            .amm_shares
            .map_or_else(|| "rejected".to_string(), |s| format!("{:.2}", from_units(s)));
        let (otc, used) = if row.otc_shares == 0 {
            ("-".to_string(), "-".to_string())
        } else {
            (
                format!("{:.2}", from_units(row.otc_shares)),
                format!("${:.2}", from_units(row.otc_collateral)),
            )
        };
        let better = row.better.map_or_else(|| "NONE".to_string(), |v| v.to_string());
        println!(
            "${:<9} | {:<12} | {:<12} | {:<10} | {}",
            from_units(row.trade_size),
            amm,
            otc,
            used,
            better,
        );
    }

    header(&format!("{}: venue breakdown", report.name));
    println!(
        "{:<9} | {:<20} | {:<20} | {:<20} | {:<10} | Venues",
        "Trade", "OTC", "AMM", "MINT", "Total"
    );
    for row in &report.venue_breakdown {
        print_route(row);
    }

    header("Venue mix by market liquidity");
    for row in &report.pool_sweep {
        print!("${:<8} ", from_units(row.pool_size));
        print_route(row);
    }

    header("Maximum AMM-only trade under the impact cap");
    println!("{:<10} | {:<12} | {:<12} | Impact", "Pool", "Max trade", "% of pool");
    for row in &report.max_amm_trade {
        println!(
            "${:<9} | ${:<11.2} | {:<12} | {}bps",
            from_units(row.pool_size),
            from_units(row.max_trade),
            pct(row.share_of_pool_bps),
            row.impact_bps,
        );
    }

    header("Vault OTC spread by inventory imbalance (buying YES)");
    println!("{:<12} | {:<10} | {:<10} | Effective price", "YES:NO", "Imbalance", "Spread");
    for row in &report.spread_by_imbalance {
        println!(
            "{:<12} | {:<10} | {:<10} | {}",
            format!("{}:{}", row.vault.yes_shares, row.vault.no_shares),
            format!("{}bps", row.imbalance_bps),
            format!("{}bps", row.spread.total_bps),
            pct(row.effective_price_bps),
        );
    }

    header("Vault OTC spread by time to close");
    println!("{:<10} | {:<12} | Total spread", "Hours", "Time boost");
    for row in &report.spread_by_time {
        println!(
            "{:<10} | {:<12} | {}",
            format!("{}h", hours(row.seconds_to_close)),
            format!("+{}bps", row.spread.time_boost_bps),
            pct(row.spread.total_bps),
        );
    }

    header("AMM fee decay during bootstrap (balanced pool)");
    println!("{:<10} | {:<10} | {:<10} | {:<10} | Total", "Elapsed", "Base", "Skew", "Asym");
    for row in &report.fee_decay {
        println!(
            "{:<10} | {:<10} | {:<10} | {:<10} | {}",
            format!("{}h", row.elapsed_seconds / 3600),
            format!("{}bps", row.fee.bootstrap_bps),
            format!("{}bps", row.fee.skew_bps),
            format!("{}bps", row.fee.asymmetric_bps),
            pct(row.fee.total_bps),
        );
    }

    header("AMM fee by pool skew (post-bootstrap)");
    println!("{:<8} | {:<10} | {:<10} | {:<10} | Total", "P(YES)", "Skew", "Skew fee", "Asym fee");
    for row in &report.fee_by_skew {
        println!(
            "{:<8} | {:<10} | {:<10} | {:<10} | {}",
            pct(row.p_yes_bps),
            format!("{}bps", row.skew_bps),
            format!("{}bps", row.fee.skew_bps),
            format!("{}bps", row.fee.asymmetric_bps),
            pct(row.fee.total_bps),
        );
    }
}
