use std::env;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use curve_lib::curve::{build_strip_curve, CurveOptions};
use curve_lib::portfolio::position_to_orders;
use curve_lib::roll::{ExpiryRollPolicy, WeightCurve};
use curve_lib::universe::RollingUniverseBuilder;
use sources::{CsvSource, CurveDataSource};
use tracing::info;

/// ------------------------------
/// main: load tables + build strip
/// ------------------------------
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.len() < 2 {
        bail!("usage: strip-curves <meta.csv> <panel.csv> [n_positions] [start] [end]");
    }
    let n_positions: usize = match args.get(2) {
        Some(s) => s.parse().context("n_positions must be an integer")?,
        None => 3,
    };

    // 1) Load and validate the two input tables
    let source = CsvSource::new(&args[0], &args[1]);
    let meta = source.load_meta()?;
    let panel = source.load_panel()?;
    info!(contracts = meta.len(), observations = panel.len(), "tables loaded");

    // 2) Date range: explicit args, else the panel's observed span
    let (start, end) = match (args.get(3), args.get(4)) {
        (Some(s), Some(e)) => (
            s.parse::<NaiveDate>().context("bad start date")?,
            e.parse::<NaiveDate>().context("bad end date")?,
        ),
        _ => {
            let mut dates = panel.iter().map(|r| r.ts.date());
            let first = dates.next().context("panel is empty")?;
            panel
                .iter()
                .map(|r| r.ts.date())
                .fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)))
        }
    };

    // 3) Rank eligible contracts for every business day in range
    let universe = RollingUniverseBuilder::new(n_positions).build(&meta, start, end)?;
    info!(days = universe.len(), %start, %end, "universe built");

    // 4) Blend prices/ownership across a 10-business-day smoothstep roll
    let policy = ExpiryRollPolicy {
        roll_end_offset_bdays: 2,
        roll_window_bdays: Some(10),
        weight_curve: WeightCurve::Smoothstep,
        logistic_k: 10.0,
    };
    let (prices, holdings) =
        build_strip_curve(&panel, &universe, &meta, n_positions, &policy, &CurveOptions::default())?;

    // 5) Print the tail of the strip
    let tail: Vec<NaiveDate> = prices.dates().collect();
    for date in tail.iter().rev().take(5).rev() {
        let row: Vec<String> = (1..=n_positions)
            .map(|p| match prices.price(*date, p) {
                Some(px) if !px.is_nan() => format!("{px:.4}"),
                _ => "-".to_string(),
            })
            .collect();
        println!("{date}  {}", row.join("  "));
    }

    // 6) Translate the final front-position snapshot into orders
    if let Some(last) = tail.last() {
        let orders = position_to_orders(&holdings, *last, 1, 1_000_000.0)?;
        for order in &orders {
            println!("{last}  p1  {}  {:.2}", order.contract, order.notional);
        }
    }

    Ok(())
}
