//! BasketForge: market basket analysis CLI
//!
//! Loads transactions, mines pairwise association rules, prints the
//! strongest ones, exports them as CSV and optionally draws charts.

use anyhow::{Context, Result};
use basketforge::{
    load_transactions, mine_transactions, report, viz, Args, MiningOptions, RuleRecord,
};
use clap::Parser;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let options = args.mining_options()?;
    let records = run_pipeline(&args, &options)?;
    run_visualizations(&args, &records)?;

    Ok(())
}

/// Load, mine, print and export
fn run_pipeline(args: &Args, options: &MiningOptions) -> Result<Vec<RuleRecord>> {
    println!("=== Market Basket Analysis ===\n");
    let start_time = Instant::now();

    info!(
        input = %args.input,
        min_support = options.thresholds.min_support,
        min_confidence = options.thresholds.min_confidence,
        min_lift = options.thresholds.min_lift,
        "starting pipeline"
    );

    let load_start = Instant::now();
    let data = load_transactions(&args.input, &options.loader)
        .with_context(|| format!("Failed to load transactions from {}", args.input))?;
    println!(
        "✓ Data loaded: {} transactions, {} distinct items",
        data.len(),
        data.catalog().len()
    );
    info!(elapsed_s = load_start.elapsed().as_secs_f64(), "loading finished");

    let mine_start = Instant::now();
    let records = mine_transactions(&data, options)?;
    info!(elapsed_s = mine_start.elapsed().as_secs_f64(), "mining finished");

    if records.is_empty() {
        println!("\nNo recommendations found for the given thresholds.");
    } else {
        println!("✓ {} rules generated\n", records.len());
        println!("=== Top Recommendations (by lift) ===");
        print!("{}", report::render_table(&report::sort_by_lift(&records), args.top));
    }

    report::export_csv(&records, &args.output)?;
    println!("\nRecommendations saved to: {}", args.output);
    println!("Total processing time: {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(records)
}

/// Draw the requested charts
fn run_visualizations(args: &Args, records: &[RuleRecord]) -> Result<()> {
    if let Some(item) = &args.chart_item {
        viz::create_recommendation_chart(records, item, &args.chart_output)?;
        println!("Bar chart saved to: {}", args.chart_output);
    }

    if let Some(path) = &args.network {
        viz::create_network_graph(records, path)?;
        println!("Network graph saved to: {}", path);
    }

    Ok(())
}
