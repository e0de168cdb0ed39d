//! BasketForge: market basket analysis with Apriori association rules
//!
//! Transactions are read from header-less CSV rows, frequent itemsets are
//! mined level by level, and pairwise rules (`A -> B`) are kept when their
//! confidence and lift pass the configured thresholds.
//!
//! ```no_run
//! let records = basketforge::mine("milk,bread\nmilk,eggs\nbread\n", 0.3, 0.5, 1.0)?;
//! for record in &records {
//!     println!("{} (lift {:.2})", record.rule, record.lift);
//! }
//! # Ok::<(), basketforge::MiningError>(())
//! ```

pub mod apriori;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod report;
pub mod rules;
pub mod viz;

use std::path::Path;
use tracing::info;

// Re-export public items for easier access
pub use apriori::{mine_frequent_itemsets, FrequentItemset, FrequentItemsets, MinerConfig};
pub use cli::Args;
pub use config::{MiningOptions, Thresholds};
pub use data::{load_transactions, ItemCatalog, ItemId, LoaderOptions, TransactionSet};
pub use error::{MiningError, MiningResult};
pub use report::{export_csv, format_rules, sort_by_lift, to_csv_string, RuleRecord};
pub use rules::{generate_rules, AssociationRule, RuleConfig, RuleOrientation};
pub use viz::{create_network_graph, create_recommendation_chart};

/// Common result type for the application layer
pub type Result<T> = anyhow::Result<T>;

/// Largest itemset the pairwise pipeline searches for
pub const PAIR_LEN: usize = 2;

/// Mine pairwise rules from raw CSV text.
///
/// Thresholds are validated before the input is parsed. An input that
/// yields no rules returns an empty vector.
pub fn mine(
    raw_input: &str,
    min_support: f64,
    min_confidence: f64,
    min_lift: f64,
) -> MiningResult<Vec<RuleRecord>> {
    let options = MiningOptions::with_thresholds(Thresholds::new(min_support, min_confidence, min_lift));
    mine_with(raw_input, &options)
}

/// Like [`mine`] with loader and orientation options.
pub fn mine_with(raw_input: &str, options: &MiningOptions) -> MiningResult<Vec<RuleRecord>> {
    options.thresholds.validate()?;
    let data = TransactionSet::from_csv_str(raw_input, &options.loader)?;
    mine_transactions(&data, options)
}

/// Mine pairwise rules from a CSV file.
pub fn mine_file(path: impl AsRef<Path>, options: &MiningOptions) -> MiningResult<Vec<RuleRecord>> {
    options.thresholds.validate()?;
    let data = load_transactions(path, &options.loader)?;
    mine_transactions(&data, options)
}

/// Run the miner and rule generator over already loaded transactions.
pub fn mine_transactions(data: &TransactionSet, options: &MiningOptions) -> MiningResult<Vec<RuleRecord>> {
    let thresholds = &options.thresholds;
    thresholds.validate()?;

    let itemsets = mine_frequent_itemsets(
        data,
        &MinerConfig {
            min_support: thresholds.min_support,
            max_len: Some(PAIR_LEN),
        },
    );
    let rules = generate_rules(
        &itemsets,
        &RuleConfig {
            min_confidence: thresholds.min_confidence,
            min_lift: thresholds.min_lift,
            exact_len: Some(PAIR_LEN),
            orientation: options.orientation,
        },
    );

    let records = format_rules(&rules, data.catalog());
    info!(
        transactions = data.len(),
        frequent_itemsets = itemsets.len(),
        records = records.len(),
        "mining complete"
    );
    Ok(records)
}
