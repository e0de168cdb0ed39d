//! Command-line interface definitions and argument parsing

use crate::config::{MiningOptions, Thresholds};
use crate::data::LoaderOptions;
use crate::rules::RuleOrientation;
use clap::Parser;

/// Market basket analysis: association rules between pairs of products
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the transaction CSV (one transaction per row, no header)
    #[arg(short, long, default_value = "transactions.csv")]
    pub input: String,

    /// Minimum support, in (0, 1]
    #[arg(short = 's', long, default_value = "0.0045")]
    pub min_support: f64,

    /// Minimum confidence, in [0, 1]
    #[arg(short = 'c', long, default_value = "0.2")]
    pub min_confidence: f64,

    /// Minimum lift, greater than 0
    #[arg(short = 'l', long, default_value = "3.0")]
    pub min_lift: f64,

    /// Field delimiter of the input file
    #[arg(long, default_value = ",")]
    pub delimiter: String,

    /// Keep surrounding whitespace in item names
    #[arg(long)]
    pub no_trim: bool,

    /// Emit every qualifying direction of a pair instead of the first one
    #[arg(long)]
    pub all_orientations: bool,

    /// Output path for the CSV export
    #[arg(short, long, default_value = "mba_recommendations.csv")]
    pub output: String,

    /// Number of rules to print, strongest lift first
    #[arg(long, default_value = "20")]
    pub top: usize,

    /// Draw a bar chart of the recommendations for this item
    #[arg(long)]
    pub chart_item: Option<String>,

    /// Output path for the bar chart
    #[arg(long, default_value = "top_recommendations.png")]
    pub chart_output: String,

    /// Draw a network graph of all rules to this path
    #[arg(long)]
    pub network: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.min_support, self.min_confidence, self.min_lift)
    }

    /// Parse the delimiter argument; it must be a single byte.
    pub fn delimiter_byte(&self) -> crate::Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] => Ok(*byte),
            _ => anyhow::bail!(
                "Delimiter must be a single byte character, got '{}'",
                self.delimiter
            ),
        }
    }

    /// Build validated mining options from the arguments
    pub fn mining_options(&self) -> crate::Result<MiningOptions> {
        let thresholds = self.thresholds();
        thresholds.validate()?;

        Ok(MiningOptions {
            thresholds,
            loader: LoaderOptions {
                delimiter: self.delimiter_byte()?,
                trim: !self.no_trim,
            },
            orientation: if self.all_orientations {
                RuleOrientation::AllQualifying
            } else {
                RuleOrientation::FirstQualifying
            },
        })
    }
}
