//! Transaction loading from row-oriented CSV input
//!
//! Every row of the input is one purchase event; every non-empty cell in the
//! row is one item. There is no header row and rows may differ in width.

use crate::error::{MiningError, MiningResult};
use csv::{ReaderBuilder, Trim};
use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Dense identifier of an item label inside an [`ItemCatalog`].
pub type ItemId = u32;

/// Interned item labels.
///
/// Ids are assigned in lexicographic order of the labels, so ordering two ids
/// orders their labels the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemCatalog {
    labels: Vec<String>,
    index: HashMap<String, ItemId>,
}

impl ItemCatalog {
    fn from_labels(labels: BTreeSet<String>) -> Self {
        let labels: Vec<String> = labels.into_iter().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(id, label)| (label.clone(), id as ItemId))
            .collect();
        Self { labels, index }
    }

    /// Label for an id produced by this catalog.
    pub fn label(&self, id: ItemId) -> &str {
        &self.labels[id as usize]
    }

    /// Id of a label, if it occurs in the data.
    pub fn id(&self, label: &str) -> Option<ItemId> {
        self.index.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All ids in label order.
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.labels.len()).map(|id| id as ItemId)
    }
}

/// Options for turning delimited text into transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Trim surrounding whitespace from every cell
    pub trim: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: true,
        }
    }
}

/// A loaded dataset: the item catalog plus one sorted, de-duplicated id list
/// per input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSet {
    catalog: ItemCatalog,
    transactions: Vec<Vec<ItemId>>,
}

impl TransactionSet {
    /// Build a dataset from in-memory rows of labels.
    ///
    /// Zero-length labels are skipped; a row that ends up with no items is
    /// still counted as a transaction.
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(Into::into)
                    .filter(|cell: &String| !cell.is_empty())
                    .collect()
            })
            .collect();

        let labels: BTreeSet<String> = rows.iter().flatten().cloned().collect();
        let catalog = ItemCatalog::from_labels(labels);

        let transactions = rows
            .iter()
            .map(|row| {
                let ids: BTreeSet<ItemId> = row
                    .iter()
                    .filter_map(|label| catalog.id(label))
                    .collect();
                ids.into_iter().collect()
            })
            .collect();

        Self {
            catalog,
            transactions,
        }
    }

    /// Parse delimited rows from a reader.
    pub fn from_reader<R: Read>(reader: R, options: &LoaderOptions) -> MiningResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter)
            .trim(if options.trim { Trim::All } else { Trim::None })
            .from_reader(reader);

        let mut rows = Vec::new();
        let mut blank_lines = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            // Whitespace-only lines are skipped like blank ones; `,,` rows still count.
            if record.len() == 1 && record[0].trim().is_empty() {
                blank_lines += 1;
                continue;
            }
            rows.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
        }
        if blank_lines > 0 {
            debug!(blank_lines, "skipped whitespace-only lines");
        }

        if rows.is_empty() {
            return Err(MiningError::Input("input contains no transactions".into()));
        }

        let set = Self::from_rows(rows);
        info!(
            transactions = set.len(),
            items = set.catalog.len(),
            "loaded transactions"
        );
        debug!(
            empty_rows = set.transactions.iter().filter(|t| t.is_empty()).count(),
            "rows without any item"
        );
        Ok(set)
    }

    /// Parse delimited rows held in a string.
    pub fn from_csv_str(raw: &str, options: &LoaderOptions) -> MiningResult<Self> {
        Self::from_reader(raw.as_bytes(), options)
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn transactions(&self) -> &[Vec<ItemId>] {
        &self.transactions
    }

    /// Number of transactions (N in every support computation).
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Load transactions from a CSV file on disk.
pub fn load_transactions(path: impl AsRef<Path>, options: &LoaderOptions) -> MiningResult<TransactionSet> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| MiningError::Input(format!("cannot open {}: {}", path.display(), e)))?;
    TransactionSet::from_reader(std::io::BufReader::new(file), options)
}
