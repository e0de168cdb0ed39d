//! Level-wise (Apriori) frequent itemset mining
//!
//! Level 1 counts every observed item. Each further level joins frequent
//! (k-1)-itemsets sharing their first k-2 items and drops any candidate with
//! an infrequent (k-1)-subset before scanning transactions. Support is
//! anti-monotone, so a dropped candidate could never have been frequent.

use crate::data::{ItemId, TransactionSet};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Parameters of one mining pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinerConfig {
    /// Inclusive minimum support
    pub min_support: f64,
    /// Largest itemset size to search; `None` runs until a level is empty
    pub max_len: Option<usize>,
}

/// An itemset whose support met the threshold
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    /// Sorted, unique item ids
    pub items: Vec<ItemId>,
    /// Transactions containing every item
    pub count: usize,
    /// `count / N`
    pub support: f64,
}

impl FrequentItemset {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All frequent itemsets of a mining pass, grouped by size.
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    levels: Vec<Vec<FrequentItemset>>,
    supports: HashMap<Vec<ItemId>, f64>,
    transaction_count: usize,
}

impl FrequentItemsets {
    fn new(transaction_count: usize) -> Self {
        Self {
            transaction_count,
            ..Self::default()
        }
    }

    fn push_level(&mut self, level: Vec<FrequentItemset>) {
        for itemset in &level {
            self.supports.insert(itemset.items.clone(), itemset.support);
        }
        self.levels.push(level);
    }

    /// Frequent itemsets of size `k`, in lexicographic order.
    pub fn level(&self, k: usize) -> &[FrequentItemset] {
        k.checked_sub(1)
            .and_then(|index| self.levels.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every frequent itemset, smallest sizes first.
    pub fn iter(&self) -> impl Iterator<Item = &FrequentItemset> {
        self.levels.iter().flatten()
    }

    /// Support of a sorted itemset, if it was found frequent.
    pub fn support(&self, items: &[ItemId]) -> Option<f64> {
        self.supports.get(items).copied()
    }

    /// Size of the largest frequent itemset found.
    pub fn max_len(&self) -> usize {
        self.levels.len()
    }

    pub fn len(&self) -> usize {
        self.supports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }
}

/// Find every itemset with support >= `config.min_support`.
///
/// # Arguments
/// * `data` - Loaded transactions
/// * `config` - Support threshold and size cap
///
/// # Returns
/// * `FrequentItemsets`, empty when there are no transactions
pub fn mine_frequent_itemsets(data: &TransactionSet, config: &MinerConfig) -> FrequentItemsets {
    let n = data.len();
    let mut result = FrequentItemsets::new(n);
    if n == 0 || config.max_len == Some(0) {
        return result;
    }

    let mut level = frequent_singletons(data, config.min_support);
    let mut k = 1;

    while !level.is_empty() {
        info!(k, frequent = level.len(), "frequent itemsets");

        let at_cap = config.max_len.is_some_and(|max| k >= max);
        let next = if at_cap {
            Vec::new()
        } else {
            let candidates = generate_candidates(&level);
            debug!(k = k + 1, candidates = candidates.len(), "candidates after pruning");
            count_candidates(candidates, data, config.min_support)
        };

        result.push_level(level);
        level = next;
        k += 1;
    }

    result
}

fn frequent_singletons(data: &TransactionSet, min_support: f64) -> Vec<FrequentItemset> {
    let n = data.len();
    let mut counts = vec![0usize; data.catalog().len()];
    for transaction in data.transactions() {
        for &id in transaction {
            counts[id as usize] += 1;
        }
    }

    data.catalog()
        .ids()
        .filter_map(|id| {
            let count = counts[id as usize];
            let support = support_of(count, n);
            (count > 0 && support >= min_support).then(|| FrequentItemset {
                items: vec![id],
                count,
                support,
            })
        })
        .collect()
}

/// Join step plus subset pruning.
///
/// `previous` must be in lexicographic order; the candidates come out in
/// lexicographic order too.
fn generate_candidates(previous: &[FrequentItemset]) -> Vec<Vec<ItemId>> {
    let frequent: HashSet<&[ItemId]> = previous.iter().map(|s| s.items.as_slice()).collect();
    let mut candidates = Vec::new();
    let mut pruned = 0usize;

    for (i, left) in previous.iter().enumerate() {
        let (prefix, last) = match left.items.split_last() {
            Some((last, prefix)) => (prefix, *last),
            None => continue,
        };

        for right in &previous[i + 1..] {
            if !right.items.starts_with(prefix) {
                // Same-prefix itemsets are contiguous in lexicographic order.
                break;
            }
            let Some(&extension) = right.items.last() else {
                continue;
            };

            let mut candidate = Vec::with_capacity(left.items.len() + 1);
            candidate.extend_from_slice(prefix);
            candidate.push(last);
            candidate.push(extension);

            if has_infrequent_subset(&candidate, &frequent) {
                pruned += 1;
            } else {
                candidates.push(candidate);
            }
        }
    }

    if pruned > 0 {
        debug!(pruned, "candidates with an infrequent subset");
    }
    candidates
}

/// Dropping either of the last two items gives one of the joined parents,
/// so only the earlier positions need a lookup.
fn has_infrequent_subset(candidate: &[ItemId], frequent: &HashSet<&[ItemId]>) -> bool {
    let mut subset = Vec::with_capacity(candidate.len().saturating_sub(1));
    (0..candidate.len().saturating_sub(2)).any(|skip| {
        subset.clear();
        subset.extend(
            candidate
                .iter()
                .enumerate()
                .filter(|&(index, _)| index != skip)
                .map(|(_, &id)| id),
        );
        !frequent.contains(subset.as_slice())
    })
}

fn count_candidates(
    candidates: Vec<Vec<ItemId>>,
    data: &TransactionSet,
    min_support: f64,
) -> Vec<FrequentItemset> {
    let n = data.len();
    candidates
        .into_iter()
        .filter_map(|items| {
            let count = data
                .transactions()
                .iter()
                .filter(|transaction| contains_all(transaction, &items))
                .count();
            let support = support_of(count, n);
            (count > 0 && support >= min_support).then_some(FrequentItemset {
                items,
                count,
                support,
            })
        })
        .collect()
}

/// Subset test over two sorted id lists.
pub(crate) fn contains_all(transaction: &[ItemId], items: &[ItemId]) -> bool {
    if items.len() > transaction.len() {
        return false;
    }
    let mut rest = transaction.iter();
    items.iter().all(|item| rest.any(|id| id == item))
}

fn support_of(count: usize, n: usize) -> f64 {
    count as f64 / n as f64
}
