//! Association rule generation from frequent itemsets

use crate::apriori::{FrequentItemset, FrequentItemsets};
use crate::data::ItemId;
use tracing::{debug, info};

/// How many rules a single itemset may produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RuleOrientation {
    /// Only the first accepted split, antecedents tried in label order.
    #[default]
    FirstQualifying,
    /// Every accepted split.
    AllQualifying,
}

/// Thresholds and scope for rule generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleConfig {
    /// Inclusive minimum confidence
    pub min_confidence: f64,
    /// Inclusive minimum lift
    pub min_lift: f64,
    /// Only consider itemsets of exactly this size
    pub exact_len: Option<usize>,
    pub orientation: RuleOrientation,
}

/// A directed rule `antecedent -> consequent`
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationRule {
    pub antecedent: Vec<ItemId>,
    pub consequent: Vec<ItemId>,
    /// Support of antecedent and consequent together
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
}

/// Derive rules from every frequent itemset of size two or more.
///
/// Rules come out in itemset discovery order. Within an itemset,
/// antecedents are tried by size, then in lexicographic order, so for a
/// pair `{a, b}` with `a < b` the rule `a -> b` is tried before `b -> a`.
pub fn generate_rules(itemsets: &FrequentItemsets, config: &RuleConfig) -> Vec<AssociationRule> {
    let mut rules = Vec::new();

    let eligible = itemsets.iter().filter(|itemset| match config.exact_len {
        Some(len) => itemset.len() == len,
        None => itemset.len() >= 2,
    });

    for itemset in eligible {
        for split in splits(itemset.len()) {
            let Some(rule) = evaluate_split(itemset, &split, itemsets) else {
                continue;
            };
            if rule.confidence >= config.min_confidence && rule.lift >= config.min_lift {
                rules.push(rule);
                if config.orientation == RuleOrientation::FirstQualifying {
                    break;
                }
            }
        }
    }

    info!(rules = rules.len(), "association rules accepted");
    rules
}

fn evaluate_split(
    itemset: &FrequentItemset,
    antecedent_positions: &[usize],
    itemsets: &FrequentItemsets,
) -> Option<AssociationRule> {
    let (antecedent, consequent): (Vec<_>, Vec<_>) = itemset
        .items
        .iter()
        .enumerate()
        .partition(|(position, _)| antecedent_positions.contains(position));
    let antecedent: Vec<ItemId> = antecedent.into_iter().map(|(_, &id)| id).collect();
    let consequent: Vec<ItemId> = consequent.into_iter().map(|(_, &id)| id).collect();

    let antecedent_support = itemsets.support(&antecedent).filter(|&s| s > 0.0);
    let consequent_support = itemsets.support(&consequent).filter(|&s| s > 0.0);
    let (Some(antecedent_support), Some(consequent_support)) = (antecedent_support, consequent_support)
    else {
        debug!(?antecedent, ?consequent, "skipping rule with unknown side support");
        return None;
    };

    let confidence = itemset.support / antecedent_support;
    let lift = confidence / consequent_support;

    Some(AssociationRule {
        antecedent,
        consequent,
        support: itemset.support,
        confidence,
        lift,
    })
}

/// Antecedent position sets for an itemset of `len` items: sizes 1..len,
/// each size in lexicographic combination order.
fn splits(len: usize) -> Vec<Vec<usize>> {
    (1..len).flat_map(|size| combinations(len, size)).collect()
}

fn combinations(n: usize, r: usize) -> Vec<Vec<usize>> {
    if r == 0 || r > n {
        return Vec::new();
    }
    let mut result = Vec::new();
    let mut current: Vec<usize> = (0..r).collect();
    loop {
        result.push(current.clone());
        // Rightmost position that can still move forward
        let Some(i) = (0..r).rev().find(|&i| current[i] < n - r + i) else {
            return result;
        };
        current[i] += 1;
        for j in i + 1..r {
            current[j] = current[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apriori::{mine_frequent_itemsets, MinerConfig};
    use crate::data::TransactionSet;

    fn pair_config(min_confidence: f64, min_lift: f64) -> RuleConfig {
        RuleConfig {
            min_confidence,
            min_lift,
            exact_len: Some(2),
            orientation: RuleOrientation::FirstQualifying,
        }
    }

    fn mine(rows: Vec<Vec<&str>>, min_support: f64, max_len: Option<usize>) -> (TransactionSet, FrequentItemsets) {
        let data = TransactionSet::from_rows(rows);
        let frequent = mine_frequent_itemsets(
            &data,
            &MinerConfig {
                min_support,
                max_len,
            },
        );
        (data, frequent)
    }

    #[test]
    fn test_combinations_order() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        assert_eq!(combinations(3, 3), vec![vec![0, 1, 2]]);
        assert!(combinations(2, 3).is_empty());
        assert_eq!(splits(2), vec![vec![0], vec![1]]);
        assert_eq!(splits(3).len(), 6);
    }

    #[test]
    fn test_inclusive_lift_boundary() {
        let (data, frequent) = mine(vec![vec!["A", "B"], vec!["A", "B"], vec!["A", "C"]], 0.5, Some(2));

        let rules = generate_rules(&frequent, &pair_config(0.5, 1.0));
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.antecedent, vec![data.catalog().id("A").unwrap()]);
        assert_eq!(rule.consequent, vec![data.catalog().id("B").unwrap()]);
        assert_eq!(rule.support, 2.0 / 3.0);
        assert_eq!(rule.confidence, 2.0 / 3.0);
        assert_eq!(rule.lift, 1.0);

        let stricter = generate_rules(&frequent, &pair_config(0.5, 1.0 + 1e-9));
        assert!(stricter.is_empty());
    }

    #[test]
    fn test_falls_back_to_reverse_direction() {
        // coffee -> sugar has confidence 2/4, sugar -> coffee has 2/2
        let (data, frequent) = mine(
            vec![
                vec!["coffee", "sugar"],
                vec!["coffee", "sugar"],
                vec!["coffee"],
                vec!["coffee"],
                vec!["tea"],
            ],
            0.2,
            Some(2),
        );

        let rules = generate_rules(&frequent, &pair_config(0.9, 1.0));
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].antecedent, vec![data.catalog().id("sugar").unwrap()]);
        assert_eq!(rules[0].consequent, vec![data.catalog().id("coffee").unwrap()]);
        assert_eq!(rules[0].confidence, 1.0);
    }

    #[test]
    fn test_all_orientations() {
        let (_, frequent) = mine(vec![vec!["x", "y"], vec!["x", "y"], vec!["z"]], 0.3, Some(2));

        let mut config = pair_config(0.5, 1.0);
        assert_eq!(generate_rules(&frequent, &config).len(), 1);

        config.orientation = RuleOrientation::AllQualifying;
        let rules = generate_rules(&frequent, &config);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].antecedent, rules[1].consequent);
        assert_eq!(rules[0].consequent, rules[1].antecedent);
    }

    #[test]
    fn test_confidence_is_exactly_one_when_antecedent_never_appears_alone() {
        let (data, frequent) = mine(
            vec![vec!["a", "b"], vec!["a", "b"], vec!["b"], vec!["c"]],
            0.25,
            Some(2),
        );
        let rules = generate_rules(&frequent, &pair_config(0.0, 0.0));
        let a = data.catalog().id("a").unwrap();
        let rule = rules.iter().find(|r| r.antecedent == vec![a]).unwrap();
        assert_eq!(rule.confidence, 1.0);
        assert_eq!(rule.lift, 1.0 / 0.75);
    }

    #[test]
    fn test_larger_itemsets_when_not_restricted() {
        let (_, frequent) = mine(
            vec![vec!["a", "b", "c"], vec!["a", "b", "c"], vec!["a", "b"], vec!["c"]],
            0.5,
            None,
        );
        let config = RuleConfig {
            min_confidence: 0.0,
            min_lift: 0.0,
            exact_len: None,
            orientation: RuleOrientation::AllQualifying,
        };
        let rules = generate_rules(&frequent, &config);

        // three pairs with two directions each, one triple with six splits
        assert_eq!(rules.len(), 12);
        let triple_rules: Vec<_> = rules
            .iter()
            .filter(|r| r.antecedent.len() + r.consequent.len() == 3)
            .collect();
        assert_eq!(triple_rules.len(), 6);
        assert_eq!(triple_rules[0].antecedent.len(), 1);
        assert_eq!(triple_rules[5].antecedent.len(), 2);
    }

    #[test]
    fn test_exact_len_skips_other_sizes() {
        let (_, frequent) = mine(
            vec![vec!["a", "b", "c"], vec!["a", "b", "c"]],
            0.5,
            None,
        );
        let rules = generate_rules(&frequent, &pair_config(0.0, 0.0));
        assert_eq!(rules.len(), 3);
        assert!(rules.iter().all(|r| r.antecedent.len() == 1 && r.consequent.len() == 1));
    }
}
