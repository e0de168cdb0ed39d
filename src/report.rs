//! Output records, CSV export and console rendering of accepted rules

use crate::data::{ItemCatalog, ItemId};
use crate::rules::AssociationRule;
use anyhow::Context;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One emitted rule in tabular form. Numbers keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleRecord {
    #[serde(rename = "Rule")]
    pub rule: String,
    #[serde(rename = "Antecedent")]
    pub antecedent: String,
    #[serde(rename = "Consequent")]
    pub consequent: String,
    #[serde(rename = "Support")]
    pub support: f64,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "Lift")]
    pub lift: f64,
}

impl RuleRecord {
    pub const HEADER: [&'static str; 6] = ["Rule", "Antecedent", "Consequent", "Support", "Confidence", "Lift"];

    pub fn from_rule(rule: &AssociationRule, catalog: &ItemCatalog) -> Self {
        let antecedent = join_labels(&rule.antecedent, catalog);
        let consequent = join_labels(&rule.consequent, catalog);
        Self {
            rule: format!("{} -> {}", antecedent, consequent),
            antecedent,
            consequent,
            support: rule.support,
            confidence: rule.confidence,
            lift: rule.lift,
        }
    }
}

fn join_labels(ids: &[ItemId], catalog: &ItemCatalog) -> String {
    ids.iter()
        .map(|&id| catalog.label(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convert rules to records, keeping generation order.
pub fn format_rules(rules: &[AssociationRule], catalog: &ItemCatalog) -> Vec<RuleRecord> {
    rules
        .iter()
        .map(|rule| RuleRecord::from_rule(rule, catalog))
        .collect()
}

/// Copy of `records` ordered by lift, highest first; ties by rule label.
pub fn sort_by_lift(records: &[RuleRecord]) -> Vec<RuleRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.lift.total_cmp(&a.lift).then_with(|| a.rule.cmp(&b.rule)));
    sorted
}

/// Write a header row followed by one row per record.
pub fn write_csv<W: Write>(records: &[RuleRecord], writer: W) -> crate::Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(RuleRecord::HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv_string(records: &[RuleRecord]) -> crate::Result<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Export records to a CSV file.
pub fn export_csv(records: &[RuleRecord], path: impl AsRef<Path>) -> crate::Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(records, std::io::BufWriter::new(file))
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Render up to `limit` records as an aligned text table, numbers rounded
/// to four decimals.
pub fn render_table(records: &[RuleRecord], limit: usize) -> String {
    let shown = &records[..records.len().min(limit)];
    let rule_width = shown
        .iter()
        .map(|r| r.rule.chars().count())
        .chain(std::iter::once(RuleRecord::HEADER[0].len()))
        .max()
        .unwrap_or(4);

    let mut table = format!(
        "{:<rule_width$} | {:>10} | {:>10} | {:>10}\n",
        "Rule", "Support", "Confidence", "Lift"
    );
    table.push_str(&format!(
        "{}-+-{}-+-{}-+-{}\n",
        "-".repeat(rule_width),
        "-".repeat(10),
        "-".repeat(10),
        "-".repeat(10)
    ));
    for record in shown {
        table.push_str(&format!(
            "{:<rule_width$} | {:>10.4} | {:>10.4} | {:>10.4}\n",
            record.rule, record.support, record.confidence, record.lift
        ));
    }
    if records.len() > shown.len() {
        table.push_str(&format!("... {} more\n", records.len() - shown.len()));
    }
    table
}
