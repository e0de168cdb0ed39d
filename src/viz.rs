//! Chart rendering for mined rules using Plotters
//!
//! The image format follows the output path's extension (`.png`, `.jpg`).

use crate::report::RuleRecord;
use plotters::prelude::*;
use std::collections::HashMap;
use tracing::info;

/// Viridis-like palette for the recommendation bars
const BAR_COLORS: [RGBColor; 6] = [
    RGBColor(68, 1, 84),
    RGBColor(65, 68, 135),
    RGBColor(42, 120, 142),
    RGBColor(34, 168, 132),
    RGBColor(122, 209, 81),
    RGBColor(253, 231, 37),
];

const NODE_COLOR: RGBColor = RGBColor(135, 206, 235);

/// Rules with the given antecedent, strongest lift first.
pub fn top_consequents<'a>(records: &'a [RuleRecord], antecedent: &str) -> Vec<&'a RuleRecord> {
    let mut matching: Vec<&RuleRecord> = records
        .iter()
        .filter(|r| r.antecedent == antecedent)
        .collect();
    matching.sort_by(|a, b| {
        b.lift
            .total_cmp(&a.lift)
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    matching
}

/// Create a horizontal bar chart of the consequents recommended for one item
///
/// # Arguments
/// * `records` - Mined rules
/// * `antecedent` - Item whose recommendations are plotted
/// * `output_path` - Path to save the image
pub fn create_recommendation_chart(
    records: &[RuleRecord],
    antecedent: &str,
    output_path: &str,
) -> crate::Result<()> {
    let top = top_consequents(records, antecedent);
    if top.is_empty() {
        anyhow::bail!("No recommendations found for '{}'", antecedent);
    }

    let max_lift = top.iter().map(|r| r.lift).fold(0.0, f64::max);
    let rows = top.len() as f64;
    let height = (160 + 40 * top.len()).clamp(400, 2000) as u32;

    let root = BitMapBackend::new(output_path, (1000, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Top Recommendations for '{}'", antecedent), ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(10)
        .build_cartesian_2d(0f64..(max_lift * 1.4), 0f64..rows)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc("Lift")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (i, record) in top.iter().enumerate() {
        // Strongest recommendation on top
        let y = rows - i as f64;
        let color = &BAR_COLORS[i % BAR_COLORS.len()];

        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, y - 0.85), (record.lift, y - 0.15)],
            color.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            format!("{} ({:.2})", record.consequent, record.lift),
            (record.lift + max_lift * 0.02, y - 0.5),
            ("sans-serif", 15).into_font(),
        )))?;
    }

    root.present()?;
    info!(path = output_path, bars = top.len(), "recommendation chart saved");

    Ok(())
}

/// Items connected by rules. Edges are undirected; a pair mined in both
/// directions keeps its higher lift.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleGraph {
    /// Node labels in first-seen order
    pub nodes: Vec<String>,
    /// `(node, node, lift)`
    pub edges: Vec<(usize, usize, f64)>,
}

pub fn rule_graph(records: &[RuleRecord]) -> RuleGraph {
    let mut nodes: Vec<String> = Vec::new();
    let mut node_index: HashMap<&str, usize> = HashMap::new();
    let mut edges: Vec<(usize, usize, f64)> = Vec::new();
    let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();

    for record in records {
        let a = node_id(&record.antecedent, &mut nodes, &mut node_index);
        let b = node_id(&record.consequent, &mut nodes, &mut node_index);
        let key = (a.min(b), a.max(b));

        match edge_index.get(&key) {
            Some(&existing) => {
                let edge = &mut edges[existing];
                edge.2 = edge.2.max(record.lift);
            }
            None => {
                edge_index.insert(key, edges.len());
                edges.push((key.0, key.1, record.lift));
            }
        }
    }

    RuleGraph { nodes, edges }
}

fn node_id<'a>(label: &'a str, nodes: &mut Vec<String>, index: &mut HashMap<&'a str, usize>) -> usize {
    *index.entry(label).or_insert_with(|| {
        nodes.push(label.to_string());
        nodes.len() - 1
    })
}

/// Evenly spaced positions on the unit circle, first node at angle zero.
pub fn circular_layout(node_count: usize) -> Vec<(f64, f64)> {
    (0..node_count)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / node_count as f64;
            (angle.cos(), angle.sin())
        })
        .collect()
}

/// Create a network graph of all rules, edge width scaled by lift
pub fn create_network_graph(records: &[RuleRecord], output_path: &str) -> crate::Result<()> {
    if records.is_empty() {
        anyhow::bail!("No rules to draw");
    }

    let graph = rule_graph(records);
    let positions = circular_layout(graph.nodes.len());
    let max_lift = graph.edges.iter().map(|e| e.2).fold(0.0, f64::max);

    let root = BitMapBackend::new(output_path, (1200, 1200)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Network Graph of Association Rules", ("sans-serif", 30))
        .margin(40)
        .build_cartesian_2d(-1.3f64..1.3f64, -1.3f64..1.3f64)?;

    for &(a, b, lift) in &graph.edges {
        let width = 1 + (4.0 * lift / max_lift).round() as u32;
        chart.draw_series(std::iter::once(PathElement::new(
            vec![positions[a], positions[b]],
            BLACK.mix(0.4).stroke_width(width),
        )))?;
    }

    chart.draw_series(
        positions
            .iter()
            .map(|&point| Circle::new(point, 18, NODE_COLOR.mix(0.8).filled())),
    )?;
    chart.draw_series(graph.nodes.iter().zip(&positions).map(|(label, &(x, y))| {
        Text::new(label.clone(), (x * 1.12, y * 1.12), ("sans-serif", 14).into_font())
    }))?;

    root.present()?;
    info!(
        path = output_path,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "network graph saved"
    );

    Ok(())
}
