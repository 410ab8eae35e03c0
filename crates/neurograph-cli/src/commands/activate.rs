//! Spread activation from the command line.

use anyhow::{bail, Result};
use colored::Colorize;
use neurograph::prelude::*;

use super::open_store;

pub fn run(config: &NeurographConfig, labels: &[String], energy: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&energy) {
        bail!("Energy must be within [0, 1], got {energy}");
    }
    let store = open_store(config)?;
    let params = store.load_chemistry()?.graph_params();
    let result = ActivationEngine::new(&store).activate(labels, energy, &params)?;

    if result.is_empty() {
        println!(
            "{} None of {} is known yet. Try {}.",
            "•".yellow(),
            labels.join(", ").white(),
            "neurograph teach".cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} node(s) fired (depth {}, threshold {:.3}):",
        "→".blue(),
        result.total_fired.to_string().cyan(),
        params.max_propagation_depth,
        params.activation_threshold
    );
    println!();
    for (i, node) in result.fired_nodes.iter().enumerate() {
        let rank = format!("{}.", i + 1);
        let kind = match node.node_type {
            NodeType::Concept => String::new(),
            NodeType::Response => " [response]".to_string(),
        };
        println!(
            "  {} {}{} {}",
            rank.blue(),
            node.label.white().bold(),
            kind.dimmed(),
            format!("({:.3})", node.energy).dimmed()
        );
    }
    Ok(())
}
