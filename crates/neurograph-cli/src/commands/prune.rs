//! Run one decay-and-prune pass.

use anyhow::Result;
use colored::Colorize;
use neurograph::prelude::*;

use super::open_store;

pub fn run(config: &NeurographConfig) -> Result<()> {
    let store = open_store(config)?;
    let report = PlasticityEngine::new(&store).decay_and_prune()?;
    print_report(&report);
    Ok(())
}

pub fn print_report(report: &PruneReport) {
    println!(
        "{} Decayed {} synapse(s), pruned {} synapse(s) and {} orphan node(s)",
        "✓".green(),
        report.synapses_decayed.to_string().cyan(),
        report.synapses_pruned.to_string().cyan(),
        report.orphan_nodes_pruned.to_string().cyan()
    );
}
