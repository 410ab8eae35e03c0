//! Show graph statistics.

use anyhow::Result;
use colored::Colorize;
use neurograph::prelude::*;

use super::open_store;

pub fn run(config: &NeurographConfig, top: usize) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats()?;
    let chem = store.load_chemistry()?;

    println!("{}", "Neurograph Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Graph Structure".blue().bold());
    println!("  Total nodes:       {}", stats.total_nodes.to_string().cyan());
    println!("  Total synapses:    {}", stats.total_synapses.to_string().cyan());
    println!("  Avg weight:        {:.4}", stats.avg_synapse_weight);
    println!("  Density:           {:.6}", stats.density);
    if let Some(label) = &stats.most_fired_node {
        println!(
            "  Most fired:        {} ({} times)",
            label.white().bold(),
            stats.most_fired_count
        );
    }
    println!();

    let connected = store.most_connected(top)?;
    if !connected.is_empty() {
        println!("{}", "Most Connected".blue().bold());
        for (i, (label, degree)) in connected.iter().enumerate() {
            let rank = format!("{}.", i + 1);
            println!(
                "  {} {} {}",
                rank.blue(),
                label.white().bold(),
                format!("(degree {degree})").dimmed()
            );
        }
        println!();
    }

    print_chemistry(&chem);

    let recent = store.recent_activations(5)?;
    if !recent.is_empty() {
        println!();
        println!("{}", "Recent Activations".blue().bold());
        for record in recent {
            println!(
                "  {} {} fired, peak {} {}",
                record.trigger.white(),
                record.nodes_fired.to_string().cyan(),
                record.peak_node.as_deref().unwrap_or("-"),
                format!("@ {}", record.timestamp).dimmed()
            );
        }
    }

    println!();
    println!("{}", "═".repeat(40).dimmed());
    Ok(())
}

/// Print the chemistry vector with its derived tone and parameters.
pub fn print_chemistry(chem: &Neurochemistry) {
    let params = chem.graph_params();
    println!("{}", "Neurochemistry".blue().bold());
    println!("  Dopamine:          {:.3}", chem.dopamine);
    println!("  Serotonin:         {:.3}", chem.serotonin);
    println!("  Norepinephrine:    {:.3}", chem.norepinephrine);
    println!("  Cortisol:          {:.3}", chem.cortisol);
    println!("  Oxytocin:          {:.3}", chem.oxytocin);
    println!("  Tone:              {}", chem.tone().to_string().magenta());
    println!(
        "  Params:            depth {} · threshold {:.3} · decay {:.3} · plasticity {:.3}",
        params.max_propagation_depth,
        params.activation_threshold,
        params.decay_factor,
        params.plasticity
    );
}
