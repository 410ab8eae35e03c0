//! Teach an explicit association.

use anyhow::{bail, Result};
use colored::Colorize;
use neurograph::prelude::*;

use super::open_store;

pub fn run(
    config: &NeurographConfig,
    concept: &str,
    associated: &str,
    strength: Option<f64>,
) -> Result<()> {
    let strength = strength.unwrap_or(TEACH_STRENGTH);
    if !(0.0..=1.0).contains(&strength) {
        bail!("Strength must be within [0, 1], got {strength}");
    }
    let store = open_store(config)?;
    let learned = PlasticityEngine::new(&store).learn_association(
        concept,
        associated,
        strength,
        SynapseType::Association,
    )?;

    match learned {
        Some(synapse) => println!(
            "{} {} → {} {}",
            "✓".green(),
            concept.trim().to_lowercase().white().bold(),
            associated.trim().to_lowercase().white().bold(),
            format!("(weight {:.3})", synapse.weight).dimmed()
        ),
        None => println!(
            "{} A concept cannot be associated with itself.",
            "•".yellow()
        ),
    }
    Ok(())
}
