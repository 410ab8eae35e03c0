//! Interactive session: the foreground mind plus background musing and voice.

use anyhow::{Context, Result};
use colored::Colorize;
use neurograph::prelude::*;
use std::io::{BufRead, Write};
use std::sync::{Arc, PoisonError};

use super::open_store;
use super::prune::print_report;
use super::stats::print_chemistry;

/// Prints voiced thoughts between prompts.
struct ConsoleSink;

impl VoiceSink for ConsoleSink {
    fn deliver(&mut self, text: &str) -> neurograph::prelude::Result<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "\n  {}", text.magenta().italic())?;
        out.flush()?;
        Ok(())
    }
}

enum Flow {
    Continue,
    Quit,
}

pub fn run(config: &NeurographConfig, prune_on_start: bool) -> Result<()> {
    let store = open_store(config)?;
    if prune_on_start {
        let report = PlasticityEngine::new(&store).decay_and_prune()?;
        print_report(&report);
    }

    let clock = Arc::new(InteractionClock::new());
    let mut mind = Mind::new(store)?
        .with_clock(clock.clone())
        .with_homeostasis_speed(config.chemistry.homeostasis_speed);
    let coordinator = Coordinator::start(
        mind.store(),
        config,
        mind.shared_chemistry(),
        clock,
        Box::new(ConsoleSink),
    )?;

    let stats = mind.store().stats()?;
    println!(
        "{} Neurograph awake: {} concepts, {} synapses. Type {} for commands.",
        "→".blue(),
        stats.total_nodes.to_string().cyan(),
        stats.total_synapses.to_string().cyan(),
        "/help".cyan()
    );

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let outcome = if input.starts_with('/') {
            command(input, &mut mind, &coordinator)
        } else {
            converse(input, &mut mind).map(|()| Flow::Continue)
        };
        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(e) => println!("{} {e:#}", "✗".red()),
        }
    }

    mind.learn()?;
    coordinator.shutdown()?;
    println!("{} Goodbye.", "✓".green());
    Ok(())
}

fn converse(input: &str, mind: &mut Mind) -> Result<()> {
    let interaction = mind.interact(input)?;
    let reply = if interaction.woven {
        interaction.response.white().bold()
    } else {
        interaction.response.dimmed()
    };
    println!("{} {}", "neuro>".blue().bold(), reply);
    Ok(())
}

fn command(input: &str, mind: &mut Mind, coordinator: &Coordinator) -> Result<Flow> {
    let mut parts = input.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match name {
        "/quit" | "/exit" => return Ok(Flow::Quit),
        "/help" => print_help(),
        "/brain" => {
            let stats = mind.store().stats()?;
            println!(
                "  {} nodes · {} synapses · avg weight {:.3} · density {:.5}",
                stats.total_nodes.to_string().cyan(),
                stats.total_synapses.to_string().cyan(),
                stats.avg_synapse_weight,
                stats.density
            );
            for (label, degree) in mind.store().most_connected(5)? {
                println!("    {} {}", label.white().bold(), format!("({degree})").dimmed());
            }
            println!(
                "  musing: {} · voice: {}",
                coordinator.musing_state(),
                coordinator.voice_state()
            );
        }
        "/chem" => print_chemistry(&mind.chemistry()),
        "/inner" => {
            let log = coordinator
                .inner_log()
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if log.is_empty() {
                println!("  {}", "No inner thoughts yet.".dimmed());
            }
            for thought in log.recent(5) {
                println!(
                    "  {} {} {}",
                    thought.seed.white().bold(),
                    thought.verbalized,
                    format!(
                        "(energy {:.2}, surprise {:.2})",
                        thought.energy, thought.surprise
                    )
                    .dimmed()
                );
            }
        }
        "/feedback" => {
            let score: f64 = args
                .first()
                .context("Usage: /feedback <score>")?
                .parse()
                .context("Score must be a number")?;
            let linked = mind.feedback(score)?;
            println!("  {} feedback {score:+}, {linked} link(s) reinforced", "✓".green());
        }
        "/teach" => {
            let (concept, associated) = match args.as_slice() {
                [a, b, ..] => (*a, *b),
                _ => anyhow::bail!("Usage: /teach <concept> <associated> [strength]"),
            };
            let strength = args
                .get(2)
                .map(|s| s.parse::<f64>())
                .transpose()
                .context("Strength must be a number")?;
            match mind.teach(concept, associated, strength)? {
                Some(syn) => println!(
                    "  {} {concept} → {associated} (weight {:.3})",
                    "✓".green(),
                    syn.weight
                ),
                None => println!("  {} A concept cannot be associated with itself.", "•".yellow()),
            }
        }
        "/prune" => print_report(&mind.decay_and_prune()?),
        other => println!("  {} Unknown command {other}. Try /help.", "•".yellow()),
    }
    Ok(Flow::Continue)
}

fn print_help() {
    println!("{}", "Commands".blue().bold());
    println!("  {}                         show commands", "/help".cyan());
    println!("  {}                        graph summary and worker states", "/brain".cyan());
    println!("  {}                         neurochemistry and derived parameters", "/chem".cyan());
    println!("  {}                        recent inner thoughts", "/inner".cyan());
    println!("  {}             rate the last reply", "/feedback <score>".cyan());
    println!("  {}  teach an association", "/teach <a> <b> [strength]".cyan());
    println!("  {}                        decay and prune synapses", "/prune".cyan());
    println!("  {}                         leave", "/quit".cyan());
}
