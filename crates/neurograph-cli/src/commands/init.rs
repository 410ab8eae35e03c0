//! Initialize a new neurograph project.

use anyhow::{Context, Result};
use colored::Colorize;
use neurograph::prelude::*;
use std::path::PathBuf;

use crate::config::{self, CONFIG_FILE};

pub fn run(path: Option<PathBuf>) -> Result<()> {
    let base_path = match path {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    println!("{} Initializing neurograph project...", "→".blue());

    let settings = NeurographConfig::default();
    let db_path = base_path.join(&settings.store.path);
    if let Some(data_dir) = db_path.parent() {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        println!("  {} Created {}", "✓".green(), data_dir.display());
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config::save(&settings, &config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    let store = GraphStore::open(&db_path)
        .with_context(|| format!("Failed to create database: {}", db_path.display()))?;
    store.save_chemistry(&store.load_chemistry()?)?;
    println!("  {} Created {}", "✓".green(), db_path.display());

    if let Some(data_dir) = db_path.parent() {
        let gitignore_path = data_dir.join(".gitignore");
        if !gitignore_path.exists() {
            std::fs::write(&gitignore_path, "*.db\n*.db-wal\n*.db-shm\n")?;
            println!("  {} Created {}", "✓".green(), gitignore_path.display());
        }
    }

    println!();
    println!("{} Neurograph project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!("  {} neurograph teach dog animal", "1.".blue());
    println!("  {} neurograph chat", "2.".blue());
    println!("  {} neurograph stats", "3.".blue());

    Ok(())
}
