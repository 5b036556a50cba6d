use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;

use crate::config::Config;

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(force: bool) -> Result<()> {
    println!();
    println!("{}", style(" Crossnet - Initialization ").bold().reverse());
    println!();

    let config_dir = Config::config_dir()?;
    let config_path = Config::config_path()?;

    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

    let spinner = super::spinner(&GEAR, "Creating configuration...")?;
    let config_content = toml::to_string_pretty(&Config::default())?;
    fs::write(&config_path, config_content).context("Failed to write config file")?;
    spinner.finish_and_clear();

    tracing::info!("Wrote default configuration to {}", config_path.display());
    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  Point at a local analysis output instead of the API:");
    println!("    {} crossnet --data-dir ./analysis_output stats", style("$").dim());
    println!();
    println!("  Open the network in your browser:");
    println!("    {} crossnet viz", style("$").dim());
    println!();

    Ok(())
}
