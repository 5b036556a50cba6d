use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::PathBuf;

use crate::cli::ExportFormat;
use crate::config::Config;
use crate::graph::builder::ModelBuilder;
use crate::graph::theme::{Environment, Palette, SystemEnvironment};
use crate::provider;

static DATABASE: Emoji<'_, '_> = Emoji("💾 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static FILE: Emoji<'_, '_> = Emoji("📁 ", "");

pub async fn run(config: Config, format: ExportFormat, output: PathBuf) -> Result<()> {
    println!();
    println!("{}", style(" Crossnet - Export ").bold().reverse());
    println!();

    let provider = provider::from_config(&config);
    let spinner = super::spinner(
        &DATABASE,
        &format!("Fetching crosspost network from {}...", provider.describe()),
    )?;
    let text = provider.fetch_graphml().await;
    spinner.finish_and_clear();
    let text = text.context("Failed to fetch the crosspost network")?;

    let env = SystemEnvironment::new(config.theme);
    let document = env
        .parse(&text)
        .context("Failed to parse the crosspost network")?;
    let model = ModelBuilder::new(Palette::for_scheme(env.color_scheme()))
        .with_sizing(config.size_scale())
        .build(&document);

    println!(
        "{}Loaded {} nodes, {} edges",
        CHECK,
        style(model.nodes.len()).green().bold(),
        style(model.edges.len()).green().bold()
    );

    let format_name = match format {
        ExportFormat::Json => "JSON",
        ExportFormat::Graphml => "GraphML",
    };

    print!("{}Exporting to {}... ", FILE, style(format_name).cyan());

    match format {
        ExportFormat::Json => crate::export::export_model_json(&model, &output)?,
        ExportFormat::Graphml => crate::export::export_graphml(&document, &output)?,
    }

    println!("{}", style("done").green());
    println!();
    println!(
        "  {} {}",
        style("→").dim(),
        style(output.display()).cyan().underlined()
    );
    println!();

    Ok(())
}
