pub mod explore;
pub mod export;
pub mod init;
pub mod stats;
pub mod viz;

use anyhow::Result;
use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::config::Config;
use crate::graph::builder::format_count;
use crate::graph::controller::NeighborhoodInfo;
use crate::graph::theme::SystemEnvironment;
use crate::provider;
use crate::render::RenderSurface;
use crate::view::GraphView;

static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");

/// Steady-ticking spinner with an emoji prefix
pub(crate) fn spinner(emoji: &Emoji<'_, '_>, message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template(&format!("{}{{spinner:.green}} {{msg}}", emoji))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    Ok(spinner)
}

/// Mount a graph view over `surface` and feed it the network document from
/// the configured provider. Any load failure is returned as an error.
pub(crate) async fn open_view<S: RenderSurface>(
    config: &Config,
    surface: S,
) -> Result<GraphView<S, SystemEnvironment>> {
    let provider = provider::from_config(config);
    let mut view = GraphView::new(
        SystemEnvironment::new(config.theme),
        surface,
        config.size_scale(),
        config.interaction_settings(),
    );

    let ticket = view.begin_load();
    let spinner = spinner(
        &GRAPH,
        &format!("Fetching crosspost network from {}...", provider.describe()),
    )?;
    let result = provider.fetch_graphml().await;
    spinner.finish_and_clear();

    view.complete_load(ticket, result);
    if let Some(message) = view.error() {
        anyhow::bail!("Failed to load the crosspost network: {}", message);
    }
    Ok(view)
}

/// Print a selected node and its direct neighbours
pub(crate) fn print_neighborhood(info: &NeighborhoodInfo) {
    println!(
        "  {} {} {}",
        style("◆").yellow(),
        style(&info.label).bold(),
        style(format!("({})", info.node_type)).dim()
    );
    println!("    {} {}", style("id:").dim(), info.id);
    if let Some(weight) = info.weight {
        println!("    {} {}", style("subscribers:").dim(), format_count(weight));
    }
    if let Some(title) = &info.title {
        println!("    {} {}", style("title:").dim(), title);
    }
    if let Some(author) = &info.author {
        println!("    {} {}", style("author:").dim(), author);
    }

    println!(
        "    {} {}",
        style("Connected nodes:").dim(),
        style(info.connected.len()).green().bold()
    );
    for node in &info.connected {
        println!(
            "      {} {} {} {}",
            style("→").dim(),
            style(&node.label).cyan(),
            style(format!("[{}]", node.node_type)).dim(),
            node.relationship_type
        );
    }
}
