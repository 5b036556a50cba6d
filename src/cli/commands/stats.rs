use anyhow::Result;
use console::{Emoji, style};
use futures::future;

use crate::config::Config;
use crate::error::ViewError;
use crate::graph::builder::{ModelBuilder, format_count};
use crate::graph::summary::{self, GraphSummary};
use crate::graph::theme::{Environment, Palette, SystemEnvironment};
use crate::provider::{self, CrosspostStats, RankedSubreddit, TopSubreddits};

static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
static TROPHY: Emoji<'_, '_> = Emoji("🏆 ", "");
static GRAPH: Emoji<'_, '_> = Emoji("🔗 ", "");
static DATABASE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(config: Config, top: usize) -> Result<()> {
    println!();
    println!(
        "{}",
        style(" Crossnet - Network Statistics ").bold().reverse()
    );
    println!();

    let provider = provider::from_config(&config);
    let spinner = super::spinner(
        &DATABASE,
        &format!("Fetching analytics from {}...", provider.describe()),
    )?;

    // panels load concurrently and fail independently
    let (stats, ranking, graphml) = future::join3(
        provider.fetch_stats(),
        provider.fetch_top(),
        provider.fetch_graphml(),
    )
    .await;

    spinner.finish_and_clear();

    let network = graphml.and_then(|text| {
        let env = SystemEnvironment::new(config.theme);
        let document = env.parse(&text)?;
        let model = ModelBuilder::new(Palette::for_scheme(env.color_scheme()))
            .with_sizing(config.size_scale())
            .build(&document);
        Ok::<_, ViewError>(summary::summarize(&model, top))
    });

    let mut loaded = 0;
    match stats {
        Ok(stats) => {
            loaded += 1;
            print_stats(&stats);
        }
        Err(e) => panel_failed("Statistics", &e),
    }
    match ranking {
        Ok(ranking) => {
            loaded += 1;
            print_ranking(&ranking, top);
        }
        Err(e) => panel_failed("Top subreddits", &e),
    }
    match network {
        Ok(network) => {
            loaded += 1;
            print_summary(&network);
        }
        Err(e) => panel_failed("Network", &e),
    }

    println!();

    if loaded == 0 {
        anyhow::bail!("No analytics could be loaded from {}", provider.describe());
    }

    Ok(())
}

fn panel_failed(panel: &str, error: &ViewError) {
    tracing::warn!("{} panel failed: {}", panel, error);
    println!("{}{} unavailable: {}", WARN, panel, style(error).red());
    println!();
}

fn print_stats(stats: &CrosspostStats) {
    println!("{}Crosspost Statistics", CHART);
    println!();
    let rows = [
        ("Subreddits", stats.subreddit_count),
        ("Crossposts", stats.crosspost_count),
        ("Connections", stats.connection_count),
        ("Users", stats.user_count),
    ];
    for (name, value) in rows {
        println!(
            "  {} {:<22} {}",
            style("•").cyan(),
            format!("{}:", name),
            style(format_count(value as f64)).green().bold()
        );
    }
    println!();
}

fn print_ranking(ranking: &TopSubreddits, top: usize) {
    if ranking.is_empty() {
        println!("{}No crosspost rankings available", TROPHY);
        println!();
        return;
    }
    print_ranked("Top Source Subreddits", &ranking.sources, top);
    print_ranked("Top Destination Subreddits", &ranking.destinations, top);
}

fn print_ranked(heading: &str, rows: &[RankedSubreddit], top: usize) {
    let rows = &rows[..rows.len().min(top)];
    if rows.is_empty() {
        return;
    }
    println!("{}{}", TROPHY, heading);
    println!();
    let widest = rows.iter().map(|r| r.count).max().unwrap_or(1).max(1);
    for (i, row) in rows.iter().enumerate() {
        let bar_len = ((row.count as f64 / widest as f64) * 30.0).round() as usize;
        let bar = "█".repeat(bar_len.max(1));
        println!(
            "  {:>2}. {:<30} {} ({})",
            i + 1,
            style(&row.name).cyan().bold(),
            style(&bar).magenta(),
            style(format_count(row.count as f64)).dim(),
        );
    }
    println!();
}

fn print_summary(summary: &GraphSummary) {
    println!("{}Network Overview", GRAPH);
    println!();
    println!(
        "  {} Nodes:                {} ({} subreddits, {} crossposts)",
        style("•").cyan(),
        style(summary.node_count).green().bold(),
        summary.subreddit_count,
        summary.crosspost_count
    );
    println!(
        "  {} Edges:                {}",
        style("•").cyan(),
        style(summary.edge_count).green().bold()
    );
    println!(
        "  {} Connected components: {}",
        style("•").cyan(),
        style(summary.connected_components).green().bold()
    );

    if !summary.top_degree.is_empty() {
        println!();
        println!("  Most connected:");
        for (i, (label, degree)) in summary.top_degree.iter().enumerate() {
            let bar = "█".repeat((*degree).min(30));
            println!(
                "  {:>2}. {:<30} {} ({})",
                i + 1,
                style(label).cyan().bold(),
                style(&bar).blue(),
                style(degree).dim(),
            );
        }
    }
}
