use anyhow::{Context, Result};
use console::{Emoji, style};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::Config;
use crate::graph::search;
use crate::graph::theme::{Environment, Palette, SystemEnvironment};
use crate::render::HtmlSurface;

static BROWSER: Emoji<'_, '_> = Emoji("🌐 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub async fn run(
    config: Config,
    output: Option<PathBuf>,
    search_query: Option<String>,
    focus: Option<String>,
    no_open: bool,
) -> Result<()> {
    println!();
    println!(
        "{}",
        style(" Crossnet - Network Visualization ").bold().reverse()
    );
    println!();

    let page_path = output.unwrap_or_else(|| std::env::temp_dir().join("crossnet_viz.html"));
    let palette = Palette::for_scheme(SystemEnvironment::new(config.theme).color_scheme());
    let surface = HtmlSurface::new(&page_path, palette);

    let mut view = super::open_view(&config, surface).await?;
    let controller = view
        .controller_mut()
        .context("Graph view did not become ready")?;

    println!(
        "{}Loaded {} nodes, {} edges",
        CHECK,
        style(controller.base().nodes.len()).green().bold(),
        style(controller.base().edges.len()).green().bold()
    );

    if let Some(query) = search_query.as_deref() {
        let matches = search::matching_ids(controller.base(), query).len();
        controller.search(query);
        println!(
            "{}{} nodes match {}",
            SEARCH,
            style(matches).green().bold(),
            style(format!("\"{}\"", query)).cyan()
        );
    }

    if let Some(id) = focus.as_deref() {
        match controller.select(id).cloned() {
            Some(info) => {
                // same path as a double click on the node
                controller.on_double_click(Some(id), Instant::now());
                println!();
                super::print_neighborhood(&info);
            }
            None => println!("{}No node with id {}", WARN, style(id).yellow()),
        }
    }

    let html_path = controller.surface().path().to_path_buf();
    if !no_open {
        open_in_browser(&html_path);
        println!();
        println!("{}Visualization opened in browser", BROWSER);
    }

    println!();
    println!(
        "{}File: {}",
        SPARKLE,
        style(html_path.display()).cyan().underlined()
    );

    view.unmount();
    Ok(())
}

/// Best-effort launch of the platform's default browser
fn open_in_browser(path: &Path) {
    #[cfg(target_os = "macos")]
    let result = std::process::Command::new("open").arg(path).spawn();

    #[cfg(target_os = "linux")]
    let result = std::process::Command::new("xdg-open").arg(path).spawn();

    #[cfg(target_os = "windows")]
    let result = std::process::Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn();

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    let result: std::io::Result<std::process::Child> = Err(std::io::Error::other(
        "no known browser launcher for this platform",
    ));

    if let Err(e) = result {
        tracing::warn!("Could not open browser: {}", e);
    }
}
