use anyhow::{Context, Result};
use console::{Emoji, style};
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::graph::controller::InteractionController;
use crate::graph::search;
use crate::graph::summary;
use crate::render::{RenderSurface, SurfaceEvent, TerminalSurface};

static COMPASS: Emoji<'_, '_> = Emoji("🧭 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Gap between the two clicks of a simulated double click
const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(80);

pub async fn run(config: Config) -> Result<()> {
    println!();
    println!("{}", style(" Crossnet - Explorer ").bold().reverse());
    println!();

    let mut view = super::open_view(&config, TerminalSurface::new(io::stdout())).await?;
    let click_delay = config.interaction_settings().click_delay;
    let controller = view
        .controller_mut()
        .context("Graph view did not become ready")?;

    println!(
        "{}Type {} for a list of commands",
        COMPASS,
        style("help").cyan()
    );
    println!();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    // Simulated pointer time; runs ahead of the wall clock after each click
    let mut clock = Instant::now();

    loop {
        print!("{} ", style("crossnet>").cyan().bold());
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };
        clock = clock.max(Instant::now());

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => print_help(),
            "search" => {
                controller.search(arg);
                if arg.is_empty() {
                    println!("{}Search cleared", CHECK);
                } else {
                    let matches = search::matching_ids(controller.base(), arg).len();
                    println!(
                        "{}{} nodes match {}",
                        SEARCH,
                        style(matches).green().bold(),
                        style(format!("\"{}\"", arg)).cyan()
                    );
                }
            }
            "click" | "canvas" => {
                if command == "click" && arg.is_empty() {
                    println!("{}Usage: click <node-id>", WARN);
                    continue;
                }
                let target = (command == "click").then_some(arg);
                controller.handle_event(SurfaceEvent::Click {
                    node: target.map(str::to_string),
                    at: clock,
                });
                clock += click_delay;
                controller.poll(clock);
                match (target, controller.selection()) {
                    (_, Some(info)) => super::print_neighborhood(info),
                    (Some(id), None) => println!("{}No node with id {}", WARN, style(id).yellow()),
                    (None, None) => println!("{}Selection cleared", CHECK),
                }
            }
            "dblclick" => {
                if arg.is_empty() {
                    println!("{}Usage: dblclick <node-id>", WARN);
                    continue;
                }
                clock = double_click(controller, arg, clock, click_delay);
            }
            "show" => {
                if !controller.query().is_empty() {
                    println!(
                        "  {} {}",
                        style("Search:").dim(),
                        style(format!("\"{}\"", controller.query())).cyan()
                    );
                }
                match controller.selection() {
                    Some(info) => super::print_neighborhood(info),
                    None => println!("  {}", style("Nothing selected").dim()),
                }
            }
            "summary" => {
                let summary = summary::summarize(controller.view(), 5);
                println!("{}Network summary", CHART);
                println!(
                    "  {} Nodes: {} ({} subreddits, {} crossposts)",
                    style("•").cyan(),
                    style(summary.node_count).green().bold(),
                    summary.subreddit_count,
                    summary.crosspost_count
                );
                println!(
                    "  {} Edges: {}",
                    style("•").cyan(),
                    style(summary.edge_count).green().bold()
                );
                println!(
                    "  {} Connected components: {}",
                    style("•").cyan(),
                    style(summary.connected_components).green().bold()
                );
                for (label, degree) in &summary.top_degree {
                    println!("    {} {} ({})", style("→").dim(), label, degree);
                }
            }
            "reset" => {
                controller.reset();
                println!("{}View reset", CHECK);
            }
            other => println!(
                "{}Unknown command {}; type {} for a list",
                WARN,
                style(other).yellow(),
                style("help").cyan()
            ),
        }
    }

    view.unmount();
    println!();
    Ok(())
}

/// Replay the event sequence a pointer produces for a double click: two
/// clicks followed by the double click itself, then let the click window
/// elapse. Returns the simulated time afterwards.
fn double_click<S: RenderSurface>(
    controller: &mut InteractionController<S>,
    id: &str,
    first: Instant,
    click_delay: Duration,
) -> Instant {
    let second = first + DOUBLE_CLICK_GAP;
    let events = [
        SurfaceEvent::Click {
            node: Some(id.to_string()),
            at: first,
        },
        SurfaceEvent::Click {
            node: Some(id.to_string()),
            at: second,
        },
        SurfaceEvent::DoubleClick {
            node: Some(id.to_string()),
            at: second,
        },
    ];
    for event in events {
        controller.handle_event(event);
    }
    let settled = second + click_delay;
    controller.poll(settled);
    settled
}

fn print_help() {
    let commands = [
        ("search <text>", "highlight matching nodes (empty clears)"),
        ("click <id>", "select a node and list its neighbours"),
        ("dblclick <id>", "focus the view on a node"),
        ("canvas", "click empty canvas (clears the selection)"),
        ("show", "show the current selection"),
        ("summary", "summarise the network"),
        ("reset", "clear search and selection, fit the view"),
        ("quit", "leave the explorer"),
    ];
    for (usage, description) in commands {
        println!("  {:<16} {}", style(usage).cyan(), description);
    }
}
