//! Render surfaces the interaction controller drives.
//!
//! A surface is a black box that can load a model, replace its data, focus a
//! node and fit the viewport. Input flows the other way as [`SurfaceEvent`]s
//! handed to `InteractionController::handle_event`.

use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::RenderInitError;
use crate::graph::builder::VisualModel;
use crate::graph::search;
use crate::graph::theme::Palette;

/// How a focus request should move the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusOptions {
    pub scale: f64,
    pub animation: bool,
}

impl Default for FocusOptions {
    fn default() -> Self {
        Self {
            scale: 1.2,
            animation: true,
        }
    }
}

/// Pointer input reported by a surface. `node` is `None` for empty canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Click { node: Option<String>, at: Instant },
    DoubleClick { node: Option<String>, at: Instant },
}

/// Contract of a graph layout/draw engine
pub trait RenderSurface {
    /// Mount the surface with its first dataset
    fn load(&mut self, model: &VisualModel) -> Result<(), RenderInitError>;

    /// Replace nodes and edges in place
    fn set_data(&mut self, model: &VisualModel);

    /// Centre and zoom the viewport on a node
    fn focus(&mut self, node_id: &str, options: FocusOptions);

    /// Reframe the viewport around all nodes
    fn fit(&mut self);
}

/// Writes a standalone vis-network page and rewrites it on every change
pub struct HtmlSurface {
    path: PathBuf,
    palette: Palette,
    model: VisualModel,
    focus: Option<(String, FocusOptions)>,
    mounted: bool,
}

impl HtmlSurface {
    pub fn new(path: impl Into<PathBuf>, palette: Palette) -> Self {
        Self {
            path: path.into(),
            palette,
            model: VisualModel::default(),
            focus: None,
            mounted: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), RenderInitError> {
        let html = render_page(&self.model, &self.palette, self.focus.as_ref())?;
        std::fs::write(&self.path, html).map_err(|source| RenderInitError::Io {
            path: self.path.display().to_string(),
            source,
        })
    }

    fn rewrite(&self) {
        if let Err(e) = self.write() {
            tracing::warn!("Failed to update {}: {}", self.path.display(), e);
        }
    }
}

impl RenderSurface for HtmlSurface {
    fn load(&mut self, model: &VisualModel) -> Result<(), RenderInitError> {
        if self.mounted {
            return Err(RenderInitError::AlreadyMounted);
        }
        let container = match self.path.parent() {
            Some(p) if p.as_os_str().is_empty() => Path::new("."),
            Some(p) => p,
            None => Path::new("."),
        };
        if !container.is_dir() {
            return Err(RenderInitError::MissingContainer(
                container.display().to_string(),
            ));
        }

        self.model = model.clone();
        self.write()?;
        self.mounted = true;
        tracing::info!("Rendered graph page to {}", self.path.display());
        Ok(())
    }

    fn set_data(&mut self, model: &VisualModel) {
        self.model = model.clone();
        self.rewrite();
    }

    fn focus(&mut self, node_id: &str, options: FocusOptions) {
        self.focus = Some((node_id.to_string(), options));
        self.rewrite();
    }

    fn fit(&mut self) {
        self.focus = None;
        self.rewrite();
    }
}

/// Prints what a graphical surface would draw
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: String) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!("Terminal surface write failed: {}", e);
        }
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn load(&mut self, model: &VisualModel) -> Result<(), RenderInitError> {
        self.line(format!(
            "  {} Loaded {} nodes, {} edges",
            style("●").green(),
            style(model.nodes.len()).green().bold(),
            style(model.edges.len()).green().bold()
        ));
        Ok(())
    }

    fn set_data(&mut self, model: &VisualModel) {
        let highlighted = model
            .nodes
            .iter()
            .filter(|n| n.font.size == search::MATCH_LABEL_SIZE)
            .count();
        let dimmed = model
            .nodes
            .iter()
            .filter(|n| n.font.size == search::DIMMED_LABEL_SIZE)
            .count();

        if highlighted == 0 && dimmed == 0 {
            self.line(format!("  {} Showing all {} nodes", style("●").cyan(), model.nodes.len()));
        } else {
            self.line(format!(
                "  {} {} highlighted, {} dimmed",
                style("●").cyan(),
                style(highlighted).green().bold(),
                style(dimmed).dim()
            ));
        }
    }

    fn focus(&mut self, node_id: &str, options: FocusOptions) {
        self.line(format!(
            "  {} Focused on {} (zoom {:.1})",
            style("◎").magenta(),
            style(node_id).cyan().bold(),
            options.scale
        ));
    }

    fn fit(&mut self) {
        self.line(format!("  {} Fit all nodes in view", style("◎").magenta()));
    }
}

/// Render the standalone HTML page for a model.
pub fn render_page(
    model: &VisualModel,
    palette: &Palette,
    focus: Option<&(String, FocusOptions)>,
) -> Result<String, serde_json::Error> {
    let nodes_json = script_safe(&serde_json::to_string(&model.nodes)?);
    let edges_json = script_safe(&serde_json::to_string(&model.edges)?);
    let focus_json = match focus {
        Some((id, options)) => script_safe(
            &serde_json::json!({
                "id": id,
                "scale": options.scale,
                "animation": options.animation,
            })
            .to_string(),
        ),
        None => "null".to_string(),
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Crosspost Network</title>
    <style>
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{ font-family: 'Inter', system-ui, sans-serif; background: {bg}; color: {text}; height: 100vh; display: flex; flex-direction: column; }}
        #header {{ padding: 12px 24px; border-bottom: 1px solid {border}; display: flex; gap: 16px; align-items: center; }}
        #header h1 {{ font-size: 1.1em; font-weight: 700; }}
        .stat {{ font-size: 0.8em; color: {muted}; }}
        #graph {{ flex: 1; }}
        #legend {{ display: flex; gap: 16px; justify-content: center; padding: 12px; border-top: 1px solid {border}; font-size: 0.85em; }}
        .dot {{ display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 6px; vertical-align: middle; }}
        .bar {{ display: inline-block; width: 24px; height: 3px; margin-right: 6px; vertical-align: middle; }}
        #error {{ display: none; padding: 24px; color: #ef4444; }}
    </style>
</head>
<body>
    <div id="header">
        <h1>Crosspost Network</h1>
        <span class="stat">{node_count} nodes</span>
        <span class="stat">{edge_count} edges</span>
    </div>
    <div id="error"></div>
    <div id="graph"></div>
    <div id="legend">
        <span><span class="dot" style="background: {sub_bg}; border: 1px solid {sub_border}"></span>Subreddit</span>
        <span><span class="dot" style="background: {cross_bg}; border: 1px solid {cross_border}"></span>Crosspost</span>
        <span><span class="dot" style="background: {hl_bg}; border: 1px solid {hl_border}"></span>Selected Node</span>
        <span><span class="bar" style="background: {from_edge}"></span>From Subreddit</span>
        <span><span class="bar" style="background: {to_edge}"></span>To Subreddit</span>
    </div>
    <script src="https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js"></script>
    <script>
        const rawNodes = {nodes_json};
        const rawEdges = {edges_json};
        const pendingFocus = {focus_json};

        if (typeof vis === 'undefined') {{
            const err = document.getElementById('error');
            err.textContent = 'Failed to load vis-network. Check connection.';
            err.style.display = 'block';
        }} else {{
            const nodes = new vis.DataSet(rawNodes.map(n => Object.assign({{ shape: 'circle' }}, n)));
            const edges = new vis.DataSet(rawEdges);
            const options = {{
                nodes: {{
                    scaling: {{ min: 3, max: 10, label: {{ enabled: false, min: 14, max: 22 }} }},
                    borderWidth: 1,
                    shadow: {{ enabled: true, size: 2, x: 0, y: 0, color: 'rgba(0,0,0,0.2)' }},
                    chosen: {{
                        node: (values, id, selected, hovering) => {{ if (hovering) {{ values.size = 8; values.borderWidth = 2; }} }},
                        label: (values, id, selected, hovering) => {{ if (hovering) {{ values.size = 14; }} }}
                    }}
                }},
                edges: {{ selectionWidth: 2, smooth: {{ enabled: true, type: 'continuous', roundness: 0.5 }}, color: {{ inherit: false, opacity: 0.8 }} }},
                interaction: {{ hover: true, tooltipDelay: 100, hideEdgesOnDrag: true, navigationButtons: true, hoverConnectedEdges: true }},
                physics: {{
                    stabilization: {{ iterations: 200, fit: true }},
                    barnesHut: {{ gravitationalConstant: -5000, centralGravity: 0.3, springLength: 95, springConstant: 0.05, damping: 0.09 }}
                }}
            }};
            const network = new vis.Network(document.getElementById('graph'), {{ nodes, edges }}, options);
            network.once('stabilizationIterationsDone', () => {{
                if (pendingFocus) network.focus(pendingFocus.id, {{ scale: pendingFocus.scale, animation: pendingFocus.animation }});
                else network.fit();
            }});
        }}
    </script>
</body>
</html>"#,
        bg = palette.background,
        text = palette.text,
        border = palette.border,
        muted = palette.muted_text,
        node_count = model.nodes.len(),
        edge_count = model.edges.len(),
        sub_bg = palette.subreddit_background,
        sub_border = palette.subreddit_border,
        cross_bg = palette.crosspost_background,
        cross_border = palette.crosspost_border,
        hl_bg = palette.highlight_background,
        hl_border = palette.highlight_border,
        from_edge = palette.from_edge,
        to_edge = palette.to_edge,
        nodes_json = nodes_json,
        edges_json = edges_json,
        focus_json = focus_json,
    );

    Ok(html)
}

/// Escape markup characters in JSON embedded in an inline `<script>`, so
/// document text can never close the element. The escapes are valid JSON
/// string escapes and decode to the same values.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
