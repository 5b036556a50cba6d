use serde::Serialize;

use super::graphml::{EdgeRecord, GraphDocument, NodeRecord};
use super::theme::Palette;

/// Font face used for node labels
pub const LABEL_FACE: &str = "Inter, system-ui, sans-serif";

/// Edge type that marks a "from subreddit" relationship
pub const FROM_SUBREDDIT: &str = "from_subreddit";

/// Visual category of a node, derived from its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Subreddit,
    Crosspost,
}

impl NodeCategory {
    /// Unrecognised types fall back to the crosspost look.
    pub fn from_type(node_type: &str) -> Self {
        if node_type.trim().eq_ignore_ascii_case("subreddit") {
            NodeCategory::Subreddit
        } else {
            NodeCategory::Crosspost
        }
    }
}

/// Direction category of an edge, derived from its declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    FromSubreddit,
    ToSubreddit,
}

impl EdgeKind {
    pub fn from_type(edge_type: &str) -> Self {
        if edge_type.trim().eq_ignore_ascii_case(FROM_SUBREDDIT) {
            EdgeKind::FromSubreddit
        } else {
            EdgeKind::ToSubreddit
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorPair {
    pub background: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeColor {
    pub background: String,
    pub border: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<ColorPair>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeFont {
    pub color: String,
    pub size: u32,
    pub face: String,
}

/// Source attributes kept for the selection panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A render-ready node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    /// Declared type, as written in the document
    pub group: String,
    pub category: NodeCategory,
    /// Tooltip text
    pub title: String,
    /// Display size
    pub value: f64,
    pub color: NodeColor,
    pub font: NodeFont,
    pub details: NodeDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeColor {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
}

/// A render-ready edge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub id: String,
    pub from: String,
    pub to: String,
    /// Declared type, or "connection" when the document leaves it empty
    pub title: String,
    pub arrows: String,
    pub width: f64,
    pub kind: EdgeKind,
    pub color: EdgeColor,
}

/// Nodes and edges as handed to a render surface
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisualModel {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl VisualModel {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Range node sizes are mapped into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    pub min: f64,
    pub max: f64,
}

impl Default for SizeScale {
    fn default() -> Self {
        Self { min: 3.0, max: 10.0 }
    }
}

impl SizeScale {
    /// Linear map of `weight` from the observed `[lo, hi]` range onto
    /// `[min, max]`. Missing weights get `min`; a degenerate range maps to the
    /// midpoint.
    pub fn size_for(&self, weight: Option<f64>, lo: f64, hi: f64) -> f64 {
        let Some(w) = weight else {
            return self.min;
        };
        if hi <= lo {
            return self.min + (self.max - self.min) / 2.0;
        }
        let t = ((w - lo) / (hi - lo)).clamp(0.0, 1.0);
        self.min + t * (self.max - self.min)
    }
}

/// Builds the visual model for a graph document
pub struct ModelBuilder {
    palette: Palette,
    sizing: SizeScale,
}

impl ModelBuilder {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            sizing: SizeScale::default(),
        }
    }

    pub fn with_sizing(mut self, sizing: SizeScale) -> Self {
        self.sizing = sizing;
        self
    }

    /// Derive visual nodes and edges. Edges with an unknown endpoint are
    /// dropped; no node is synthesised for them.
    pub fn build(&self, document: &GraphDocument) -> VisualModel {
        let (lo, hi) = document
            .nodes
            .iter()
            .filter_map(|n| n.weight)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), w| {
                (lo.min(w), hi.max(w))
            });

        let nodes: Vec<VisualNode> = document
            .nodes
            .iter()
            .map(|record| self.visual_node(record, lo, hi))
            .collect();

        let edges: Vec<VisualEdge> = document
            .resolved_edges()
            .map(|(index, record)| self.visual_edge(index, record))
            .collect();

        tracing::info!(
            "Built visual model: {} nodes, {} edges ({} dropped)",
            nodes.len(),
            edges.len(),
            document.edges.len() - edges.len()
        );

        VisualModel { nodes, edges }
    }

    fn visual_node(&self, record: &NodeRecord, lo: f64, hi: f64) -> VisualNode {
        let category = NodeCategory::from_type(&record.node_type);

        VisualNode {
            id: record.id.clone(),
            label: record.label.clone(),
            group: record.node_type.clone(),
            category,
            title: tooltip(record),
            value: self.sizing.size_for(record.weight, lo, hi),
            color: NodeColor {
                background: self.node_background(category).to_string(),
                border: self.node_border(category).to_string(),
                highlight: Some(ColorPair {
                    background: self.palette.highlight_background.to_string(),
                    border: self.palette.highlight_border.to_string(),
                }),
            },
            font: NodeFont {
                color: self.palette.text.to_string(),
                // labels stay hidden until the renderer scales them on hover
                size: 0,
                face: LABEL_FACE.to_string(),
            },
            details: NodeDetails {
                weight: record.weight,
                title: record.title.clone(),
                author: record.author.clone(),
            },
        }
    }

    fn visual_edge(&self, index: usize, record: &EdgeRecord) -> VisualEdge {
        let kind = EdgeKind::from_type(&record.edge_type);
        let color = match kind {
            EdgeKind::FromSubreddit => self.palette.from_edge,
            EdgeKind::ToSubreddit => self.palette.to_edge,
        };
        let title = if record.edge_type.is_empty() {
            "connection".to_string()
        } else {
            record.edge_type.clone()
        };

        VisualEdge {
            id: format!("e{}", index),
            from: record.source.clone(),
            to: record.target.clone(),
            title,
            arrows: "to".to_string(),
            width: 2.0,
            kind,
            color: EdgeColor {
                color: color.to_string(),
                highlight: Some(color.to_string()),
            },
        }
    }

    fn node_background(&self, category: NodeCategory) -> &'static str {
        match category {
            NodeCategory::Subreddit => self.palette.subreddit_background,
            NodeCategory::Crosspost => self.palette.crosspost_background,
        }
    }

    fn node_border(&self, category: NodeCategory) -> &'static str {
        match category {
            NodeCategory::Subreddit => self.palette.subreddit_border,
            NodeCategory::Crosspost => self.palette.crosspost_border,
        }
    }
}

/// Tooltip lines for a node, skipping fields the document left empty.
fn tooltip(record: &NodeRecord) -> String {
    let mut lines = Vec::with_capacity(4);

    if record.node_type.is_empty() {
        lines.push(record.label.clone());
    } else {
        lines.push(format!("{}: {}", record.node_type, record.label));
    }
    if let Some(weight) = record.weight {
        lines.push(format!("Subscribers: {}", format_count(weight)));
    }
    if let Some(title) = &record.title {
        lines.push(format!("Title: {}", title));
    }
    if let Some(author) = &record.author {
        lines.push(format!("Author: {}", author));
    }

    lines.join("\n")
}

/// Round to an integer and group digits by thousands: `8500000.0` -> `8,500,000`.
pub fn format_count(value: f64) -> String {
    let digits = (value.round().max(0.0) as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, node_type: &str, weight: Option<f64>) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            node_type: node_type.to_string(),
            label: id.to_string(),
            weight,
            title: None,
            author: None,
        }
    }

    fn edge(source: &str, target: &str, edge_type: &str) -> EdgeRecord {
        EdgeRecord {
            source: source.to_string(),
            target: target.to_string(),
            edge_type: edge_type.to_string(),
        }
    }

    fn build(document: &GraphDocument) -> VisualModel {
        ModelBuilder::new(Palette::light()).build(document)
    }

    #[test]
    fn test_dangling_edges_dropped() {
        let doc = GraphDocument {
            nodes: vec![node("S1", "subreddit", None), node("C1", "crosspost", None)],
            edges: vec![
                edge("S1", "C1", "from_subreddit"),
                edge("S1", "MISSING", "to_subreddit"),
                edge("NOPE", "C1", "to_subreddit"),
            ],
        };
        let model = build(&doc);

        assert_eq!(model.nodes.len(), 2);
        assert_eq!(model.edges.len(), 1);
        assert!(model.node("MISSING").is_none());
        for e in &model.edges {
            assert!(model.node(&e.from).is_some());
            assert!(model.node(&e.to).is_some());
        }
    }

    #[test]
    fn test_edge_ids_are_document_positions() {
        let doc = GraphDocument {
            nodes: vec![node("a", "subreddit", None), node("b", "subreddit", None)],
            edges: vec![
                edge("a", "ghost", "to_subreddit"),
                edge("a", "b", "from_subreddit"),
            ],
        };
        let model = build(&doc);
        assert_eq!(model.edges[0].id, "e1");
        assert_eq!(model.edges[0].arrows, "to");
    }

    #[test]
    fn test_type_is_case_insensitive_with_crosspost_default() {
        assert_eq!(NodeCategory::from_type("SubReddit"), NodeCategory::Subreddit);
        assert_eq!(NodeCategory::from_type("crosspost"), NodeCategory::Crosspost);
        assert_eq!(NodeCategory::from_type("user"), NodeCategory::Crosspost);
        assert_eq!(NodeCategory::from_type(""), NodeCategory::Crosspost);
    }

    #[test]
    fn test_colors_follow_category_and_kind() {
        let palette = Palette::dark();
        let doc = GraphDocument {
            nodes: vec![node("s", "SUBREDDIT", None), node("c", "mystery", None)],
            edges: vec![edge("s", "c", "from_subreddit"), edge("c", "s", "to_subreddit")],
        };
        let model = ModelBuilder::new(palette.clone()).build(&doc);

        assert_eq!(model.nodes[0].color.background, palette.subreddit_background);
        assert_eq!(model.nodes[0].color.border, palette.subreddit_border);
        assert_eq!(model.nodes[1].color.background, palette.crosspost_background);
        assert_eq!(model.edges[0].color.color, palette.from_edge);
        assert_eq!(model.edges[0].kind, EdgeKind::FromSubreddit);
        assert_eq!(model.edges[1].color.color, palette.to_edge);
    }

    #[test]
    fn test_size_range_and_minimum() {
        let doc = GraphDocument {
            nodes: vec![
                node("small", "subreddit", Some(100.0)),
                node("mid", "subreddit", Some(550.0)),
                node("big", "subreddit", Some(1000.0)),
                node("none", "crosspost", None),
            ],
            edges: vec![],
        };
        let model = build(&doc);
        let size = |id: &str| model.node(id).unwrap().value;

        assert!((size("small") - 3.0).abs() < 1e-9);
        assert!((size("big") - 10.0).abs() < 1e-9);
        assert!(size("small") < size("mid") && size("mid") < size("big"));
        assert!((size("none") - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_weight_maps_to_midpoint() {
        let scale = SizeScale::default();
        assert!((scale.size_for(Some(42.0), 42.0, 42.0) - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_tooltip_omits_empty_fields() {
        let mut full = node("C1", "crosspost", Some(1234567.0));
        full.label = "Hello".into();
        full.title = Some("A title".into());
        full.author = Some("bob".into());
        assert_eq!(
            tooltip(&full),
            "crosspost: Hello\nSubscribers: 1,234,567\nTitle: A title\nAuthor: bob"
        );

        let bare = node("S1", "subreddit", None);
        assert_eq!(tooltip(&bare), "subreddit: S1");
    }

    #[test]
    fn test_edge_title_defaults_to_connection() {
        let doc = GraphDocument {
            nodes: vec![node("a", "", None), node("b", "", None)],
            edges: vec![edge("a", "b", "")],
        };
        let model = build(&doc);
        assert_eq!(model.edges[0].title, "connection");
        assert_eq!(model.edges[0].kind, EdgeKind::ToSubreddit);
    }

    #[test]
    fn test_build_is_deterministic() {
        let doc = GraphDocument {
            nodes: vec![node("a", "subreddit", Some(5.0)), node("b", "crosspost", None)],
            edges: vec![edge("a", "b", "from_subreddit")],
        };
        assert_eq!(build(&doc), build(&doc));
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1000.0), "1,000");
        assert_eq!(format_count(8_500_000.4), "8,500,000");
    }
}
