//! GraphML-like document parsing.
//!
//! The upstream analytics service writes a GraphML file whose attributes are
//! addressed by fixed positional keys rather than by the `<key>` declarations.
//! Only those keys are recognised:
//!
//! | key  | owner | meaning                 |
//! |------|-------|-------------------------|
//! | `d0` | node  | type (`subreddit`, ...) |
//! | `d1` | node  | label                   |
//! | `d4` | node  | subscriber count        |
//! | `d5` | node  | size                    |
//! | `d6` | node  | post title              |
//! | `d7` | node  | post author             |
//! | `d8` | edge  | relationship type       |
//!
//! XML syntax errors are [`ParseError::Malformed`]; a well-formed document
//! with no graph element is [`ParseError::NotGraphMl`].

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::ParseError;

pub const KEY_NODE_TYPE: &str = "d0";
pub const KEY_LABEL: &str = "d1";
pub const KEY_SUBSCRIBERS: &str = "d4";
pub const KEY_SIZE: &str = "d5";
pub const KEY_TITLE: &str = "d6";
pub const KEY_AUTHOR: &str = "d7";
pub const KEY_EDGE_TYPE: &str = "d8";

/// A node record as declared by the source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub node_type: String,
    pub label: String,
    pub weight: Option<f64>,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// An edge record as declared by the source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub edge_type: String,
}

/// The parsed graph description, before any visual derivation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphDocument {
    /// Edges whose endpoints both exist, paired with their position in the
    /// document. Dangling edges are skipped.
    pub fn resolved_edges(&self) -> impl Iterator<Item = (usize, &EdgeRecord)> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();

        self.edges.iter().enumerate().filter(move |(index, edge)| {
            let keep = ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str());
            if !keep {
                tracing::debug!(
                    "Dropping edge #{} ({} -> {}): unknown endpoint",
                    index,
                    edge.source,
                    edge.target
                );
            }
            keep
        })
    }
}

/// Parse a GraphML document into node and edge records.
pub fn parse_graphml(text: &str) -> Result<GraphDocument, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let xml = Document::parse(text).map_err(|source| ParseError::Malformed { source })?;
    let elements: Vec<Node> = xml.descendants().filter(Node::is_element).collect();

    if !elements
        .iter()
        .any(|el| matches!(el.tag_name().name(), "graphml" | "graph"))
    {
        return Err(ParseError::NotGraphMl);
    }

    let mut document = GraphDocument::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (position, element) in elements
        .iter()
        .filter(|el| el.tag_name().name() == "node")
        .enumerate()
    {
        let id = element
            .attribute("id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ParseError::MissingNodeId { position })?
            .to_string();

        if !seen.insert(id.clone()) {
            tracing::debug!("Duplicate node id '{}' ignored", id);
            continue;
        }

        let label = data_value(element, KEY_LABEL).unwrap_or_else(|| id.clone());
        let weight = data_value(element, KEY_SUBSCRIBERS)
            .and_then(|v| parse_weight(&v))
            .or_else(|| data_value(element, KEY_SIZE).and_then(|v| parse_weight(&v)));

        document.nodes.push(NodeRecord {
            node_type: data_value(element, KEY_NODE_TYPE).unwrap_or_default(),
            label,
            weight,
            title: data_value(element, KEY_TITLE),
            author: data_value(element, KEY_AUTHOR),
            id,
        });
    }

    for element in elements.iter().filter(|el| el.tag_name().name() == "edge") {
        let attr = |name: &str| element.attribute(name).unwrap_or("").trim().to_string();
        document.edges.push(EdgeRecord {
            source: attr("source"),
            target: attr("target"),
            edge_type: data_value(element, KEY_EDGE_TYPE).unwrap_or_default(),
        });
    }

    tracing::debug!(
        "Parsed GraphML: {} nodes, {} edges",
        document.nodes.len(),
        document.edges.len()
    );

    Ok(document)
}

/// Text of the first `<data key="...">` child, trimmed, if non-empty.
/// CDATA sections count as text.
fn data_value(element: &Node, key: &str) -> Option<String> {
    element
        .children()
        .find(|child| {
            child.is_element()
                && child.tag_name().name() == "data"
                && child.attribute("key") == Some(key)
        })
        .map(|child| {
            child
                .descendants()
                .filter(Node::is_text)
                .filter_map(|n| n.text())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|text| !text.is_empty())
}

fn parse_weight(raw: &str) -> Option<f64> {
    match raw.trim().parse::<f64>() {
        Ok(w) if w.is_finite() && w > 0.0 => Some(w),
        Ok(_) => None,
        Err(_) => {
            tracing::debug!("Ignoring non-numeric weight '{}'", raw);
            None
        }
    }
}
