use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use super::builder::{NodeCategory, VisualModel};

/// Shape of the crosspost network as built
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    pub subreddit_count: usize,
    pub crosspost_count: usize,
    pub connected_components: usize,
    /// Most connected nodes by label, highest degree first
    pub top_degree: Vec<(String, usize)>,
}

/// Build a petgraph view of the model, labelled by node label.
pub fn to_petgraph(model: &VisualModel) -> DiGraph<String, String> {
    let mut graph = DiGraph::new();
    let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

    for node in &model.nodes {
        let idx = graph.add_node(node.label.clone());
        indices.insert(node.id.as_str(), idx);
    }

    for edge in &model.edges {
        if let (Some(&src), Some(&tgt)) = (indices.get(edge.from.as_str()), indices.get(edge.to.as_str())) {
            graph.add_edge(src, tgt, edge.title.clone());
        }
    }

    graph
}

/// Degree (in + out) for each node.
pub fn node_degrees(graph: &DiGraph<String, String>) -> HashMap<NodeIndex, usize> {
    graph
        .node_indices()
        .map(|ni| {
            let in_deg = graph
                .edges_directed(ni, petgraph::Direction::Incoming)
                .count();
            let out_deg = graph
                .edges_directed(ni, petgraph::Direction::Outgoing)
                .count();
            (ni, in_deg + out_deg)
        })
        .collect()
}

/// Summarise a model; `top` bounds the most-connected list.
pub fn summarize(model: &VisualModel, top: usize) -> GraphSummary {
    let graph = to_petgraph(model);

    let subreddit_count = model
        .nodes
        .iter()
        .filter(|n| n.category == NodeCategory::Subreddit)
        .count();

    let degrees = node_degrees(&graph);
    let mut degree_vec: Vec<(String, usize)> = degrees
        .iter()
        .filter(|&(_, &d)| d > 0)
        .map(|(&ni, &d)| (graph[ni].clone(), d))
        .collect();
    // ties broken by label so output is stable
    degree_vec.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    degree_vec.truncate(top);

    GraphSummary {
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        subreddit_count,
        crosspost_count: model.nodes.len() - subreddit_count,
        connected_components: connected_components(&graph),
        top_degree: degree_vec,
    }
}
