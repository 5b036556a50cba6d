//! Text search highlighting over a visual model.
//!
//! Every restyle starts from the base model, so the result depends only on the
//! query and never on earlier searches.

use std::collections::HashSet;

use super::builder::{EdgeColor, NodeColor, NodeFont, VisualModel};
use super::theme::Palette;

/// Label size of nodes that match the query
pub const MATCH_LABEL_SIZE: u32 = 16;
/// Label size of nodes that do not match the query
pub const DIMMED_LABEL_SIZE: u32 = 12;
pub const LIT_EDGE_WIDTH: f64 = 2.0;
pub const DIMMED_EDGE_WIDTH: f64 = 0.5;

/// Ids of nodes whose label or tooltip contains `query`, ignoring case.
pub fn matching_ids<'a>(model: &'a VisualModel, query: &str) -> HashSet<&'a str> {
    let needle = query.to_lowercase();
    model
        .nodes
        .iter()
        .filter(|n| {
            n.label.to_lowercase().contains(&needle) || n.title.to_lowercase().contains(&needle)
        })
        .map(|n| n.id.as_str())
        .collect()
}

/// Highlight nodes matching `query` and dim the rest.
///
/// An empty query, or one every node matches, returns `base` unchanged.
/// Dimmed nodes stay visible and keep their size. A restyled view carries no
/// selection highlight colours; clearing the search restores them.
pub fn restyle(base: &VisualModel, query: &str, palette: &Palette) -> VisualModel {
    if query.is_empty() {
        return base.clone();
    }

    let matches = matching_ids(base, query);
    if matches.len() == base.nodes.len() {
        return base.clone();
    }

    tracing::debug!(
        "Search '{}' matched {} of {} nodes",
        query,
        matches.len(),
        base.nodes.len()
    );

    let mut view = base.clone();

    for node in &mut view.nodes {
        if matches.contains(node.id.as_str()) {
            node.color.highlight = None;
            node.font = NodeFont {
                color: palette.text.to_string(),
                size: MATCH_LABEL_SIZE,
                face: node.font.face.clone(),
            };
        } else {
            node.color = NodeColor {
                background: palette.dimmed_node.to_string(),
                border: palette.border.to_string(),
                highlight: None,
            };
            node.font = NodeFont {
                color: palette.muted_text.to_string(),
                size: DIMMED_LABEL_SIZE,
                face: node.font.face.clone(),
            };
        }
    }

    for edge in &mut view.edges {
        let lit = matches.contains(edge.from.as_str()) || matches.contains(edge.to.as_str());
        if lit {
            edge.color.highlight = None;
            edge.width = LIT_EDGE_WIDTH;
        } else {
            edge.color = EdgeColor {
                color: palette.dimmed_edge.to_string(),
                highlight: None,
            };
            edge.width = DIMMED_EDGE_WIDTH;
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::ModelBuilder;
    use crate::graph::graphml::parse_graphml;

    const XML: &str = r#"<graphml><graph>
        <node id="S1"><data key="d0">subreddit</data><data key="d1">politics</data></node>
        <node id="S2"><data key="d0">subreddit</data><data key="d1">news</data></node>
        <node id="C1"><data key="d0">crosspost</data><data key="d1">Election day</data>
            <data key="d7">Reporter</data></node>
        <edge source="S1" target="C1"><data key="d8">from_subreddit</data></edge>
        <edge source="C1" target="S2"><data key="d8">to_subreddit</data></edge>
        <edge source="S2" target="S2"><data key="d8">to_subreddit</data></edge>
    </graph></graphml>"#;

    fn base(palette: &Palette) -> VisualModel {
        ModelBuilder::new(palette.clone()).build(&parse_graphml(XML).unwrap())
    }

    #[test]
    fn test_empty_query_is_identity() {
        let palette = Palette::light();
        let model = base(&palette);
        assert_eq!(restyle(&model, "", &palette), model);
    }

    #[test]
    fn test_round_trip_after_search() {
        let palette = Palette::light();
        let model = base(&palette);
        let searched = restyle(&model, "elect", &palette);
        assert_ne!(searched, model);
        assert_eq!(restyle(&model, "", &palette), model);
    }

    #[test]
    fn test_partition_by_label_and_tooltip() {
        let palette = Palette::light();
        let model = base(&palette);

        // matches C1 through the author line of its tooltip
        let view = restyle(&model, "REPORTER", &palette);
        let c1 = view.node("C1").unwrap();
        let s1 = view.node("S1").unwrap();

        let c1_base = model.node("C1").unwrap();
        assert_eq!(c1.color.background, c1_base.color.background);
        assert_eq!(c1.color.border, c1_base.color.border);
        assert_eq!(c1.font.size, MATCH_LABEL_SIZE);
        assert_eq!(c1.font.color, palette.text);
        assert_eq!(s1.color.background, palette.dimmed_node);
        assert_eq!(s1.color.border, palette.border);
        assert_eq!(s1.font.size, DIMMED_LABEL_SIZE);
        assert_eq!(s1.font.color, palette.muted_text);
        assert_eq!(view.nodes.len(), model.nodes.len());
    }

    #[test]
    fn test_edges_lit_when_incident_to_match() {
        let palette = Palette::light();
        let model = base(&palette);
        let view = restyle(&model, "politics", &palette);

        let by_id = |id: &str| view.edges.iter().find(|e| e.id == id).unwrap();
        // S1 -> C1 touches the match
        assert_eq!(by_id("e0").color.color, palette.from_edge);
        assert_eq!(by_id("e0").width, 2.0);
        // C1 -> S2 and the S2 self-loop do not
        assert_eq!(by_id("e1").color.color, palette.dimmed_edge);
        assert_eq!(by_id("e1").width, DIMMED_EDGE_WIDTH);
        assert_eq!(by_id("e2").color.color, palette.dimmed_edge);
    }

    #[test]
    fn test_restyle_drops_selection_highlights() {
        let palette = Palette::light();
        let model = base(&palette);
        assert!(model.nodes.iter().all(|n| n.color.highlight.is_some()));
        assert!(model.edges.iter().all(|e| e.color.highlight.is_some()));

        let view = restyle(&model, "politics", &palette);
        // matched, dimmed, lit and dimmed-edge styles alike
        assert!(view.node("S1").unwrap().color.highlight.is_none());
        assert!(view.node("C1").unwrap().color.highlight.is_none());
        assert!(view.edges.iter().all(|e| e.color.highlight.is_none()));

        assert_eq!(restyle(&model, "", &palette), model);
    }

    #[test]
    fn test_no_match_dims_everything() {
        let palette = Palette::dark();
        let model = base(&palette);
        let view = restyle(&model, "zzz-nothing", &palette);

        assert!(view.nodes.iter().all(|n| n.color.background == palette.dimmed_node));
        assert!(view.edges.iter().all(|e| e.color.color == palette.dimmed_edge));
    }

    #[test]
    fn test_match_all_equals_clear() {
        let palette = Palette::light();
        let model = base(&palette);
        // every tooltip carries its type followed by ": "
        assert_eq!(matching_ids(&model, ": ").len(), model.nodes.len());
        assert_eq!(restyle(&model, ": ", &palette), model);
    }
}
