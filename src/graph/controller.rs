//! Interaction controller: selection, click/double-click disambiguation,
//! neighbourhood lookup and search highlighting over a mounted surface.
//!
//! Everything runs on the caller's thread. Time is passed in explicitly, so a
//! pending single click is a plain value that a later event can cancel and
//! that [`InteractionController::poll`] fires once its deadline has passed.

use serde::Serialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::builder::VisualModel;
use super::search;
use super::theme::Palette;
use crate::error::RenderInitError;
use crate::render::{FocusOptions, RenderSurface, SurfaceEvent};

/// Tunables for the controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    /// How long a single click waits for a possible second click
    pub click_delay: Duration,
    pub focus: FocusOptions,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            click_delay: Duration::from_millis(300),
            focus: FocusOptions::default(),
        }
    }
}

/// A node adjacent to the selected one
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedNode {
    pub id: String,
    pub label: String,
    pub node_type: String,
    /// `"to: <edge>"` when the selection is the edge source, `"from: <edge>"`
    /// when it is the target
    pub relationship_type: String,
}

/// Details of the selected node and its direct neighbours
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodInfo {
    pub id: String,
    pub node_type: String,
    pub label: String,
    pub weight: Option<f64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub connected: Vec<ConnectedNode>,
}

/// A single click waiting out the double-click window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClick {
    pub target: Option<String>,
    pub deadline: Instant,
}

/// Owns the live view of a mounted graph
pub struct InteractionController<S: RenderSurface> {
    surface: S,
    base: VisualModel,
    view: VisualModel,
    palette: Palette,
    settings: InteractionSettings,
    selection: Option<NeighborhoodInfo>,
    query: String,
    pending: Option<PendingClick>,
    /// Clicks before this instant belong to a double click already handled
    suppress_until: Option<Instant>,
}

impl<S: RenderSurface> InteractionController<S> {
    /// Load `model` into `surface` and take ownership of both.
    pub fn mount(
        mut surface: S,
        model: VisualModel,
        palette: Palette,
        settings: InteractionSettings,
    ) -> Result<Self, RenderInitError> {
        surface.load(&model)?;

        Ok(Self {
            surface,
            view: model.clone(),
            base: model,
            palette,
            settings,
            selection: None,
            query: String::new(),
            pending: None,
            suppress_until: None,
        })
    }

    /// Release the surface. Selection, search and pending clicks are dropped.
    pub fn dispose(self) -> S {
        self.surface
    }

    pub fn base(&self) -> &VisualModel {
        &self.base
    }

    /// The model currently shown on the surface
    pub fn view(&self) -> &VisualModel {
        &self.view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn selection(&self) -> Option<&NeighborhoodInfo> {
        self.selection.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    #[cfg(test)]
    pub fn pending_click(&self) -> Option<&PendingClick> {
        self.pending.as_ref()
    }

    /// Dispatch a surface event
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Click { node, at } => self.on_click(node.as_deref(), at),
            SurfaceEvent::DoubleClick { node, at } => self.on_double_click(node.as_deref(), at),
        }
    }

    /// Start (or restart) the single-click timer.
    pub fn on_click(&mut self, node: Option<&str>, at: Instant) {
        if let Some(until) = self.suppress_until {
            if at < until {
                tracing::trace!("Click swallowed by preceding double click");
                return;
            }
            self.suppress_until = None;
        }

        self.pending = Some(PendingClick {
            target: node.map(str::to_string),
            deadline: at + self.settings.click_delay,
        });
    }

    /// Cancel any pending single click and focus the node under the pointer.
    /// Selection is left untouched.
    pub fn on_double_click(&mut self, node: Option<&str>, at: Instant) {
        if self.pending.take().is_some() {
            tracing::trace!("Pending click cancelled by double click");
        }
        self.suppress_until = Some(at + self.settings.click_delay);

        if let Some(id) = node {
            self.surface.focus(id, self.settings.focus);
        }
    }

    /// Fire the pending click if its deadline has passed. Returns whether the
    /// selection was updated.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {}
            _ => return false,
        }

        if let Some(pending) = self.pending.take() {
            match pending.target {
                Some(id) => {
                    self.select(&id);
                }
                None => self.clear_selection(),
            }
            true
        } else {
            false
        }
    }

    /// Select a node immediately and compute its neighbourhood. Unknown ids
    /// clear the selection.
    pub fn select(&mut self, id: &str) -> Option<&NeighborhoodInfo> {
        self.selection = neighborhood(&self.base, id);
        if self.selection.is_none() {
            tracing::debug!("Selected unknown node '{}'", id);
        }
        self.selection.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Highlight nodes matching `query` and dim the rest.
    pub fn search(&mut self, query: &str) {
        self.query = query.to_string();
        self.view = search::restyle(&self.base, query, &self.palette);
        self.surface.set_data(&self.view);
    }

    /// Clear search and selection, restore the original styling and reframe.
    pub fn reset(&mut self) {
        self.query.clear();
        self.selection = None;
        self.pending = None;
        self.suppress_until = None;
        self.view = self.base.clone();
        self.surface.set_data(&self.view);
        self.surface.fit();
    }
}

/// Scan every edge for incidences on `id`.
///
/// Each neighbour appears once, labelled by the first edge that reaches it.
/// Self-loops are ignored.
pub fn neighborhood(model: &VisualModel, id: &str) -> Option<NeighborhoodInfo> {
    let node = model.node(id)?;

    let mut seen: HashSet<&str> = HashSet::new();
    let mut connected = Vec::new();

    for edge in &model.edges {
        let (other, direction) = if edge.from == id && edge.to != id {
            (edge.to.as_str(), "to")
        } else if edge.to == id && edge.from != id {
            (edge.from.as_str(), "from")
        } else {
            continue;
        };

        if !seen.insert(other) {
            continue;
        }
        let Some(neighbor) = model.node(other) else {
            continue;
        };

        connected.push(ConnectedNode {
            id: neighbor.id.clone(),
            label: neighbor.label.clone(),
            node_type: type_or_unknown(&neighbor.group),
            relationship_type: format!("{}: {}", direction, edge.title),
        });
    }

    Some(NeighborhoodInfo {
        id: node.id.clone(),
        node_type: type_or_unknown(&node.group),
        label: node.label.clone(),
        weight: node.details.weight,
        title: node.details.title.clone(),
        author: node.details.author.clone(),
        connected,
    })
}

fn type_or_unknown(group: &str) -> String {
    if group.is_empty() {
        "Unknown".to_string()
    } else {
        group.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::ModelBuilder;
    use crate::graph::graphml::parse_graphml;

    /// Records every call the controller makes
    #[derive(Default)]
    struct RecordingSurface {
        loads: usize,
        set_data: Vec<VisualModel>,
        focused: Vec<(String, FocusOptions)>,
        fits: usize,
        fail_load: bool,
    }

    impl RenderSurface for RecordingSurface {
        fn load(&mut self, _model: &VisualModel) -> Result<(), RenderInitError> {
            if self.fail_load {
                return Err(RenderInitError::MissingContainer("#network".into()));
            }
            self.loads += 1;
            Ok(())
        }

        fn set_data(&mut self, model: &VisualModel) {
            self.set_data.push(model.clone());
        }

        fn focus(&mut self, node_id: &str, options: FocusOptions) {
            self.focused.push((node_id.to_string(), options));
        }

        fn fit(&mut self) {
            self.fits += 1;
        }
    }

    const XML: &str = r#"<graphml><graph>
        <node id="S1"><data key="d0">subreddit</data><data key="d1">politics</data>
            <data key="d4">1500</data></node>
        <node id="S2"><data key="d0">subreddit</data><data key="d1">news</data></node>
        <node id="C1"><data key="d0">crosspost</data><data key="d1">Vote today</data>
            <data key="d6">Vote today</data><data key="d7">alice</data></node>
        <node id="C2"><data key="d0">crosspost</data><data key="d1">Lonely</data></node>
        <edge source="S1" target="C1"><data key="d8">from_subreddit</data></edge>
        <edge source="C1" target="S2"><data key="d8">to_subreddit</data></edge>
        <edge source="S1" target="C1"><data key="d8">to_subreddit</data></edge>
        <edge source="S2" target="S2"><data key="d8">to_subreddit</data></edge>
        <edge source="C1" target="GHOST"><data key="d8">to_subreddit</data></edge>
    </graph></graphml>"#;

    fn model() -> VisualModel {
        ModelBuilder::new(Palette::light()).build(&parse_graphml(XML).unwrap())
    }

    fn controller() -> InteractionController<RecordingSurface> {
        InteractionController::mount(
            RecordingSurface::default(),
            model(),
            Palette::light(),
            InteractionSettings::default(),
        )
        .unwrap()
    }

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_mount_loads_surface() {
        let c = controller();
        assert_eq!(c.surface().loads, 1);
        assert_eq!(c.view(), c.base());
    }

    #[test]
    fn test_mount_failure_is_render_init_error() {
        let surface = RecordingSurface {
            fail_load: true,
            ..Default::default()
        };
        let result =
            InteractionController::mount(surface, model(), Palette::light(), Default::default());
        assert!(matches!(result, Err(RenderInitError::MissingContainer(_))));
    }

    #[test]
    fn test_two_node_example() {
        let doc = parse_graphml(
            r#"<graphml><graph>
                <node id="S1"><data key="d0">subreddit</data></node>
                <node id="C1"><data key="d0">crosspost</data></node>
                <edge source="S1" target="C1"><data key="d8">from_subreddit</data></edge>
            </graph></graphml>"#,
        )
        .unwrap();
        let model = ModelBuilder::new(Palette::light()).build(&doc);
        let info = neighborhood(&model, "S1").unwrap();

        assert_eq!(info.connected.len(), 1);
        assert_eq!(info.connected[0].id, "C1");
        assert_eq!(info.connected[0].relationship_type, "to: from_subreddit");
    }

    #[test]
    fn test_neighborhood_directions_and_dedup() {
        let m = model();
        let info = neighborhood(&m, "C1").unwrap();

        let rels: Vec<(&str, &str)> = info
            .connected
            .iter()
            .map(|c| (c.id.as_str(), c.relationship_type.as_str()))
            .collect();
        // S1 reached twice, first edge wins; GHOST edge was never built
        assert_eq!(
            rels,
            vec![("S1", "from: from_subreddit"), ("S2", "to: to_subreddit")]
        );
        assert_eq!(info.author.as_deref(), Some("alice"));
        assert_eq!(info.title.as_deref(), Some("Vote today"));
    }

    #[test]
    fn test_neighborhood_is_exact_incident_set() {
        let m = model();
        for node in &m.nodes {
            let info = neighborhood(&m, &node.id).unwrap();
            let got: HashSet<&str> = info.connected.iter().map(|c| c.id.as_str()).collect();
            let expected: HashSet<&str> = m
                .edges
                .iter()
                .filter(|e| e.from != e.to)
                .filter_map(|e| {
                    if e.from == node.id {
                        Some(e.to.as_str())
                    } else if e.to == node.id {
                        Some(e.from.as_str())
                    } else {
                        None
                    }
                })
                .collect();
            assert_eq!(got, expected, "neighbourhood of {}", node.id);
        }
    }

    #[test]
    fn test_self_loop_and_isolated_nodes() {
        let m = model();
        let s2 = neighborhood(&m, "S2").unwrap();
        assert_eq!(s2.connected.len(), 1);
        assert_eq!(s2.connected[0].id, "C1");

        let lonely = neighborhood(&m, "C2").unwrap();
        assert!(lonely.connected.is_empty());
        assert!(neighborhood(&m, "nope").is_none());
    }

    #[test]
    fn test_click_selects_after_delay() {
        let mut c = controller();
        let t0 = Instant::now();

        c.on_click(Some("S1"), t0);
        assert!(!c.poll(t0 + Duration::from_millis(100)));
        assert!(c.selection().is_none());

        assert!(c.poll(t0 + DELAY));
        let info = c.selection().unwrap();
        assert_eq!(info.id, "S1");
        assert_eq!(info.weight, Some(1500.0));
        assert!(c.pending_click().is_none());
    }

    #[test]
    fn test_canvas_click_clears_selection() {
        let mut c = controller();
        c.select("S1");
        let t0 = Instant::now();
        c.handle_event(SurfaceEvent::Click { node: None, at: t0 });
        assert!(c.poll(t0 + DELAY));
        assert!(c.selection().is_none());
    }

    #[test]
    fn test_double_click_cancels_pending_and_focuses() {
        let mut c = controller();
        c.select("S2");
        let t0 = Instant::now();

        c.on_click(Some("C1"), t0);
        c.on_click(Some("C1"), t0 + Duration::from_millis(80));
        c.on_double_click(Some("C1"), t0 + Duration::from_millis(90));
        assert!(c.pending_click().is_none());

        // a trailing click inside the window is swallowed
        c.on_click(Some("C1"), t0 + Duration::from_millis(120));
        assert!(!c.poll(t0 + Duration::from_secs(2)));

        assert_eq!(c.selection().unwrap().id, "S2");
        assert_eq!(c.surface().focused.len(), 1);
        assert_eq!(c.surface().focused[0].0, "C1");
        assert_eq!(c.surface().focused[0].1.scale, 1.2);
    }

    #[test]
    fn test_click_after_double_click_window_works() {
        let mut c = controller();
        let t0 = Instant::now();
        c.on_double_click(Some("C1"), t0);
        c.on_click(Some("S1"), t0 + Duration::from_secs(1));
        assert!(c.poll(t0 + Duration::from_secs(2)));
        assert_eq!(c.selection().unwrap().id, "S1");
    }

    #[test]
    fn test_second_click_restarts_timer() {
        let mut c = controller();
        let t0 = Instant::now();
        c.on_click(Some("S1"), t0);
        c.on_click(Some("S2"), t0 + Duration::from_millis(200));
        assert!(!c.poll(t0 + DELAY));
        assert!(c.poll(t0 + Duration::from_millis(200) + DELAY));
        assert_eq!(c.selection().unwrap().id, "S2");
    }

    #[test]
    fn test_select_then_clear_leaves_colors_alone() {
        let mut c = controller();
        c.select("S1");
        c.select("C1");
        c.clear_selection();

        assert!(c.selection().is_none());
        assert_eq!(c.view(), c.base());
        assert!(c.surface().set_data.is_empty());
    }

    #[test]
    fn test_unknown_selection_clears() {
        let mut c = controller();
        c.select("S1");
        assert!(c.select("missing").is_none());
        assert!(c.selection().is_none());
    }

    #[test]
    fn test_search_pushes_restyled_view() {
        let mut c = controller();
        c.search("vote");
        assert_eq!(c.query(), "vote");
        assert_eq!(c.surface().set_data.len(), 1);

        let view = c.view();
        assert_eq!(view.node("C1").unwrap().font.size, search::MATCH_LABEL_SIZE);
        assert_eq!(view.node("S1").unwrap().font.size, search::DIMMED_LABEL_SIZE);

        c.search("");
        assert_eq!(c.view(), c.base());
    }

    #[test]
    fn test_search_keeps_selection() {
        let mut c = controller();
        c.select("S1");
        c.search("news");
        assert_eq!(c.selection().unwrap().id, "S1");
    }

    #[test]
    fn test_reset_restores_everything() {
        let mut c = controller();
        let t0 = Instant::now();
        c.select("S1");
        c.search("lonely");
        c.on_click(Some("C1"), t0);
        c.reset();

        assert_eq!(c.query(), "");
        assert!(c.selection().is_none());
        assert!(c.pending_click().is_none());
        assert_eq!(c.view(), c.base());
        assert_eq!(c.surface().fits, 1);
        assert_eq!(c.surface().set_data.last().unwrap(), c.base());
    }

    #[test]
    fn test_dispose_returns_surface() {
        let mut c = controller();
        c.search("x");
        let surface = c.dispose();
        assert_eq!(surface.loads, 1);
        assert_eq!(surface.set_data.len(), 1);
    }
}
