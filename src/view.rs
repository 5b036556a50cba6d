//! Mount/unmount lifecycle of a graph view.
//!
//! A view is created mounted and `Loading`. The graph document arrives later
//! through [`GraphView::complete_load`], tagged with the [`LoadTicket`] handed
//! out when the fetch started; results that land after an unmount are
//! dropped without touching state.

use crate::error::{RenderInitError, ViewError};
use crate::graph::builder::{ModelBuilder, SizeScale};
use crate::graph::controller::{InteractionController, InteractionSettings};
use crate::graph::theme::{Environment, Palette};
use crate::render::RenderSurface;

pub enum ViewState<S: RenderSurface> {
    Loading,
    Ready(InteractionController<S>),
    /// Terminal error state carrying the user-visible message
    Failed(String),
    Unmounted,
}

/// Ties a fetch result to the mount that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Ignored,
}

pub struct GraphView<S: RenderSurface, E: Environment> {
    env: E,
    surface: Option<S>,
    sizing: SizeScale,
    settings: InteractionSettings,
    state: ViewState<S>,
    generation: u64,
}

impl<S: RenderSurface, E: Environment> GraphView<S, E> {
    pub fn new(env: E, surface: S, sizing: SizeScale, settings: InteractionSettings) -> Self {
        Self {
            env,
            surface: Some(surface),
            sizing,
            settings,
            state: ViewState::Loading,
            generation: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &ViewState<S> {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn controller(&self) -> Option<&InteractionController<S>> {
        match &self.state {
            ViewState::Ready(controller) => Some(controller),
            _ => None,
        }
    }

    pub fn controller_mut(&mut self) -> Option<&mut InteractionController<S>> {
        match &mut self.state {
            ViewState::Ready(controller) => Some(controller),
            _ => None,
        }
    }

    /// Ticket for a fetch started now
    pub fn begin_load(&self) -> LoadTicket {
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the outcome of the document fetch.
    ///
    /// Ignored when the view was unmounted, the ticket is stale, or a document
    /// was already applied. Errors move the view to `Failed`; nothing retries.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, ViewError>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation || !self.is_loading() {
            tracing::debug!("Ignoring graph document for a view that moved on");
            return LoadOutcome::Ignored;
        }

        let mounted = result.and_then(|text| self.mount(&text));
        self.state = match mounted {
            Ok(controller) => ViewState::Ready(controller),
            Err(e) => {
                tracing::error!("Graph view failed: {}", e);
                ViewState::Failed(e.to_string())
            }
        };
        LoadOutcome::Applied
    }

    fn mount(&mut self, text: &str) -> Result<InteractionController<S>, ViewError> {
        let document = self.env.parse(text)?;
        let palette = Palette::for_scheme(self.env.color_scheme());
        let model = ModelBuilder::new(palette.clone())
            .with_sizing(self.sizing)
            .build(&document);

        let surface = self.surface.take().ok_or(RenderInitError::AlreadyMounted)?;
        Ok(InteractionController::mount(
            surface,
            model,
            palette,
            self.settings,
        )?)
    }

    /// Tear the view down. Outstanding tickets become stale; the surface is
    /// handed back if one was still held.
    pub fn unmount(&mut self) -> Option<S> {
        self.generation += 1;
        match std::mem::replace(&mut self.state, ViewState::Unmounted) {
            ViewState::Ready(controller) => Some(controller.dispose()),
            _ => self.surface.take(),
        }
    }
}
