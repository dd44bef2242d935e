//! UI event handling.
//!
//! The controller owns the [`ParameterStore`], the [`LayerResolver`] and the
//! map canvas, and reacts to one [`UiEvent`] at a time:
//!
//! ```text
//! Idle  --InitialLoad-->   Ready   (render the default period)
//! Ready --SelectPeriod-->  Ready   (store only, nothing is drawn)
//! Ready --ShowResult-->    Ready   (resolve, render, replace legend)
//! ```
//!
//! A cycle whose resolve fails does not touch the map. The error is kept as
//! a status message for the front-end and also returned to the caller. A
//! cycle that fails part way through drawing drops the legend and the
//! rendered period, since the map no longer shows a complete result.

use std::sync::Arc;

use landcover_viewer_models::{ClassSelector, TimePeriod, Viewport};
use landcover_viewer_platform::{ImageCollectionSource, MapCanvas};

use crate::ViewerError;
use crate::config::ViewerConfig;
use crate::dispatcher;
use crate::legend::{self, Panel};
use crate::resolver::LayerResolver;
use crate::store::ParameterStore;

/// Controller lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ControllerState {
    /// Nothing has been drawn yet.
    Idle,
    /// The initial load has happened; events are accepted.
    Ready,
}

/// Input from the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The viewer has been shown for the first time.
    InitialLoad,
    /// The selection control changed to this value.
    SelectPeriod(String),
    /// The trigger control was pressed.
    ShowResult,
}

/// Drives the viewer from [`UiEvent`]s.
pub struct Controller<C: MapCanvas> {
    store: ParameterStore,
    resolver: LayerResolver,
    canvas: C,
    viewport: Viewport,
    class: ClassSelector,
    info_panel: Panel,
    legend: Option<Panel>,
    state: ControllerState,
    status: Option<String>,
    rendered: Option<TimePeriod>,
}

impl<C: MapCanvas> Controller<C> {
    /// Creates an idle controller.
    #[must_use]
    pub const fn new(
        store: ParameterStore,
        resolver: LayerResolver,
        canvas: C,
        viewport: Viewport,
        class: ClassSelector,
        info_panel: Panel,
    ) -> Self {
        Self {
            store,
            resolver,
            canvas,
            viewport,
            class,
            info_panel,
            legend: None,
            state: ControllerState::Idle,
            status: None,
            rendered: None,
        }
    }

    /// Wires a controller from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] if the configuration is unusable.
    pub fn from_config(
        config: &ViewerConfig,
        images: Arc<dyn ImageCollectionSource>,
        canvas: C,
    ) -> Result<Self, ViewerError> {
        let store = ParameterStore::new(config.supported_periods()?);
        let resolver = LayerResolver::new(images, config.resolver_settings()?);
        Ok(Self::new(
            store,
            resolver,
            canvas,
            config.viewport(),
            config.class_selector(),
            legend::build_info_panel(&config.panel),
        ))
    }

    /// Sends [`UiEvent::InitialLoad`].
    ///
    /// # Errors
    ///
    /// See [`Self::handle`].
    pub fn start(&mut self) -> Result<ControllerState, ViewerError> {
        self.handle(UiEvent::InitialLoad)
    }

    /// Handles one event and returns the resulting state.
    ///
    /// # Errors
    ///
    /// * [`ViewerError::InvalidPeriod`] if a selection is rejected; the
    ///   selected period is unchanged.
    /// * [`ViewerError::NoImageForPeriod`] or
    ///   [`ViewerError::AmbiguousImageForPeriod`] if a render cycle could
    ///   not resolve its layers; the map is unchanged.
    /// * [`ViewerError::Platform`] if the canvas refused a command.
    pub fn handle(&mut self, event: UiEvent) -> Result<ControllerState, ViewerError> {
        log::debug!("{} <- {event:?}", self.state);

        let result = match event {
            UiEvent::InitialLoad => {
                if self.state == ControllerState::Ready {
                    log::debug!("Ignoring repeated initial load");
                    return Ok(self.state);
                }
                self.state = ControllerState::Ready;
                self.store.reset();
                self.render_cycle()
            }
            UiEvent::SelectPeriod(value) => self.store.set_from_str(&value).map(|period| {
                log::info!("Selected {period}");
            }),
            UiEvent::ShowResult => {
                self.state = ControllerState::Ready;
                self.render_cycle()
            }
        };

        match result {
            Ok(()) => Ok(self.state),
            Err(e) => {
                log::warn!("{e}");
                self.status = Some(e.to_string());
                Err(e)
            }
        }
    }

    fn render_cycle(&mut self) -> Result<(), ViewerError> {
        let period = self.store.get();
        let mut resolved = self.resolver.resolve(period)?;
        let warnings = std::mem::take(&mut resolved.warnings);
        let layers = dispatcher::prepare(&resolved.into_ordered())?;

        if let Err(e) = dispatcher::draw(&mut self.canvas, layers, &self.viewport) {
            self.legend = None;
            self.rendered = None;
            return Err(e);
        }

        self.legend = Some(legend::build_legend(&self.class.name, self.class.color));
        self.rendered = Some(period);
        self.status = (!warnings.is_empty()).then(|| warnings.join("; "));
        log::info!("Rendered {}", self.resolver.label_for(period));
        Ok(())
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// The selected period.
    #[must_use]
    pub const fn selected_period(&self) -> TimePeriod {
        self.store.get()
    }

    /// The period currently drawn on the map, if any.
    #[must_use]
    pub const fn rendered_period(&self) -> Option<TimePeriod> {
        self.rendered
    }

    /// The parameter store.
    #[must_use]
    pub const fn store(&self) -> &ParameterStore {
        &self.store
    }

    /// The legend of the last successful render cycle.
    #[must_use]
    pub const fn legend(&self) -> Option<&Panel> {
        self.legend.as_ref()
    }

    /// The static info panel.
    #[must_use]
    pub const fn info_panel(&self) -> &Panel {
        &self.info_panel
    }

    /// The message of the last failed event, or the warnings of the last
    /// render cycle. A render cycle without warnings clears it.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The map canvas.
    #[must_use]
    pub const fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The info panel followed by the legend, as the front-end stacks them.
    #[must_use]
    pub fn panel(&self) -> Vec<&Panel> {
        std::iter::once(&self.info_panel)
            .chain(self.legend.as_ref())
            .collect()
    }
}
