//! Fire-and-forget map canvas.
//!
//! [`DispatchCanvas`] forwards every map call as a [`MapCommand`] over an
//! unbounded [`tokio::sync::mpsc`] channel and returns immediately. A
//! backend task drains the channel into a real canvas at its own pace, so
//! the caller never waits on (and cannot cancel) layer evaluation.

use landcover_viewer_models::BaseMapStyle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::expr::Renderable;
use crate::{MapCanvas, PlatformError};

/// One map call, as sent to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum MapCommand {
    /// [`MapCanvas::clear`].
    Clear,
    /// [`MapCanvas::set_center`].
    SetCenter {
        /// Longitude.
        lon: f64,
        /// Latitude.
        lat: f64,
        /// Zoom level.
        zoom: u8,
    },
    /// [`MapCanvas::set_options`].
    SetOptions(BaseMapStyle),
    /// [`MapCanvas::add_layer`].
    AddLayer {
        /// What to draw.
        renderable: Renderable,
        /// Layer name.
        label: String,
    },
}

impl MapCommand {
    /// Replays this command onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the canvas refuses the command.
    pub fn apply<C: MapCanvas + ?Sized>(self, canvas: &mut C) -> Result<(), PlatformError> {
        match self {
            Self::Clear => canvas.clear(),
            Self::SetCenter { lon, lat, zoom } => canvas.set_center(lon, lat, zoom),
            Self::SetOptions(base_map) => canvas.set_options(base_map),
            Self::AddLayer { renderable, label } => canvas.add_layer(renderable, &label),
        }
    }
}

/// Sending half: a [`MapCanvas`] that only enqueues commands.
#[derive(Debug, Clone)]
pub struct DispatchCanvas {
    tx: mpsc::UnboundedSender<MapCommand>,
}

/// Receiving half, owned by the backend.
#[derive(Debug)]
pub struct MapCommandReceiver {
    rx: mpsc::UnboundedReceiver<MapCommand>,
}

impl DispatchCanvas {
    /// Creates a connected canvas/receiver pair.
    #[must_use]
    pub fn channel() -> (Self, MapCommandReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, MapCommandReceiver { rx })
    }

    /// Spawns a backend task that applies every command to `canvas` and
    /// hands the canvas back once all senders are dropped.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn spawn_backend<C>(canvas: C) -> (Self, JoinHandle<Result<C, PlatformError>>)
    where
        C: MapCanvas + Send + 'static,
    {
        let (sender, receiver) = Self::channel();
        let handle = tokio::spawn(async move {
            let mut canvas = canvas;
            let applied = receiver.drain_into(&mut canvas).await?;
            log::debug!("Map backend finished after {applied} command(s)");
            Ok(canvas)
        });
        (sender, handle)
    }

    fn send(&self, command: MapCommand) -> Result<(), PlatformError> {
        self.tx
            .send(command)
            .map_err(|_| PlatformError::Disconnected)
    }
}

impl MapCanvas for DispatchCanvas {
    fn clear(&mut self) -> Result<(), PlatformError> {
        self.send(MapCommand::Clear)
    }

    fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) -> Result<(), PlatformError> {
        self.send(MapCommand::SetCenter { lon, lat, zoom })
    }

    fn set_options(&mut self, base_map: BaseMapStyle) -> Result<(), PlatformError> {
        self.send(MapCommand::SetOptions(base_map))
    }

    fn add_layer(&mut self, layer: Renderable, label: &str) -> Result<(), PlatformError> {
        self.send(MapCommand::AddLayer {
            renderable: layer,
            label: label.to_string(),
        })
    }
}

impl MapCommandReceiver {
    /// Applies commands to `canvas` in arrival order until every sender
    /// is dropped. Returns the number of commands applied.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] as soon as the canvas refuses a command;
    /// the remaining commands are dropped.
    pub async fn drain_into<C: MapCanvas + ?Sized>(
        mut self,
        canvas: &mut C,
    ) -> Result<usize, PlatformError> {
        let mut applied = 0usize;
        while let Some(command) = self.rx.recv().await {
            if let MapCommand::AddLayer { label, .. } = &command {
                log::info!("Map backend: drawing {label:?}");
            }
            command.apply(canvas)?;
            applied += 1;
        }
        Ok(applied)
    }
}
