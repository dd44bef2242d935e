#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Year-driven land-cover viewer.
//!
//! Picks a year, resolves the classified layer for that year (one image of
//! a hosted collection, masked to a single class and clipped to a region)
//! plus two boundary overlays, and dispatches them to a map canvas. The
//! pieces are wired together by [`controller::Controller`], a small state
//! machine driven by UI events:
//!
//! * [`store::ParameterStore`] holds the selected year.
//! * [`resolver::LayerResolver`] turns a year into layer requests.
//! * [`dispatcher::render`] clears the map and draws the requests in order.
//! * [`legend`] builds the legend and the static info panel.
//!
//! All image and geometry work happens on the platform behind
//! [`landcover_viewer_platform`]'s traits.

pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod legend;
pub mod resolver;
pub mod store;

use landcover_viewer_models::{
    DateInterval, InvalidPeriodError, ParsePeriodError, TimePeriod,
};
use landcover_viewer_platform::PlatformError;
use thiserror::Error;

/// Errors that can occur while resolving or rendering layers.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The selected period is not one of the supported periods.
    #[error("{input:?} is not a supported period")]
    InvalidPeriod {
        /// The rejected selection.
        input: String,
    },

    /// The image collection has nothing for the selected period.
    #[error("No {collection} image for {period} {interval}")]
    NoImageForPeriod {
        /// Collection that was filtered.
        collection: String,
        /// Requested period.
        period: TimePeriod,
        /// Date interval that was filtered on.
        interval: DateInterval,
    },

    /// More than one image matches the selected period and the configured
    /// policy refuses to pick one.
    #[error(
        "{} {collection} images match {period}: {}",
        .images.len(),
        .images.join(", ")
    )]
    AmbiguousImageForPeriod {
        /// Collection that was filtered.
        collection: String,
        /// Requested period.
        period: TimePeriod,
        /// Identifiers of every matching image.
        images: Vec<String>,
    },

    /// The platform refused a query or map command.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// The configuration is well-formed TOML but not usable.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },

    /// The configuration file is not valid TOML for [`config::ViewerConfig`].
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O error (configuration file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InvalidPeriodError> for ViewerError {
    fn from(e: InvalidPeriodError) -> Self {
        Self::InvalidPeriod {
            input: e.period.to_string(),
        }
    }
}

impl From<ParsePeriodError> for ViewerError {
    fn from(e: ParsePeriodError) -> Self {
        Self::InvalidPeriod { input: e.input }
    }
}
