#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Seams to the external geospatial compute/map platform.
//!
//! The viewer never decodes rasters, clips geometry, or draws tiles itself.
//! It talks to a hosting platform through three traits:
//!
//! * [`ImageCollectionSource`]: date filtering of an image collection.
//! * [`FeatureCollectionSource`]: attribute filtering of a feature
//!   collection.
//! * [`MapCanvas`]: the map (clear, viewport, base style, add layer).
//!
//! Image pipelines are described lazily with [`expr::ImageExpr`] and only
//! evaluated by the platform. Two reference backends ship with the crate:
//! [`catalog::InMemoryCatalog`] (a TOML-described catalog that can sample
//! expressions point by point) and the canvases in [`canvas`] and
//! [`dispatch`].

pub mod canvas;
pub mod catalog;
pub mod dispatch;
pub mod expr;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use geo::MultiPolygon;
use landcover_viewer_models::{BaseMapStyle, DateInterval, FeatureFilter, ImageRef};
use thiserror::Error;

use crate::expr::Renderable;

/// Errors reported by a platform backend.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The catalog description could not be parsed.
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] toml::de::Error),

    /// I/O error (catalog file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A feature geometry could not be interpreted as polygons.
    #[error("Invalid geometry in {collection}: {message}")]
    InvalidGeometry {
        /// Feature collection the geometry belongs to.
        collection: String,
        /// Description of what went wrong.
        message: String,
    },

    /// An expression referenced an image the backend does not know.
    #[error("Unknown image: {image}")]
    UnknownImage {
        /// The missing image.
        image: ImageRef,
    },

    /// An expression selected a band the image does not have.
    #[error("Image {image} has no band {band:?}")]
    UnknownBand {
        /// Image being read.
        image: ImageRef,
        /// Requested band.
        band: String,
    },

    /// A layer request cannot be turned into something drawable.
    #[error("Layer {label:?} cannot be rendered: {message}")]
    Unrenderable {
        /// Layer name.
        label: String,
        /// Description of what went wrong.
        message: String,
    },

    /// The map backend stopped accepting commands.
    #[error("Map backend disconnected")]
    Disconnected,
}

/// Catalog metadata for one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Collection and id.
    pub image: ImageRef,
    /// Acquisition start date used for temporal filtering.
    pub start: NaiveDate,
    /// When the platform ingested the image.
    pub ingested_at: DateTime<Utc>,
}

/// One feature of a feature collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Collection the feature belongs to.
    pub collection: String,
    /// String attributes (e.g. `NAME`, `STATEFP`).
    pub properties: BTreeMap<String, String>,
    /// Polygon geometry, if the backend carries one.
    pub geometry: Option<MultiPolygon<f64>>,
}

impl Feature {
    /// Returns `true` if the feature passes `filter`.
    #[must_use]
    pub fn matches(&self, filter: &FeatureFilter) -> bool {
        self.collection == filter.collection
            && self
                .properties
                .get(&filter.property)
                .is_some_and(|v| *v == filter.value)
    }
}

/// A hosted image collection that can be filtered by date.
pub trait ImageCollectionSource: Send + Sync {
    /// Returns every image of `collection` whose start date falls inside
    /// `interval`, in the backend's native order.
    ///
    /// An unknown collection yields no images rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend cannot be queried.
    fn filter_date(
        &self,
        collection: &str,
        interval: &DateInterval,
    ) -> Result<Vec<ImageRecord>, PlatformError>;
}

/// A hosted feature collection that can be filtered by attribute.
pub trait FeatureCollectionSource: Send + Sync {
    /// Returns the features matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend cannot be queried.
    fn filter_eq(&self, filter: &FeatureFilter) -> Result<Vec<Feature>, PlatformError>;
}

/// The platform's map widget.
///
/// Calls are dispatched, not awaited: an implementation may hand the work
/// to a backend that evaluates and tiles layers later. Nothing here
/// cancels work already in flight for layers that a later [`clear`]
/// removes.
///
/// [`clear`]: MapCanvas::clear
pub trait MapCanvas {
    /// Removes every layer. A no-op on an empty map.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend refuses the command.
    fn clear(&mut self) -> Result<(), PlatformError>;

    /// Centers the map.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend refuses the command.
    fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) -> Result<(), PlatformError>;

    /// Sets the base map imagery.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend refuses the command.
    fn set_options(&mut self, base_map: BaseMapStyle) -> Result<(), PlatformError>;

    /// Draws `layer` above all existing layers under the name `label`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the backend refuses the command.
    fn add_layer(&mut self, layer: Renderable, label: &str) -> Result<(), PlatformError>;
}
