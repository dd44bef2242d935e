//! Resolved layer requests and the map viewport.
//!
//! A [`VisualLayerRequest`] is built fresh on every render cycle and handed
//! straight to a map backend; it has no identity beyond that one call.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

use crate::class::MaskPredicate;
use crate::region::FeatureFilter;
use crate::style::{BaseMapStyle, LayerStyle};

/// A single image in a hosted image collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image collection identifier (e.g. `"USDA/NASS/CDL"`).
    pub collection: String,
    /// Image identifier within the collection (e.g. `"2020"`).
    pub id: String,
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// What a layer request draws from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerSource {
    /// One image selected by time period.
    Image(ImageRef),
    /// A filtered feature collection.
    Features(FeatureFilter),
}

/// Role of a layer in the rendered stack.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LayerKind {
    /// The masked, clipped class raster.
    Classified,
    /// Sub-region outlines (e.g. counties).
    SubRegionBoundary,
    /// Enclosing region outline (e.g. the state).
    RegionBoundary,
}

/// A fully specified request for one map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualLayerRequest {
    /// Role in the stack.
    pub kind: LayerKind,
    /// Image or feature collection to draw.
    pub source: LayerSource,
    /// Pixel predicate; unmatched pixels are not rendered. `None` for
    /// boundary overlays.
    pub mask: Option<MaskPredicate>,
    /// Polygon the layer is clipped to. `None` for boundary overlays.
    pub clip_region: Option<FeatureFilter>,
    /// Drawing style.
    pub style: LayerStyle,
    /// User-visible layer name.
    pub label: String,
}

/// Output of one resolve: the classified layer and its boundary overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayers {
    /// The masked, clipped class layer.
    pub classified: VisualLayerRequest,
    /// Boundary overlays in draw order (sub-regions, then the enclosing
    /// region).
    pub boundaries: Vec<VisualLayerRequest>,
    /// Messages for the user about how the layers were chosen, such as
    /// which image was picked when several matched the period.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ResolvedLayers {
    /// All requests in draw order: the classified layer first so the
    /// boundaries are drawn over it.
    #[must_use]
    pub fn into_ordered(self) -> Vec<VisualLayerRequest> {
        let mut ordered = Vec::with_capacity(1 + self.boundaries.len());
        ordered.push(self.classified);
        ordered.extend(self.boundaries);
        ordered
    }
}

/// Latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

/// Map view state set before layers are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Map center.
    pub center: LatLon,
    /// Zoom level.
    pub zoom: u8,
    /// Base imagery.
    pub base_map: BaseMapStyle,
}
