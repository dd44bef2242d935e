#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core types for the land-cover viewer.
//!
//! These types describe *what* should be drawn: which time period is
//! active, which classification code counts as the target class, which
//! administrative region the result is clipped to, and the fully resolved
//! layer requests handed to a map backend. None of them perform any image
//! or geometry work themselves.

pub mod class;
pub mod fips;
pub mod layer;
pub mod period;
pub mod region;
pub mod style;

pub use class::{ClassSelector, MaskPredicate};
pub use layer::{
    ImageRef, LatLon, LayerKind, LayerSource, ResolvedLayers, Viewport, VisualLayerRequest,
};
pub use period::{DateInterval, InvalidPeriodError, ParsePeriodError, SupportedPeriods, TimePeriod};
pub use region::{FeatureFilter, RegionSpec};
pub use style::{BaseMapStyle, BoundaryStyle, Color, ImageVisParams, LayerStyle, ParseColorError};
