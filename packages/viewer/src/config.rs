//! Viewer configuration.
//!
//! Everything fixed at design time (dataset, class, years, region, styles,
//! viewport, panel text) is read from one TOML file. The Cropland Data
//! Layer tomato/California configuration is embedded in the binary; a
//! different file can be supplied through [`CONFIG_ENV_VAR`] or an explicit
//! path.

use std::path::Path;

use landcover_viewer_models::{
    BaseMapStyle, BoundaryStyle, ClassSelector, Color, ImageVisParams, LatLon, RegionSpec,
    SupportedPeriods, TimePeriod, Viewport,
};
use serde::Deserialize;

use crate::ViewerError;
use crate::resolver::{AmbiguityPolicy, ResolverSettings};

/// Configuration embedded at compile time.
pub const EMBEDDED_CONFIG: &str = include_str!("../config/cdl_tomato_california.toml");

/// Environment variable naming a configuration file to use instead of the
/// embedded one.
pub const CONFIG_ENV_VAR: &str = "LANDCOVER_VIEWER_CONFIG";

/// Highest zoom level accepted for the initial viewport.
const MAX_ZOOM: u8 = 24;

/// Complete viewer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    /// Image collection and band.
    pub dataset: DatasetConfig,
    /// The single class shown.
    pub class: ClassConfig,
    /// Selectable years.
    pub periods: PeriodsConfig,
    /// Region the layer is clipped to.
    pub region: RegionConfig,
    /// Boundary overlay strokes.
    pub boundaries: BoundariesConfig,
    /// Initial map view.
    pub viewport: ViewportConfig,
    /// Side panel text.
    pub panel: PanelConfig,
}

/// Which hosted image collection to read.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Image collection identifier.
    pub collection: String,
    /// Band holding classification codes.
    pub band: String,
    /// Behavior when several images match one period.
    #[serde(default)]
    pub ambiguity: AmbiguityPolicy,
}

/// The target class.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassConfig {
    /// Raw classification code.
    pub code: u16,
    /// Legend label (e.g. `"Tomato"`).
    pub name: String,
    /// Layer name prefix; the year is appended in parentheses.
    pub layer_title: String,
    /// Palette and swatch color.
    pub color: Color,
}

/// Inclusive year range.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodsConfig {
    /// Oldest selectable year.
    pub first: u16,
    /// Newest selectable year.
    pub last: u16,
    /// Initial selection; the newest year when omitted.
    pub default: Option<u16>,
}

/// A US state and the `TIGER` collections its boundaries come from.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionConfig {
    /// Two-digit state FIPS code.
    pub state_fips: String,
    /// State polygons, matched by `NAME`.
    #[serde(default = "default_states_collection")]
    pub states_collection: String,
    /// County polygons, matched by `STATEFP`.
    #[serde(default = "default_counties_collection")]
    pub counties_collection: String,
}

fn default_states_collection() -> String {
    "TIGER/2018/States".to_string()
}

fn default_counties_collection() -> String {
    "TIGER/2018/Counties".to_string()
}

/// Boundary overlay strokes. Both overlays are unfilled.
#[derive(Debug, Clone, Deserialize)]
pub struct BoundariesConfig {
    /// Stroke color for both overlays.
    pub color: Color,
    /// Sub-region (county) stroke width in pixels.
    pub sub_region_width: u32,
    /// Enclosing region (state) stroke width in pixels.
    pub region_width: u32,
}

/// Initial map view.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewportConfig {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lon: f64,
    /// Zoom level.
    pub zoom: u8,
    /// Base map imagery.
    #[serde(default)]
    pub base_map: BaseMapStyle,
}

/// Static side panel text.
#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    /// Panel heading.
    pub title: String,
    /// Selection control placeholder.
    pub placeholder: String,
    /// Text next to the trigger control.
    pub instruction: String,
    /// Trigger control label.
    pub button: String,
    /// What the viewer shows.
    pub description: String,
    /// Heading above the data source list.
    pub data_source_heading: String,
    /// Data source bullets.
    #[serde(default)]
    pub data_sources: Vec<String>,
    /// Author credit line.
    pub credits: String,
    /// Affiliation line.
    pub lab: String,
    /// Link text.
    pub link_text: String,
    /// Link target.
    pub link_url: String,
}

impl ViewerConfig {
    /// Parses and validates the embedded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if the embedded configuration is invalid.
    pub fn embedded() -> Result<Self, ViewerError> {
        Self::from_toml_str(EMBEDDED_CONFIG)
    }

    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ConfigParse`] for malformed TOML and
    /// [`ViewerError::Config`] for values that fail validation.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ViewerError> {
        let config: Self = toml::de::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if the file cannot be read or is invalid.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads the file named by `path`, else the file named by
    /// [`CONFIG_ENV_VAR`], else the embedded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if the chosen configuration is invalid.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ViewerError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => {
                log::debug!("Using embedded configuration");
                Self::embedded()
            }
        }
    }

    /// Checks cross-field constraints that TOML types cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ViewerError> {
        self.supported_periods()?;
        self.region_spec()?;

        let invalid = |message: String| Err(ViewerError::Config { message });

        if self.dataset.collection.is_empty() || self.dataset.band.is_empty() {
            return invalid("dataset collection and band must not be empty".to_string());
        }
        if self.viewport.zoom > MAX_ZOOM {
            return invalid(format!(
                "viewport zoom {} exceeds {MAX_ZOOM}",
                self.viewport.zoom
            ));
        }
        if !(-90.0..=90.0).contains(&self.viewport.lat)
            || !(-180.0..=180.0).contains(&self.viewport.lon)
        {
            return invalid(format!(
                "viewport center ({}, {}) is not a valid coordinate",
                self.viewport.lat, self.viewport.lon
            ));
        }
        if self.boundaries.sub_region_width == 0 || self.boundaries.region_width == 0 {
            return invalid("boundary widths must be positive".to_string());
        }
        Ok(())
    }

    /// The selectable years.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] if the range is empty or the default
    /// lies outside it.
    pub fn supported_periods(&self) -> Result<SupportedPeriods, ViewerError> {
        let PeriodsConfig {
            first,
            last,
            default,
        } = self.periods;
        let supported = match default {
            Some(default) => SupportedPeriods::new(
                (first..=last).map(TimePeriod::year).collect(),
                TimePeriod::year(default),
            ),
            None => SupportedPeriods::year_range(first, last),
        };
        supported.map_err(|e| ViewerError::Config {
            message: format!("periods {first}..={last}: {e}"),
        })
    }

    /// The target class.
    #[must_use]
    pub fn class_selector(&self) -> ClassSelector {
        ClassSelector {
            band: self.dataset.band.clone(),
            target_code: self.class.code,
            name: self.class.name.clone(),
            color: self.class.color,
        }
    }

    /// The clip region and its overlays.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] if the FIPS code is not a US state
    /// or DC.
    pub fn region_spec(&self) -> Result<RegionSpec, ViewerError> {
        RegionSpec::us_state(
            &self.region.state_fips,
            &self.region.states_collection,
            &self.region.counties_collection,
        )
        .ok_or_else(|| ViewerError::Config {
            message: format!("unknown state FIPS code {:?}", self.region.state_fips),
        })
    }

    /// The initial map view.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        Viewport {
            center: LatLon {
                lat: self.viewport.lat,
                lon: self.viewport.lon,
            },
            zoom: self.viewport.zoom,
            base_map: self.viewport.base_map,
        }
    }

    /// Everything the layer resolver needs.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] if the region is invalid.
    pub fn resolver_settings(&self) -> Result<ResolverSettings, ViewerError> {
        Ok(ResolverSettings {
            collection: self.dataset.collection.clone(),
            class: self.class_selector(),
            region: self.region_spec()?,
            layer_title: self.class.layer_title.clone(),
            vis: ImageVisParams::single_color(self.class.color),
            sub_region_style: BoundaryStyle::outline(
                self.boundaries.color,
                self.boundaries.sub_region_width,
            ),
            region_style: BoundaryStyle::outline(
                self.boundaries.color,
                self.boundaries.region_width,
            ),
            ambiguity: self.dataset.ambiguity,
        })
    }
}
