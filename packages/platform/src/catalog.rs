//! In-memory platform catalog.
//!
//! Describes a handful of images and boundary features in TOML so the
//! viewer can run without a hosted platform. Images carry no real raster
//! data: each band has a fill value plus optional rectangular patches of a
//! constant class, which is enough to observe masking and clipping through
//! [`InMemoryCatalog::sample`].

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use geo::{Contains, Intersects, MultiPolygon, Rect, coord};
use geojson::GeoJson;
use landcover_viewer_models::{DateInterval, FeatureFilter, ImageRef};
use serde::Deserialize;

use crate::expr::ImageExpr;
use crate::{Feature, FeatureCollectionSource, ImageCollectionSource, ImageRecord, PlatformError};

/// Catalog shipped with the binary: Cropland Data Layer stand-ins for
/// 2015-2023 and simplified California boundaries.
pub const EMBEDDED_CATALOG: &str = include_str!("../catalog/cdl_california.toml");

/// Environment variable naming a catalog file to use instead of the
/// embedded one.
pub const CATALOG_ENV_VAR: &str = "LANDCOVER_VIEWER_CATALOG";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    images: Vec<ImageConfig>,
    #[serde(default)]
    features: Vec<FeatureConfig>,
}

#[derive(Debug, Deserialize)]
struct ImageConfig {
    collection: String,
    id: String,
    start: NaiveDate,
    ingested_at: DateTime<Utc>,
    /// Band name -> value of every pixel not covered by a patch.
    #[serde(default)]
    bands: BTreeMap<String, u16>,
    #[serde(default)]
    patches: Vec<PatchConfig>,
}

#[derive(Debug, Deserialize)]
struct PatchConfig {
    band: String,
    value: u16,
    /// `[min_lon, min_lat, max_lon, max_lat]`
    bbox: [f64; 4],
}

#[derive(Debug, Deserialize)]
struct FeatureConfig {
    collection: String,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    /// `GeoJSON` `Polygon` or `MultiPolygon` geometry.
    geometry: Option<String>,
}

/// A rectangle of constant value in one band.
#[derive(Debug, Clone, PartialEq)]
struct Patch {
    band: String,
    value: u16,
    rect: Rect<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct ImageEntry {
    record: ImageRecord,
    fill: BTreeMap<String, u16>,
    patches: Vec<Patch>,
}

impl ImageEntry {
    /// Raw band values at a point. Later patches win over earlier ones.
    fn pixel(&self, point: geo::Point<f64>) -> BTreeMap<String, f64> {
        self.fill
            .iter()
            .map(|(band, fill)| {
                let value = self
                    .patches
                    .iter()
                    .rev()
                    .find(|p| p.band == *band && point.intersects(&p.rect))
                    .map_or(*fill, |p| p.value);
                (band.clone(), f64::from(value))
            })
            .collect()
    }
}

/// Band name -> value for one evaluated pixel.
type Pixel = BTreeMap<String, f64>;

/// A platform backend held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryCatalog {
    images: Vec<ImageEntry>,
    features: Vec<Feature>,
}

impl InMemoryCatalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the catalog embedded in the binary.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the embedded catalog is malformed.
    pub fn embedded() -> Result<Self, PlatformError> {
        Self::from_toml_str(EMBEDDED_CATALOG)
    }

    /// Reads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PlatformError> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        log::info!(
            "Loaded catalog {} ({} images, {} features)",
            path.display(),
            catalog.images.len(),
            catalog.features.len()
        );
        Ok(catalog)
    }

    /// Loads the file named by `path`, else the file named by
    /// [`CATALOG_ENV_VAR`], else the embedded catalog.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the chosen catalog cannot be read or
    /// parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, PlatformError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var(CATALOG_ENV_VAR) {
            Ok(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Self::embedded(),
        }
    }

    /// Parses a catalog from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the TOML or any `GeoJSON` geometry is
    /// malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, PlatformError> {
        let file: CatalogFile = toml::de::from_str(toml_str)?;
        let mut catalog = Self::new();

        for image in file.images {
            let patches = image
                .patches
                .into_iter()
                .map(|p| Patch {
                    band: p.band,
                    value: p.value,
                    rect: Rect::new(
                        coord! { x: p.bbox[0], y: p.bbox[1] },
                        coord! { x: p.bbox[2], y: p.bbox[3] },
                    ),
                })
                .collect();
            catalog.images.push(ImageEntry {
                record: ImageRecord {
                    image: ImageRef {
                        collection: image.collection,
                        id: image.id,
                    },
                    start: image.start,
                    ingested_at: image.ingested_at,
                },
                fill: image.bands,
                patches,
            });
        }

        for feature in file.features {
            let geometry = feature
                .geometry
                .as_deref()
                .map(|g| parse_geojson_to_multipolygon(g, &feature.collection))
                .transpose()?;
            catalog.push_feature(Feature {
                collection: feature.collection,
                properties: feature.properties,
                geometry,
            });
        }

        Ok(catalog)
    }

    /// Adds an image with no bands.
    pub fn push_image(&mut self, record: ImageRecord) {
        self.images.push(ImageEntry {
            record,
            fill: BTreeMap::new(),
            patches: Vec::new(),
        });
    }

    /// Adds a feature.
    pub fn push_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Number of images across all collections.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Evaluates `expr` at one point and returns the first band's value,
    /// or `None` if the pixel is masked or clipped away.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the expression references an unknown
    /// image or band.
    pub fn sample(
        &self,
        expr: &ImageExpr,
        lon: f64,
        lat: f64,
    ) -> Result<Option<f64>, PlatformError> {
        let point = geo::Point::new(lon, lat);
        Ok(self
            .eval(expr, point)?
            .and_then(|pixel| pixel.into_values().next()))
    }

    fn eval(
        &self,
        expr: &ImageExpr,
        point: geo::Point<f64>,
    ) -> Result<Option<Pixel>, PlatformError> {
        match expr {
            ImageExpr::Load(image) => {
                let entry = self
                    .images
                    .iter()
                    .find(|e| e.record.image == *image)
                    .ok_or_else(|| PlatformError::UnknownImage {
                        image: image.clone(),
                    })?;
                Ok(Some(entry.pixel(point)))
            }
            ImageExpr::Select { input, band } => {
                let Some(mut pixel) = self.eval(input, point)? else {
                    return Ok(None);
                };
                let value = pixel.remove(band).ok_or_else(|| PlatformError::UnknownBand {
                    image: expr.source().clone(),
                    band: band.clone(),
                })?;
                Ok(Some(BTreeMap::from([(band.clone(), value)])))
            }
            ImageExpr::Equals { input, value } => {
                let target = f64::from(*value);
                Ok(self.eval(input, point)?.map(|pixel| {
                    pixel
                        .into_iter()
                        .map(|(band, v)| {
                            let hit = (v - target).abs() < f64::EPSILON;
                            (band, if hit { 1.0 } else { 0.0 })
                        })
                        .collect()
                }))
            }
            ImageExpr::UpdateMask { input, mask } => {
                let visible = self
                    .eval(mask, point)?
                    .is_some_and(|m| m.values().any(|v| *v != 0.0));
                if visible {
                    self.eval(input, point)
                } else {
                    Ok(None)
                }
            }
            ImageExpr::Clip { input, region } => {
                let inside = self.filter_eq(region)?.iter().any(|f| {
                    f.geometry
                        .as_ref()
                        .is_some_and(|g| g.contains(&point))
                });
                if inside {
                    self.eval(input, point)
                } else {
                    Ok(None)
                }
            }
        }
    }
}

impl ImageCollectionSource for InMemoryCatalog {
    fn filter_date(
        &self,
        collection: &str,
        interval: &DateInterval,
    ) -> Result<Vec<ImageRecord>, PlatformError> {
        let matches: Vec<ImageRecord> = self
            .images
            .iter()
            .filter(|e| e.record.image.collection == collection && interval.contains(e.record.start))
            .map(|e| e.record.clone())
            .collect();
        log::debug!(
            "{collection} filtered to {interval}: {} image(s)",
            matches.len()
        );
        Ok(matches)
    }
}

impl FeatureCollectionSource for InMemoryCatalog {
    fn filter_eq(&self, filter: &FeatureFilter) -> Result<Vec<Feature>, PlatformError> {
        Ok(self
            .features
            .iter()
            .filter(|f| f.matches(filter))
            .cloned()
            .collect())
    }
}

/// Parse a `GeoJSON` string into a [`MultiPolygon`].
/// Handles `Polygon` and `MultiPolygon` geometries as well as a `Feature`
/// wrapping one of them.
fn parse_geojson_to_multipolygon(
    geojson_str: &str,
    collection: &str,
) -> Result<MultiPolygon<f64>, PlatformError> {
    let invalid = |message: String| PlatformError::InvalidGeometry {
        collection: collection.to_string(),
        message,
    };

    let geojson: GeoJson = geojson_str.parse().map_err(|e| invalid(format!("{e}")))?;
    let geometry = match geojson {
        GeoJson::Geometry(geom) => geom,
        GeoJson::Feature(feature) => feature
            .geometry
            .ok_or_else(|| invalid("feature has no geometry".to_string()))?,
        GeoJson::FeatureCollection(_) => {
            return Err(invalid("expected a single geometry".to_string()));
        }
    };

    let geo_geom: geo::Geometry<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| invalid(format!("{e}")))?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(invalid("expected Polygon or MultiPolygon".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use landcover_viewer_models::TimePeriod;

    use super::*;

    const DAVIS: (f64, f64) = (-121.7415, 38.5449);
    const RENO: (f64, f64) = (-119.8138, 39.5296);

    fn cdl(year: &str) -> ImageRef {
        ImageRef {
            collection: "USDA/NASS/CDL".to_string(),
            id: year.to_string(),
        }
    }

    fn california() -> FeatureFilter {
        FeatureFilter::attribute_eq("TIGER/2018/States", "NAME", "California")
    }

    fn tomatoes(year: &str) -> ImageExpr {
        let class = ImageExpr::load(cdl(year)).select("cropland").equals(54);
        class.clone().update_mask(class)
    }

    #[test]
    fn embedded_catalog_covers_2015_through_2023() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        for year in 2015..=2023 {
            let interval = TimePeriod::year(year).interval();
            let images = catalog.filter_date("USDA/NASS/CDL", &interval).unwrap();
            assert_eq!(images.len(), 1, "expected one image for {year}");
            assert_eq!(images[0].image.id, year.to_string());
        }
    }

    #[test]
    fn no_images_outside_catalog_years() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        let interval = TimePeriod::year(2030).interval();
        assert!(catalog.filter_date("USDA/NASS/CDL", &interval).unwrap().is_empty());
        assert!(catalog.filter_date("NOPE", &interval).unwrap().is_empty());
    }

    #[test]
    fn filters_boundaries_by_attribute() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        let states = catalog.filter_eq(&california()).unwrap();
        assert_eq!(states.len(), 1);
        assert!(states[0].geometry.is_some());

        let counties = catalog
            .filter_eq(&FeatureFilter::attribute_eq(
                "TIGER/2018/Counties",
                "STATEFP",
                "06",
            ))
            .unwrap();
        assert!(!counties.is_empty());
        assert!(counties.iter().all(|c| c.properties["STATEFP"] == "06"));
    }

    #[test]
    fn mask_keeps_only_target_class() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        let expr = tomatoes("2020");
        assert_eq!(catalog.sample(&expr, DAVIS.0, DAVIS.1).unwrap(), Some(1.0));
        // Open ocean is background (code 0) and is masked out.
        assert_eq!(catalog.sample(&expr, -125.5, 36.0).unwrap(), None);
    }

    #[test]
    fn clip_hides_pixels_outside_region() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        let unclipped = tomatoes("2020");
        let clipped = unclipped.clone().clip(california());

        // The Nevada patch is tomatoes, but lies outside California.
        assert_eq!(catalog.sample(&unclipped, RENO.0, RENO.1).unwrap(), Some(1.0));
        assert_eq!(catalog.sample(&clipped, RENO.0, RENO.1).unwrap(), None);
        assert_eq!(catalog.sample(&clipped, DAVIS.0, DAVIS.1).unwrap(), Some(1.0));
    }

    #[test]
    fn unknown_image_and_band_are_errors() {
        let catalog = InMemoryCatalog::embedded().unwrap();
        assert!(matches!(
            catalog.sample(&ImageExpr::load(cdl("1999")), 0.0, 0.0),
            Err(PlatformError::UnknownImage { .. })
        ));
        assert!(matches!(
            catalog.sample(&ImageExpr::load(cdl("2020")).select("nope"), 0.0, 0.0),
            Err(PlatformError::UnknownBand { .. })
        ));
    }

    #[test]
    fn rejects_non_polygon_geometry() {
        let toml_str = r#"
            [[features]]
            collection = "points"
            geometry = '{"type":"Point","coordinates":[0.0,0.0]}'
        "#;
        assert!(matches!(
            InMemoryCatalog::from_toml_str(toml_str),
            Err(PlatformError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn later_patches_win() {
        let toml_str = r#"
            [[images]]
            collection = "c"
            id = "a"
            start = "2020-01-01"
            ingested_at = "2021-01-01T00:00:00Z"
            bands = { cropland = 0 }

            [[images.patches]]
            band = "cropland"
            value = 1
            bbox = [0.0, 0.0, 10.0, 10.0]

            [[images.patches]]
            band = "cropland"
            value = 54
            bbox = [4.0, 4.0, 6.0, 6.0]
        "#;
        let catalog = InMemoryCatalog::from_toml_str(toml_str).unwrap();
        let expr = ImageExpr::load(ImageRef {
            collection: "c".to_string(),
            id: "a".to_string(),
        })
        .select("cropland");
        assert_eq!(catalog.sample(&expr, 5.0, 5.0).unwrap(), Some(54.0));
        assert_eq!(catalog.sample(&expr, 1.0, 1.0).unwrap(), Some(1.0));
        assert_eq!(catalog.sample(&expr, 20.0, 20.0).unwrap(), Some(0.0));
    }
}
