//! Turns a time period into layer requests.

use std::sync::Arc;

use landcover_viewer_models::{
    BoundaryStyle, ClassSelector, ImageRef, ImageVisParams, LayerKind, LayerSource, LayerStyle,
    RegionSpec, ResolvedLayers, TimePeriod, VisualLayerRequest,
};
use landcover_viewer_platform::{ImageCollectionSource, ImageRecord};
use serde::Deserialize;

use crate::ViewerError;

/// What to do when a period's date filter matches more than one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Take the most recently ingested image (ties broken by image id) and
    /// log a warning.
    #[default]
    FirstMatch,
    /// Fail with [`ViewerError::AmbiguousImageForPeriod`].
    Reject,
}

/// Fixed inputs of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverSettings {
    /// Image collection filtered by period.
    pub collection: String,
    /// Target class.
    pub class: ClassSelector,
    /// Clip region and overlays.
    pub region: RegionSpec,
    /// Classified layer name prefix (e.g. `"Tomato Landcover"`).
    pub layer_title: String,
    /// Classified layer visualization.
    pub vis: ImageVisParams,
    /// Sub-region overlay stroke.
    pub sub_region_style: BoundaryStyle,
    /// Enclosing region overlay stroke.
    pub region_style: BoundaryStyle,
    /// Multiple-match behavior.
    pub ambiguity: AmbiguityPolicy,
}

/// Builds the classified layer and boundary overlays for a period.
///
/// The output depends only on the period, the fixed settings, and the
/// backing collection; nothing is cached between calls.
pub struct LayerResolver {
    images: Arc<dyn ImageCollectionSource>,
    settings: ResolverSettings,
}

impl LayerResolver {
    /// Creates a resolver over `images`.
    #[must_use]
    pub fn new(images: Arc<dyn ImageCollectionSource>, settings: ResolverSettings) -> Self {
        Self { images, settings }
    }

    /// Layer name for the classified layer of `period`
    /// (e.g. `"Tomato Landcover (2020)"`).
    #[must_use]
    pub fn label_for(&self, period: TimePeriod) -> String {
        format!("{} ({period})", self.settings.layer_title)
    }

    /// Resolves `period` into its classified layer and overlays.
    ///
    /// # Errors
    ///
    /// * [`ViewerError::NoImageForPeriod`] if the collection has no image in
    ///   the period's interval.
    /// * [`ViewerError::AmbiguousImageForPeriod`] if several images match and
    ///   the policy is [`AmbiguityPolicy::Reject`].
    /// * [`ViewerError::Platform`] if the collection cannot be queried.
    ///
    /// When several images match under [`AmbiguityPolicy::FirstMatch`], the
    /// pick is described in [`ResolvedLayers::warnings`].
    pub fn resolve(&self, period: TimePeriod) -> Result<ResolvedLayers, ViewerError> {
        let (image, warning) = self.select_image(period)?;
        let s = &self.settings;

        let classified = VisualLayerRequest {
            kind: LayerKind::Classified,
            source: LayerSource::Image(image),
            mask: Some(s.class.mask_predicate()),
            clip_region: Some(s.region.enclosing.clone()),
            style: LayerStyle::Image(s.vis.clone()),
            label: self.label_for(period),
        };

        let boundaries = vec![
            VisualLayerRequest {
                kind: LayerKind::SubRegionBoundary,
                source: LayerSource::Features(s.region.sub_regions.clone()),
                mask: None,
                clip_region: None,
                style: LayerStyle::Boundary(s.sub_region_style),
                label: s.region.sub_region_label(),
            },
            VisualLayerRequest {
                kind: LayerKind::RegionBoundary,
                source: LayerSource::Features(s.region.enclosing.clone()),
                mask: None,
                clip_region: None,
                style: LayerStyle::Boundary(s.region_style),
                label: s.region.boundary_label(),
            },
        ];

        Ok(ResolvedLayers {
            classified,
            boundaries,
            warnings: warning.into_iter().collect(),
        })
    }

    /// Picks the image for `period`, plus a user-facing note when the pick
    /// was one of several matches.
    fn select_image(
        &self,
        period: TimePeriod,
    ) -> Result<(ImageRef, Option<String>), ViewerError> {
        let collection = &self.settings.collection;
        let interval = period.interval();
        let matches = self.images.filter_date(collection, &interval)?;
        let count = matches.len();

        let mut ids: Vec<String> = matches.iter().map(|r| r.image.id.clone()).collect();
        ids.sort();

        if count > 1 && self.settings.ambiguity == AmbiguityPolicy::Reject {
            return Err(ViewerError::AmbiguousImageForPeriod {
                collection: collection.clone(),
                period,
                images: ids,
            });
        }

        let chosen = most_recent(matches).ok_or_else(|| ViewerError::NoImageForPeriod {
            collection: collection.clone(),
            period,
            interval,
        })?;
        log::debug!("Resolved {period} to {chosen}");

        let warning = (count > 1).then(|| {
            format!(
                "{count} {collection} images match {period} ({}); showing the most recently ingested, {}",
                ids.join(", "),
                chosen.id
            )
        });
        if let Some(warning) = &warning {
            log::warn!("{warning}");
        }

        Ok((chosen, warning))
    }
}

/// Picks the most recently ingested image, breaking ties by image id so the
/// choice does not depend on backend ordering.
fn most_recent(records: Vec<ImageRecord>) -> Option<ImageRef> {
    records
        .into_iter()
        .min_by(|a, b| {
            b.ingested_at
                .cmp(&a.ingested_at)
                .then_with(|| a.image.cmp(&b.image))
        })
        .map(|r| r.image)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone as _, Utc};
    use landcover_viewer_models::{Color, FeatureFilter, MaskPredicate};
    use landcover_viewer_platform::catalog::InMemoryCatalog;

    use super::*;
    use crate::config::ViewerConfig;

    fn resolver_over(catalog: InMemoryCatalog) -> LayerResolver {
        let settings = ViewerConfig::embedded()
            .unwrap()
            .resolver_settings()
            .unwrap();
        LayerResolver::new(Arc::new(catalog), settings)
    }

    fn record(id: &str, start: (i32, u32, u32), ingested_year: i32) -> ImageRecord {
        ImageRecord {
            image: ImageRef {
                collection: "USDA/NASS/CDL".to_string(),
                id: id.to_string(),
            },
            start: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            ingested_at: Utc
                .with_ymd_and_hms(ingested_year, 1, 1, 0, 0, 0)
                .unwrap(),
        }
    }

    fn california() -> FeatureFilter {
        FeatureFilter::attribute_eq("TIGER/2018/States", "NAME", "California")
    }

    #[test]
    fn resolves_2020_scenario() {
        let resolver = resolver_over(InMemoryCatalog::embedded().unwrap());
        let resolved = resolver.resolve(TimePeriod::year(2020)).unwrap();

        let classified = &resolved.classified;
        assert_eq!(classified.kind, LayerKind::Classified);
        assert_eq!(
            classified.source,
            LayerSource::Image(ImageRef {
                collection: "USDA/NASS/CDL".to_string(),
                id: "2020".to_string(),
            })
        );
        assert_eq!(
            classified.mask,
            Some(MaskPredicate::Equals {
                band: "cropland".to_string(),
                value: 54,
            })
        );
        assert_eq!(classified.clip_region, Some(california()));
        assert_eq!(
            classified.style,
            LayerStyle::Image(ImageVisParams::single_color(Color::RED))
        );
        assert_eq!(classified.label, "Tomato Landcover (2020)");

        let [counties, state] = resolved.boundaries.as_slice() else {
            panic!("expected two boundary layers");
        };
        assert_eq!(counties.label, "California Counties");
        assert_eq!(
            counties.source,
            LayerSource::Features(FeatureFilter::attribute_eq(
                "TIGER/2018/Counties",
                "STATEFP",
                "06"
            ))
        );
        assert_eq!(
            counties.style,
            LayerStyle::Boundary(BoundaryStyle::outline(Color::BLACK, 2))
        );
        assert_eq!(state.label, "California Boundary");
        assert_eq!(state.source, LayerSource::Features(california()));
        assert_eq!(
            state.style,
            LayerStyle::Boundary(BoundaryStyle::outline(Color::BLACK, 4))
        );
        for overlay in [counties, state] {
            assert!(overlay.mask.is_none());
            assert!(overlay.clip_region.is_none());
        }
    }

    #[test]
    fn every_supported_period_masks_target_and_clips_region() {
        let config = ViewerConfig::embedded().unwrap();
        let resolver = resolver_over(InMemoryCatalog::embedded().unwrap());
        for &period in config.supported_periods().unwrap().as_slice() {
            let resolved = resolver.resolve(period).unwrap();
            let mask = resolved.classified.mask.as_ref().unwrap();
            assert!(mask.matches(54));
            assert!(!mask.matches(1));
            assert_eq!(mask.band(), "cropland");
            assert_eq!(resolved.classified.clip_region, Some(california()));
        }
    }

    #[test]
    fn resolve_is_idempotent() {
        let resolver = resolver_over(InMemoryCatalog::embedded().unwrap());
        let first = resolver.resolve(TimePeriod::year(2017)).unwrap();
        let second = resolver.resolve(TimePeriod::year(2017)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_image_is_reported() {
        let resolver = resolver_over(InMemoryCatalog::embedded().unwrap());
        let err = resolver.resolve(TimePeriod::year(2030)).unwrap_err();
        let ViewerError::NoImageForPeriod {
            period, interval, ..
        } = err
        else {
            panic!("expected NoImageForPeriod, got {err}");
        };
        assert_eq!(period, TimePeriod::year(2030));
        assert_eq!(interval, TimePeriod::year(2030).interval());
    }

    #[test]
    fn ambiguous_match_prefers_most_recent_ingestion() {
        let mut catalog = InMemoryCatalog::new();
        catalog.push_image(record("2020_a", (2020, 1, 1), 2021));
        catalog.push_image(record("2020_b", (2020, 6, 1), 2023));
        catalog.push_image(record("2020_c", (2020, 3, 1), 2022));

        let resolved = resolver_over(catalog)
            .resolve(TimePeriod::year(2020))
            .unwrap();
        let LayerSource::Image(image) = resolved.classified.source else {
            panic!("classified layer must come from an image");
        };
        assert_eq!(image.id, "2020_b");
        assert_eq!(
            resolved.warnings,
            ["3 USDA/NASS/CDL images match 2020 (2020_a, 2020_b, 2020_c); showing the most recently ingested, 2020_b"]
        );
    }

    #[test]
    fn single_match_has_no_warnings() {
        let resolver = resolver_over(InMemoryCatalog::embedded().unwrap());
        let resolved = resolver.resolve(TimePeriod::year(2023)).unwrap();
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn ambiguous_ties_break_by_id() {
        let mut catalog = InMemoryCatalog::new();
        catalog.push_image(record("z", (2020, 1, 1), 2021));
        catalog.push_image(record("a", (2020, 1, 1), 2021));

        let resolved = resolver_over(catalog)
            .resolve(TimePeriod::year(2020))
            .unwrap();
        let LayerSource::Image(image) = resolved.classified.source else {
            panic!("classified layer must come from an image");
        };
        assert_eq!(image.id, "a");
    }

    #[test]
    fn reject_policy_reports_ambiguity() {
        let mut catalog = InMemoryCatalog::new();
        catalog.push_image(record("one", (2020, 1, 1), 2021));
        catalog.push_image(record("two", (2020, 12, 31), 2021));

        let mut resolver = resolver_over(catalog);
        resolver.settings.ambiguity = AmbiguityPolicy::Reject;

        let err = resolver.resolve(TimePeriod::year(2020)).unwrap_err();
        assert!(matches!(
            err,
            ViewerError::AmbiguousImageForPeriod { ref images, .. } if images == &["one", "two"]
        ));
    }

    #[test]
    fn image_starting_next_year_is_not_matched() {
        let mut catalog = InMemoryCatalog::new();
        catalog.push_image(record("2021", (2021, 1, 1), 2022));
        let resolver = resolver_over(catalog);
        assert!(matches!(
            resolver.resolve(TimePeriod::year(2020)),
            Err(ViewerError::NoImageForPeriod { .. })
        ));
    }
}
