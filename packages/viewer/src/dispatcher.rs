//! Clears the map and draws an ordered list of layer requests.

use landcover_viewer_models::{Viewport, VisualLayerRequest};
use landcover_viewer_platform::MapCanvas;
use landcover_viewer_platform::canvas::MapLayer;
use landcover_viewer_platform::expr::Renderable;

use crate::ViewerError;

/// Replaces whatever the map shows with `requests`.
///
/// Every request is converted up front with [`prepare`], so a request that
/// cannot be drawn leaves the map untouched. The rest is [`draw`].
///
/// An empty slice leaves only the base map. Calls return as soon as the
/// canvas has accepted the commands; evaluation is up to the backend.
///
/// # Errors
///
/// Returns [`ViewerError::Platform`] if a request cannot be converted or
/// the canvas refuses a command.
pub fn render<C: MapCanvas + ?Sized>(
    canvas: &mut C,
    requests: &[VisualLayerRequest],
    viewport: &Viewport,
) -> Result<(), ViewerError> {
    let layers = prepare(requests)?;
    draw(canvas, layers, viewport)
}

/// Converts requests into drawable layers without touching any canvas.
///
/// # Errors
///
/// Returns [`ViewerError::Platform`] for the first request whose source and
/// style do not fit together.
pub fn prepare(requests: &[VisualLayerRequest]) -> Result<Vec<MapLayer>, ViewerError> {
    requests
        .iter()
        .map(|request| {
            Ok(MapLayer {
                label: request.label.clone(),
                renderable: Renderable::try_from(request)?,
            })
        })
        .collect()
}

/// Clears the map, applies `viewport`, and adds `layers` in order (the first
/// layer ends up at the bottom).
///
/// A failure after the clear leaves the map partially drawn.
///
/// # Errors
///
/// Returns [`ViewerError::Platform`] if the canvas refuses a command.
pub fn draw<C: MapCanvas + ?Sized>(
    canvas: &mut C,
    layers: Vec<MapLayer>,
    viewport: &Viewport,
) -> Result<(), ViewerError> {
    canvas.clear()?;
    canvas.set_center(viewport.center.lon, viewport.center.lat, viewport.zoom)?;
    canvas.set_options(viewport.base_map)?;

    for layer in layers {
        log::info!("Adding layer {:?}", layer.label);
        canvas.add_layer(layer.renderable, &layer.label)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use landcover_viewer_models::{
        BaseMapStyle, BoundaryStyle, Color, FeatureFilter, ImageRef, ImageVisParams, LatLon,
        LayerKind, LayerSource, LayerStyle, TimePeriod,
    };
    use landcover_viewer_platform::canvas::LayerStack;
    use landcover_viewer_platform::catalog::InMemoryCatalog;

    use super::*;
    use crate::config::ViewerConfig;
    use crate::resolver::LayerResolver;

    fn viewport() -> Viewport {
        Viewport {
            center: LatLon {
                lat: 38.5449,
                lon: -121.7415,
            },
            zoom: 10,
            base_map: BaseMapStyle::Hybrid,
        }
    }

    fn resolved(year: u16) -> Vec<VisualLayerRequest> {
        let config = ViewerConfig::embedded().unwrap();
        let resolver = LayerResolver::new(
            Arc::new(InMemoryCatalog::embedded().unwrap()),
            config.resolver_settings().unwrap(),
        );
        resolver
            .resolve(TimePeriod::year(year))
            .unwrap()
            .into_ordered()
    }

    #[test]
    fn empty_sequence_leaves_base_map_only() {
        let mut stack = LayerStack::new();
        render(&mut stack, &resolved(2020), &viewport()).unwrap();
        render(&mut stack, &[], &viewport()).unwrap();

        assert!(stack.is_empty());
        assert_eq!(stack.base_map(), Some(BaseMapStyle::Hybrid));
        let center = stack.center().unwrap();
        assert_eq!(center.zoom, 10);
        assert!((center.lat - 38.5449).abs() < f64::EPSILON);
        assert!((center.lon - -121.7415).abs() < f64::EPSILON);
    }

    #[test]
    fn layers_are_added_in_request_order() {
        let mut stack = LayerStack::new();
        render(&mut stack, &resolved(2020), &viewport()).unwrap();
        assert_eq!(
            stack.labels(),
            [
                "Tomato Landcover (2020)",
                "California Counties",
                "California Boundary"
            ]
        );
    }

    #[test]
    fn rerender_replaces_previous_layers() {
        let mut stack = LayerStack::new();
        render(&mut stack, &resolved(2018), &viewport()).unwrap();
        render(&mut stack, &resolved(2021), &viewport()).unwrap();

        assert_eq!(stack.layers().len(), 3);
        assert_eq!(stack.labels()[0], "Tomato Landcover (2021)");
        assert!(!stack.labels().iter().any(|l| l.contains("2018")));
        assert_eq!(stack.clear_count(), 2);
    }

    #[test]
    fn unrenderable_request_leaves_map_untouched() {
        let mut stack = LayerStack::new();
        render(&mut stack, &resolved(2020), &viewport()).unwrap();

        let broken = VisualLayerRequest {
            kind: LayerKind::Classified,
            source: LayerSource::Image(ImageRef {
                collection: "USDA/NASS/CDL".to_string(),
                id: "2020".to_string(),
            }),
            mask: None,
            clip_region: None,
            style: LayerStyle::Boundary(BoundaryStyle::outline(Color::BLACK, 1)),
            label: "broken".to_string(),
        };
        let mismatched = VisualLayerRequest {
            kind: LayerKind::RegionBoundary,
            source: LayerSource::Features(FeatureFilter::attribute_eq(
                "TIGER/2018/States",
                "NAME",
                "Nevada",
            )),
            mask: None,
            clip_region: None,
            style: LayerStyle::Image(ImageVisParams::single_color(Color::RED)),
            label: "also broken".to_string(),
        };

        assert!(matches!(
            render(&mut stack, &[broken, mismatched], &viewport()),
            Err(ViewerError::Platform(_))
        ));
        assert_eq!(stack.layers().len(), 3);
        assert_eq!(stack.clear_count(), 1);
    }

    #[test]
    fn prepare_keeps_labels_in_order() {
        let layers = prepare(&resolved(2019)).unwrap();
        let labels: Vec<&str> = layers.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(
            labels,
            [
                "Tomato Landcover (2019)",
                "California Counties",
                "California Boundary"
            ]
        );
        assert!(matches!(layers[0].renderable, Renderable::Image { .. }));
    }
}
