//! In-process map canvas that records what would be drawn.

use landcover_viewer_models::BaseMapStyle;

use crate::expr::Renderable;
use crate::{MapCanvas, PlatformError};

/// One drawn layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    /// User-visible layer name.
    pub label: String,
    /// What is drawn.
    pub renderable: Renderable,
}

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapCenter {
    /// Longitude.
    pub lon: f64,
    /// Latitude.
    pub lat: f64,
    /// Zoom level.
    pub zoom: u8,
}

/// A canvas that keeps the viewport and the layer stack in memory,
/// bottom layer first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerStack {
    center: Option<MapCenter>,
    base_map: Option<BaseMapStyle>,
    layers: Vec<MapLayer>,
    clears: usize,
}

impl LayerStack {
    /// An empty map with no viewport set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers, bottom first.
    #[must_use]
    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    /// Layer names, bottom first.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.label.as_str()).collect()
    }

    /// Returns `true` if only the base map is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Current center, if one was set.
    #[must_use]
    pub const fn center(&self) -> Option<MapCenter> {
        self.center
    }

    /// Current base map style, if one was set.
    #[must_use]
    pub const fn base_map(&self) -> Option<BaseMapStyle> {
        self.base_map
    }

    /// How many times the map has been cleared.
    #[must_use]
    pub const fn clear_count(&self) -> usize {
        self.clears
    }
}

impl MapCanvas for LayerStack {
    fn clear(&mut self) -> Result<(), PlatformError> {
        self.layers.clear();
        self.clears += 1;
        Ok(())
    }

    fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) -> Result<(), PlatformError> {
        self.center = Some(MapCenter { lon, lat, zoom });
        Ok(())
    }

    fn set_options(&mut self, base_map: BaseMapStyle) -> Result<(), PlatformError> {
        self.base_map = Some(base_map);
        Ok(())
    }

    fn add_layer(&mut self, layer: Renderable, label: &str) -> Result<(), PlatformError> {
        log::debug!("Adding layer {label:?}: {layer}");
        self.layers.push(MapLayer {
            label: label.to_string(),
            renderable: layer,
        });
        Ok(())
    }
}

impl std::fmt::Display for LayerStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.base_map {
            Some(base) => writeln!(f, "Base map: {base}")?,
            None => writeln!(f, "Base map: (default)")?,
        }
        if let Some(c) = self.center {
            writeln!(f, "Center: ({:.4}, {:.4}) zoom {}", c.lat, c.lon, c.zoom)?;
        }
        if self.layers.is_empty() {
            writeln!(f, "Layers: (none)")?;
        } else {
            writeln!(f, "Layers (bottom to top):")?;
            for (i, layer) in self.layers.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, layer.label)?;
                writeln!(f, "     {}", layer.renderable)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use landcover_viewer_models::{BoundaryStyle, Color, FeatureFilter};

    use super::*;

    fn outline(label: &str) -> Renderable {
        Renderable::Features {
            filter: FeatureFilter::attribute_eq("c", "NAME", label),
            style: BoundaryStyle::outline(Color::BLACK, 2),
        }
    }

    #[test]
    fn layers_stack_in_insertion_order() {
        let mut stack = LayerStack::new();
        stack.add_layer(outline("a"), "a").unwrap();
        stack.add_layer(outline("b"), "b").unwrap();
        assert_eq!(stack.labels(), ["a", "b"]);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut stack = LayerStack::new();
        stack.clear().unwrap();
        assert!(stack.is_empty());
        stack.add_layer(outline("a"), "a").unwrap();
        stack.clear().unwrap();
        stack.clear().unwrap();
        assert!(stack.is_empty());
        assert_eq!(stack.clear_count(), 3);
    }

    #[test]
    fn clear_keeps_viewport() {
        let mut stack = LayerStack::new();
        stack.set_center(-121.7415, 38.5449, 10).unwrap();
        stack.set_options(BaseMapStyle::Hybrid).unwrap();
        stack.clear().unwrap();
        assert_eq!(stack.base_map(), Some(BaseMapStyle::Hybrid));
        assert_eq!(stack.center().map(|c| c.zoom), Some(10));
    }
}
