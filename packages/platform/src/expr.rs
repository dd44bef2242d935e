//! Lazy image expressions and drawable layers.
//!
//! An [`ImageExpr`] records a chain of platform operations (`select`, `eq`,
//! `updateMask`, `clip`) without evaluating anything. The platform decides
//! when and where the pixels are computed.

use landcover_viewer_models::{
    BoundaryStyle, FeatureFilter, ImageRef, ImageVisParams, LayerSource, LayerStyle, MaskPredicate,
    VisualLayerRequest,
};

use crate::PlatformError;

/// A lazily evaluated image pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageExpr {
    /// A catalog image, all bands.
    Load(ImageRef),
    /// Keeps a single band.
    Select {
        /// Upstream image.
        input: Box<Self>,
        /// Band to keep.
        band: String,
    },
    /// `1` where the pixel equals `value`, `0` elsewhere.
    Equals {
        /// Upstream image.
        input: Box<Self>,
        /// Constant compared against.
        value: u16,
    },
    /// Hides pixels where `mask` is zero or itself masked.
    UpdateMask {
        /// Upstream image.
        input: Box<Self>,
        /// Mask image.
        mask: Box<Self>,
    },
    /// Hides pixels outside the polygons selected by `region`.
    Clip {
        /// Upstream image.
        input: Box<Self>,
        /// Clip polygons.
        region: FeatureFilter,
    },
}

impl ImageExpr {
    /// Starts a pipeline from a catalog image.
    #[must_use]
    pub const fn load(image: ImageRef) -> Self {
        Self::Load(image)
    }

    /// Keeps only `band`.
    #[must_use]
    pub fn select(self, band: impl Into<String>) -> Self {
        Self::Select {
            input: Box::new(self),
            band: band.into(),
        }
    }

    /// Compares every pixel against a constant.
    #[must_use]
    pub fn equals(self, value: u16) -> Self {
        Self::Equals {
            input: Box::new(self),
            value,
        }
    }

    /// Masks this image with `mask`.
    #[must_use]
    pub fn update_mask(self, mask: Self) -> Self {
        Self::UpdateMask {
            input: Box::new(self),
            mask: Box::new(mask),
        }
    }

    /// Clips this image to the polygons selected by `region`.
    #[must_use]
    pub fn clip(self, region: FeatureFilter) -> Self {
        Self::Clip {
            input: Box::new(self),
            region,
        }
    }

    /// The catalog image at the root of the pipeline.
    #[must_use]
    pub fn source(&self) -> &ImageRef {
        match self {
            Self::Load(image) => image,
            Self::Select { input, .. }
            | Self::Equals { input, .. }
            | Self::UpdateMask { input, .. }
            | Self::Clip { input, .. } => input.source(),
        }
    }
}

impl std::fmt::Display for ImageExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Load(image) => write!(f, "Image({:?})", image.to_string()),
            Self::Select { input, band } => write!(f, "{input}.select({band:?})"),
            Self::Equals { input, value } => write!(f, "{input}.eq({value})"),
            Self::UpdateMask { input, mask } => write!(f, "{input}.updateMask({mask})"),
            Self::Clip { input, region } => write!(f, "{input}.clip({region})"),
        }
    }
}

/// Something the map can draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// A raster pipeline with a stretch/palette.
    Image {
        /// Pipeline to evaluate.
        expr: ImageExpr,
        /// Visualization parameters.
        vis: ImageVisParams,
    },
    /// Styled polygon outlines.
    Features {
        /// Features to draw.
        filter: FeatureFilter,
        /// Stroke/fill styling.
        style: BoundaryStyle,
    },
}

impl std::fmt::Display for Renderable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Image { expr, vis } => {
                let palette: Vec<String> = vis.palette.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "{expr} {{min: {}, max: {}, palette: [{}]}}",
                    vis.min,
                    vis.max,
                    palette.join(", ")
                )
            }
            Self::Features { filter, style } => write!(
                f,
                "{filter}.style({{color: {}, fillColor: {}, width: {}}})",
                style.color, style.fill_color, style.width
            ),
        }
    }
}

/// Builds the masked class pipeline:
/// `img.select(band).eq(code)` used as both the value and its own mask.
fn masked(image: ImageRef, mask: &MaskPredicate) -> ImageExpr {
    let class = match mask {
        MaskPredicate::Equals { band, value } => ImageExpr::load(image).select(band).equals(*value),
    };
    class.clone().update_mask(class)
}

impl TryFrom<&VisualLayerRequest> for Renderable {
    type Error = PlatformError;

    fn try_from(request: &VisualLayerRequest) -> Result<Self, Self::Error> {
        let unrenderable = |message: &str| PlatformError::Unrenderable {
            label: request.label.clone(),
            message: message.to_string(),
        };

        match (&request.source, &request.style) {
            (LayerSource::Image(image), LayerStyle::Image(vis)) => {
                let mut expr = match &request.mask {
                    Some(mask) => masked(image.clone(), mask),
                    None => ImageExpr::load(image.clone()),
                };
                if let Some(region) = &request.clip_region {
                    expr = expr.clip(region.clone());
                }
                Ok(Self::Image {
                    expr,
                    vis: vis.clone(),
                })
            }
            (LayerSource::Features(filter), LayerStyle::Boundary(style)) => {
                if request.mask.is_some() || request.clip_region.is_some() {
                    return Err(unrenderable("feature layers cannot be masked or clipped"));
                }
                Ok(Self::Features {
                    filter: filter.clone(),
                    style: *style,
                })
            }
            (LayerSource::Image(_), LayerStyle::Boundary(_)) => {
                Err(unrenderable("image layers need image visualization parameters"))
            }
            (LayerSource::Features(_), LayerStyle::Image(_)) => {
                Err(unrenderable("feature layers need a boundary style"))
            }
        }
    }
}
