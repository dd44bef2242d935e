//! The target class of a classified raster.

use serde::{Deserialize, Serialize};

use crate::style::Color;

/// Per-pixel predicate that decides whether a raw classification value is
/// part of the target class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum MaskPredicate {
    /// `band == value`.
    Equals {
        /// Band holding the classification codes.
        band: String,
        /// Code that is kept; every other value is masked out.
        value: u16,
    },
}

impl MaskPredicate {
    /// The band the predicate reads.
    #[must_use]
    pub fn band(&self) -> &str {
        match self {
            Self::Equals { band, .. } => band,
        }
    }

    /// Returns `true` if a pixel with this raw value is kept.
    #[must_use]
    pub const fn matches(&self, value: u16) -> bool {
        match self {
            Self::Equals { value: target, .. } => value == *target,
        }
    }
}

impl std::fmt::Display for MaskPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals { band, value } => write!(f, "{band} == {value}"),
        }
    }
}

/// The fixed class shown by the viewer (e.g. code 54, tomatoes, in the
/// `cropland` band of the Cropland Data Layer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSelector {
    /// Band holding the classification codes.
    pub band: String,
    /// Raw code of the target class.
    pub target_code: u16,
    /// Human-readable class name (legend row label).
    pub name: String,
    /// Swatch and palette color.
    pub color: Color,
}

impl ClassSelector {
    /// Builds the binary mask predicate for this class.
    #[must_use]
    pub fn mask_predicate(&self) -> MaskPredicate {
        MaskPredicate::Equals {
            band: self.band.clone(),
            value: self.target_code,
        }
    }
}
