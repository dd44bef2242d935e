//! Region selection: the enclosing boundary a layer is clipped to and the
//! sub-region boundaries drawn over it.

use serde::{Deserialize, Serialize};

use crate::fips;

/// Selects features of a hosted feature collection by one attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureFilter {
    /// Feature collection identifier (e.g. `"TIGER/2018/States"`).
    pub collection: String,
    /// Attribute name (e.g. `"NAME"`).
    pub property: String,
    /// Required attribute value (e.g. `"California"`).
    pub value: String,
}

impl FeatureFilter {
    /// Creates an attribute-equality filter.
    #[must_use]
    pub fn attribute_eq(
        collection: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            property: property.into(),
            value: value.into(),
        }
    }
}

impl std::fmt::Display for FeatureFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{} == {:?}]",
            self.collection, self.property, self.value
        )
    }
}

/// The fixed region a viewer is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSpec {
    /// Display name of the enclosing region (e.g. `"California"`).
    pub name: String,
    /// Selects the enclosing region polygon.
    pub enclosing: FeatureFilter,
    /// Selects the sub-region polygons overlaid for context.
    pub sub_regions: FeatureFilter,
    /// Plural noun for the sub-regions (e.g. `"Counties"`).
    pub sub_region_kind: String,
}

impl RegionSpec {
    /// Builds the region for a US state from its FIPS code using `TIGER`
    /// state and county collections: the state is matched by `NAME`, the
    /// counties by `STATEFP`.
    ///
    /// Returns `None` if `state_fips` is not a state or DC.
    #[must_use]
    pub fn us_state(
        state_fips: &str,
        states_collection: &str,
        counties_collection: &str,
    ) -> Option<Self> {
        let name = fips::state_name(state_fips)?;
        Some(Self {
            name: name.to_string(),
            enclosing: FeatureFilter::attribute_eq(states_collection, "NAME", name),
            sub_regions: FeatureFilter::attribute_eq(counties_collection, "STATEFP", state_fips),
            sub_region_kind: "Counties".to_string(),
        })
    }

    /// Layer name for the enclosing boundary (e.g. `"California Boundary"`).
    #[must_use]
    pub fn boundary_label(&self) -> String {
        format!("{} Boundary", self.name)
    }

    /// Layer name for the sub-region boundaries (e.g. `"California Counties"`).
    #[must_use]
    pub fn sub_region_label(&self) -> String {
        format!("{} {}", self.name, self.sub_region_kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn california_from_fips() {
        let region = RegionSpec::us_state("06", "TIGER/2018/States", "TIGER/2018/Counties")
            .expect("06 is California");
        assert_eq!(
            region.enclosing,
            FeatureFilter::attribute_eq("TIGER/2018/States", "NAME", "California")
        );
        assert_eq!(
            region.sub_regions,
            FeatureFilter::attribute_eq("TIGER/2018/Counties", "STATEFP", "06")
        );
        assert_eq!(region.boundary_label(), "California Boundary");
        assert_eq!(region.sub_region_label(), "California Counties");
    }

    #[test]
    fn unknown_fips_has_no_region() {
        assert!(RegionSpec::us_state("99", "S", "C").is_none());
    }

    #[test]
    fn filter_display() {
        let filter = FeatureFilter::attribute_eq("TIGER/2018/Counties", "STATEFP", "06");
        assert_eq!(filter.to_string(), "TIGER/2018/Counties[STATEFP == \"06\"]");
    }
}
