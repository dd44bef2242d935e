//! US state FIPS codes.
//!
//! Maps two-digit FIPS codes to the state names used by the Census
//! `TIGER/Line` `NAME` attribute, for the 50 states + DC.

/// `(fips, name)` for the 50 states + DC, ordered by FIPS.
const STATES: &[(&str, &str)] = &[
    ("01", "Alabama"),
    ("02", "Alaska"),
    ("04", "Arizona"),
    ("05", "Arkansas"),
    ("06", "California"),
    ("08", "Colorado"),
    ("09", "Connecticut"),
    ("10", "Delaware"),
    ("11", "District of Columbia"),
    ("12", "Florida"),
    ("13", "Georgia"),
    ("15", "Hawaii"),
    ("16", "Idaho"),
    ("17", "Illinois"),
    ("18", "Indiana"),
    ("19", "Iowa"),
    ("20", "Kansas"),
    ("21", "Kentucky"),
    ("22", "Louisiana"),
    ("23", "Maine"),
    ("24", "Maryland"),
    ("25", "Massachusetts"),
    ("26", "Michigan"),
    ("27", "Minnesota"),
    ("28", "Mississippi"),
    ("29", "Missouri"),
    ("30", "Montana"),
    ("31", "Nebraska"),
    ("32", "Nevada"),
    ("33", "New Hampshire"),
    ("34", "New Jersey"),
    ("35", "New Mexico"),
    ("36", "New York"),
    ("37", "North Carolina"),
    ("38", "North Dakota"),
    ("39", "Ohio"),
    ("40", "Oklahoma"),
    ("41", "Oregon"),
    ("42", "Pennsylvania"),
    ("44", "Rhode Island"),
    ("45", "South Carolina"),
    ("46", "South Dakota"),
    ("47", "Tennessee"),
    ("48", "Texas"),
    ("49", "Utah"),
    ("50", "Vermont"),
    ("51", "Virginia"),
    ("53", "Washington"),
    ("54", "West Virginia"),
    ("55", "Wisconsin"),
    ("56", "Wyoming"),
];

/// Returns the state name for a two-digit FIPS code, or `None` if the code
/// is not a state or DC.
#[must_use]
pub fn state_name(fips: &str) -> Option<&'static str> {
    STATES
        .binary_search_by(|(code, _)| (*code).cmp(fips))
        .ok()
        .map(|i| STATES[i].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_for_binary_search() {
        assert!(STATES.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(STATES.len(), 51);
    }

    #[test]
    fn california_lookups() {
        assert_eq!(state_name("06"), Some("California"));
        assert_eq!(state_name("11"), Some("District of Columbia"));
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(state_name("03"), None);
        assert_eq!(state_name("99"), None);
        assert_eq!(state_name("6"), None);
    }
}
