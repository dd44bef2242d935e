//! The currently selected time period.

use landcover_viewer_models::{SupportedPeriods, TimePeriod};

use crate::ViewerError;

/// Holds the active [`TimePeriod`]. Starts at the supported set's default
/// and only ever holds a supported period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterStore {
    supported: SupportedPeriods,
    current: TimePeriod,
}

impl ParameterStore {
    /// Creates a store holding the default period.
    #[must_use]
    pub fn new(supported: SupportedPeriods) -> Self {
        let current = supported.default_period();
        Self { supported, current }
    }

    /// The active period.
    #[must_use]
    pub const fn get(&self) -> TimePeriod {
        self.current
    }

    /// Replaces the active period.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidPeriod`] if `period` is not supported;
    /// the active period is left unchanged.
    pub fn set(&mut self, period: TimePeriod) -> Result<(), ViewerError> {
        self.current = self.supported.validate(period)?;
        Ok(())
    }

    /// Parses a selection-control value (e.g. `"2020"`) and makes it the
    /// active period.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidPeriod`] if the value is not a year or
    /// not supported; the active period is left unchanged.
    pub fn set_from_str(&mut self, value: &str) -> Result<TimePeriod, ViewerError> {
        let period: TimePeriod = value.parse()?;
        self.set(period)?;
        Ok(period)
    }

    /// Goes back to the default period.
    pub fn reset(&mut self) {
        self.current = self.supported.default_period();
    }

    /// The selectable periods.
    #[must_use]
    pub const fn supported(&self) -> &SupportedPeriods {
        &self.supported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ParameterStore {
        ParameterStore::new(SupportedPeriods::year_range(2015, 2023).unwrap())
    }

    #[test]
    fn starts_at_default() {
        assert_eq!(store().get(), TimePeriod::year(2023));
    }

    #[test]
    fn set_accepts_supported_periods() {
        let mut store = store();
        store.set(TimePeriod::year(2015)).unwrap();
        assert_eq!(store.get(), TimePeriod::year(2015));
        assert_eq!(store.set_from_str("2020").unwrap(), TimePeriod::year(2020));
        assert_eq!(store.get(), TimePeriod::year(2020));
    }

    #[test]
    fn rejected_period_leaves_state_unchanged() {
        let mut store = store();
        store.set(TimePeriod::year(2018)).unwrap();

        let err = store.set(TimePeriod::year(2030)).unwrap_err();
        assert!(matches!(err, ViewerError::InvalidPeriod { ref input } if input == "2030"));
        assert_eq!(store.get(), TimePeriod::year(2018));

        assert!(matches!(
            store.set_from_str("twenty"),
            Err(ViewerError::InvalidPeriod { .. })
        ));
        assert!(matches!(
            store.set_from_str("2014"),
            Err(ViewerError::InvalidPeriod { .. })
        ));
        assert_eq!(store.get(), TimePeriod::year(2018));
    }

    #[test]
    fn reset_restores_default() {
        let mut store = store();
        store.set(TimePeriod::year(2016)).unwrap();
        store.reset();
        assert_eq!(store.get(), TimePeriod::year(2023));
    }
}
