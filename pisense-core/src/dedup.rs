//! Duplicate reading suppression
//!
//! Some sensors answer faster than they re-sample, so a poll can return the
//! previous frame again. A repeated frame means "no new sample", not "the
//! air did not change", and is dropped. Comparison is exact: readings are
//! either quantized integers or floats that are stable while the physical
//! sample is unchanged.

use crate::reading::Reading;

/// True iff `current` is the same reading as `previous`
pub fn suppress(previous: Option<&Reading>, current: &Reading) -> bool {
    previous == Some(current)
}

/// Remembers the last admitted reading of one stream
#[derive(Debug, Clone, Default)]
pub struct DedupFilter {
    previous: Option<Reading>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the reading is new and should be emitted
    ///
    /// Admitted readings become the new comparison point; suppressed ones
    /// leave the state untouched.
    pub fn admit(&mut self, reading: &Reading) -> bool {
        if suppress(self.previous.as_ref(), reading) {
            return false;
        }
        self.previous = Some(*reading);
        true
    }

    /// Last admitted reading, if any
    pub fn previous(&self) -> Option<&Reading> {
        self.previous.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::{ClimateReading, ParticulateReading};
    use proptest::prelude::*;

    fn pm(pm25_env: u16) -> Reading {
        ParticulateReading { pm25_env, ..Default::default() }.into()
    }

    #[test]
    fn first_reading_always_admitted() {
        let mut filter = DedupFilter::new();
        assert!(filter.admit(&pm(0)));
    }

    #[test]
    fn identical_pair_emits_once() {
        let mut filter = DedupFilter::new();
        assert!(filter.admit(&pm(12)));
        assert!(!filter.admit(&pm(12)));
        assert_eq!(filter.previous(), Some(&pm(12)));
    }

    #[test]
    fn change_then_return_is_admitted() {
        let mut filter = DedupFilter::new();
        assert!(filter.admit(&pm(12)));
        assert!(filter.admit(&pm(13)));
        assert!(filter.admit(&pm(12)));
    }

    #[test]
    fn no_tolerance_on_floats() {
        let a: Reading = ClimateReading { temperature: 21.0, humidity: 40.0, pressure: 1000.0 }.into();
        let b: Reading = ClimateReading { temperature: 21.01, humidity: 40.0, pressure: 1000.0 }.into();
        assert!(!suppress(Some(&a), &b));
        assert!(suppress(Some(&a), &a));
        assert!(!suppress(None, &a));
    }

    proptest! {
        #[test]
        fn emissions_equal_value_changes(values in proptest::collection::vec(0u16..4, 0..64)) {
            let mut filter = DedupFilter::new();
            let emitted = values.iter().filter(|v| filter.admit(&pm(**v))).count();

            let expected = values
                .iter()
                .enumerate()
                .filter(|(i, v)| *i == 0 || values[i - 1] != **v)
                .count();

            prop_assert_eq!(emitted, expected);
        }
    }
}
