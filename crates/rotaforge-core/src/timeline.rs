//! Timeline discretization: seconds to ticks.

use std::time::Duration;

use crate::error::{Result, RotaforgeError};

/// Default real-time length of one tick, in seconds.
pub const DEFAULT_TICK_LENGTH: f64 = 0.6;

// Absorbs float noise such as 3.0 / 0.6 = 4.999999...
const TICK_EPSILON: f64 = 1e-9;

/// A fixed number of ticks `0 .. ticks-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    ticks: usize,
    tick_length: f64,
}

impl Timeline {
    /// Discretizes a horizon of `seconds` into ticks of `tick_length` seconds.
    ///
    /// `ticks = floor(seconds / tick_length) + 1`, so tick 0 is always
    /// included and the last tick starts no later than `seconds`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotaforge_core::Timeline;
    ///
    /// let timeline = Timeline::discretize(20.0, 0.6).unwrap();
    /// assert_eq!(timeline.ticks(), 34);
    /// ```
    pub fn discretize(seconds: f64, tick_length: f64) -> Result<Self> {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(RotaforgeError::InvalidParameter(format!(
                "seconds must be positive (got {})",
                seconds
            )));
        }
        if !tick_length.is_finite() || tick_length <= 0.0 {
            return Err(RotaforgeError::InvalidParameter(format!(
                "tick length must be positive (got {})",
                tick_length
            )));
        }
        let steps = (seconds / tick_length + TICK_EPSILON).floor();
        if steps >= usize::MAX as f64 {
            return Err(RotaforgeError::InvalidParameter(format!(
                "{} seconds is too long for {}s ticks",
                seconds, tick_length
            )));
        }
        Ok(Self {
            ticks: steps as usize + 1,
            tick_length,
        })
    }

    /// Creates a timeline with an explicit tick count.
    pub fn from_ticks(ticks: usize) -> Result<Self> {
        if ticks == 0 {
            return Err(RotaforgeError::InvalidParameter(
                "a timeline needs at least one tick".to_string(),
            ));
        }
        Ok(Self {
            ticks,
            tick_length: DEFAULT_TICK_LENGTH,
        })
    }

    #[inline]
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    #[inline]
    pub fn tick_length(&self) -> f64 {
        self.tick_length
    }

    /// Real time at which a tick starts.
    pub fn start_of(&self, tick: usize) -> Duration {
        Duration::from_secs_f64(tick as f64 * self.tick_length)
    }

    pub fn iter(&self) -> std::ops::Range<usize> {
        0..self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discretize_includes_tick_zero() {
        assert_eq!(Timeline::discretize(0.5, 0.6).unwrap().ticks(), 1);
        assert_eq!(Timeline::discretize(0.6, 0.6).unwrap().ticks(), 2);
        assert_eq!(Timeline::discretize(10.0, 0.6).unwrap().ticks(), 17);
    }

    #[test]
    fn test_discretize_absorbs_float_noise() {
        assert_eq!(Timeline::discretize(3.0, 0.6).unwrap().ticks(), 6);
        assert_eq!(Timeline::discretize(6.0, 0.6).unwrap().ticks(), 11);
    }

    #[test]
    fn test_last_tick_starts_within_horizon() {
        for seconds in [1.0, 7.5, 20.0, 61.0] {
            let timeline = Timeline::discretize(seconds, 0.6).unwrap();
            let last = timeline.start_of(timeline.ticks() - 1).as_secs_f64();
            assert!(last <= seconds + 1e-6, "{seconds}: last tick at {last}");
        }
    }

    #[test]
    fn test_rejects_non_positive_seconds() {
        assert!(Timeline::discretize(0.0, 0.6).is_err());
        assert!(Timeline::discretize(-3.0, 0.6).is_err());
        assert!(Timeline::discretize(f64::NAN, 0.6).is_err());
    }

    #[test]
    fn test_rejects_non_positive_tick_length() {
        assert!(Timeline::discretize(10.0, 0.0).is_err());
    }

    #[test]
    fn test_from_ticks() {
        assert_eq!(Timeline::from_ticks(5).unwrap().ticks(), 5);
        assert!(Timeline::from_ticks(0).is_err());
    }
}
