//! Wheel sizing parameters.

use serde::{Deserialize, Serialize};
use transport_common::bit::is_power_of_two;
use transport_common::consts::INITIAL_TICK_DEPTH;

use crate::error::{WheelError, WheelResult};

/// Sizing parameters for a [`crate::TimerWheel`]: tick resolution and
/// slot count. Constructing and validating one is the host process's
/// job; this crate never reads it from a file or environment variable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelConfig {
    /// Duration of one tick, in nanoseconds. Must be positive.
    pub tick_duration_nanos: i64,
    /// Number of buckets in the wheel. Must be a power of two, at least 2.
    pub ticks_per_wheel: u64,
    /// Initial depth of each bucket's slot array before it grows.
    #[serde(default = "default_initial_tick_depth")]
    pub initial_tick_depth: usize,
}

fn default_initial_tick_depth() -> usize {
    INITIAL_TICK_DEPTH
}

impl WheelConfig {
    /// Build a config with the conventional initial tick depth.
    #[must_use]
    pub fn new(tick_duration_nanos: i64, ticks_per_wheel: u64) -> Self {
        Self {
            tick_duration_nanos,
            ticks_per_wheel,
            initial_tick_depth: INITIAL_TICK_DEPTH,
        }
    }

    /// Validate the config.
    ///
    /// # Errors
    ///
    /// Returns [`WheelError::TicksPerWheelNotPowerOfTwo`] if
    /// `ticks_per_wheel` is not a power of two or is less than 2, or
    /// [`WheelError::DurationOverflow`] if `tick_duration_nanos *
    /// ticks_per_wheel` would overflow `i64`.
    pub fn validate(&self) -> WheelResult<()> {
        if self.ticks_per_wheel < 2 || !is_power_of_two(self.ticks_per_wheel) {
            return Err(WheelError::TicksPerWheelNotPowerOfTwo {
                ticks_per_wheel: self.ticks_per_wheel,
            });
        }
        let ticks = i64::try_from(self.ticks_per_wheel).map_err(|_| WheelError::DurationOverflow {
            tick_duration_nanos: self.tick_duration_nanos,
            ticks_per_wheel: self.ticks_per_wheel,
        })?;
        self.tick_duration_nanos
            .checked_mul(ticks)
            .ok_or(WheelError::DurationOverflow {
                tick_duration_nanos: self.tick_duration_nanos,
                ticks_per_wheel: self.ticks_per_wheel,
            })?;
        Ok(())
    }

    /// Bitmask for wheel-index arithmetic: `ticks_per_wheel - 1`.
    #[inline]
    #[must_use]
    pub fn mask(&self) -> u64 {
        self.ticks_per_wheel - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_power_of_two_ticks() {
        let c = WheelConfig::new(1_000_000, 3);
        assert!(matches!(
            c.validate(),
            Err(WheelError::TicksPerWheelNotPowerOfTwo { .. })
        ));
    }

    #[test]
    fn rejects_overflowing_duration() {
        let c = WheelConfig::new(i64::MAX, 4);
        assert!(matches!(c.validate(), Err(WheelError::DurationOverflow { .. })));
    }

    #[test]
    fn accepts_reasonable_config() {
        let c = WheelConfig::new(10_000_000, 4);
        assert!(c.validate().is_ok());
        assert_eq!(c.mask(), 3);
    }

    #[test]
    fn serde_roundtrip() {
        let c = WheelConfig::new(1_000_000, 512);
        let json = serde_json::to_string(&c).unwrap();
        let back: WheelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.tick_duration_nanos, c.tick_duration_nanos);
        assert_eq!(back.ticks_per_wheel, c.ticks_per_wheel);
    }
}
