//! Countdown readout.

use std::fmt;

/// Signed seconds rendered as `MM:SS`; negative values (overtime) get a
/// leading `+` because they count time spent beyond the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown(pub i64);

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "+" } else { "" };
        write!(f, "{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
    }
}
