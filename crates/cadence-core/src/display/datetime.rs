//! DateTime display utilities.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// A wrapper around `Timestamp` that formats it in the system timezone.
///
/// # Format
///
/// `YYYY-MM-DD HH:MM:SS TZ`, 24-hour clock, zero-padded.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

/// Wall-clock time of day (`HH:MM`) in the system timezone, as shown in the
/// header of the meeting console.
pub struct TimeOfDay<'a>(pub &'a Timestamp);

impl fmt::Display for TimeOfDay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_zoned(TimeZone::system()).strftime("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_of_day_shape() {
        let ts = Timestamp::from_second(1_700_000_000).unwrap();
        let text = TimeOfDay(&ts).to_string();
        assert_eq!(text.len(), 5);
        assert_eq!(&text[2..3], ":");
    }
}
