//! The packed 8-byte date-time representation.

use std::fmt;

/// A decoded date-time value.
///
/// On the wire: year-minus-1900, a time-zone/month nibble pair, then day,
/// hour, minute, second as single bytes and milliseconds as a 2-byte
/// big-endian integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DateTime {
    /// Full year (the wire carries year - 1900).
    pub year: u16,
    /// Time zone nibble: 0 local standard, 1 local daylight savings, 2 GMT.
    pub tz: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

impl DateTime {
    /// Time zone abbreviation, or the empty string for unknown nibbles.
    #[must_use]
    pub const fn tz_abbreviation(&self) -> &'static str {
        match self.tz {
            0 => "STD",
            1 => "DST",
            2 => "GMT",
            _ => "",
        }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )?;
        let abbrev = self.tz_abbreviation();
        if !abbrev.is_empty() {
            write!(f, " {abbrev}")?;
        }
        Ok(())
    }
}
