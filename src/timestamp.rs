//! MS-DOS date/time handling.
//!
//! Both the archive header and every record header store timestamps as a
//! pair of packed 16-bit words:
//!
//! - time: `hour << 11 | minute << 5 | second / 2`
//! - date: `(year - 1980) << 9 | month << 5 | day`
//!
//! The encoding has two-second resolution and covers 1980-01-01 through
//! 2107-12-31. There is no time zone; callers decide which wall clock the
//! value represents.
//!
//! # Example
//!
//! ```rust
//! use crspatch::DosDateTime;
//!
//! let ts = DosDateTime::from_parts(2024, 3, 15, 12, 34, 56).unwrap();
//! assert_eq!(ts.date(), 0x586F);
//! assert_eq!(ts.time(), 0x645C);
//! assert_eq!(ts.to_string(), "2024-03-15 12:34:56");
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Error, Result};

const SECONDS_PER_DAY: i64 = 86_400;
const DOS_EPOCH_YEAR: i32 = 1980;
const DOS_MAX_YEAR: i32 = DOS_EPOCH_YEAR + 127;

/// A packed MS-DOS date/time pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime {
    // Date first so the derived ordering is chronological.
    date: u16,
    time: u16,
}

impl DosDateTime {
    /// Wraps raw date and time words as read from a header.
    #[inline]
    pub const fn from_raw(date: u16, time: u16) -> Self {
        Self { date, time }
    }

    /// Builds a timestamp from calendar components.
    ///
    /// Odd seconds are rounded down to the two-second resolution of the
    /// format.
    pub fn from_parts(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        if !(DOS_EPOCH_YEAR..=DOS_MAX_YEAR).contains(&year) {
            return Err(Error::InvalidTimestamp {
                reason: format!("year {year} outside {DOS_EPOCH_YEAR}-{DOS_MAX_YEAR}"),
            });
        }
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return Err(Error::InvalidTimestamp {
                reason: format!("no such date {year:04}-{month:02}-{day:02}"),
            });
        }
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::InvalidTimestamp {
                reason: format!("no such time {hour:02}:{minute:02}:{second:02}"),
            });
        }

        let date = (((year - DOS_EPOCH_YEAR) as u16) << 9) | ((month as u16) << 5) | day as u16;
        let time = ((hour as u16) << 11) | ((minute as u16) << 5) | (second / 2) as u16;
        Ok(Self { date, time })
    }

    /// Converts Unix seconds (UTC) to an MS-DOS timestamp.
    pub fn from_unix_secs(secs: i64) -> Result<Self> {
        let days = secs.div_euclid(SECONDS_PER_DAY);
        let rem = secs.rem_euclid(SECONDS_PER_DAY);
        let (year, month, day) = civil_from_days(days);

        let year = i32::try_from(year).map_err(|_| Error::InvalidTimestamp {
            reason: format!("unix time {secs} out of range"),
        })?;
        Self::from_parts(
            year,
            month,
            day,
            (rem / 3600) as u32,
            ((rem % 3600) / 60) as u32,
            (rem % 60) as u32,
        )
    }

    /// Converts a `SystemTime` shifted by `offset_secs` to an MS-DOS
    /// timestamp.
    ///
    /// The offset moves the clock before calendar conversion, which is how
    /// a UTC modification time is mapped onto the local wall clock the
    /// archive is expected to carry.
    pub fn from_system_time(time: SystemTime, offset_secs: i64) -> Result<Self> {
        let secs = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Self::from_unix_secs(secs.saturating_add(offset_secs))
    }

    /// Returns the packed date word.
    #[inline]
    pub const fn date(&self) -> u16 {
        self.date
    }

    /// Returns the packed time word.
    #[inline]
    pub const fn time(&self) -> u16 {
        self.time
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        DOS_EPOCH_YEAR + i32::from(self.date >> 9)
    }

    /// Returns the month (1-12 for valid values).
    pub fn month(&self) -> u32 {
        u32::from((self.date >> 5) & 0x0F)
    }

    /// Returns the day of the month.
    pub fn day(&self) -> u32 {
        u32::from(self.date & 0x1F)
    }

    /// Returns the hour.
    pub fn hour(&self) -> u32 {
        u32::from(self.time >> 11)
    }

    /// Returns the minute.
    pub fn minute(&self) -> u32 {
        u32::from((self.time >> 5) & 0x3F)
    }

    /// Returns the second (always even).
    pub fn second(&self) -> u32 {
        u32::from(self.time & 0x1F) * 2
    }
}

impl std::fmt::Display for DosDateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year(),
            self.month(),
            self.day(),
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Converts days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_parts_packing() {
        let ts = DosDateTime::from_parts(2024, 3, 15, 12, 34, 56).unwrap();
        assert_eq!(ts.date(), 0x586F);
        assert_eq!(ts.time(), 0x645C);
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 15));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (12, 34, 56));
    }

    #[test]
    fn test_odd_seconds_round_down() {
        let ts = DosDateTime::from_parts(1995, 1, 1, 0, 0, 59).unwrap();
        assert_eq!(ts.second(), 58);
    }

    #[test]
    fn test_range_limits() {
        assert!(DosDateTime::from_parts(1980, 1, 1, 0, 0, 0).is_ok());
        assert!(DosDateTime::from_parts(2107, 12, 31, 23, 59, 58).is_ok());
        assert!(DosDateTime::from_parts(1979, 12, 31, 23, 59, 59).is_err());
        assert!(DosDateTime::from_parts(2108, 1, 1, 0, 0, 0).is_err());
    }

    #[test]
    fn test_invalid_calendar_values() {
        assert!(DosDateTime::from_parts(2023, 2, 29, 0, 0, 0).is_err());
        assert!(DosDateTime::from_parts(2024, 2, 29, 0, 0, 0).is_ok());
        assert!(DosDateTime::from_parts(2024, 13, 1, 0, 0, 0).is_err());
        assert!(DosDateTime::from_parts(2024, 4, 31, 0, 0, 0).is_err());
        assert!(DosDateTime::from_parts(2024, 4, 30, 24, 0, 0).is_err());
    }

    #[test]
    fn test_from_unix_secs() {
        let ts = DosDateTime::from_unix_secs(1_710_506_096).unwrap();
        assert_eq!(ts.to_string(), "2024-03-15 12:34:56");

        let ts = DosDateTime::from_unix_secs(315_532_800).unwrap();
        assert_eq!(ts.to_string(), "1980-01-01 00:00:00");
        assert_eq!(ts.date(), (1 << 5) | 1);
        assert_eq!(ts.time(), 0);

        let ts = DosDateTime::from_unix_secs(951_865_200).unwrap();
        assert_eq!(ts.to_string(), "2000-02-29 23:00:00");
    }

    #[test]
    fn test_from_unix_secs_out_of_range() {
        assert!(DosDateTime::from_unix_secs(0).is_err());
        assert!(DosDateTime::from_unix_secs(4_354_819_198).is_ok());
        assert!(DosDateTime::from_unix_secs(4_354_819_200).is_err());
    }

    #[test]
    fn test_from_system_time_with_offset() {
        let time = UNIX_EPOCH + Duration::from_secs(1_710_506_096);
        let ts = DosDateTime::from_system_time(time, 4 * 3600 + 30 * 60).unwrap();
        assert_eq!(ts.to_string(), "2024-03-15 17:04:56");

        // The offset can carry across midnight.
        let ts = DosDateTime::from_system_time(time, 12 * 3600).unwrap();
        assert_eq!(ts.to_string(), "2024-03-16 00:34:56");
    }

    #[test]
    fn test_raw_roundtrip_and_ordering() {
        let a = DosDateTime::from_parts(1999, 12, 31, 23, 59, 58).unwrap();
        let b = DosDateTime::from_parts(2000, 1, 1, 0, 0, 0).unwrap();
        assert!(a < b);
        assert_eq!(DosDateTime::from_raw(a.date(), a.time()), a);
    }
}
