//! Time handling for NIMROD products.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validity time as stored in header elements 1-5.
///
/// Kept as raw integers so that a header with an out-of-range date can still
/// be reported verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    pub year: i16,
    pub month: i16,
    pub day: i16,
    pub hour: i16,
    pub minute: i16,
}

impl ValidTime {
    pub fn new(year: i16, month: i16, day: i16, hour: i16, minute: i16) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
        }
    }

    /// Interpret as a UTC timestamp, if the fields form a real date.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        let date = NaiveDate::from_ymd_opt(
            self.year.into(),
            u32::try_from(self.month).ok()?,
            u32::try_from(self.day).ok()?,
        )?;
        let naive = date.and_hms_opt(
            u32::try_from(self.hour).ok()?,
            u32::try_from(self.minute).ok()?,
            0,
        )?;
        Some(Utc.from_utc_datetime(&naive))
    }
}

impl fmt::Display for ValidTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02} on {:02}/{:02}/{:04}",
            self.hour, self.minute, self.day, self.month, self.year
        )
    }
}

/// Extract the acquisition timestamp encoded in a composite filename.
///
/// The timestamp is the second-to-last `_`-separated token, formatted
/// `YYYYMMDDHHMM`, e.g. `metoffice-c-band-rain-radar_uk_202306201200_1km-composite.dat`.
pub fn timestamp_from_filename(name: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let token = name
        .rsplit('_')
        .nth(1)
        .ok_or_else(|| TimeParseError::MissingTimestamp(name.to_string()))?;

    let naive = NaiveDateTime::parse_from_str(token, "%Y%m%d%H%M")
        .map_err(|_| TimeParseError::InvalidFormat(token.to_string()))?;

    Ok(Utc.from_utc_datetime(&naive))
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("No timestamp token in filename: {0}")]
    MissingTimestamp(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_valid_time_display() {
        let vt = ValidTime::new(2023, 6, 20, 9, 5);
        assert_eq!(vt.to_string(), "09:05 on 20/06/2023");
    }

    #[test]
    fn test_valid_time_to_datetime() {
        let dt = ValidTime::new(2023, 6, 20, 12, 15).to_datetime().unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2023, 6, 20, 12, 15, 0).unwrap());

        assert!(ValidTime::new(2023, 13, 1, 0, 0).to_datetime().is_none());
        assert!(ValidTime::new(2023, 2, 30, 0, 0).to_datetime().is_none());
        assert!(ValidTime::new(2023, -1, 1, 0, 0).to_datetime().is_none());
    }

    #[test]
    fn test_timestamp_from_filename() {
        let dt = timestamp_from_filename(
            "metoffice-c-band-rain-radar_uk_202306201205_1km-composite.dat",
        )
        .unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 20);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 5);
    }

    #[test]
    fn test_timestamp_from_filename_errors() {
        assert!(matches!(
            timestamp_from_filename("composite.dat"),
            Err(TimeParseError::MissingTimestamp(_))
        ));
        assert!(matches!(
            timestamp_from_filename("radar_uk_latest_1km.dat"),
            Err(TimeParseError::InvalidFormat(t)) if t == "latest"
        ));
    }
}
