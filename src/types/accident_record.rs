//! Defines the data structures for a single accident row and the time features
//! derived from it.

use crate::types::lat_lon::LatLon;
use crate::types::time_of_day::TimeOfDay;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// One accident, restricted to the columns the analysis uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentRecord {
    /// Source identifier (e.g. "A-1").
    pub id: String,
    /// When the accident started, if the source row has a value.
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    /// Impact on traffic, 1 (least) to 4 (most).
    pub severity: Option<i64>,
    /// Free-text weather description such as "Light Rain" or "Overcast".
    pub weather_condition: Option<String>,
    /// Start location. `None` if either coordinate is missing.
    pub location: Option<LatLon>,
    /// A pedestrian crossing is nearby.
    pub crossing: bool,
    /// A junction is nearby.
    pub junction: bool,
    /// A traffic signal is nearby.
    pub traffic_signal: bool,
}

/// Calendar features derived from an accident's start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFeatures {
    pub year: i32,
    /// Hour of day, 0-23.
    pub hour: u32,
    pub weekday: Weekday,
    pub time_of_day: TimeOfDay,
}

impl TimeFeatures {
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        let hour = datetime.hour();
        Self {
            year: datetime.year(),
            hour,
            weekday: datetime.weekday(),
            time_of_day: TimeOfDay::from_hour(hour),
        }
    }
}

impl AccidentRecord {
    /// Time features of the start time, `None` when the start time is missing.
    pub fn time_features(&self) -> Option<TimeFeatures> {
        self.start_time.map(TimeFeatures::from_datetime)
    }
}

/// Full English name of a weekday, as used in reports.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record_at(start_time: Option<NaiveDateTime>) -> AccidentRecord {
        AccidentRecord {
            id: "A-1".to_string(),
            start_time,
            end_time: None,
            severity: Some(2),
            weather_condition: None,
            location: None,
            crossing: false,
            junction: false,
            traffic_signal: false,
        }
    }

    #[test]
    fn test_time_features() {
        // 2016-02-08 was a Monday.
        let start = NaiveDate::from_ymd_opt(2016, 2, 8)
            .unwrap()
            .and_hms_opt(5, 46, 0)
            .unwrap();
        let features = record_at(Some(start)).time_features().unwrap();
        assert_eq!(features.year, 2016);
        assert_eq!(features.hour, 5);
        assert_eq!(features.weekday, Weekday::Mon);
        assert_eq!(features.time_of_day, TimeOfDay::Morning);
    }

    #[test]
    fn test_time_features_missing_start() {
        assert_eq!(record_at(None).time_features(), None);
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_name(Weekday::Wed), "Wednesday");
    }
}
