//! Aggregate counts behind the exploratory charts: time of day, year, hour, weekday,
//! weather and nearby road features.

use crate::types::accident_record::AccidentRecord;
use crate::types::time_of_day::TimeOfDay;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_TOP_WEATHER: usize = 10;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Number of accidents flagged with each nearby road feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadFeatureCounts {
    pub crossing: u64,
    pub junction: u64,
    pub traffic_signal: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentSummary {
    /// Every period, Morning first, including periods with no accidents.
    pub by_time_of_day: Vec<(TimeOfDay, u64)>,
    pub by_year: BTreeMap<i32, u64>,
    pub by_hour: BTreeMap<u32, u64>,
    /// Monday to Sunday, including days with no accidents.
    pub by_weekday: Vec<(Weekday, u64)>,
    /// Most frequent weather conditions, most frequent first.
    pub top_weather: Vec<(String, u64)>,
    pub road_features: RoadFeatureCounts,
    pub total_records: u64,
}

impl AccidentSummary {
    /// Tallies `records`. Records without a start time only count towards
    /// `total_records`, `top_weather` and `road_features`.
    ///
    /// Weather ties are broken by name so the result is stable.
    pub fn from_records(records: &[AccidentRecord], top_weather: usize) -> Self {
        let mut by_time_of_day: HashMap<TimeOfDay, u64> = HashMap::new();
        let mut by_weekday: HashMap<Weekday, u64> = HashMap::new();
        let mut by_year = BTreeMap::new();
        let mut by_hour = BTreeMap::new();
        let mut weather: HashMap<&str, u64> = HashMap::new();
        let mut road_features = RoadFeatureCounts::default();

        for record in records {
            if let Some(features) = record.time_features() {
                *by_time_of_day.entry(features.time_of_day).or_default() += 1;
                *by_weekday.entry(features.weekday).or_default() += 1;
                *by_year.entry(features.year).or_default() += 1;
                *by_hour.entry(features.hour).or_default() += 1;
            }
            if let Some(condition) = record.weather_condition.as_deref() {
                *weather.entry(condition).or_default() += 1;
            }
            road_features.crossing += u64::from(record.crossing);
            road_features.junction += u64::from(record.junction);
            road_features.traffic_signal += u64::from(record.traffic_signal);
        }

        let mut weather: Vec<(String, u64)> = weather
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        weather.sort_by(|a, b| (Reverse(a.1), &a.0).cmp(&(Reverse(b.1), &b.0)));
        weather.truncate(top_weather);

        Self {
            by_time_of_day: TimeOfDay::ALL
                .iter()
                .map(|period| (*period, by_time_of_day.get(period).copied().unwrap_or(0)))
                .collect(),
            by_year,
            by_hour,
            by_weekday: WEEKDAYS
                .iter()
                .map(|day| (*day, by_weekday.get(day).copied().unwrap_or(0)))
                .collect(),
            top_weather: weather,
            road_features,
            total_records: records.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(
        start: Option<(i32, u32, u32, u32)>,
        weather: Option<&str>,
        flags: (bool, bool, bool),
    ) -> AccidentRecord {
        AccidentRecord {
            id: "A".to_string(),
            start_time: start.map(|(y, m, d, h)| {
                NaiveDate::from_ymd_opt(y, m, d)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap()
            }),
            end_time: None,
            severity: Some(2),
            weather_condition: weather.map(str::to_string),
            location: None,
            crossing: flags.0,
            junction: flags.1,
            traffic_signal: flags.2,
        }
    }

    fn sample() -> Vec<AccidentRecord> {
        vec![
            // 2016-02-08 was a Monday.
            record(Some((2016, 2, 8, 7)), Some("Clear"), (true, false, false)),
            record(Some((2016, 2, 8, 8)), Some("Rain"), (false, true, true)),
            record(Some((2017, 3, 4, 18)), Some("Clear"), (false, false, true)),
            record(Some((2017, 3, 5, 23)), Some("Fog"), (false, false, false)),
            record(None, Some("Rain"), (true, false, false)),
            record(Some((2016, 2, 9, 13)), None, (false, false, false)),
        ]
    }

    #[test]
    fn test_time_counts() {
        let summary = AccidentSummary::from_records(&sample(), DEFAULT_TOP_WEATHER);
        assert_eq!(summary.total_records, 6);
        assert_eq!(
            summary.by_time_of_day,
            vec![
                (TimeOfDay::Morning, 2),
                (TimeOfDay::Afternoon, 1),
                (TimeOfDay::Evening, 1),
                (TimeOfDay::Night, 1),
            ]
        );
        assert_eq!(
            summary.by_year.into_iter().collect::<Vec<_>>(),
            vec![(2016, 3), (2017, 2)]
        );
        assert_eq!(
            summary.by_hour.into_iter().collect::<Vec<_>>(),
            vec![(7, 1), (8, 1), (13, 1), (18, 1), (23, 1)]
        );
    }

    #[test]
    fn test_weekdays_keep_empty_days() {
        let summary = AccidentSummary::from_records(&sample(), DEFAULT_TOP_WEATHER);
        assert_eq!(summary.by_weekday.len(), 7);
        assert_eq!(summary.by_weekday[0], (Weekday::Mon, 2));
        assert_eq!(summary.by_weekday[1], (Weekday::Tue, 1));
        assert_eq!(summary.by_weekday[2], (Weekday::Wed, 0));
        assert_eq!(summary.by_weekday[5], (Weekday::Sat, 1));
        assert_eq!(summary.by_weekday[6], (Weekday::Sun, 1));
    }

    #[test]
    fn test_top_weather_order_and_limit() {
        let summary = AccidentSummary::from_records(&sample(), DEFAULT_TOP_WEATHER);
        assert_eq!(
            summary.top_weather,
            vec![
                ("Clear".to_string(), 2),
                ("Rain".to_string(), 2),
                ("Fog".to_string(), 1),
            ]
        );

        let top_one = AccidentSummary::from_records(&sample(), 1);
        assert_eq!(top_one.top_weather, vec![("Clear".to_string(), 2)]);
    }

    #[test]
    fn test_road_features() {
        let summary = AccidentSummary::from_records(&sample(), DEFAULT_TOP_WEATHER);
        assert_eq!(
            summary.road_features,
            RoadFeatureCounts {
                crossing: 2,
                junction: 1,
                traffic_signal: 2,
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let summary = AccidentSummary::from_records(&[], DEFAULT_TOP_WEATHER);
        assert_eq!(summary.total_records, 0);
        assert!(summary.by_time_of_day.iter().all(|(_, c)| *c == 0));
        assert!(summary.by_weekday.iter().all(|(_, c)| *c == 0));
        assert!(summary.by_year.is_empty());
        assert!(summary.top_weather.is_empty());
    }
}
