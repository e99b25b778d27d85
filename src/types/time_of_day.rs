//! Defines the `TimeOfDay` enum, bucketing the hour an accident started into one of
//! four periods of the day.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Period of the day an accident started in.
///
/// | Period      | Hours (start inclusive, end exclusive) |
/// |-------------|----------------------------------------|
/// | `Morning`   | 05 – 12                                |
/// | `Afternoon` | 12 – 17                                |
/// | `Evening`   | 17 – 21                                |
/// | `Night`     | 21 – 05                                |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    /// All periods in the order they are reported in.
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    /// Buckets an hour of the day (0-23) into a period.
    ///
    /// Any hour outside `5..21` is `Night`, including out-of-range values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use accident_hotspots::TimeOfDay;
    ///
    /// assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
    /// assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
    /// assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Evening);
    /// assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
    /// ```
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeOfDay::Morning,
            12..=16 => TimeOfDay::Afternoon,
            17..=20 => TimeOfDay::Evening,
            _ => TimeOfDay::Night,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
