//! TfL Journey Planner request and response types.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TflError;

/// A whole-hour departure slot for a journey batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    date_time: NaiveDateTime,
}

impl Departure {
    /// Builds a departure at `hour:00` local time on the given date.
    ///
    /// # Errors
    ///
    /// Returns [`TflError::InvalidDeparture`] when the fields do not form a
    /// valid calendar date/time.
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Result<Self, TflError> {
        let invalid = || TflError::InvalidDeparture {
            year,
            month,
            day,
            hour,
        };
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(invalid)?;
        Ok(Self {
            date_time: NaiveDateTime::new(date, time),
        })
    }

    pub(crate) fn date_param(self) -> String {
        self.date_time.format("%Y%m%d").to_string()
    }

    pub(crate) fn time_param(self) -> String {
        self.date_time.format("%H%M").to_string()
    }

    pub(crate) fn is_past(self, now: NaiveDateTime) -> bool {
        self.date_time < now
    }
}

impl std::fmt::Display for Departure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date_time.format("%Y-%m-%d %H:%M"))
    }
}

/// One journey planner response. Fields the export layer reads are typed;
/// the rest rides along in `extra` so persisted results keep the upstream
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyResult {
    pub journey_vector: JourneyVector,
    pub search_criteria: SearchCriteria,
    pub journeys: Vec<Journey>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyVector {
    pub from: String,
    pub to: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub date_time: String,
    #[serde(default)]
    pub date_time_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One proposed journey: total duration in minutes plus its legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journey {
    pub duration: i64,
    #[serde(default)]
    pub legs: Vec<Leg>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub duration: i64,
    pub mode: Mode,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mode {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn departure_formats_api_parameters() {
        let departure = Departure::new(2031, 11, 2, 8).unwrap();
        assert_eq!(departure.date_param(), "20311102");
        assert_eq!(departure.time_param(), "0800");
    }

    #[test]
    fn invalid_calendar_dates_are_rejected() {
        assert!(matches!(
            Departure::new(2031, 2, 30, 8),
            Err(TflError::InvalidDeparture { .. })
        ));
        assert!(matches!(
            Departure::new(2031, 1, 1, 24),
            Err(TflError::InvalidDeparture { .. })
        ));
    }

    #[test]
    fn is_past_compares_against_the_given_clock() {
        let departure = Departure::new(2031, 1, 1, 9).unwrap();
        let before = Departure::new(2030, 12, 31, 9).unwrap().date_time;
        let after = Departure::new(2031, 1, 2, 9).unwrap().date_time;
        assert!(!departure.is_past(before));
        assert!(departure.is_past(after));
    }

    #[test]
    fn journey_result_deserializes_the_planner_shape() {
        let body = serde_json::json!({
            "journeyVector": {"from": "SW10 0JG", "to": "1000235", "uri": "/journey/..."},
            "searchCriteria": {"dateTime": "2031-11-02T08:00:00", "dateTimeType": "Departing"},
            "journeys": [
                {
                    "duration": 34,
                    "legs": [
                        {"duration": 10, "mode": {"name": "walking"}},
                        {"duration": 24, "mode": {"name": "tube"}}
                    ]
                }
            ],
            "recommendedMaxAgeMinutes": 1
        });
        let result: JourneyResult = serde_json::from_value(body).unwrap();
        assert_eq!(result.journey_vector.from, "SW10 0JG");
        assert_eq!(result.journeys[0].duration, 34);
        assert_eq!(result.journeys[0].legs[1].mode.name, "tube");
        assert!(result.extra.contains_key("recommendedMaxAgeMinutes"));
    }

    #[test]
    fn missing_journeys_field_fails_deserialization() {
        let body = serde_json::json!({
            "journeyVector": {"from": "SW10 0JG", "to": "1000235"},
            "searchCriteria": {"dateTime": "2031-11-02T08:00:00"}
        });
        assert!(serde_json::from_value::<JourneyResult>(body).is_err());
    }
}
