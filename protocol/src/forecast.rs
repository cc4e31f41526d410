use crate::SafetyStatus;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use serde_with::skip_serializing_none;

#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub predicted_status: SafetyStatus,
    #[serde(default)]
    pub precipitation_mm: f64,
    #[serde(default)]
    pub temp_high_c: Option<f64>,
    #[serde(default)]
    pub temp_low_c: Option<f64>,
    #[serde(default)]
    pub weather_icon: Option<String>,
}

/// Per-day predicted safety for a crag, as computed by the backend.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub crag_id: String,
    pub crag_name: String,
    #[serde(default)]
    pub current_status: SafetyStatus,
    #[serde(default)]
    pub estimated_safe_date: Option<NaiveDate>,
    #[serde(default)]
    pub days: Vec<DayForecast>,
}

impl Forecast {
    /// First forecast day predicted safe, if any.
    pub fn first_safe_day(&self) -> Option<&DayForecast> {
        self.days
            .iter()
            .find(|day| day.predicted_status == SafetyStatus::Safe)
    }
}
