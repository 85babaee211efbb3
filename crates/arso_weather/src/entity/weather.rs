//! Weather entity for arso_weather
//!
//! Holds the latest parsed ARSO observation and daily forecast and serializes
//! them to the JSON shape weather entities are rendered from.

use serde::Serialize;

use super::Entity;
use crate::bulletin::Bearing;
use crate::bulletin::ForecastDay;
use crate::bulletin::WeatherObservation;

const ATTRIBUTION: &str = "Data provided by ARSO";

/// Current weather state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeatherState {
    pub condition: Option<String>,
    pub temperature: Option<f64>,
    pub humidity: Option<i32>,
    pub pressure: Option<i32>,
    pub wind_speed: Option<f64>,
    pub wind_bearing: Option<String>,
    /// Wind bearing in degrees, for hosts that expect a number
    pub wind_bearing_degrees: Option<f64>,
    pub visibility: Option<f64>,
    pub dew_point: Option<f64>,
    pub description: Option<String>,
    pub observed_at: Option<String>,
}

impl From<&WeatherObservation> for WeatherState {
    fn from(obs: &WeatherObservation) -> Self {
        Self {
            condition: obs.condition.map(|c| c.to_string()),
            temperature: obs.temperature,
            humidity: obs.humidity,
            pressure: obs.pressure_mbar,
            wind_speed: obs.wind_speed_ms,
            wind_bearing: obs.wind_bearing.as_ref().map(|b| b.to_string()),
            wind_bearing_degrees: obs.wind_bearing.as_ref().and_then(Bearing::degrees),
            visibility: obs.visibility_km,
            dew_point: obs.dew_point_c,
            description: obs.description.clone(),
            observed_at: Some(obs.observed_at.to_rfc3339()),
        }
    }
}

/// A single daily forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templow: Option<f64>,
}

impl From<&ForecastDay> for Forecast {
    fn from(day: &ForecastDay) -> Self {
        Self {
            datetime: day.date.format("%Y-%m-%dT%H:%M:%S").to_string(),
            condition: day.condition.map(|c| c.to_string()),
            temperature: day.high_c,
            templow: day.low_c,
        }
    }
}

/// Weather entity backed by ARSO feeds.
pub struct Weather {
    pub entity_id: String,
    pub name: String,
    pub observation: Option<WeatherObservation>,
    pub forecast_daily: Vec<ForecastDay>,
}

impl Weather {
    pub fn new(entity_id: String, name: String) -> Self {
        Self {
            entity_id,
            name,
            observation: None,
            forecast_daily: Vec::new(),
        }
    }

    /// Replace the current observation.
    ///
    /// Only called on a successful parse, so a failed poll leaves the previous
    /// observation in place.
    pub fn apply_observation(&mut self, observation: WeatherObservation) {
        self.observation = Some(observation);
    }

    pub fn apply_forecast(&mut self, forecast: Vec<ForecastDay>) {
        self.forecast_daily = forecast;
    }

    pub fn state(&self) -> WeatherState {
        self.observation
            .as_ref()
            .map(WeatherState::from)
            .unwrap_or_default()
    }

    /// Entity state string: the condition code, or "unknown".
    pub fn condition(&self) -> &'static str {
        self.observation
            .as_ref()
            .and_then(|obs| obs.condition)
            .map(|c| -> &'static str { c.into() })
            .unwrap_or("unknown")
    }
}

impl Entity for Weather {
    fn state_json(&self) -> serde_json::Value {
        let forecast_daily: Vec<Forecast> =
            self.forecast_daily.iter().map(Forecast::from).collect();

        serde_json::json!({
            "entity_id": self.entity_id,
            "name": self.name,
            "platform": "weather",
            "attribution": ATTRIBUTION,
            "condition": self.condition(),
            "state": self.state(),
            "units": {
                "temperature": "°C",
                "humidity": "%",
                "pressure": "mbar",
                "wind_speed": "m/s",
                "visibility": "km",
            },
            "forecast_daily": forecast_daily,
        })
    }

    fn platform(&self) -> &'static str {
        "weather"
    }
}
