//! Entity abstraction for arso_weather
//!
//! Entities are what the host renders; the ARSO integration exposes one
//! weather entity per station.

mod weather;

pub use weather::Forecast;
pub use weather::Weather;
pub use weather::WeatherState;

/// Base trait that all entities must implement
pub trait Entity: Send + Sync {
    /// Serialize current state to JSON for the host
    fn state_json(&self) -> serde_json::Value;

    /// Return the platform type of this entity (e.g. "weather")
    fn platform(&self) -> &'static str;
}
