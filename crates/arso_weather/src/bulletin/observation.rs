use std::sync::LazyLock;

use chrono::DateTime;
use chrono::Utc;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::BulletinParser;
use super::RawBulletinEntry;
use super::collapse;
use super::extract;
use super::extract::ExtractionError;
use super::lexicon::Bearing;
use super::lexicon::ConditionCode;

const TEMPERATURE: &str = "Temperatura: ";
const DEW_POINT: &str = "Temperatura rosišča: ";
const CELSIUS: &str = "°C";
const HUMIDITY: &str = "Vlažnost zraka: ";
const PERCENT: &str = "%";
const WIND: &str = "Piha ";
const WIND_SPEED: &str = ": ";
const METRES_PER_SECOND: &str = " m/s";
const WIND_BEARING_END: &str = ":";
const PRESSURE: &str = "Zračni tlak: ";
const MILLIBAR: &str = " mbar";
const VISIBILITY: &str = "Vidnost: ";
const KILOMETRES: &str = " km";

/// Sky description in an observation title, e.g. `"Ljubljana: pretežno jasno, 18 °C"`.
static TITLE_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i):\s*(.*?),\s*[-+]?\d+(?:[.,]\d+)?\s*°C").unwrap());

/// Current conditions at a station.
///
/// Every measurement is optional and extracted independently of the others.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    /// Air temperature in °C
    pub temperature: Option<f64>,

    /// Relative humidity in %
    pub humidity: Option<i32>,

    pub wind_speed_ms: Option<f64>,
    pub wind_bearing: Option<Bearing>,
    pub pressure_mbar: Option<i32>,
    pub visibility_km: Option<f64>,
    pub dew_point_c: Option<f64>,
    pub condition: Option<ConditionCode>,

    /// Raw Slovenian sky description from the entry title
    pub description: Option<String>,

    /// When the bulletin was parsed (ARSO's own timestamp is not used)
    pub observed_at: DateTime<Utc>,
}

impl WeatherObservation {
    /// Wind speed converted to km/h.
    pub fn wind_speed_kmh(&self) -> Option<f64> {
        self.wind_speed_ms.map(|ms| ms * 3.6)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ObservationError {
    #[error("No entries found in ARSO observation feed")]
    NoEntries,
}

impl BulletinParser {
    /// Parse the most recent entry of an observation feed.
    ///
    /// The feed lists the latest observation first. An empty feed is an error
    /// rather than an empty observation.
    pub fn parse_observation(
        &self,
        entries: &[RawBulletinEntry],
    ) -> Result<WeatherObservation, ObservationError> {
        let entry = entries.first().ok_or(ObservationError::NoEntries)?;
        Ok(self.parse_observation_entry(entry))
    }

    /// Parse a single observation entry, stamped with the current time.
    pub fn parse_observation_entry(&self, entry: &RawBulletinEntry) -> WeatherObservation {
        self.parse_observation_at(entry, Utc::now())
    }

    /// Parse a single observation entry with an explicit observation time.
    pub fn parse_observation_at(
        &self,
        entry: &RawBulletinEntry,
        observed_at: DateTime<Utc>,
    ) -> WeatherObservation {
        let summary = entry.summary.as_str();
        debug!(title = %entry.title, "Parsing ARSO observation");

        WeatherObservation {
            temperature: collapse("temperature", extract_temperature(summary)),
            humidity: collapse("humidity", extract::labeled(summary, HUMIDITY, PERCENT)),
            wind_speed_ms: collapse("wind_speed", extract_wind_speed(summary)),
            wind_bearing: collapse("wind_bearing", self.extract_wind_bearing(summary)),
            pressure_mbar: collapse(
                "pressure",
                extract::labeled_first_token(summary, PRESSURE, MILLIBAR),
            ),
            visibility_km: collapse(
                "visibility",
                extract::labeled(summary, VISIBILITY, KILOMETRES),
            ),
            dew_point_c: collapse("dew_point", extract::labeled(summary, DEW_POINT, CELSIUS)),
            condition: self.conditions.lookup(summary),
            description: collapse("description", extract_description(&entry.title)),
            observed_at,
        }
    }

    /// `"Piha severozahodnik (SZ): 3 m/s"` → the last word before the colon,
    /// without parentheses, translated through the bearing lexicon.
    fn extract_wind_bearing(&self, summary: &str) -> Result<Bearing, ExtractionError> {
        let phrase = extract::between(summary, WIND, WIND_BEARING_END)?;
        let abbreviation = phrase
            .split_whitespace()
            .last()
            .map(|word| word.replace(['(', ')'], ""))
            .filter(|word| !word.is_empty())
            .ok_or_else(|| ExtractionError::Empty {
                label: WIND.to_string(),
            })?;

        Ok(self.bearings.lookup(&abbreviation))
    }
}

/// Air temperature, or the dew point when the station reports no air temperature.
fn extract_temperature(summary: &str) -> Result<f64, ExtractionError> {
    extract::labeled(summary, TEMPERATURE, CELSIUS).or_else(|e| {
        debug!(error = %e, "No air temperature, using dew point");
        extract::labeled(summary, DEW_POINT, CELSIUS)
    })
}

fn extract_wind_speed(summary: &str) -> Result<f64, ExtractionError> {
    let speed = extract::between_after(summary, WIND, WIND_SPEED, METRES_PER_SECOND)?;
    extract::parse_first_token(speed)
}

fn extract_description(title: &str) -> Result<String, ExtractionError> {
    extract::capture(&TITLE_DESCRIPTION, title).map(str::to_string)
}
