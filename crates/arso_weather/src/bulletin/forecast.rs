use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::BulletinParser;
use super::RawBulletinEntry;
use super::collapse;
use super::extract;
use super::lexicon::ConditionCode;

// ARSO writes its forecast bounds in Slovenian, so these English labels do not
// occur in live feeds and the bounds come out empty. Replace once the exact
// Slovenian wording is confirmed against a captured forecast feed.
const HIGH_TEMPERATURE: &str = "max temperature: ";
const LOW_TEMPERATURE: &str = "min temperature: ";
const CELSIUS: &str = "°C";

/// One forecast period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    /// Publication time of the entry, in the feed's own local time
    pub date: NaiveDateTime,
    pub high_c: Option<f64>,
    pub low_c: Option<f64>,
    pub condition: Option<ConditionCode>,
}

#[derive(Debug, thiserror::Error)]
pub enum ForecastEntryError {
    #[error("forecast entry {title:?} has no publication date")]
    MissingPublished { title: String },
}

impl BulletinParser {
    /// Parse every entry of a forecast feed, in feed order.
    ///
    /// Malformed entries are dropped and logged; an empty feed gives an empty forecast.
    pub fn parse_forecast(&self, entries: &[RawBulletinEntry]) -> Vec<ForecastDay> {
        let forecast: Vec<ForecastDay> = entries
            .iter()
            .filter_map(|entry| match self.parse_forecast_entry(entry) {
                Ok(day) => Some(day),
                Err(e) => {
                    warn!("Error parsing forecast entry: {}", e);
                    None
                }
            })
            .collect();

        debug!(
            "Parsed {} of {} forecast entries",
            forecast.len(),
            entries.len()
        );
        forecast
    }

    pub fn parse_forecast_entry(
        &self,
        entry: &RawBulletinEntry,
    ) -> Result<ForecastDay, ForecastEntryError> {
        let published = entry
            .published_at
            .ok_or_else(|| ForecastEntryError::MissingPublished {
                title: entry.title.clone(),
            })?;
        let summary = entry.summary.as_str();

        Ok(ForecastDay {
            date: published.naive_local(),
            high_c: collapse(
                "high_temperature",
                extract::labeled(summary, HIGH_TEMPERATURE, CELSIUS),
            ),
            low_c: collapse(
                "low_temperature",
                extract::labeled(summary, LOW_TEMPERATURE, CELSIUS),
            ),
            condition: self.conditions.lookup(summary),
        })
    }
}
