//! ARSO bulletin parsing.
//!
//! ARSO publishes its observations and forecasts as RSS items whose text is
//! free-form Slovenian prose with the measurements embedded in it
//! (`"Temperatura: 18 °C"`, `"Vlažnost zraka: 65%"`, ...). This module turns a
//! decoded feed entry into structured records:
//!
//! - [`BulletinParser::parse_observation`]: latest entry → [`WeatherObservation`]
//! - [`BulletinParser::parse_forecast`]: every entry → [`ForecastDay`]
//!
//! Both share the primitives in [`extract`] and the tables in [`lexicon`].
//! Each field is extracted independently; a failure on one field leaves that
//! field `None` and never aborts the record.

use std::fmt;

use chrono::DateTime;
use chrono::FixedOffset;
use tracing::debug;

pub mod extract;
mod forecast;
pub mod lexicon;
mod observation;


pub use extract::ExtractionError;
pub use forecast::ForecastDay;
pub use forecast::ForecastEntryError;
pub use lexicon::Bearing;
pub use lexicon::BearingLexicon;
pub use lexicon::ConditionCode;
pub use lexicon::ConditionLexicon;
pub use observation::ObservationError;
pub use observation::WeatherObservation;

/// One `<item>`/`<entry>` of an ARSO feed, as delivered by the fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawBulletinEntry {
    pub title: String,
    pub summary: String,
    pub published_at: Option<DateTime<FixedOffset>>,
}

impl RawBulletinEntry {
    pub fn new(title: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: DateTime<FixedOffset>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// Parser for ARSO observation and forecast bulletins.
///
/// Owns the lexicon tables it translates with. The tables are immutable, so a
/// parser is cheap to copy into every poll task.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletinParser {
    conditions: ConditionLexicon,
    bearings: BearingLexicon,
}

impl BulletinParser {
    pub fn new(conditions: ConditionLexicon, bearings: BearingLexicon) -> Self {
        Self {
            conditions,
            bearings,
        }
    }
}

/// Collapse a field extraction result to an `Option`, logging the failure.
///
/// Missing fields are routine in ARSO bulletins (stations without a
/// visibility sensor, calm wind, ...), so failures are logged at debug level.
fn collapse<T: fmt::Debug>(field: &'static str, result: Result<T, ExtractionError>) -> Option<T> {
    match result {
        Ok(value) => {
            debug!(field, value = ?value, "Extracted field");
            Some(value)
        }
        Err(e) => {
            debug!(field, error = %e, "Field not extracted");
            None
        }
    }
}
