//! Slovenian → canonical vocabulary used by ARSO bulletins.
//!
//! The phrases below are matched byte-for-byte against ARSO's wording and
//! must not be normalised.

use std::fmt;

use serde::Serialize;
use serde::Serializer;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;

/// Canonical weather condition, as understood by home-automation weather entities.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCode {
    Sunny,
    Partlycloudy,
    Cloudy,
    Fog,
    Rainy,
    Pouring,
    LightningRainy,
    Snowy,
    SnowyRainy,
    Windy,
    WindyVariant,
    Hail,
    Exceptional,
}

/// Compass bearing the wind blows from.
///
/// Abbreviations missing from the [`BearingLexicon`] are carried verbatim in
/// [`Bearing::Unmapped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bearing {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
    Unmapped(String),
}

impl Bearing {
    pub fn as_str(&self) -> &str {
        match self {
            Bearing::N => "N",
            Bearing::NE => "NE",
            Bearing::E => "E",
            Bearing::SE => "SE",
            Bearing::S => "S",
            Bearing::SW => "SW",
            Bearing::W => "W",
            Bearing::NW => "NW",
            Bearing::Unmapped(s) => s,
        }
    }

    /// Bearing in degrees clockwise from north, if the bearing is canonical.
    pub fn degrees(&self) -> Option<f64> {
        match self {
            Bearing::N => Some(0.0),
            Bearing::NE => Some(45.0),
            Bearing::E => Some(90.0),
            Bearing::SE => Some(135.0),
            Bearing::S => Some(180.0),
            Bearing::SW => Some(225.0),
            Bearing::W => Some(270.0),
            Bearing::NW => Some(315.0),
            Bearing::Unmapped(_) => None,
        }
    }
}

impl fmt::Display for Bearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Bearing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// ARSO condition phrases, in match priority order.
pub const ARSO_CONDITIONS: &[(&str, ConditionCode)] = &[
    ("Jasno.", ConditionCode::Sunny),
    ("Pretežno jasno.", ConditionCode::Sunny),
    ("Delno oblačno.", ConditionCode::Partlycloudy),
    ("Oblačno.", ConditionCode::Cloudy),
    ("Megleno.", ConditionCode::Fog),
    ("Močni nalivi.", ConditionCode::Pouring),
    ("Deževno.", ConditionCode::Rainy),
    ("Nevihte z dežjem.", ConditionCode::LightningRainy),
    ("Snežilo.", ConditionCode::Snowy),
    ("Mešanica snega in dežja.", ConditionCode::SnowyRainy),
    ("Veter.", ConditionCode::Windy),
    ("Vihar.", ConditionCode::WindyVariant),
    ("Izjemno vreme.", ConditionCode::Exceptional),
];

/// ARSO compass abbreviations (S = sever, J = jug, V = vzhod, Z = zahod).
pub const ARSO_BEARINGS: &[(&str, Bearing)] = &[
    ("Z", Bearing::W),
    ("S", Bearing::N),
    ("V", Bearing::E),
    ("J", Bearing::S),
    ("SV", Bearing::NE),
    ("SZ", Bearing::NW),
    ("JV", Bearing::SE),
    ("JZ", Bearing::SW),
];

/// Condition phrase table, matched by substring containment.
#[derive(Debug, Clone, Copy)]
pub struct ConditionLexicon {
    entries: &'static [(&'static str, ConditionCode)],
}

impl ConditionLexicon {
    pub const fn new(entries: &'static [(&'static str, ConditionCode)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(&'static str, ConditionCode)] {
        self.entries
    }

    /// Return the code of the first table entry whose phrase occurs anywhere in `text`.
    ///
    /// Table order decides, not position in the text.
    pub fn lookup(&self, text: &str) -> Option<ConditionCode> {
        self.entries
            .iter()
            .find(|(phrase, _)| text.contains(phrase))
            .map(|(_, code)| *code)
    }
}

impl Default for ConditionLexicon {
    fn default() -> Self {
        Self::new(ARSO_CONDITIONS)
    }
}

/// Compass abbreviation table, matched exactly.
#[derive(Debug, Clone, Copy)]
pub struct BearingLexicon {
    entries: &'static [(&'static str, Bearing)],
}

impl BearingLexicon {
    pub const fn new(entries: &'static [(&'static str, Bearing)]) -> Self {
        Self { entries }
    }

    /// Translate an abbreviation; unknown abbreviations pass through unchanged.
    pub fn lookup(&self, abbreviation: &str) -> Bearing {
        self.entries
            .iter()
            .find(|(abbr, _)| *abbr == abbreviation)
            .map(|(_, bearing)| bearing.clone())
            .unwrap_or_else(|| Bearing::Unmapped(abbreviation.to_string()))
    }
}

impl Default for BearingLexicon {
    fn default() -> Self {
        Self::new(ARSO_BEARINGS)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_condition_code_names() {
        assert_eq!(ConditionCode::Sunny.to_string(), "sunny");
        assert_eq!(ConditionCode::Partlycloudy.to_string(), "partlycloudy");
        assert_eq!(ConditionCode::LightningRainy.to_string(), "lightning-rainy");
        assert_eq!(ConditionCode::SnowyRainy.to_string(), "snowy-rainy");
        assert_eq!(ConditionCode::WindyVariant.to_string(), "windy-variant");
        assert_eq!(
            ConditionCode::from_str("lightning-rainy"),
            Ok(ConditionCode::LightningRainy)
        );
        assert_eq!(
            serde_json::to_value(ConditionCode::WindyVariant).unwrap(),
            "windy-variant"
        );
    }

    #[test]
    fn test_condition_lookup_substring() {
        let lexicon = ConditionLexicon::default();
        assert_eq!(
            lexicon.lookup("Ljubljana, 08:00<br />Delno oblačno. Temperatura: 12 °C"),
            Some(ConditionCode::Partlycloudy)
        );
        assert_eq!(
            lexicon.lookup("Nevihte z dežjem. Temperatura: 22 °C"),
            Some(ConditionCode::LightningRainy)
        );
    }

    #[test]
    fn test_condition_lookup_is_case_sensitive() {
        let lexicon = ConditionLexicon::default();
        // "oblačno." inside "Delno oblačno." must not read as "Oblačno."
        assert_eq!(
            lexicon.lookup("Delno oblačno."),
            Some(ConditionCode::Partlycloudy)
        );
        assert_eq!(lexicon.lookup("jasno"), None);
    }

    #[test]
    fn test_condition_lookup_table_order_wins() {
        let lexicon = ConditionLexicon::default();
        // "Megleno." appears first in the text, "Oblačno." first in the table
        assert_eq!(
            lexicon.lookup("Megleno. Kasneje Oblačno."),
            Some(ConditionCode::Cloudy)
        );
    }

    #[test]
    fn test_condition_lookup_unknown() {
        assert_eq!(ConditionLexicon::default().lookup("Sparno."), None);
    }

    #[test]
    fn test_condition_table_covers_all_phrases() {
        let lexicon = ConditionLexicon::default();
        assert_eq!(lexicon.entries().len(), 13);
        for (phrase, code) in lexicon.entries() {
            assert_eq!(lexicon.lookup(phrase), Some(*code), "{phrase}");
        }
    }

    #[test]
    fn test_bearing_lookup() {
        let lexicon = BearingLexicon::default();
        assert_eq!(lexicon.lookup("Z"), Bearing::W);
        assert_eq!(lexicon.lookup("S"), Bearing::N);
        assert_eq!(lexicon.lookup("V"), Bearing::E);
        assert_eq!(lexicon.lookup("J"), Bearing::S);
        assert_eq!(lexicon.lookup("SV"), Bearing::NE);
        assert_eq!(lexicon.lookup("SZ"), Bearing::NW);
        assert_eq!(lexicon.lookup("JV"), Bearing::SE);
        assert_eq!(lexicon.lookup("JZ"), Bearing::SW);
    }

    #[test]
    fn test_bearing_lookup_is_exact() {
        let lexicon = BearingLexicon::default();
        assert_eq!(lexicon.lookup("sz"), Bearing::Unmapped("sz".to_string()));
        assert_eq!(lexicon.lookup("SSZ"), Bearing::Unmapped("SSZ".to_string()));
    }

    #[test]
    fn test_bearing_display_and_serialize() {
        assert_eq!(Bearing::NW.to_string(), "NW");
        assert_eq!(Bearing::Unmapped("SSZ".to_string()).to_string(), "SSZ");
        assert_eq!(serde_json::to_value(Bearing::SE).unwrap(), "SE");
        assert_eq!(Bearing::SW.degrees(), Some(225.0));
        assert_eq!(Bearing::Unmapped("x".to_string()).degrees(), None);
    }
}
