//! RSS / Atom decoding into [`RawBulletinEntry`] values.

use chrono::DateTime;
use chrono::FixedOffset;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use crate::bulletin::RawBulletinEntry;

pub mod client;

pub use client::FeedClient;
pub use client::FetchError;
pub use client::ReqwestFeedClient;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Invalid feed XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Entry child element being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Summary,
    Content,
    Published,
    Updated,
}

impl Field {
    fn from_tag(local_name: &[u8]) -> Option<Self> {
        match local_name {
            b"title" => Some(Field::Title),
            b"description" | b"summary" => Some(Field::Summary),
            b"content" => Some(Field::Content),
            b"pubDate" | b"published" => Some(Field::Published),
            b"updated" | b"date" => Some(Field::Updated),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct EntryBuilder {
    title: String,
    summary: String,
    content: String,
    published: String,
    updated: String,
}

impl EntryBuilder {
    fn push(&mut self, field: Field, text: &str) {
        let target = match field {
            Field::Title => &mut self.title,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
            Field::Published => &mut self.published,
            Field::Updated => &mut self.updated,
        };
        target.push_str(text);
    }

    fn finish(self) -> RawBulletinEntry {
        let summary = if self.summary.is_empty() {
            self.content
        } else {
            self.summary
        };
        let published = if self.published.is_empty() {
            self.updated
        } else {
            self.published
        };

        RawBulletinEntry {
            title: self.title.trim().to_string(),
            summary: summary.trim().to_string(),
            published_at: parse_timestamp(&published),
        }
    }
}

/// Decode an RSS 2.0 or Atom document into its entries, in document order.
///
/// Channel/feed-level elements are ignored. A well-formed feed without
/// entries decodes to an empty list. Only direct children of an entry select
/// a field; text nested deeper (e.g. the `<div>` of Atom xhtml content) is
/// appended to the enclosing field.
pub fn parse_feed(xml: &str) -> Result<Vec<RawBulletinEntry>, FeedError> {
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut entries = Vec::new();
    let mut current: Option<EntryBuilder> = None;
    let mut field: Option<Field> = None;
    // Element depth below the open entry
    let mut depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if current.is_some() {
                    depth += 1;
                    if depth == 1 {
                        field = Field::from_tag(e.local_name().as_ref());
                    }
                } else if matches!(e.local_name().as_ref(), b"item" | b"entry") {
                    current = Some(EntryBuilder::default());
                    field = None;
                    depth = 0;
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), field) {
                    entry.push(field, &t.unescape()?);
                }
            }
            Ok(Event::CData(c)) => {
                if let (Some(entry), Some(field)) = (current.as_mut(), field) {
                    entry.push(field, &String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::End(_)) if current.is_some() => {
                if depth == 0 {
                    if let Some(entry) = current.take() {
                        entries.push(entry.finish());
                    }
                } else {
                    depth -= 1;
                    if depth == 0 {
                        field = None;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                debug!("XML error at byte {}: {}", reader.buffer_position(), e);
                return Err(FeedError::Xml(e));
            }
            _ => {}
        }
        buf.clear();
    }

    debug!("Decoded {} feed entries", entries.len());
    Ok(entries)
}

/// RSS uses RFC 2822 dates, Atom RFC 3339.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    match DateTime::parse_from_rfc2822(raw).or_else(|_| DateTime::parse_from_rfc3339(raw)) {
        Ok(timestamp) => Some(timestamp),
        Err(e) => {
            debug!("Unrecognised feed timestamp {:?}: {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Datelike;
    use chrono::Timelike;

    use super::*;

    const OBSERVATION_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>ARSO - opazovanja</title>
    <link>https://meteo.arso.gov.si</link>
    <item>
      <title>Ljubljana: pretežno jasno, 18 &#176;C</title>
      <link>https://meteo.arso.gov.si/met/sl/weather/observ/</link>
      <description>Ljubljana - Bežigrad&lt;br /&gt;Pretežno jasno. Temperatura: 18 °C, Vlažnost zraka: 65%</description>
      <pubDate>Wed, 16 Oct 2024 08:00:00 +0200</pubDate>
    </item>
    <item>
      <title>Ljubljana: jasno, 15 °C</title>
      <description><![CDATA[Jasno. Temperatura: 15 °C]]></description>
      <pubDate>Wed, 16 Oct 2024 07:30:00 +0200</pubDate>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_items() {
        let entries = parse_feed(OBSERVATION_RSS).unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].title, "Ljubljana: pretežno jasno, 18 °C");
        assert_eq!(
            entries[0].summary,
            "Ljubljana - Bežigrad<br />Pretežno jasno. Temperatura: 18 °C, Vlažnost zraka: 65%"
        );
        let published = entries[0].published_at.unwrap();
        assert_eq!(published.day(), 16);
        assert_eq!(published.hour(), 8);

        assert_eq!(entries[1].summary, "Jasno. Temperatura: 15 °C");
    }

    #[test]
    fn test_channel_title_is_ignored() {
        let entries = parse_feed(OBSERVATION_RSS).unwrap();
        assert!(entries.iter().all(|e| e.title != "ARSO - opazovanja"));
    }

    #[test]
    fn test_parse_atom_entries() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ARSO napoved</title>
  <entry>
    <title>Sreda</title>
    <content type="text">Delno oblačno.</content>
    <updated>2024-10-16T05:30:00+02:00</updated>
  </entry>
  <entry>
    <title>Četrtek</title>
    <summary>Deževno.</summary>
    <published>2024-10-17T05:30:00+02:00</published>
    <updated>2024-10-17T06:00:00+02:00</updated>
  </entry>
</feed>"#;

        let entries = parse_feed(atom).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].summary, "Delno oblačno.");
        assert_eq!(entries[0].published_at.unwrap().hour(), 5);
        assert_eq!(entries[1].summary, "Deževno.");
        assert_eq!(entries[1].published_at.unwrap().minute(), 30);
    }

    #[test]
    fn test_atom_xhtml_content_keeps_nested_text() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>Sreda</title>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml">Jasno. <b>Temperatura: 18 °C</b></div></content>
    <published>2024-10-16T05:30:00+02:00</published>
  </entry>
</feed>"#;

        let entries = parse_feed(atom).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Sreda");
        assert_eq!(entries[0].summary, "Jasno. Temperatura: 18 °C");
        assert_eq!(entries[0].published_at.unwrap().hour(), 5);
    }

    #[test]
    fn test_text_and_cdata_keep_inner_whitespace() {
        let rss = r#"<rss><channel><item>
            <title>  Ljubljana  </title>
            <description>
                Temperatura: <![CDATA[18]]> °C
            </description>
        </item></channel></rss>"#;

        let entries = parse_feed(rss).unwrap();
        assert_eq!(entries[0].title, "Ljubljana");
        assert_eq!(entries[0].summary, "Temperatura: 18 °C");
    }

    #[test]
    fn test_empty_channel() {
        let rss = r#"<rss version="2.0"><channel><title>ARSO</title></channel></rss>"#;
        assert!(parse_feed(rss).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_date_is_none() {
        let rss = r#"<rss><channel><item>
            <title>Ljubljana</title>
            <description>Jasno.</description>
            <pubDate>16.10.2024 08:00 CEST</pubDate>
        </item></channel></rss>"#;

        let entries = parse_feed(rss).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].published_at, None);
    }

    #[test]
    fn test_malformed_xml() {
        let rss = r#"<rss><channel><item><title>Ljubljana</item></channel></rss>"#;
        assert!(matches!(parse_feed(rss), Err(FeedError::Xml(_))));
    }
}
