//! Calendar feed download and parsing.

mod parse;

pub use parse::parse_feed;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::TodologyResult;

/// Start of an event as written in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStart {
    Date(NaiveDate),
    /// Date and time in whatever zone the feed used (UTC, TZID or floating).
    DateTime(NaiveDateTime),
}

impl EventStart {
    /// Calendar date with the time of day stripped.
    pub fn date(&self) -> NaiveDate {
        match self {
            EventStart::Date(d) => *d,
            EventStart::DateTime(dt) => dt.date(),
        }
    }
}

/// The fields of a `VEVENT` that todology consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub uid: String,
    pub summary: String,
    pub description: String,
    pub url: String,
    pub start: EventStart,
}

/// A top-level component of the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarComponent {
    Event(FeedEvent),
    /// Anything that isn't a `VEVENT` (`VTODO`, `VTIMEZONE`, ...).
    Other { kind: String },
}

/// Turn a configured feed address into an URL to GET.
///
/// `webcal://` is just a hint for calendar apps, the feed itself is served over
/// HTTPS. Addresses without a scheme get `https://`.
pub fn feed_url(address: &str) -> String {
    let address = address.trim();
    if let Some(rest) = address.strip_prefix("webcal://") {
        format!("https://{rest}")
    } else if address.starts_with("https://") || address.starts_with("http://") {
        address.to_string()
    } else {
        format!("https://{address}")
    }
}

/// Download the feed and parse its components, in document order.
pub async fn fetch_feed(
    client: &reqwest::Client,
    address: &str,
) -> TodologyResult<Vec<CalendarComponent>> {
    let url = feed_url(address);
    log::info!("Fetching calendar feed from {url}");

    let body = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_feed(&body)
}
