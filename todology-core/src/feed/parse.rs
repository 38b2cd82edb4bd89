//! ICS feed parsing using the icalendar crate's parser.

use chrono::NaiveDate;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, read_calendar, unfold},
};

use super::{CalendarComponent, EventStart, FeedEvent};
use crate::error::{TodologyError, TodologyResult};

/// Parse an iCalendar document into its components, in document order.
pub fn parse_feed(content: &str) -> TodologyResult<Vec<CalendarComponent>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| TodologyError::FeedParse(e.to_string()))?;

    let mut components = Vec::new();
    collect_components(&calendar.components, &mut components)?;
    Ok(components)
}

fn collect_components(
    raw: &[Component<'_>],
    out: &mut Vec<CalendarComponent>,
) -> TodologyResult<()> {
    for component in raw {
        match component.name.as_ref() {
            // Some feeds concatenate several calendars
            "VCALENDAR" => collect_components(&component.components, out)?,
            "VEVENT" => out.push(CalendarComponent::Event(parse_event(component)?)),
            kind => out.push(CalendarComponent::Other {
                kind: kind.to_string(),
            }),
        }
    }
    Ok(())
}

fn parse_event(vevent: &Component<'_>) -> TodologyResult<FeedEvent> {
    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .ok_or_else(|| TodologyError::FeedParse("VEVENT without UID".into()))?;

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| {
            DatePerhapsTime::try_from(p)
                .ok()
                .map(to_event_start)
                .or_else(|| {
                    NaiveDate::parse_from_str(p.val.as_ref(), "%Y%m%d")
                        .ok()
                        .map(EventStart::Date)
                })
        })
        .ok_or_else(|| TodologyError::FeedParse(format!("Event {uid} has no valid DTSTART")))?;

    // The parser has already undone TEXT escaping
    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| p.val.to_string())
            .unwrap_or_default()
    };

    Ok(FeedEvent {
        summary: text("SUMMARY"),
        description: text("DESCRIPTION"),
        url: vevent
            .find_prop("URL")
            .map(|p| p.val.to_string())
            .unwrap_or_default(),
        uid,
        start,
    })
}

fn to_event_start(dpt: DatePerhapsTime) -> EventStart {
    match dpt {
        DatePerhapsTime::Date(d) => EventStart::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => EventStart::DateTime(dt.naive_utc()),
            CalendarDateTime::Floating(naive) => EventStart::DateTime(naive),
            CalendarDateTime::WithTimezone { date_time, .. } => EventStart::DateTime(date_time),
        },
    }
}
