//! Turning feed events into importable assignments.

use chrono::{Datelike, NaiveDate};

use crate::feed::{CalendarComponent, FeedEvent};
use crate::ledger::ImportLedger;

/// One feed event that should become a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
    pub reference_url: String,
}

impl Assignment {
    fn from_event(event: &FeedEvent, due_date: NaiveDate) -> Self {
        Assignment {
            id: event.uid.clone(),
            title: event.summary.clone(),
            description: event.description.clone(),
            due_date,
            reference_url: event.url.clone(),
        }
    }

    /// Task title: a markdown link back to the assignment.
    pub fn task_content(&self) -> String {
        format!("[{}]({})", self.title, self.reference_url)
    }
}

/// Result of filtering a feed.
#[derive(Debug, Default)]
pub struct FilterReport {
    pub assignments: Vec<Assignment>,
    pub already_imported: usize,
    pub before_cutoff: usize,
    /// Kind names of non-event components, one entry per occurrence.
    pub unrecognized: Vec<String>,
}

/// First day of the month before the one `today` is in.
pub fn start_of_previous_month(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() >= 2 {
        (today.year(), today.month() - 1)
    } else {
        (today.year() - 1, 12)
    };
    // Day 1 exists in every month
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

/// Select the events that should be imported, keeping feed order.
///
/// Events already in the ledger or starting before `cutoff` are skipped. Other
/// component kinds are skipped with a warning.
pub fn filter_assignments(
    components: &[CalendarComponent],
    already_imported: &ImportLedger,
    cutoff: NaiveDate,
) -> FilterReport {
    let mut report = FilterReport::default();

    for component in components {
        let event = match component {
            CalendarComponent::Event(event) => event,
            CalendarComponent::Other { kind } => {
                log::warn!("Unknown event type `{kind}`. Ignoring.");
                report.unrecognized.push(kind.clone());
                continue;
            }
        };

        let start = event.start.date();

        if already_imported.contains(&event.uid) {
            report.already_imported += 1;
            continue;
        }
        if start < cutoff {
            log::debug!("Skipping '{}': starts {start}, before {cutoff}", event.summary);
            report.before_cutoff += 1;
            continue;
        }

        report.assignments.push(Assignment::from_event(event, start));
    }

    report
}
