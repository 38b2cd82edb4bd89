//! The filter, push, persist step of a run.

use chrono::NaiveDate;

use crate::assignment::{FilterReport, filter_assignments};
use crate::backend::TaskBackend;
use crate::config::Config;
use crate::error::TodologyResult;
use crate::feed::CalendarComponent;
use crate::ledger::ImportLedger;
use crate::push::{PushStats, TaskPusher};

#[derive(Debug)]
pub struct ImportStats {
    pub filter: FilterReport,
    pub push: PushStats,
}

/// Push every new assignment in `components`, then write the ledger.
///
/// The ledger is written even when the push fails part way, so the tasks that
/// were created are not duplicated on the next run. The push error is still
/// returned.
pub async fn import_assignments<B: TaskBackend>(
    config: &Config,
    components: &[CalendarComponent],
    ledger: &mut ImportLedger,
    pusher: &mut TaskPusher<B>,
    cutoff: NaiveDate,
) -> TodologyResult<ImportStats> {
    let filter = filter_assignments(components, ledger, cutoff);
    log::info!(
        "{} new assignments ({} already imported, {} before {cutoff})",
        filter.assignments.len(),
        filter.already_imported,
        filter.before_cutoff
    );

    let pushed = pusher
        .push(&config.project, &config.labels, &filter.assignments, ledger)
        .await;
    let stored = ledger.store(&config.storage, &config.ledger_path());

    match (pushed, stored) {
        (Ok(push), Ok(())) => Ok(ImportStats { filter, push }),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), stored) => {
            if let Err(store_err) = stored {
                log::error!("Could not save imported assignments: {store_err}");
            }
            Err(e)
        }
    }
}
