//! Global status tallying and error alerting.

use plantwatch_types::{ErrorAlert, StatusEvent, TallySnapshot};

/// Maintains running counts of machine status labels and flags error
/// states.
///
/// One tally for the whole stream, alive for the duration of the
/// process. Tallying is case-sensitive (labels are counted under their
/// original case) while the error check is case-insensitive; downstream
/// tally consumers rely on seeing original-case labels, so the asymmetry
/// is intentional.
#[derive(Debug, Clone, Default)]
pub struct StatusAggregator {
    counts: TallySnapshot,
}

impl StatusAggregator {
    /// Create an aggregator with an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a status event into the tally.
    ///
    /// Returns an [`ErrorAlert`] if the status is `error` in any case.
    pub fn observe(&mut self, event: &StatusEvent) -> Option<ErrorAlert> {
        *self.counts.entry(event.status.clone()).or_insert(0) += 1;

        if event.status.eq_ignore_ascii_case("error") {
            Some(ErrorAlert {
                machine_id: event.machine_id.clone(),
                status: event.status.clone(),
                error_code: event.error_code.clone(),
            })
        } else {
            None
        }
    }

    /// A copy of the current tally.
    pub fn snapshot(&self) -> TallySnapshot {
        self.counts.clone()
    }

    /// Total status events processed since process start.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}
