//! Observer that writes each history change to the log.

use super::{HistoryEvent, HistoryObserver};
use tracing::info;

/// Emits one `info` event per history change under the `tally::history`
/// target. Logging cannot fail from the caller's point of view.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingObserver;

impl LoggingObserver {
    pub fn new() -> Self {
        Self
    }
}

impl HistoryObserver for LoggingObserver {
    fn notify(&self, event: &HistoryEvent<'_>) {
        match event {
            HistoryEvent::Added { record, history } => {
                info!(
                    target: "tally::history",
                    operator = %record.operator(),
                    operand_a = %record.operand_a(),
                    operand_b = %record.operand_b(),
                    result = %record.result(),
                    size = history.len(),
                    "Calculation: {record}"
                );
            }
            HistoryEvent::Cleared => {
                info!(target: "tally::history", "History cleared");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CalculationRecord;
    use rust_decimal::Decimal;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn logs_added_calculation() {
        let record = CalculationRecord::create("add", Decimal::from(5), Decimal::from(3)).unwrap();
        let history = vec![record.clone()];

        LoggingObserver::new().notify(&HistoryEvent::Added {
            record: &record,
            history: &history,
        });

        assert!(logs_contain("Calculation: 5 + 3 = 8"));
    }

    #[traced_test]
    #[test]
    fn logs_clear() {
        LoggingObserver::new().notify(&HistoryEvent::Cleared);
        assert!(logs_contain("History cleared"));
    }
}
