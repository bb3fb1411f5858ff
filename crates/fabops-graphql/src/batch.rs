//! Generic CSV-driven batch driver.

use std::future::Future;

use tracing::{error, info};

use fabops_core::{BatchReport, Result, RowOutcome};

/// Apply one operation per data row, isolating per-row failures.
///
/// `op` receives the 1-based data-row number and the row (the header row is
/// expected to have been consumed by the reader already). Rows are processed
/// strictly in order: row N's mutation is not started until row N-1's
/// response has been received, which is what makes the fetch-etag-then-mutate
/// convention safe within one run.
///
/// A row failing with an API, transport, or data error is recorded in the
/// report and the batch continues; configuration and authentication errors
/// abort the whole run, since no later row could succeed either. There is no
/// automatic retry.
pub async fn run_batch<R, Op, Fut>(rows: Vec<R>, mut op: Op) -> Result<BatchReport>
where
    Op: FnMut(usize, R) -> Fut,
    Fut: Future<Output = Result<RowOutcome>>,
{
    let total = rows.len();
    let mut report = BatchReport::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        info!(row = row_number, total, "processing row");
        match op(row_number, row).await {
            Ok(outcome) => report.record(row_number, outcome),
            Err(err) if err.is_fatal() => {
                error!(row = row_number, %err, "fatal error, aborting batch");
                return Err(err);
            }
            Err(err) => {
                error!(row = row_number, %err, "row failed, continuing");
                report.record_failure(row_number, err.to_string());
            }
        }
    }

    info!(%report, "batch complete");
    Ok(report)
}
