//! Output formatting helpers.

use colored::Colorize;
use fabops_core::BatchReport;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print end-of-batch accounting: the counts on stdout, each skipped or
/// failed row on stderr. Row failures do not fail the process; the batch
/// completed and the rows that worked are already applied.
pub fn batch_summary(report: &BatchReport) {
    if report.is_clean() {
        success(&report.to_string());
        return;
    }
    println!("{}", report);
    for (row, reason) in report.skipped() {
        eprintln!("{} row {}: {}", "skipped".yellow(), row, reason);
    }
    for failure in report.failures() {
        eprintln!("{} row {}: {}", "failed".red(), failure.row, failure.reason);
    }
}

/// Print per-entity failures from a sweep-style operation.
pub fn entity_failures<I, K>(failures: I)
where
    I: IntoIterator<Item = (K, String)>,
    K: std::fmt::Display,
{
    for (id, reason) in failures {
        eprintln!("{} {}: {}", "failed".red(), id, reason);
    }
}
