//! Console output formatting with colored display

use std::fmt::Write as _;

use owo_colors::OwoColorize;

use crate::batch::{BatchReport, BundleOutcome, BundleStatus};
use crate::bundle::WriteReport;

/// Format a batch report as a colored multi-line summary.
pub fn format_batch_report(report: &BatchReport) -> String {
    let mut output = String::new();
    let border = "━".repeat(50);
    let border_dim = border.dimmed();

    let _ = writeln!(output, "{}", border_dim);
    for outcome in &report.outcomes {
        let _ = writeln!(output, "  {}", format_outcome(outcome));
    }
    for path in &report.pruned {
        let _ = writeln!(output, "  {} {}", "PRUNED".dimmed(), path.display());
    }
    let _ = writeln!(output, "{}", border_dim);
    let _ = writeln!(
        output,
        "  {} processed, {} skipped, {} failed, {} pruned",
        report.processed_count().green(),
        report.skipped_count().yellow(),
        if report.has_failures() {
            report.failed_count().red().bold().to_string()
        } else {
            report.failed_count().to_string()
        },
        report.pruned.len()
    );
    let _ = write!(output, "{}", border_dim);

    output
}

fn format_outcome(outcome: &BundleOutcome) -> String {
    let target = if outcome.validated { "" } else { " (unvalidated)" };
    match &outcome.status {
        BundleStatus::Processed { written, unchanged } if *written == 0 => format!(
            "{} {}{} ({} files unchanged)",
            "OK    ".green(),
            outcome.identity.bold(),
            target,
            unchanged
        ),
        BundleStatus::Processed { written, unchanged } => format!(
            "{} {}{} ({} written, {} unchanged)",
            "UPDATE".cyan(),
            outcome.identity.bold(),
            target,
            written,
            unchanged
        ),
        BundleStatus::Skipped => format!(
            "{} {}{}",
            "SKIP  ".yellow(),
            outcome.identity,
            target
        ),
        BundleStatus::Failed(message) => format!(
            "{} {}{}: {}",
            "FAIL  ".red(),
            outcome.identity.bold(),
            target,
            message
        ),
    }
}

/// One-line summary of a single bundle write, for logging
pub fn format_write_summary(identity: &str, report: &WriteReport) -> String {
    if report.is_unchanged() {
        format!("{}: up to date ({} files)", identity, report.unchanged.len())
    } else {
        format!(
            "{}: {} written, {} unchanged",
            identity,
            report.written.len(),
            report.unchanged.len()
        )
    }
}
