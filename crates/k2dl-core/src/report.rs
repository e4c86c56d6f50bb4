//! Human-readable lines for the CLI.

use crate::fetch::FetchOutcome;
use crate::resume::ResumeReport;

/// One line per completed file.
pub fn outcome_line(path: &str, outcome: &FetchOutcome) -> String {
    match outcome {
        FetchOutcome::Downloaded => format!("Downloaded: {}", path),
        FetchOutcome::AlreadyPresent => format!("File already exists: {}", path),
        FetchOutcome::Error(reason) => format!("Error downloading file: {}: {}", path, reason),
        FetchOutcome::Timeout => format!("Timeout occurred while processing {}", path),
    }
}

pub fn started_line(path: &str) -> String {
    format!("Downloading file: {}...", path)
}

/// Closing summary: success message, or error breakdown and numbered failures.
pub fn summary_lines(report: &ResumeReport) -> Vec<String> {
    let run = &report.run;
    let fin = &report.final_report;
    let mut lines = Vec::new();
    if run.errors.is_empty() {
        lines.push("All files are in place without errors. Resume the Kraken 2 build.".to_string());
        return lines;
    }

    lines.push(format!(
        "Finished, but {} file(s) hit server errors or timeouts ({} error(s), {} timeout(s)).",
        run.errors.len(),
        run.failed(),
        run.timed_out()
    ));
    lines.push("Checking whether the failed files are really missing...".to_string());
    if fin.unresolved.is_empty() {
        lines.push(
            "All failed files exist in their directories after all. Proceed with the Kraken 2 build."
                .to_string(),
        );
        return lines;
    }
    if !fin.reconciled.is_empty() {
        lines.push(format!(
            "{} of them were found on disk after all.",
            fin.reconciled.len()
        ));
    }
    for (idx, file) in fin.unresolved.iter().enumerate() {
        lines.push(format!("Failed {}: {}", idx + 1, file));
    }
    lines.push("If the list is long, re-run k2dl; otherwise download these files manually.".to_string());
    lines
}
