//! `k2dl -i <dir>`: plan from disk, fetch what is missing, reconcile, report.

use anyhow::Result;
use k2dl_core::config::K2dlConfig;
use k2dl_core::fetch::Fetcher;
use k2dl_core::layout::{self, Layout};
use k2dl_core::report;
use k2dl_core::resume::{self, ResumeReport};
use k2dl_core::scheduler::{SchedulerOptions, TaskEvent};
use k2dl_core::transport::{CurlOptions, HttpClient};
use std::path::Path;
use std::sync::Arc;

pub fn run_resume(cfg: &K2dlConfig, input: &Path, threads: usize) -> Result<ResumeReport> {
    println!("Provided path: {}", input.display());
    let layout = Layout::new(input);
    if layout::has_trailing_separator(input) {
        println!("Trailing slash removed: {}", layout.base().display());
    }
    println!("Normalized path: {}", layout.base().display());

    let plan = resume::plan(&layout)?;
    println!("Genomes in manifest: {}", plan.manifest.len());
    println!("Missing genomes: {}", plan.missing_count());
    println!("Threads: {}", threads);

    let client = HttpClient::curl(
        CurlOptions {
            connect_timeout: cfg.connect_timeout(),
            request_timeout: cfg.request_timeout(),
            ..CurlOptions::default()
        },
        cfg.retry_policy(),
    );
    let fetcher = Arc::new(Fetcher::new(layout, &cfg.base_url, client)?);
    let opts = SchedulerOptions {
        worker_limit: threads,
        collect_timeout: cfg.collect_timeout(),
    };

    let report = resume::execute(&plan, fetcher, &opts, |event| {
        if resume::will_download(&plan, &event) {
            if let TaskEvent::Started(file) = event {
                println!("{}", report::started_line(&file.path));
            }
        }
        if let TaskEvent::Completed(file, outcome) = event {
            println!("{}", report::outcome_line(&file.path, outcome));
        }
    });

    tracing::info!(
        downloaded = report.run.downloaded(),
        present = report.run.already_present(),
        errors = report.run.failed(),
        timeouts = report.run.timed_out(),
        unresolved = report.final_report.unresolved.len(),
        "resume finished"
    );
    for line in report::summary_lines(&report) {
        println!("{}", line);
    }
    Ok(report)
}
