//! # Run Command Implementation
//!
//! Runs the full per-host pipeline over the inventory:
//! 1. Load `.config-splice.yaml` (or the defaults when the file is absent)
//! 2. Determine the hosts, from the file or the captured configurations
//! 3. Merge loopbacks, sub-interfaces, prefix-lists, route-maps and BGP
//! 4. Write each final configuration to the output directory
//!
//! Hosts run concurrently on a bounded worker pool. A failing host does not
//! stop the others, but makes the command exit with an error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use config_splice::config::{self, Settings};
use config_splice::defaults;
use config_splice::output::{describe_merge, emoji, host_status, OutputConfig};
use config_splice::pipeline::{self, HostReport, HostResult, RunOptions};
use config_splice::store::DirectoryStore;
use config_splice::suggestions;

/// Summary format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to config file
    #[arg(short, long, value_name = "PATH", env = "CONFIG_SPLICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only process hosts matching this glob (repeatable)
    #[arg(long = "host", value_name = "GLOB")]
    pub hosts: Vec<String>,

    /// Number of hosts processed concurrently (overrides the config file)
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Merge without writing the final configurations
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Summary format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

/// One host in the JSON summary
#[derive(Debug, Serialize)]
struct HostSummary<'a> {
    host: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a HostReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    dry_run: bool,
    succeeded: usize,
    failed: usize,
    hosts: Vec<HostSummary<'a>>,
}

fn load_settings(config: Option<PathBuf>) -> Result<Settings> {
    match config {
        Some(path) if !path.exists() => Err(suggestions::config_not_found(&path)),
        Some(path) => Ok(config::from_file(&path)?),
        None => {
            let path = Path::new(defaults::CONFIG_FILE);
            if path.exists() {
                Ok(config::from_file(path)?)
            } else {
                log::info!("{} not found, using default settings", defaults::CONFIG_FILE);
                Ok(Settings::default())
            }
        }
    }
}

fn progress_bar(len: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}") {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

fn summarize(results: &[HostResult], dry_run: bool) -> RunSummary<'_> {
    let hosts: Vec<HostSummary> = results
        .iter()
        .map(|r| HostSummary {
            host: &r.host,
            ok: r.result.is_ok(),
            report: r.result.as_ref().ok(),
            error: r.result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    let failed = hosts.iter().filter(|h| !h.ok).count();
    RunSummary {
        dry_run,
        succeeded: hosts.len() - failed,
        failed,
        hosts,
    }
}

fn print_text(summary: &RunSummary, out: &OutputConfig) {
    for host in &summary.hosts {
        match (host.report, &host.error) {
            (Some(report), _) => {
                let state = if report.pushed {
                    "written"
                } else if summary.dry_run {
                    "not written (dry run)"
                } else {
                    "not written"
                };
                println!("{} {}: {}", host_status(out, true), host.host, state);
                for merge in &report.merges {
                    println!("   {}", describe_merge(merge));
                }
                if !report.skipped.is_empty() {
                    let skipped: Vec<&str> = report.skipped.iter().map(|c| c.name()).collect();
                    println!("   skipped: {}", skipped.join(", "));
                }
            }
            (None, Some(error)) => {
                println!("{} {}: {}", host_status(out, false), host.host, error);
            }
            (None, None) => {}
        }
    }
}

/// Execute the run command
pub fn execute(args: RunArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let start_time = Instant::now();
    let text_output = !args.quiet && args.format == OutputFormat::Text;

    let mut settings = load_settings(args.config)?;
    if let Some(workers) = args.workers {
        settings.workers = workers;
    }
    settings.validate()?;

    let store = DirectoryStore::from_settings(&settings);
    let inventory = if settings.hosts.is_empty() {
        store.discover_hosts()
    } else {
        settings.hosts.clone()
    };
    let hosts = pipeline::select_hosts(&inventory, &args.hosts)?;
    if hosts.is_empty() {
        return Err(suggestions::no_hosts(&settings.running_dir, &args.hosts));
    }

    if text_output {
        println!("{} Config Splice Run", emoji(&out, "🔧", "[RUN]"));
        if args.dry_run {
            println!(
                "{} DRY RUN MODE - No configurations will be written",
                emoji(&out, "🔎", "[DRY]")
            );
        }
        println!();
    }

    let options = RunOptions {
        marker: settings.marker(),
        workers: settings.workers,
        dry_run: args.dry_run,
    };
    let bar = progress_bar(hosts.len(), !text_output);
    let results = pipeline::run_inventory_with(&hosts, &store, &store, &store, &options, |r| {
        bar.set_message(r.host.clone());
        bar.inc(1);
    })?;
    bar.finish_and_clear();

    let summary = summarize(&results, args.dry_run);
    match args.format {
        OutputFormat::Json if !args.quiet => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text if text_output => {
            print_text(&summary, &out);
            println!();
            println!(
                "{} {} succeeded, {} failed in {:.2}s",
                emoji(&out, "📊", "[SUMMARY]"),
                summary.succeeded,
                summary.failed,
                start_time.elapsed().as_secs_f64()
            );
            if !args.dry_run && summary.succeeded > 0 {
                println!("   Configurations written to: {}", settings.output_dir.display());
            }
        }
        _ => {}
    }

    if summary.failed > 0 {
        anyhow::bail!("{} of {} host(s) failed", summary.failed, results.len());
    }
    Ok(())
}
