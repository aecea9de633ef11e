//! Per-host merge pipeline
//!
//! Every host goes through the same linear sequence of stages, each one a
//! category merge applied to the buffer produced by the previous stage:
//!
//! 1. Loopbacks
//! 2. Sub-interfaces
//! 3. Prefix-lists, then route-maps
//! 4. BGP
//! 5. Handoff of the final text to the `ConfigSink`
//!
//! There is no branching and no retry. A failure aborts the remaining stages
//! of that host only; `run_inventory` keeps going with the other hosts and
//! reports one result per host.
//!
//! Per-host state lives in a `HostRecord` value that is threaded through the
//! stages explicitly. Hosts share nothing, so the worker pool needs no
//! locking.

use std::collections::BTreeMap;

use glob::Pattern;
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::category::Category;
use crate::collab::{ConfigSink, ConfigSource, Renderer};
use crate::error::{Error, Result};
use crate::merge::{merge, DesiredSet, MergeReport};
use crate::ownership::ManagedMarker;
use crate::text::ConfigText;

/// Captured configuration and rendered fragments of one host
#[derive(Debug, Clone)]
pub struct HostRecord {
    pub host: String,
    pub config: ConfigText,
    pub rendered: BTreeMap<Category, String>,
}

impl HostRecord {
    pub fn new(host: impl Into<String>, config: impl Into<ConfigText>) -> Self {
        Self {
            host: host.into(),
            config: config.into(),
            rendered: BTreeMap::new(),
        }
    }

    pub fn with_fragment(mut self, category: Category, rendered: impl Into<String>) -> Self {
        self.rendered.insert(category, rendered.into());
        self
    }

    /// Fetch the running configuration and every rendered fragment of `host`
    pub fn load<S, R>(host: &str, source: &S, renderer: &R) -> Result<Self>
    where
        S: ConfigSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let mut record = Self::new(host, source.fetch_running_config(host)?);
        for category in Category::ALL {
            if let Some(text) = renderer
                .render(host, category)
                .map_err(|e| e.in_stage(host, category))?
            {
                record.rendered.insert(category, text);
            }
        }
        Ok(record)
    }
}

/// What happened to one host
#[derive(Debug, Clone, Serialize)]
pub struct HostReport {
    pub host: String,
    pub merges: Vec<MergeReport>,
    /// Categories without a rendered fragment
    pub skipped: Vec<Category>,
    /// Whether the final text differs from the captured one
    pub changed: bool,
    /// Whether the final text was handed to the sink
    pub pushed: bool,
}

/// Run every stage on a host record, returning the final text and a report
pub fn run_stages(record: HostRecord, marker: &ManagedMarker) -> Result<(ConfigText, HostReport)> {
    let HostRecord {
        host,
        config: captured,
        rendered,
    } = record;

    let mut config = captured.clone();
    let mut merges = Vec::new();
    let mut skipped = Vec::new();

    for category in Category::ALL {
        let Some(fragment) = rendered.get(&category) else {
            debug!("{}: no {} fragment, skipping stage", host, category);
            skipped.push(category);
            continue;
        };

        let desired = DesiredSet::from_rendered(category, fragment)
            .map_err(|e| e.in_stage(&host, category))?;
        let outcome = merge(&config, &desired, marker).map_err(|e| e.in_stage(&host, category))?;
        config = outcome.text;
        merges.push(outcome.report);
    }

    let changed = config != captured;
    Ok((
        config,
        HostReport {
            host,
            merges,
            skipped,
            changed,
            pushed: false,
        },
    ))
}

/// Options shared by every host of a run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub marker: ManagedMarker,
    pub workers: usize,
    /// Merge without handing the result to the sink
    pub dry_run: bool,
}

/// Load, merge and push one host
pub fn run_host<S, R, K>(host: &str, source: &S, renderer: &R, sink: &K, options: &RunOptions) -> Result<HostReport>
where
    S: ConfigSource + ?Sized,
    R: Renderer + ?Sized,
    K: ConfigSink + ?Sized,
{
    info!("{}: obtaining running configuration", host);
    let record = HostRecord::load(host, source, renderer)?;

    let (config, mut report) = run_stages(record, &options.marker)?;

    if options.dry_run {
        info!("{}: dry run, final configuration not pushed", host);
    } else {
        info!("{}: pushing final configuration", host);
        sink.push_config(host, &config.to_string())?;
        report.pushed = true;
    }
    Ok(report)
}

/// Outcome of one host in an inventory run
#[derive(Debug)]
pub struct HostResult {
    pub host: String,
    pub result: Result<HostReport>,
}

/// Run every host on a bounded worker pool.
///
/// Results are returned in the order of `hosts`. Only failing to build the
/// pool is an error; host failures are reported in their `HostResult`.
pub fn run_inventory<S, R, K>(
    hosts: &[String],
    source: &S,
    renderer: &R,
    sink: &K,
    options: &RunOptions,
) -> Result<Vec<HostResult>>
where
    S: ConfigSource + ?Sized,
    R: Renderer + ?Sized,
    K: ConfigSink + ?Sized,
{
    run_inventory_with(hosts, source, renderer, sink, options, |_| {})
}

/// `run_inventory`, calling `on_done` from the worker as each host finishes
pub fn run_inventory_with<S, R, K, F>(
    hosts: &[String],
    source: &S,
    renderer: &R,
    sink: &K,
    options: &RunOptions,
    on_done: F,
) -> Result<Vec<HostResult>>
where
    S: ConfigSource + ?Sized,
    R: Renderer + ?Sized,
    K: ConfigSink + ?Sized,
    F: Fn(&HostResult) + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.max(1))
        .build()?;

    let results: Vec<HostResult> = pool.install(|| {
        hosts
            .par_iter()
            .map(|host| {
                let result = HostResult {
                    host: host.clone(),
                    result: run_host(host, source, renderer, sink, options),
                };
                on_done(&result);
                result
            })
            .collect()
    });

    for failed in &results {
        if let Err(e) = &failed.result {
            log_host_failure(&failed.host, e);
        }
    }
    Ok(results)
}

/// Stage errors already name their host
fn log_host_failure(host: &str, error: &Error) {
    match error {
        Error::Stage { .. } => warn!("{}", error),
        _ => warn!("{}: {}", host, error),
    }
}

/// Keep the hosts matching any of the glob `patterns` (all hosts if none)
pub fn select_hosts(hosts: &[String], patterns: &[String]) -> Result<Vec<String>> {
    if patterns.is_empty() {
        return Ok(hosts.to_vec());
    }
    let compiled = patterns
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(hosts
        .iter()
        .filter(|host| compiled.iter().any(|p| p.matches(host)))
        .cloned()
        .collect())
}
