use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use tracing::warn;

use ccnx_service::{ConnectionList, ContentStoreService};
use ccnx_store::{ContentStore, ContentStoreConfig, StoreStats};

use crate::cli::*;
use crate::trace::{parse_trace, TraceOp, TraceRecord};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Replay(args) => cmd_replay(args, cli.format),
        Command::Config(args) => cmd_config(args),
    }
}

/// Load a TOML config file, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ContentStoreConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ContentStoreConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Outcome of replaying a trace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub records: usize,
    pub stats: StoreStats,
    /// Match requests the store could not resolve at all.
    pub match_errors: u64,
    /// Add requests that did not leave the object resident.
    pub failed_adds: u64,
    pub resident: usize,
    pub capacity: usize,
    pub finished_at_us: u64,
}

/// Feed `records` through a delayed content store built from `config`.
pub fn replay(config: ContentStoreConfig, records: &[TraceRecord]) -> anyhow::Result<ReplaySummary> {
    let mut service = ContentStoreService::with_config(config)?;

    let match_errors = Rc::new(Cell::new(0u64));
    let failed_adds = Rc::new(Cell::new(0u64));
    {
        let match_errors = Rc::clone(&match_errors);
        service.set_match_interest_callback(move |done| {
            if done.error.is_some() {
                match_errors.set(match_errors.get() + 1);
            }
        });
        let failed_adds = Rc::clone(&failed_adds);
        service.set_add_content_object_callback(move |done| {
            if !done.admitted {
                failed_adds.set(failed_adds.get() + 1);
            }
        });
    }

    for (i, record) in records.iter().enumerate() {
        if record.at() < service.now() {
            warn!(record = i + 1, at_us = record.at_us, "record out of order; submitting now");
        }
        service.advance_to(record.at());
        let (op, message) = record
            .to_message()
            .with_context(|| format!("trace record {}", i + 1))?;
        match op {
            TraceOp::Add => service.submit_add(message, ConnectionList::new()),
            TraceOp::Match => service.submit_match(message),
            TraceOp::Remove => service.submit_remove(message),
        };
    }
    service.run_until_idle();

    let store = service.store();
    Ok(ReplaySummary {
        records: records.len(),
        stats: store.stats(),
        match_errors: match_errors.get(),
        failed_adds: failed_adds.get(),
        resident: store.object_count(),
        capacity: store.object_capacity(),
        finished_at_us: u64::try_from(service.now().as_micros()).unwrap_or(u64::MAX),
    })
}

fn cmd_replay(args: ReplayArgs, format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let text = fs::read_to_string(&args.trace)
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let records = parse_trace(&text)?;
    let summary = replay(config, &records)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print_summary(&args.trace, &summary),
    }
    Ok(())
}

fn print_summary(trace: &Path, summary: &ReplaySummary) {
    let s = &summary.stats;
    let lookups = s.hits + s.misses;
    let hit_rate = if lookups == 0 {
        0.0
    } else {
        s.hits as f64 * 100.0 / lookups as f64
    };
    println!(
        "{} Replayed {} records from {} ({} us)",
        "✓".green().bold(),
        summary.records.to_string().bold(),
        trace.display(),
        summary.finished_at_us
    );
    println!(
        "  Matches:   {} hits, {} misses ({:.1}% hit rate)",
        s.hits.to_string().green(),
        s.misses.to_string().yellow(),
        hit_rate
    );
    println!(
        "  Adds:      {} admitted, {} refreshed, {} rejected",
        s.admitted.to_string().green(),
        s.refreshed,
        s.rejected.to_string().red()
    );
    println!(
        "  Removals:  {} removed, {} not found",
        s.removed, s.not_found
    );
    println!("  Evicted:   {} ({} displaced by newer versions)", s.evicted, s.displaced);
    if summary.match_errors > 0 {
        println!("  {} {} malformed match requests", "!".red().bold(), summary.match_errors);
    }
    println!(
        "  Resident:  {}/{}",
        summary.resident.to_string().cyan(),
        summary.capacity
    );
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
