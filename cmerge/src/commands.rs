//! CLI command implementations.

use std::path::{Path, PathBuf};

use courtdb::init::prepare_destination;
use courtdb::{
    read_manifest, Config, Coordinator, Error, MergeStats, MinutesSummary, SourceOutcome, Store,
};

/// Options for the merge command, after argument parsing.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub list: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub fresh: bool,
    pub format: String,
    pub quiet: bool,
}

/// Load the config file named on the command line, or ./cmerge.toml.
fn load_config(config_file: Option<&Path>) -> courtdb::Result<Config> {
    match config_file {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Config::load_from(path)
        }
        None => Config::load_in(&std::env::current_dir()?),
    }
}

fn check_format(format: &str) -> courtdb::Result<()> {
    match format {
        "table" | "json" => Ok(()),
        other => Err(Error::Config(format!(
            "Unknown format '{}' (expected table or json)",
            other
        ))),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> courtdb::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}

pub fn merge(opts: &MergeOptions) -> courtdb::Result<()> {
    check_format(&opts.format)?;

    let mut config = load_config(opts.config.as_deref())?;
    if let Some(list) = &opts.list {
        config.list_path = list.clone();
    }
    if let Some(out) = &opts.out {
        config.out_path = out.clone();
    }
    if opts.fresh {
        config.fresh = true;
    }

    let json = opts.format == "json";
    let show_progress = !opts.quiet && !json;

    let coordinator = Coordinator::new(config);
    let report = coordinator.run_with_progress(|outcome| {
        if !show_progress {
            return;
        }
        match outcome {
            SourceOutcome::Merged { path, .. } => println!("Merged {}", path.display()),
            SourceOutcome::Skipped { path, .. } => println!("Skipping missing DB: {}", path.display()),
        }
    })?;

    if json {
        return print_json(&report);
    }

    if !opts.quiet {
        let totals = report.totals();
        println!();
        println!(
            "{} merged, {} skipped",
            report.merged_count(),
            report.skipped_count()
        );
        print_stats(&totals);
    }
    println!("Combined DB written to {}", report.destination.display());

    Ok(())
}

fn print_stats(stats: &MergeStats) {
    println!("  {:<14} {:>10}", "sessions", stats.sessions);
    println!("  {:<14} {:>10}", "matches", stats.matches);
    println!("  {:<14} {:>10}", "points", stats.points);
    println!("  {:<14} {:>10}", "player_stats", stats.player_stats);
    println!("  {:<14} {:>10}", "events", stats.events);
    println!("  {:<14} {:>10}", "debug_events", stats.debug_events);
}

pub fn minutes(
    paths: &[PathBuf],
    list: Option<&Path>,
    no_list: bool,
    config_file: Option<&Path>,
    format: &str,
) -> courtdb::Result<()> {
    check_format(format)?;

    let mut sources = Vec::new();
    if !no_list {
        let list_path = match list {
            Some(path) => path.to_path_buf(),
            None => load_config(config_file)?.list_path,
        };
        // The default list is optional here; an explicit one must exist.
        if list.is_some() || list_path.exists() || paths.is_empty() {
            sources.extend(read_manifest(&list_path)?);
        }
    }
    sources.extend(paths.iter().cloned());

    if sources.is_empty() {
        return Err(Error::Config("No DBs to summarize".to_string()));
    }

    let summary = MinutesSummary::collect(sources.as_slice())?;

    if format == "json" {
        print_json(&summary)?;
        return missing_sources(&summary);
    }

    for source in &summary.sources {
        match (source.matches, source.duration_secs) {
            (Some(count), Some(secs)) => println!(
                "{}: {} matches, {:.1} min",
                source.path.display(),
                count,
                secs / 60.0
            ),
            _ => println!("{}: missing", source.path.display()),
        }
    }
    println!();
    println!("Total matches: {}", summary.total_matches);
    println!("Total seconds: {:.1}", summary.total_secs);
    println!("Total minutes: {:.1}", summary.total_minutes());

    missing_sources(&summary)
}

/// Totals are still printed, but a missing store fails the command.
fn missing_sources(summary: &MinutesSummary) -> courtdb::Result<()> {
    match summary.sources.iter().find(|s| s.is_missing()) {
        Some(source) => Err(Error::SourceMissing(source.path.clone())),
        None => Ok(()),
    }
}

pub fn init(out: Option<&Path>, config_file: Option<&Path>) -> courtdb::Result<()> {
    let out_path = match out {
        Some(path) => path.to_path_buf(),
        None => load_config(config_file)?.out_path,
    };

    prepare_destination(&out_path, false)?;
    Store::open(&out_path)?;
    println!("Initialized {}", out_path.display());
    Ok(())
}
