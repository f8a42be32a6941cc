//! Merge coordination.
//!
//! Reads the manifest, prepares and opens the destination once, then merges
//! each source in manifest order. Sources are strictly sequential: every
//! offset depends on what earlier sources committed.

use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::init::prepare_destination;
use crate::manifest::read_manifest;
use crate::store::{MergeStats, SourceOutcome, Store};
use crate::{Config, Error, Result};

/// Result of a full merge run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub destination: PathBuf,
    pub sources: Vec<SourceOutcome>,
}

impl MergeReport {
    /// Rows inserted across all merged sources.
    pub fn totals(&self) -> MergeStats {
        let mut totals = MergeStats::default();
        for stats in self.sources.iter().filter_map(SourceOutcome::stats) {
            totals.add(stats);
        }
        totals
    }

    pub fn merged_count(&self) -> usize {
        self.sources.iter().filter(|s| s.stats().is_some()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.sources.len() - self.merged_count()
    }
}

/// Drives one merge run from a [`Config`].
pub struct Coordinator {
    config: Config,
}

impl Coordinator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the merge without progress reporting.
    pub fn run(&self) -> Result<MergeReport> {
        self.run_with_progress(|_| {})
    }

    /// Run the merge, calling `on_source` after each manifest entry.
    ///
    /// A storage error aborts the run. Sources committed before the failure
    /// stay in the destination.
    pub fn run_with_progress<F>(&self, mut on_source: F) -> Result<MergeReport>
    where
        F: FnMut(&SourceOutcome),
    {
        let sources = read_manifest(&self.config.list_path)?;
        if sources.is_empty() {
            return Err(Error::EmptyManifest(self.config.list_path.clone()));
        }

        prepare_destination(&self.config.out_path, self.config.fresh)?;
        let mut store = Store::open(&self.config.out_path)?;
        info!(
            destination = %self.config.out_path.display(),
            sources = sources.len(),
            "starting merge"
        );

        let mut outcomes = Vec::with_capacity(sources.len());
        for source in &sources {
            let outcome = store.merge_source(source)?;
            on_source(&outcome);
            outcomes.push(outcome);
        }

        Ok(MergeReport {
            destination: self.config.out_path.clone(),
            sources: outcomes,
        })
    }
}
