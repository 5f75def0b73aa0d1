//! Run statistics
//!
//! Counters accumulated by the scanner while it walks the snapshots, and a
//! console rendering printed at the end of a run.

use std::collections::HashMap;

/// How the processing of one snapshot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotOutcome {
    /// Text extracted and at least one keyword matched
    Matched,

    /// Text extracted, no keyword matched
    Clean,

    /// Fetch failed after exhausting retries
    FetchFailed,

    /// Response was not declared as a PDF
    NotPdf,
}

impl SnapshotOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SnapshotOutcome::Matched => "matched",
            SnapshotOutcome::Clean => "clean",
            SnapshotOutcome::FetchFailed => "fetch failed",
            SnapshotOutcome::NotPdf => "not a PDF",
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SnapshotOutcome::FetchFailed | SnapshotOutcome::NotPdf)
    }
}

/// Scan statistics summary
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Target URLs processed
    pub targets: u64,

    /// Snapshots listed by the index across all targets
    pub snapshots_found: u64,

    /// Count of snapshots by outcome
    pub outcomes: HashMap<SnapshotOutcome, u64>,

    /// Count of extractions by strategy name ("none" when nothing was produced)
    pub extractions: HashMap<&'static str, u64>,

    /// Total keyword occurrences recorded
    pub keyword_hits: u64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, outcome: SnapshotOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    pub fn record_extraction(&mut self, strategy: Option<&'static str>) {
        *self.extractions.entry(strategy.unwrap_or("none")).or_insert(0) += 1;
    }

    pub fn count(&self, outcome: SnapshotOutcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Snapshots that were fetched and extracted
    pub fn snapshots_scanned(&self) -> u64 {
        self.count(SnapshotOutcome::Matched) + self.count(SnapshotOutcome::Clean)
    }

    /// Snapshots skipped because of a fetch failure or non-PDF content
    pub fn snapshots_skipped(&self) -> u64 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_skip())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &ScanStats) {
    println!("=== Scan Statistics ===\n");

    println!("Overview:");
    println!("  Targets processed: {}", stats.targets);
    println!("  Snapshots found: {}", stats.snapshots_found);
    println!("  Snapshots scanned: {}", stats.snapshots_scanned());
    println!("  Snapshots skipped: {}", stats.snapshots_skipped());
    println!("  Keyword hits: {}", stats.keyword_hits);
    println!();

    println!("Snapshots by Outcome:");
    let mut outcome_counts: Vec<_> = stats.outcomes.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1));

    for (outcome, count) in outcome_counts {
        println!("  {}: {}", outcome.label(), count);
    }
    println!();

    if !stats.extractions.is_empty() {
        println!("Extraction Strategies:");
        let mut strategy_counts: Vec<_> = stats.extractions.iter().collect();
        strategy_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (strategy, count) in strategy_counts {
            println!("  {}: {}", strategy, count);
        }
        println!();
    }
}
