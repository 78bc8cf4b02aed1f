use std::collections::BTreeMap;

use super::RunNumber;

/// Occurrence count per run number. Never pruned.
#[derive(Debug, Clone, Default)]
pub struct RunCounter {
    counts: BTreeMap<RunNumber, u32>,
}

impl RunCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a begin-run and return the number of distinct runs seen so far.
    pub fn record(&mut self, run: RunNumber) -> usize {
        *self.counts.entry(run).or_insert(0) += 1;
        self.counts.len()
    }

    pub fn occurrences(&self, run: RunNumber) -> u32 {
        self.counts.get(&run).copied().unwrap_or(0)
    }

    pub fn distinct_runs(&self) -> usize {
        self.counts.len()
    }

    pub fn runs(&self) -> impl Iterator<Item = RunNumber> + '_ {
        self.counts.keys().copied()
    }
}

/// Whether a begin-run should be logged.
///
/// At verbosity 0 a run is logged when its number is a multiple of
/// `frequency`, or while exactly one distinct run has been seen (so a repeated
/// first run keeps logging). A non-positive frequency never matches.
pub fn should_log_run(verbosity: i32, frequency: i32, run: RunNumber, distinct_runs: usize) -> bool {
    if verbosity > 0 {
        return true;
    }
    if verbosity < 0 {
        return false;
    }
    let on_modulus = u32::try_from(frequency)
        .ok()
        .and_then(|f| run.checked_rem(f))
        .is_some_and(|rem| rem == 0);
    on_modulus || distinct_runs == 1
}
