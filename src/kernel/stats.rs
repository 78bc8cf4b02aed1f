use serde::{Deserialize, Serialize};

use super::kind::{Kind, KindCounts};
use super::RunNumber;

/// Outcome of one run end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub run: RunNumber,
    /// Entries per kind in the products handed to the sink.
    pub emitted: KindCounts,
    /// Elements dropped because their kind or value could not be resolved.
    pub skipped: usize,
    /// Non-empty buckets not emitted because the kind was not declared at init.
    pub undeclared: Vec<Kind>,
    /// Products the sink refused. Their elements were not reset.
    pub rejected: Vec<Kind>,
}

impl RunReport {
    pub fn new(run: RunNumber) -> Self {
        Self {
            run,
            emitted: KindCounts::new(),
            skipped: 0,
            undeclared: Vec::new(),
            rejected: Vec::new(),
        }
    }

    pub fn emitted_kinds(&self) -> Vec<Kind> {
        self.emitted.present().collect()
    }

    pub fn containers(&self) -> usize {
        self.emitted.present().count()
    }
}

/// Job-wide counters. Read-only for the conversion logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub runs_finalized: u64,
    pub elements_converted: KindCounts,
    pub containers_emitted: KindCounts,
    pub elements_skipped: u64,
    pub undeclared_skips: u64,
    pub rejected_products: u64,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, report: &RunReport) {
        self.runs_finalized += 1;
        for (kind, n) in report.emitted.iter() {
            if n > 0 {
                self.elements_converted.add(kind, n);
                self.containers_emitted.increment(kind);
            }
        }
        self.elements_skipped += report.skipped as u64;
        self.undeclared_skips += report.undeclared.len() as u64;
        self.rejected_products += report.rejected.len() as u64;
    }

    pub fn total_containers(&self) -> usize {
        self.containers_emitted.total()
    }
}

/// What the host gets back at job end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub runs_processed: usize,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_across_runs() {
        let mut stats = ConversionStats::new();

        let mut first = RunReport::new(1);
        first.emitted.add(Kind::Hist1D, 2);
        first.skipped = 1;
        stats.record(&first);

        let mut second = RunReport::new(2);
        second.emitted.add(Kind::Hist1D, 3);
        second.emitted.add(Kind::Int, 1);
        second.undeclared.push(Kind::Float);
        stats.record(&second);

        assert_eq!(stats.runs_finalized, 2);
        assert_eq!(stats.elements_converted.get(Kind::Hist1D), 5);
        assert_eq!(stats.containers_emitted.get(Kind::Hist1D), 2);
        assert_eq!(stats.total_containers(), 3);
        assert_eq!(stats.elements_skipped, 1);
        assert_eq!(stats.undeclared_skips, 1);
    }
}
