use std::collections::BTreeSet;
use tracing::{error, info, info_span};

use super::bucket::RunBuckets;
use super::inventory::Inventory;
use super::kind::Kind;
use super::lifecycle::{ConverterState, Lifecycle, LifecycleRequest};
use super::run_counter::{should_log_run, RunCounter};
use super::stats::{ConversionStats, JobSummary, RunReport};
use super::RunNumber;
use crate::config::ConverterConfig;
use crate::error::ConverterError;
use crate::monitor::MonitorStore;
use crate::output::ProductSink;

/// Turns the contents of a monitoring-element store into per-run products.
///
/// The host drives it through `initialize`, then `begin_run`/`end_run` pairs,
/// then `end_job`. Calls are expected one at a time and in that order; anything
/// else is rejected with [`ConverterError::InvalidTransition`].
pub struct Converter<S> {
    config: ConverterConfig,
    verbosity: i32,
    store: S,
    state: ConverterState,
    inventory: Inventory,
    declared: BTreeSet<Kind>,
    runs: RunCounter,
    stats: ConversionStats,
}

impl<S: MonitorStore> Converter<S> {
    /// Connect to the store, take inventory and declare one product slot per
    /// kind present. Declarations are final for the lifetime of the converter.
    pub fn initialize<O>(config: ConverterConfig, store: Option<S>, sink: &mut O) -> Result<Self, ConverterError>
    where
        O: ProductSink + ?Sized,
    {
        let _span = info_span!("init", label = %config.name).entered();
        config.validate()?;

        let verbosity = config.effective_verbosity();
        if verbosity >= 0 {
            info!(
                name = %config.name,
                verbosity,
                frequency = config.frequency,
                "initialized with parameter values"
            );
        }

        let mut store = store.ok_or(ConverterError::StoreUnavailable)?;
        store.set_verbose(if verbosity != 0 { 1 } else { 0 });

        // 1. Inventory (counts only)
        let inventory = Inventory::take(&store.contents(""), verbosity);
        if verbosity > 0 {
            inventory.log_summary();
        }

        // 2. Declare product shapes
        let mut declared = BTreeSet::new();
        for kind in inventory.declared_kinds() {
            sink.produces(kind, &config.name)?;
            declared.insert(kind);
        }

        Ok(Self {
            config,
            verbosity,
            store,
            state: ConverterState::Initialized,
            inventory,
            declared,
            runs: RunCounter::new(),
            stats: ConversionStats::new(),
        })
    }

    fn advance(&mut self, request: LifecycleRequest) -> Result<(), ConverterError> {
        let next = Lifecycle::transition(self.state, request).ok_or(ConverterError::InvalidTransition {
            state: self.state,
            request,
        })?;
        self.state = next;
        Ok(())
    }

    pub fn begin_run(&mut self, run: RunNumber) -> Result<(), ConverterError> {
        let _span = info_span!("begin_run", run).entered();
        self.advance(LifecycleRequest::BeginRun(run))?;

        let total = self.runs.record(run);
        if should_log_run(self.verbosity, self.config.frequency, run, total) {
            info!(run, runs_total = total, "processing run");
        }
        Ok(())
    }

    /// Extract every element into the run's buckets and hand one product per
    /// non-empty bucket to the sink.
    ///
    /// Element-level faults are logged and skipped, and so are products the
    /// sink refuses. Object-kind elements are reset in the store only once the
    /// product holding their snapshot has been stored.
    pub fn end_run<O>(&mut self, run: RunNumber, sink: &mut O) -> Result<RunReport, ConverterError>
    where
        O: ProductSink + ?Sized,
    {
        let _span = info_span!("end_run", run).entered();
        self.advance(LifecycleRequest::EndRun(run))?;

        if self.verbosity > 0 {
            info!("storing monitoring elements as run products");
        }

        let mut report = RunReport::new(run);

        // 1. Extract
        let mut buckets = RunBuckets::new();
        for me in self.store.contents("") {
            if let Err(e) = buckets.classify(me, self.verbosity) {
                error!("{}", e);
                report.skipped += 1;
            }
        }

        // 2. Emit
        let mut stored = BTreeSet::new();
        for product in buckets.into_products() {
            let kind = product.kind();
            let entries = product.len();
            if !self.declared.contains(&kind) {
                error!(
                    %kind,
                    label = %self.config.name,
                    entries,
                    "kind was not declared at initialization, product dropped"
                );
                report.undeclared.push(kind);
                continue;
            }
            let names = if kind.is_object() {
                product.names().to_vec()
            } else {
                Vec::new()
            };
            match sink.put(run, &self.config.name, product) {
                Ok(()) => {
                    report.emitted.add(kind, entries);
                    stored.extend(names);
                }
                Err(e) => {
                    error!(%kind, entries, "{}", e);
                    report.rejected.push(kind);
                }
            }
        }

        // 3. Reset what was stored
        for me in self.store.contents_mut("") {
            if stored.contains(&me.full_name()) {
                me.reset();
            }
        }

        self.stats.record(&report);
        Ok(report)
    }

    pub fn end_job(&mut self) -> Result<JobSummary, ConverterError> {
        let _span = info_span!("end_job").entered();
        self.advance(LifecycleRequest::EndJob)?;

        let runs = self.runs.distinct_runs();
        if self.verbosity >= 0 {
            info!(runs, "terminating having processed runs");
        }
        Ok(JobSummary {
            runs_processed: runs,
            stats: self.stats.clone(),
        })
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn verbosity(&self) -> i32 {
        self.verbosity
    }

    pub fn state(&self) -> ConverterState {
        self.state
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn declared_kinds(&self) -> Vec<Kind> {
        self.declared.iter().copied().collect()
    }

    pub fn run_counter(&self) -> &RunCounter {
        &self.runs
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.stats
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Host-side access, e.g. to fill elements between runs.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
