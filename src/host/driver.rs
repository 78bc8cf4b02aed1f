use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::error::ConverterError;
use crate::kernel::{Converter, JobSummary, RunNumber, RunReport};
use crate::monitor::MonitorStore;
use crate::output::ProductSink;

/// Lifecycle callbacks as delivered by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    BeginRun(RunNumber),
    EndRun(RunNumber),
    EndJob,
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    RunStarted(RunNumber),
    RunFinalized(RunReport),
    JobEnded(JobSummary),
}

/// Plays the host: owns the converter and the output sink and applies
/// lifecycle events strictly one after another.
pub struct JobDriver<S, O> {
    pub receiver: mpsc::Receiver<HostEvent>,
    converter: Converter<S>,
    sink: O,
    summary: Option<JobSummary>,
}

impl<S: MonitorStore, O: ProductSink> JobDriver<S, O> {
    pub fn new(receiver: mpsc::Receiver<HostEvent>, converter: Converter<S>, sink: O) -> Self {
        Self {
            receiver,
            converter,
            sink,
            summary: None,
        }
    }

    /// Synchronous step. Each callback runs to completion before the next one.
    pub fn dispatch(&mut self, event: HostEvent) -> Result<StepOutcome, ConverterError> {
        match event {
            HostEvent::BeginRun(run) => {
                self.converter.begin_run(run)?;
                Ok(StepOutcome::RunStarted(run))
            }
            HostEvent::EndRun(run) => {
                let report = self.converter.end_run(run, &mut self.sink)?;
                Ok(StepOutcome::RunFinalized(report))
            }
            HostEvent::EndJob => {
                let summary = self.converter.end_job()?;
                self.summary = Some(summary.clone());
                Ok(StepOutcome::JobEnded(summary))
            }
        }
    }

    /// Async driver loop: drain events until the job ends.
    /// A closed channel ends the job as if `EndJob` had been sent.
    pub async fn run(&mut self) -> Result<JobSummary, ConverterError> {
        info!("host driver started");

        while let Some(event) = self.receiver.recv().await {
            if let StepOutcome::JobEnded(summary) = self.dispatch(event)? {
                return Ok(summary);
            }
        }

        if let Some(summary) = &self.summary {
            return Ok(summary.clone());
        }
        warn!("event channel closed before job end, terminating job");
        let summary = self.converter.end_job()?;
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    pub fn converter(&self) -> &Converter<S> {
        &self.converter
    }

    pub fn converter_mut(&mut self) -> &mut Converter<S> {
        &mut self.converter
    }

    pub fn sink(&self) -> &O {
        &self.sink
    }

    pub fn into_parts(self) -> (Converter<S>, O) {
        (self.converter, self.sink)
    }
}
