//! Runs the six (workload x strategy) experiments and reports their timings.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::config::HarnessConfig;
use crate::error::Result;
use crate::pool::{ProcessPool, WorkerCommand};
use crate::strategy::{run_serial, run_threaded, Strategy};
use crate::workload::{Completion, Workload, WorkloadKind};

/// One timed experiment.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub kind: WorkloadKind,
    pub strategy: Strategy,
    pub elapsed: Duration,
    pub started_at: SystemTime,
    pub finished_at: SystemTime,
    /// One entry per workload invocation, in invocation-argument order.
    pub completions: Vec<Completion>,
}

impl Measurement {
    /// `"<Label> time=<seconds>"`
    pub fn line(&self) -> String {
        format!("{} time={}", self.strategy.label(), self.elapsed.as_secs_f64())
    }

    pub fn invocations(&self) -> usize {
        self.completions.len()
    }

    /// Wall-clock time at which the slowest invocation finished.
    pub fn last_completion(&self) -> Option<SystemTime> {
        self.completions.iter().map(|c| c.finished_at).max()
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    pub kind: WorkloadKind,
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub sections: Vec<Section>,
}

impl Report {
    pub fn measurements(&self) -> impl Iterator<Item = &Measurement> {
        self.sections.iter().flat_map(|s| s.measurements.iter())
    }
}

pub struct Harness {
    config: HarnessConfig,
    worker_command: WorkerCommand,
}

impl Harness {
    pub fn new(config: HarnessConfig, worker_command: WorkerCommand) -> Result<Self> {
        config.validate()?;

        let cpus = num_cpus::get();
        if config.worker_count > cpus {
            tracing::warn!(
                workers = config.worker_count,
                cpus,
                "more workers than CPUs; CPU-bound work cannot run fully in parallel"
            );
        }

        Ok(Self {
            config,
            worker_command,
        })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The two workloads, non-blocking first.
    pub fn workloads(&self) -> [Workload; 2] {
        [
            Workload::non_blocking(self.config.pause),
            Workload::blocking(self.config.iterations),
        ]
    }

    /// Times `worker_count` invocations of `workload` under `strategy`. The
    /// clock stops only after every invocation has completed and every worker
    /// thread or process has been joined.
    pub fn measure(&self, workload: Workload, strategy: Strategy) -> Result<Measurement> {
        let count = self.config.worker_count;
        tracing::debug!(kind = %workload.kind(), %strategy, count, "experiment starting");

        let started_at = SystemTime::now();
        let clock = Instant::now();

        let completions = match strategy {
            Strategy::Serial => run_serial(count, |worker| workload.perform(worker)),
            Strategy::Threaded => {
                run_threaded(count, Arc::new(move |worker: usize| workload.perform(worker)))?
            }
            Strategy::Pooled => {
                let mut pool = ProcessPool::spawn(&self.worker_command, self.config.pool_size)?;
                let completions = pool.map(vec![workload; count])?;
                pool.shutdown()?;
                completions
            }
        };

        let elapsed = clock.elapsed();
        let finished_at = SystemTime::now();
        tracing::debug!(kind = %workload.kind(), %strategy, ?elapsed, "experiment finished");

        Ok(Measurement {
            kind: workload.kind(),
            strategy,
            elapsed,
            started_at,
            finished_at,
            completions,
        })
    }

    /// Runs every experiment in order, writing each line as soon as its
    /// measurement is taken.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Report> {
        let mut report = Report::default();

        for (position, workload) in self.workloads().into_iter().enumerate() {
            if position > 0 {
                writeln!(out)?;
            }
            writeln!(out, "{}", workload.kind().header())?;
            out.flush()?;

            let mut measurements = Vec::with_capacity(Strategy::ALL.len());
            for strategy in Strategy::ALL {
                let measurement = self.measure(workload, strategy)?;
                writeln!(out, "{}", measurement.line())?;
                out.flush()?;
                measurements.push(measurement);
            }

            report.sections.push(Section {
                kind: workload.kind(),
                measurements,
            });
        }

        Ok(report)
    }
}
