//! Serial execution vs. worker threads vs. a worker-process pool, timed on a
//! sleeping ("non-blocking") and a spinning ("blocking") workload.

pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod pool;
pub mod strategy;
pub mod wait_group;
pub mod workload;

pub use config::{HarnessConfig, WORKER_COUNT};
pub use error::{ConfigError, HarnessError, Result};
pub use harness::{Harness, Measurement, Report, Section};
pub use pool::{ProcessPool, WorkerCommand, WORKER_FLAG};
pub use strategy::Strategy;
pub use wait_group::ThreadGroup;
pub use workload::{Completion, Workload, WorkloadKind};
