#![allow(dead_code)]

use std::time::Duration;

use concurrency_timing::{Harness, HarnessConfig, WorkerCommand};

/// The harness binary, started in pool-worker mode.
pub fn worker_command() -> WorkerCommand {
    WorkerCommand::new(env!("CARGO_BIN_EXE_timing_harness"))
}

/// Workloads small enough that a full run takes well under a second.
pub fn quick_config() -> HarnessConfig {
    HarnessConfig::default()
        .with_pause(Duration::from_millis(10))
        .with_iterations(10_000)
}

pub fn harness(config: HarnessConfig) -> Harness {
    Harness::new(config, worker_command()).expect("valid test config")
}
