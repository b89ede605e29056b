//! The two synthetic workload shapes.
//!
//! "Non-blocking" and "blocking" describe what a task does to the unit that
//! executes it: the first sleeps and gives the processor away (I/O wait), the
//! second spins on arithmetic and keeps it busy (CPU-bound work).

use std::fmt;
use std::hint::black_box;
use std::thread;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkloadKind {
    NonBlocking,
    Blocking,
}

impl WorkloadKind {
    /// Section title printed before the block of measurements.
    pub fn header(self) -> &'static str {
        match self {
            WorkloadKind::NonBlocking => "Execution of non-blocking tasks",
            WorkloadKind::Blocking => "Execution of blocking tasks",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadKind::NonBlocking => write!(f, "non-blocking"),
            WorkloadKind::Blocking => write!(f, "blocking"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum Workload {
    /// Suspends the executing unit for `pause`.
    NonBlocking { pause: Duration },
    /// Counts from zero up to `iterations`, one increment at a time.
    Blocking { iterations: u64 },
}

/// What a single workload invocation leaves behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    /// The (otherwise unused) argument the invocation was bound to.
    pub worker: usize,
    /// Process that executed the invocation.
    pub pid: u32,
    pub finished_at: SystemTime,
}

impl Workload {
    pub fn non_blocking(pause: Duration) -> Self {
        Workload::NonBlocking { pause }
    }

    pub fn blocking(iterations: u64) -> Self {
        Workload::Blocking { iterations }
    }

    pub fn kind(&self) -> WorkloadKind {
        match self {
            Workload::NonBlocking { .. } => WorkloadKind::NonBlocking,
            Workload::Blocking { .. } => WorkloadKind::Blocking,
        }
    }

    /// Runs the workload on the calling thread. `worker` only tags the result.
    pub fn perform(&self, worker: usize) -> Completion {
        match *self {
            Workload::NonBlocking { pause } => thread::sleep(pause),
            Workload::Blocking { iterations } => {
                count_up(iterations);
            }
        }

        Completion {
            worker,
            pid: std::process::id(),
            finished_at: SystemTime::now(),
        }
    }
}

fn count_up(limit: u64) -> u64 {
    let mut x = 0u64;
    // black_box keeps the loop from being folded into a constant.
    while black_box(x) < limit {
        x += 1;
    }
    x
}
