//! The three ways of running a batch of independent invocations.

use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::wait_group::ThreadGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One call after another on the calling thread.
    Serial,
    /// One worker thread per invocation, then join all.
    Threaded,
    /// A process pool and a blocking parallel map.
    Pooled,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Serial, Strategy::Threaded, Strategy::Pooled];

    /// Report label. The lowercase "multiprocessing" is intentional.
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Serial => "Serial",
            Strategy::Threaded => "Threading",
            Strategy::Pooled => "multiprocessing",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calls `task(0)`, `task(1)`, ... `task(count - 1)` in a loop.
pub fn run_serial<T, F>(count: usize, task: F) -> Vec<T>
where
    F: FnMut(usize) -> T,
{
    (0..count).map(task).collect()
}

/// Starts `count` threads, each bound to `task` with its own index, and joins
/// them all before returning.
pub fn run_threaded<T, F>(count: usize, task: Arc<F>) -> Result<Vec<T>>
where
    T: Send + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    let mut group = ThreadGroup::with_capacity(count);
    for worker in 0..count {
        let task = Arc::clone(&task);
        group.spawn(move || task(worker))?;
    }
    group.wait()
}
