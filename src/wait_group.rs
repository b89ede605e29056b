//! Join-all barrier over a set of worker threads.

use std::thread::{self, JoinHandle};

use crate::error::{HarnessError, Result};

/// Owns the handles of every thread it started. [`ThreadGroup::wait`] is the
/// single blocking "wait for all" point; no handle outlives it.
pub struct ThreadGroup<T> {
    handles: Vec<JoinHandle<T>>,
}

impl<T: Send + 'static> ThreadGroup<T> {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::with_capacity(capacity),
        }
    }

    /// Starts a thread named `worker-<index>`, where index is its creation order.
    pub fn spawn<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = format!("worker-{}", self.handles.len());
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(f)
            .map_err(|err| HarnessError::spawn(format!("thread {name}"), err))?;
        self.handles.push(handle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Joins every thread in creation order and returns their results in that
    /// order. A panicking worker does not cut the barrier short: the rest are
    /// still joined, then the first panic is reported.
    pub fn wait(self) -> Result<Vec<T>> {
        let mut results = Vec::with_capacity(self.handles.len());
        let mut first_panic = None;

        for (index, handle) in self.handles.into_iter().enumerate() {
            match handle.join() {
                Ok(value) => results.push(value),
                Err(_) => {
                    tracing::warn!(index, "worker thread panicked");
                    first_panic.get_or_insert(index);
                }
            }
        }

        match first_panic {
            Some(index) => Err(HarnessError::WorkerPanicked { index }),
            None => Ok(results),
        }
    }
}

impl<T: Send + 'static> Default for ThreadGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn results_come_back_in_creation_order() {
        let mut group = ThreadGroup::new();
        for i in 0..4u64 {
            // Later threads finish first.
            group
                .spawn(move || {
                    thread::sleep(Duration::from_millis(40 - i * 10));
                    i
                })
                .unwrap();
        }
        assert_eq!(group.len(), 4);
        assert_eq!(group.wait().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn threads_are_named_by_index() {
        let mut group = ThreadGroup::new();
        for _ in 0..2 {
            group
                .spawn(|| thread::current().name().map(str::to_owned))
                .unwrap();
        }
        let names = group.wait().unwrap();
        assert_eq!(
            names,
            vec![Some("worker-0".to_string()), Some("worker-1".to_string())]
        );
    }

    #[test]
    fn panic_is_reported_after_all_workers_finish() {
        let finished = Arc::new(AtomicUsize::new(0));
        let mut group = ThreadGroup::new();

        for i in 0..3 {
            let finished = Arc::clone(&finished);
            group
                .spawn(move || {
                    if i == 1 {
                        panic!("worker {i} failed");
                    }
                    thread::sleep(Duration::from_millis(20));
                    finished.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        match group.wait() {
            Err(HarnessError::WorkerPanicked { index }) => assert_eq!(index, 1),
            other => panic!("expected a panic report, got {other:?}"),
        }
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn empty_group_waits_trivially() {
        let group: ThreadGroup<()> = ThreadGroup::default();
        assert!(group.is_empty());
        assert!(group.wait().unwrap().is_empty());
    }
}
