//! Bounded pool of worker processes.
//!
//! Each pool worker is a child process running [`serve`]: it reads one JSON
//! task per line on stdin, runs it, and answers with one JSON line on stdout.
//! The parent drives every child from its own scoped thread, and the threads
//! pull from one shared queue, so an idle worker always takes the next task.

use std::env;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::thread;

use crossbeam::queue::SegQueue;
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};
use crate::workload::{Completion, Workload};

/// Argument that switches the harness binary into pool-worker mode.
pub const WORKER_FLAG: &str = "--pool-worker";

#[derive(Debug, Serialize, Deserialize)]
struct TaskRequest {
    index: usize,
    workload: Workload,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskReply {
    index: usize,
    completion: Completion,
}

/// The program (plus arguments) started for every pool worker.
#[derive(Debug, Clone)]
pub struct WorkerCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl WorkerCommand {
    /// `program --pool-worker`
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: vec![OsString::from(WORKER_FLAG)],
        }
    }

    /// Re-executes the running binary as the worker.
    pub fn current_exe() -> Result<Self> {
        let program = env::current_exe()
            .map_err(|err| HarnessError::spawn("pool worker (current executable)", err))?;
        Ok(Self::new(program))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        command
    }
}

struct PoolWorker {
    id: usize,
    child: Child,
    input: Option<ChildStdin>,
    output: BufReader<ChildStdout>,
}

impl PoolWorker {
    fn start(id: usize, command: &WorkerCommand) -> Result<Self> {
        let what = format!("pool worker {id}");
        let mut child = command
            .command()
            .spawn()
            .map_err(|err| HarnessError::spawn(what.as_str(), err))?;

        let pipes = child.stdin.take().zip(child.stdout.take());
        let Some((input, output)) = pipes else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(HarnessError::spawn(
                what,
                io::Error::new(io::ErrorKind::Other, "worker pipes were not captured"),
            ));
        };

        tracing::debug!(worker = id, pid = child.id(), "pool worker started");
        Ok(Self {
            id,
            child,
            input: Some(input),
            output: BufReader::new(output),
        })
    }

    fn run_task(&mut self, request: &TaskRequest) -> Result<Completion> {
        let input = self
            .input
            .as_mut()
            .ok_or(HarnessError::WorkerExited { worker: self.id })?;

        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        input.write_all(line.as_bytes())?;
        input.flush()?;

        let mut reply_line = String::new();
        if self.output.read_line(&mut reply_line)? == 0 {
            return Err(HarnessError::WorkerExited { worker: self.id });
        }

        let reply: TaskReply = serde_json::from_str(&reply_line)?;
        if reply.index != request.index {
            return Err(HarnessError::UnexpectedResult {
                expected: request.index,
                got: reply.index,
            });
        }
        Ok(reply.completion)
    }

    /// Drains the shared queue until it is empty.
    fn drain(&mut self, queue: &SegQueue<TaskRequest>) -> Result<Vec<(usize, Completion)>> {
        let mut done = Vec::new();
        while let Some(request) = queue.pop() {
            let completion = self.run_task(&request)?;
            done.push((request.index, completion));
        }
        Ok(done)
    }

    /// Closes the worker's input, which ends its serve loop, then reaps it.
    fn finish(&mut self) -> Result<()> {
        drop(self.input.take());
        let status = self.child.wait()?;
        if !status.success() {
            tracing::warn!(worker = self.id, %status, "pool worker exited abnormally");
        }
        tracing::debug!(worker = self.id, "pool worker stopped");
        Ok(())
    }
}

pub struct ProcessPool {
    workers: Vec<PoolWorker>,
}

impl ProcessPool {
    /// Starts `size` worker processes.
    pub fn spawn(command: &WorkerCommand, size: usize) -> Result<Self> {
        let mut pool = Self {
            workers: Vec::with_capacity(size),
        };
        for id in 0..size {
            // On failure the partially built pool is dropped and reaps what started.
            pool.workers.push(PoolWorker::start(id, command)?);
        }
        Ok(pool)
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Worker process ids, in pool order.
    pub fn pids(&self) -> Vec<u32> {
        self.workers.iter().map(|worker| worker.child.id()).collect()
    }

    /// Runs every task on the pool and blocks until all of them completed.
    /// Results are in submission order regardless of completion order.
    pub fn map(&mut self, tasks: Vec<Workload>) -> Result<Vec<Completion>> {
        let count = tasks.len();
        let queue = SegQueue::new();
        for (index, workload) in tasks.into_iter().enumerate() {
            queue.push(TaskRequest { index, workload });
        }

        let outcomes: Vec<Result<Vec<(usize, Completion)>>> = thread::scope(|scope| {
            let queue = &queue;
            let handles: Vec<_> = self
                .workers
                .iter_mut()
                .map(|worker| {
                    let id = worker.id;
                    (id, scope.spawn(move || worker.drain(queue)))
                })
                .collect();

            handles
                .into_iter()
                .map(|(id, handle)| {
                    handle
                        .join()
                        .unwrap_or(Err(HarnessError::WorkerPanicked { index: id }))
                })
                .collect()
        });

        let mut slots: Vec<Option<Completion>> = vec![None; count];
        for outcome in outcomes {
            for (index, completion) in outcome? {
                slots[index] = Some(completion);
            }
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| slot.ok_or(HarnessError::MissingResult { index }))
            .collect()
    }

    /// Stops every worker and waits for it to exit.
    pub fn shutdown(mut self) -> Result<()> {
        let mut workers = std::mem::take(&mut self.workers);
        let mut first_error = None;
        for worker in &mut workers {
            if let Err(err) = worker.finish() {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for ProcessPool {
    fn drop(&mut self) {
        for worker in &mut self.workers {
            drop(worker.input.take());
            let _ = worker.child.kill();
            let _ = worker.child.wait();
        }
    }
}

/// Worker side of the pool protocol. Returns how many tasks were served once
/// the input is exhausted.
pub fn serve<R: BufRead, W: Write>(reader: R, mut writer: W) -> Result<usize> {
    let mut served = 0;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let request: TaskRequest = serde_json::from_str(&line)?;
        let completion = request.workload.perform(request.index);
        let reply = TaskReply {
            index: request.index,
            completion,
        };

        serde_json::to_writer(&mut writer, &reply)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        served += 1;
    }
    Ok(served)
}
