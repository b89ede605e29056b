use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("process pool size must be at least 1")]
    ZeroPoolSize,
}

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("worker {index} panicked before finishing its workload")]
    WorkerPanicked { index: usize },

    #[error("failed to start {what}: {source}")]
    Spawn {
        what: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while talking to a worker: {0}")]
    Io(#[from] io::Error),

    #[error("malformed worker message: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("pool worker {worker} exited before reporting a result")]
    WorkerExited { worker: usize },

    #[error("no result was collected for task {index}")]
    MissingResult { index: usize },

    #[error("expected the result of task {expected}, got task {got}")]
    UnexpectedResult { expected: usize, got: usize },
}

impl HarnessError {
    pub fn spawn(what: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
