//! Times four sleeping and four spinning tasks run serially, on threads and on
//! a process pool.
//!
//! Run with: cargo run --release --bin timing_harness

use std::io;

use concurrency_timing::{
    logging, pool, Harness, HarnessConfig, HarnessError, WorkerCommand, WORKER_FLAG,
};

fn main() -> Result<(), HarnessError> {
    logging::init();

    // The pool re-executes this binary with WORKER_FLAG to get its workers.
    if std::env::args().nth(1).as_deref() == Some(WORKER_FLAG) {
        let served = pool::serve(io::stdin().lock(), io::stdout().lock())?;
        tracing::debug!(served, pid = std::process::id(), "pool worker done");
        return Ok(());
    }

    let harness = Harness::new(HarnessConfig::default(), WorkerCommand::current_exe()?)?;
    harness.run(&mut io::stdout().lock())?;
    Ok(())
}
