//! Wall-clock scenarios. Tolerances are wide; only the shape of the result
//! (overlap vs. no overlap, speedup vs. none) is asserted.

mod common;
use common::harness;

use concurrency_timing::{HarnessConfig, Strategy};
use std::time::Duration;

const PAUSE: Duration = Duration::from_millis(200);

#[test]
fn threads_overlap_sleeping_workers() {
    let harness = harness(HarnessConfig::default().with_pause(PAUSE));
    let workload = harness.workloads()[0];

    let serial = harness.measure(workload, Strategy::Serial).unwrap();
    let threaded = harness.measure(workload, Strategy::Threaded).unwrap();

    assert!(serial.elapsed >= PAUSE * 4, "serial took {:?}", serial.elapsed);
    assert!(threaded.elapsed >= PAUSE, "threaded took {:?}", threaded.elapsed);
    assert!(threaded.elapsed < PAUSE * 2, "threaded took {:?}", threaded.elapsed);
}

#[test]
fn process_pool_overlaps_sleeping_workers() {
    let harness = harness(HarnessConfig::default().with_pause(PAUSE));
    let workload = harness.workloads()[0];

    let serial = harness.measure(workload, Strategy::Serial).unwrap();
    let pooled = harness.measure(workload, Strategy::Pooled).unwrap();

    assert!(pooled.elapsed >= PAUSE);
    assert!(
        pooled.elapsed < serial.elapsed,
        "pooled {:?} vs serial {:?}",
        pooled.elapsed,
        serial.elapsed
    );
}

#[test]
fn process_pool_speeds_up_cpu_bound_work() {
    if num_cpus::get() < 4 {
        eprintln!("skipping: needs at least 4 CPUs");
        return;
    }

    let harness = harness(HarnessConfig::default().with_iterations(100_000_000));
    let workload = harness.workloads()[1];

    let serial = harness.measure(workload, Strategy::Serial).unwrap();
    let pooled = harness.measure(workload, Strategy::Pooled).unwrap();

    assert!(
        pooled.elapsed < serial.elapsed,
        "pooled {:?} vs serial {:?}",
        pooled.elapsed,
        serial.elapsed
    );
}
