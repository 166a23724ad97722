//! Thread count agrees with the kernel. Kept in its own binary so no other
//! test spawns threads while it samples.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

#[cfg(target_os = "linux")]
fn kernel_threads() -> u64 {
    let status = std::fs::read_to_string("/proc/self/status").unwrap();
    status
        .lines()
        .find_map(|l| l.strip_prefix("Threads:"))
        .expect("Threads: line")
        .trim()
        .parse()
        .unwrap()
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn thread_count_includes_main_thread() {
    use webstats_server::host::{HostIdentity, ProcessStatsProvider, StatsSnapshotProvider};

    let provider = ProcessStatsProvider::new(HostIdentity::new("Shisha#0420", "mezo#0001"));
    // Warm the blocking pool so the sampling thread already exists.
    provider.snapshot().await.unwrap();

    let before = kernel_threads();
    let snap = provider.snapshot().await.unwrap();
    let after = kernel_threads();

    let reported = snap.process.threads;
    assert!(
        reported >= before.min(after) && reported <= before.max(after),
        "reported {reported} threads, kernel saw {before}..{after}"
    );
}
