//! Load runs for the session record codec.
//!
//! A run pushes a fixed workload of manifest records through encode and
//! decode many times, on the calling thread or from several threads reading
//! the same records, and counts round-trips that did not reproduce their
//! input.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use levelmeta_codec::SessionRecord;

use crate::fixtures::scenarios;

/// Shape of a load run.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Round-trips across all threads.
    pub operations: usize,
    /// Worker threads for concurrent runs; `0` is treated as `1`.
    pub threads: usize,
    /// Tables added and removed by each compaction record in the workload.
    pub tables_per_record: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 10_000,
            threads: 4,
            tables_per_record: 16,
        }
    }
}

/// Counters collected by a load run.
#[derive(Debug, Clone, Default)]
pub struct StressReport {
    /// Round-trips attempted.
    pub roundtrips: u64,
    /// Round-trips that failed to decode or decoded to a different record.
    pub mismatches: u64,
    /// Encoded bytes produced.
    pub bytes_encoded: u64,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
}

impl StressReport {
    /// Round-trips per second, or `0.0` for an instantaneous run.
    pub fn roundtrips_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.roundtrips as f64 / secs
        } else {
            0.0
        }
    }

    /// One-line summary for test output.
    pub fn summary(&self, label: &str) -> String {
        format!(
            "{label}: {} round-trips, {} mismatches, {} bytes in {:?} ({:.0}/s)",
            self.roundtrips,
            self.mismatches,
            self.bytes_encoded,
            self.elapsed,
            self.roundtrips_per_sec()
        )
    }
}

/// Records cycled through by every run: one compaction per level plus the
/// new-database and flush records.
pub fn stress_workload(config: &StressConfig) -> Vec<SessionRecord> {
    let n = config.tables_per_record;
    (0..7)
        .map(|level| scenarios::compaction(level, n, n))
        .chain([scenarios::new_database(), scenarios::memtable_flush()])
        .collect()
}

/// Encode and decode `record`, returning the encoded size and whether the
/// decoded record matched.
fn roundtrip(record: &SessionRecord) -> (u64, bool) {
    let encoded = record.encode();
    let matched = SessionRecord::from_bytes(&encoded).is_ok_and(|decoded| decoded == *record);
    (encoded.len() as u64, matched)
}

/// Run the workload on the calling thread.
pub fn stress_sequential_roundtrips(config: &StressConfig) -> StressReport {
    let workload = stress_workload(config);
    let mut report = StressReport::default();
    let start = Instant::now();

    for record in workload.iter().cycle().take(config.operations) {
        let (len, matched) = roundtrip(record);
        report.roundtrips += 1;
        report.bytes_encoded += len;
        report.mismatches += u64::from(!matched);
    }

    report.elapsed = start.elapsed();
    report
}

/// Run the workload from `config.threads` threads sharing one set of records.
pub fn stress_concurrent_roundtrips(config: &StressConfig) -> StressReport {
    let workload = Arc::new(stress_workload(config));
    let threads = config.threads.max(1);
    let base = config.operations / threads;
    let extra = config.operations % threads;
    let roundtrips = Arc::new(AtomicU64::new(0));
    let mismatches = Arc::new(AtomicU64::new(0));
    let bytes_encoded = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let workers: Vec<_> = (0..threads)
        .map(|worker| {
            let workload = Arc::clone(&workload);
            let roundtrips = Arc::clone(&roundtrips);
            let mismatches = Arc::clone(&mismatches);
            let bytes_encoded = Arc::clone(&bytes_encoded);

            // The first `extra` workers pick up the remainder.
            let share = base + usize::from(worker < extra);

            thread::spawn(move || {
                // Offset each worker so threads hit different records at once.
                for record in workload.iter().cycle().skip(worker).take(share) {
                    let (len, matched) = roundtrip(record);
                    roundtrips.fetch_add(1, Ordering::Relaxed);
                    bytes_encoded.fetch_add(len, Ordering::Relaxed);
                    if !matched {
                        mismatches.fetch_add(1, Ordering::Relaxed);
                    }
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("stress worker panicked");
    }

    StressReport {
        roundtrips: roundtrips.load(Ordering::Relaxed),
        mismatches: mismatches.load(Ordering::Relaxed),
        bytes_encoded: bytes_encoded.load(Ordering::Relaxed),
        elapsed: start.elapsed(),
    }
}
