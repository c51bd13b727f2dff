//! Worker pool management.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, info};
use rand::RngCore;

use crate::crypto::KeyGenerator;
use crate::error::{Error, Result};
use crate::matcher::AddressMatcher;

use super::cpu::{CpuWorker, Outcome, WorkerStats};
use super::MatchSignal;

/// Worker count used when the caller does not pick one.
pub const DEFAULT_WORKERS: usize = 8;

/// Result of a successful vanity address search.
#[derive(Debug, Clone, PartialEq)]
pub struct VanityResult {
    /// The address (lowercase hex with 0x prefix)
    pub address: String,
    /// The private key (64 hex characters, no 0x prefix)
    pub private_key: String,
    /// The auxiliary random number (hex, no leading zeros)
    pub aux_random: String,
    /// Attempts counted across all workers when the winner claimed the run
    pub attempts: u64,
    /// Time from pool start to the claim
    pub elapsed: Duration,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

impl VanityResult {
    /// Returns the elapsed time in seconds.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// What [`WorkerPool::wait_for_result`] observed.
#[derive(Debug)]
pub enum SearchStatus {
    /// A worker claimed the run with this result.
    Found(VanityResult),
    /// Nothing yet; the workers are still searching.
    Pending,
    /// Every worker has exited without a result, e.g. after [`WorkerPool::stop`].
    Stopped,
}

/// A handle that ends the run from another thread, e.g. a signal handler.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<MatchSignal>);

impl StopHandle {
    /// Ends the run; workers exit after their current attempt.
    pub fn stop(&self) {
        self.0.cancel();
    }
}

/// Runs a fixed set of workers until one of them claims a match.
pub struct WorkerPool {
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Receives the single outcome of the run
    result_rx: Receiver<Outcome>,
    /// Shared completion flag
    signal: Arc<MatchSignal>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Starts `num_workers` workers testing addresses with `matcher`.
    pub fn spawn<M>(num_workers: usize, matcher: M) -> Result<Self>
    where
        M: AddressMatcher + 'static,
    {
        Self::spawn_with(num_workers, matcher, KeyGenerator::new)
    }

    /// Like [`spawn`](Self::spawn), with each worker's key generator built
    /// by `keygen`.
    pub(crate) fn spawn_with<M, R, F>(num_workers: usize, matcher: M, keygen: F) -> Result<Self>
    where
        M: AddressMatcher + 'static,
        R: RngCore + Send + 'static,
        F: Fn() -> KeyGenerator<R>,
    {
        // One slot: only the claiming worker ever sends.
        let (result_tx, result_rx) = bounded(1);
        let signal = Arc::new(MatchSignal::new());
        let stats = Arc::new(WorkerStats::new());
        let start_time = Instant::now();

        let handles = Self::spawn_workers(
            num_workers,
            Arc::new(matcher),
            keygen,
            result_tx,
            &signal,
            &stats,
            start_time,
        )?;

        info!("started {} workers", num_workers);

        Ok(Self {
            handles: Some(handles),
            result_rx,
            signal,
            stats,
            start_time,
        })
    }

    /// Spawns worker threads.
    ///
    /// If any spawn fails, the workers already running are stopped and joined
    /// before the error is returned.
    fn spawn_workers<M, R, F>(
        num_workers: usize,
        matcher: Arc<M>,
        keygen: F,
        result_tx: Sender<Outcome>,
        signal: &Arc<MatchSignal>,
        stats: &Arc<WorkerStats>,
        start_time: Instant,
    ) -> Result<Vec<JoinHandle<()>>>
    where
        M: AddressMatcher + 'static,
        R: RngCore + Send + 'static,
        F: Fn() -> KeyGenerator<R>,
    {
        let mut handles = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let worker = CpuWorker::new(
                id,
                matcher.clone(),
                keygen(),
                result_tx.clone(),
                signal.clone(),
                stats.clone(),
                start_time,
            );

            let spawned = thread::Builder::new()
                .name(format!("vanity-worker-{}", id))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    signal.cancel();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(Error::Spawn(e));
                }
            }
        }

        Ok(handles)
    }

    /// Waits up to `timeout` for the run to end.
    ///
    /// A worker whose random source failed ends the run with its error.
    pub fn wait_for_result(&self, timeout: Duration) -> Result<SearchStatus> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(outcome) => outcome.map(SearchStatus::Found),
            Err(RecvTimeoutError::Timeout) => Ok(SearchStatus::Pending),
            Err(RecvTimeoutError::Disconnected) => Ok(SearchStatus::Stopped),
        }
    }

    /// Blocks until a worker claims the run or every worker has exited.
    ///
    /// Returns `Ok(None)` if the run was stopped without a match.
    pub fn wait(&self) -> Result<Option<VanityResult>> {
        match self.result_rx.recv() {
            Ok(outcome) => outcome.map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.signal.cancel();
    }

    /// Returns a handle for external use (e.g., signal handlers).
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.signal.clone())
    }

    /// Returns true once the run is claimed or stopped.
    pub fn is_stopped(&self) -> bool {
        self.signal.is_done()
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.join_workers();
    }

    fn join_workers(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
            debug!("all workers joined");
        }
    }

    /// Returns the total attempts across all workers.
    pub fn total_attempts(&self) -> u64 {
        self.stats.total_attempts()
    }

    /// Returns the total matches seen, including discarded ones.
    pub fn total_matches(&self) -> u64 {
        self.stats.total_matches()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current rate (attempts per second).
    pub fn attempts_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_attempts() as f64 / elapsed
        } else {
            0.0
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.join_workers();
    }
}

/// Runs a search to completion with `num_workers` workers.
///
/// Returns `Ok(None)` only if every worker exited without a match, which
/// cannot happen unless the pool has no workers.
pub fn search<M>(num_workers: usize, matcher: M) -> Result<Option<VanityResult>>
where
    M: AddressMatcher + 'static,
{
    let pool = WorkerPool::spawn(num_workers, matcher)?;
    let result = pool.wait();
    pool.join();
    result
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::TryRecvError;

    use super::*;
    use crate::crypto::{derive, Address, PrivateKey};
    use crate::worker::cpu::tests::FailingRng;

    struct Always;

    impl AddressMatcher for Always {
        fn is_match(&self, _address: &Address) -> bool {
            true
        }
    }

    struct Never;

    impl AddressMatcher for Never {
        fn is_match(&self, _address: &Address) -> bool {
            false
        }
    }

    #[test]
    fn test_single_winner_with_always_true_matcher() {
        for _ in 0..20 {
            let mut pool = WorkerPool::spawn(DEFAULT_WORKERS, Always).unwrap();
            let result = pool.wait().unwrap();
            assert!(result.is_some());

            pool.join_workers();
            assert!(matches!(
                pool.result_rx.try_recv(),
                Err(TryRecvError::Disconnected)
            ));
            assert!(pool.total_matches() >= 1);
            assert!(pool.total_matches() <= DEFAULT_WORKERS as u64);
        }
    }

    #[test]
    fn test_reported_key_derives_reported_address() {
        let result = search(4, Always).unwrap().unwrap();

        let bytes: [u8; 32] = hex::decode(&result.private_key)
            .unwrap()
            .try_into()
            .unwrap();
        let key = PrivateKey::from_bytes(bytes).unwrap();
        assert_eq!(derive(&key).to_hex_prefixed(), result.address);
        assert!(result.attempts >= 1);
        assert!(result.worker_id < 4);
    }

    #[test]
    fn test_stop_without_match() {
        let pool = WorkerPool::spawn(2, Never).unwrap();
        assert!(matches!(
            pool.wait_for_result(Duration::from_millis(50)).unwrap(),
            SearchStatus::Pending
        ));

        pool.stop_handle().stop();
        assert!(pool.is_stopped());
        assert_eq!(pool.wait().unwrap(), None);
        assert!(pool.total_attempts() > 0);
        assert_eq!(pool.total_matches(), 0);
    }

    #[test]
    fn test_empty_pool_reports_stopped() {
        let pool = WorkerPool::spawn(0, Never).unwrap();
        assert!(matches!(
            pool.wait_for_result(Duration::from_millis(10)).unwrap(),
            SearchStatus::Stopped
        ));
    }

    #[test]
    fn test_entropy_failure_aborts_the_run() {
        let mut pool =
            WorkerPool::spawn_with(DEFAULT_WORKERS, Never, || KeyGenerator::with_rng(FailingRng))
                .unwrap();

        assert!(matches!(pool.wait(), Err(Error::Entropy(_))));
        assert!(pool.is_stopped());

        pool.join_workers();
        assert!(matches!(
            pool.result_rx.try_recv(),
            Err(TryRecvError::Disconnected)
        ));
        assert_eq!(pool.total_attempts(), 0);
    }
}
