//! CPU-based worker for vanity address search.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Sender;
use log::debug;
use rand::RngCore;

use crate::crypto::{derive, Address, AuxRandom, KeyGenerator, PrivateKey};
use crate::error::Result;
use crate::matcher::AddressMatcher;

use super::{MatchSignal, VanityResult};

/// What a worker hands to the pool: its match, or the error that stopped it.
pub(crate) type Outcome = Result<VanityResult>;

/// Statistics shared by every worker of one run.
#[derive(Debug, Default)]
pub(crate) struct WorkerStats {
    /// Completed generate-derive cycles
    attempts: AtomicU64,
    /// Matches seen, including ones that lost the claim
    matches_seen: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one cycle and returns the new total.
    #[inline]
    pub fn record_attempt(&self) -> u64 {
        self.attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Counts one match, whether or not it wins the claim.
    pub fn record_match(&self) {
        self.matches_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total attempts so far.
    pub fn total_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    /// Returns the total matches seen.
    pub fn total_matches(&self) -> u64 {
        self.matches_seen.load(Ordering::Relaxed)
    }
}

/// A candidate that satisfied the matcher.
struct Candidate {
    key: PrivateKey,
    aux: AuxRandom,
    address: Address,
}

/// A CPU worker that generates and tests keys until the run is done.
pub(crate) struct CpuWorker<M, R> {
    /// Worker ID
    id: usize,
    /// Decides whether an address is a hit
    matcher: Arc<M>,
    /// One-slot channel to the pool
    result_tx: Sender<Outcome>,
    /// Shared completion flag
    signal: Arc<MatchSignal>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// When the run started
    start_time: Instant,
    /// This worker's own key source
    keygen: KeyGenerator<R>,
}

impl<M: AddressMatcher, R: RngCore> CpuWorker<M, R> {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        matcher: Arc<M>,
        keygen: KeyGenerator<R>,
        result_tx: Sender<Outcome>,
        signal: Arc<MatchSignal>,
        stats: Arc<WorkerStats>,
        start_time: Instant,
    ) -> Self {
        Self {
            id,
            matcher,
            result_tx,
            signal,
            stats,
            start_time,
            keygen,
        }
    }

    /// Runs the worker loop.
    ///
    /// Each iteration polls the completion flag, then generates, derives,
    /// counts and tests one candidate. The loop ends when:
    /// - The flag is already set (another worker won, or the pool was stopped)
    /// - This worker matched, whether or not it won the claim
    /// - The random source failed
    pub fn run(mut self) {
        debug!("worker {} started", self.id);

        loop {
            if self.signal.is_done() {
                debug!("worker {} cancelled", self.id);
                return;
            }

            match self.attempt() {
                Ok(None) => {}
                Ok(Some(candidate)) => {
                    self.stats.record_match();
                    self.finish(|worker| Ok(worker.report(candidate)));
                    return;
                }
                Err(e) => {
                    self.finish(|_| Err(e));
                    return;
                }
            }
        }
    }

    /// One generate-derive-match cycle.
    #[inline]
    fn attempt(&mut self) -> Result<Option<Candidate>> {
        let (key, aux) = self.keygen.generate()?;
        let address = derive(&key);
        self.stats.record_attempt();

        if self.matcher.is_match(&address) {
            Ok(Some(Candidate { key, aux, address }))
        } else {
            Ok(None)
        }
    }

    /// Claims the signal and, if this worker won, delivers the outcome.
    fn finish(&self, outcome: impl FnOnce(&Self) -> Outcome) {
        if !self.signal.claim() {
            debug!("worker {} lost the claim, discarding", self.id);
            return;
        }

        // The pool may already be gone; the claim still stands.
        if self.result_tx.try_send(outcome(self)).is_err() {
            debug!("worker {} won but nobody is listening", self.id);
        }
    }

    fn report(&self, candidate: Candidate) -> VanityResult {
        VanityResult {
            address: candidate.address.to_hex_prefixed(),
            private_key: candidate.key.to_hex(),
            aux_random: candidate.aux.to_hex(),
            attempts: self.stats.total_attempts(),
            elapsed: self.start_time.elapsed(),
            worker_id: self.id,
        }
    }
}
