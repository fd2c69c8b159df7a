use crate::{
    affinity::{AffinityError, CoreBinder},
    channel::HandshakeChannel,
    matrix::{ScoreMatrix, pairs},
};
use std::{
    fmt, hint,
    sync::{
        atomic::{
            AtomicU8,
            Ordering::{Acquire, Release},
        },
        mpsc,
    },
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

/// Handshake discipline selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    /// Alternating rendezvous handshake.
    Classic,
    /// Ping-pong rendezvous. Runs the same discipline as classic; kept as
    /// a distinct selection for compatibility.
    PingPong,
    /// Reserved bulk-transfer discipline.
    BigBang,
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Schema::Classic => "classic",
            Schema::PingPong => "ping-pong",
            Schema::BigBang => "big-bang",
        })
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProbeError {
    #[error(transparent)]
    Affinity(#[from] AffinityError),
    #[error("at least 2 transactions are required (got {trans})")]
    TooFewTransactions { trans: u64 },
    #[error("the {0} schema is not implemented")]
    UnsupportedSchema(Schema),
}

const HOLD: u8 = 0;
const GO: u8 = 1;
const ABORT: u8 = 2;

// Release barrier aligning the start of the two roles. Both roles spin on
// the gate after binding; the controller opens it right before taking the
// start timestamp, or aborts it so that the peer of a failed bind exits
// without ever touching the channel.
#[derive(Debug, Default)]
struct StartGate(AtomicU8);

impl StartGate {
    fn release(&self) {
        self.0.store(GO, Release);
    }

    fn abort(&self) {
        self.0.store(ABORT, Release);
    }

    // true means go, false means abort
    fn wait(&self) -> bool {
        loop {
            match self.0.load(Acquire) {
                HOLD => hint::spin_loop(),
                GO => return true,
                _ => return false,
            }
        }
    }
}

// Lets a finishing pair's threads get off-CPU before the next measurement.
const SETTLE: Duration = Duration::from_millis(1);

/// One timed measurement between a pair of logical cores.
///
/// Spawns the two roles, binds each to its core, aligns their start on the
/// gate and times a fixed number of handshake round trips. The joins at
/// the end are the only blocking points in the whole run.
#[derive(Debug)]
pub struct PairProbe<'a, B> {
    binder: &'a B,
    transactions: u64,
    schema: Schema,
}

impl<'a, B: CoreBinder> PairProbe<'a, B> {
    pub fn new(binder: &'a B, transactions: u64, schema: Schema) -> PairProbe<'a, B> {
        PairProbe {
            binder,
            transactions,
            schema,
        }
    }

    /// Measures the pair `(lower, higher)` and returns its throughput
    /// score in round trips per second.
    ///
    /// The consumer binds to `lower`, the producer to `higher`. A bind
    /// failure in either role aborts the probe; there are no retries.
    pub fn run(&self, lower: usize, higher: usize) -> Result<f64, ProbeError> {
        let trans = self.transactions;
        if trans < 2 {
            return Err(ProbeError::TooFewTransactions { trans });
        }
        match self.schema {
            Schema::Classic | Schema::PingPong => {}
            Schema::BigBang => return Err(ProbeError::UnsupportedSchema(self.schema)),
        }

        thread::sleep(SETTLE);

        let chan = HandshakeChannel::new();
        let gate = StartGate::default();
        let binder = self.binder;
        let (bound_tx, bound_rx) = mpsc::channel();

        let elapsed = thread::scope(|s| {
            {
                let bound_tx = bound_tx.clone();
                let (chan, gate) = (&chan, &gate);
                s.spawn(move || {
                    let bound = binder.bind_current(lower);
                    let ok = bound.is_ok();
                    bound_tx.send(bound).unwrap();
                    if ok && gate.wait() {
                        chan.run_consumer(trans);
                    }
                });
            }
            {
                let (chan, gate) = (&chan, &gate);
                s.spawn(move || {
                    let bound = binder.bind_current(higher);
                    let ok = bound.is_ok();
                    bound_tx.send(bound).unwrap();
                    if ok && gate.wait() {
                        chan.run_producer(trans);
                    }
                });
            }

            // both roles must be bound before the gate opens
            let mut bound = Ok(());
            for _ in 0..2 {
                if let Err(err) = bound_rx.recv().unwrap() {
                    bound = Err(err);
                }
            }
            if let Err(err) = bound {
                gate.abort();
                // the scope joins the roles on exit
                return Err(err);
            }

            let begin = Instant::now();
            gate.release();
            Ok(begin)
        })?
        .elapsed();

        let round_trips = trans - 1;
        Ok(round_trips as f64 / elapsed.as_secs_f64())
    }
}

/// Runs one probe per unordered core pair, strictly sequentially so that
/// busy-waiting from one pair cannot pollute the next, and collects the
/// scores into the upper triangle of a [`ScoreMatrix`].
///
/// `progress` is invoked with `(index, total)` before each probe. Any
/// probe error aborts the sweep; partial results are discarded.
pub fn sweep<B: CoreBinder>(
    probe: &PairProbe<'_, B>,
    cores: usize,
    mut progress: impl FnMut(usize, usize),
) -> Result<ScoreMatrix, ProbeError> {
    let mut matrix = ScoreMatrix::new(cores);
    let total = cores * cores.saturating_sub(1) / 2;
    for (n, (i, j)) in pairs(cores).enumerate() {
        progress(n, total);
        let score = probe.run(i, j)?;
        matrix.set(i, j, score);
    }
    Ok(matrix)
}
