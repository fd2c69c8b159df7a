//! Pairwise inter-core communication benchmark engine.
//!
//! Pins two threads to a pair of logical cores and times a fixed number of
//! lock-free handshake round trips over a pair of shared atomic cells. A
//! strictly sequential sweep over every unordered core pair yields a
//! relative score matrix that makes topology effects visible (shared
//! caches, sockets, SMT siblings) on systems that do not expose them
//! reliably.
//!
//! The handshake busy-waits instead of blocking: scheduler wake-up
//! latency must stay out of the measured path.

pub mod affinity;
pub mod channel;
pub mod cpu;
pub mod matrix;
pub mod probe;
pub mod report;

pub use affinity::{AffinityError, CoreBinder, NoopBinder, OsBinder};
pub use channel::HandshakeChannel;
pub use matrix::{Extremal, ScoreMatrix};
pub use probe::{PairProbe, ProbeError, Schema, sweep};
pub use report::Reporter;
