use std::{
    hint,
    sync::atomic::{
        AtomicU64,
        Ordering::{Acquire, Release},
    },
};

// The data cache line size is 64 bytes in most CPUs.
pub const CACHE_LINE_SIZE: usize = 64;

// Each cell is written by exactly one role and read by the other; give
// each cell its own cache line so the two directions don't false-share.
#[derive(Debug, Default)]
#[repr(align(64))]
struct SeqCell(AtomicU64);

const _: () = assert!(align_of::<SeqCell>() == CACHE_LINE_SIZE);

/// Rendezvous channel for one core pair.
///
/// Two single-writer sequence cells: the producer publishes cycle numbers
/// into `forward`, the consumer acknowledges them through `backward`. Both
/// cells start at 0, the "not started" sentinel, so cycle numbering begins
/// at 1 and an uninitialized cell can never satisfy a wait.
#[derive(Debug, Default)]
pub struct HandshakeChannel {
    forward: SeqCell,
    backward: SeqCell,
}

impl HandshakeChannel {
    pub fn new() -> HandshakeChannel {
        HandshakeChannel::default()
    }

    /// Producer half: issues cycles `1..trans`, waiting for the matching
    /// acknowledgement before issuing the next. Pure busy-wait, no
    /// blocking syscalls in the measured path.
    pub fn run_producer(&self, trans: u64) {
        for seq in 1..trans {
            // Release pairs with the consumer's acquire poll of `forward`,
            // so the consumer observes cycle seq only after it is issued.
            self.forward.0.store(seq, Release);
            while self.backward.0.load(Acquire) != seq {
                hint::spin_loop();
            }
        }
    }

    /// Consumer half: waits for each issued cycle and acknowledges it.
    /// The acquire/release pairing mirrors `run_producer`, in the other
    /// direction.
    pub fn run_consumer(&self, trans: u64) {
        for seq in 1..trans {
            while self.forward.0.load(Acquire) != seq {
                hint::spin_loop();
            }
            self.backward.0.store(seq, Release);
        }
    }

    /// Last cycle issued by the producer. Observer-side accessor.
    pub fn forward_seq(&self) -> u64 {
        self.forward.0.load(Acquire)
    }

    /// Last cycle acknowledged by the consumer. Observer-side accessor.
    pub fn backward_seq(&self) -> u64 {
        self.backward.0.load(Acquire)
    }
}

#[cfg(test)]
mod test {
    use super::HandshakeChannel;
    use std::{
        sync::atomic::{AtomicBool, Ordering::Relaxed},
        thread,
    };

    #[test]
    fn handshake_completes() {
        let trans = 1000;
        let chan = HandshakeChannel::new();
        thread::scope(|s| {
            s.spawn(|| chan.run_consumer(trans));
            s.spawn(|| chan.run_producer(trans));
        });
        assert_eq!(chan.forward_seq(), trans - 1);
        assert_eq!(chan.backward_seq(), trans - 1);
    }

    #[test]
    fn acknowledgement_never_overtakes_issue() {
        let trans = 100_000;
        let chan = HandshakeChannel::new();
        let done = AtomicBool::new(false);
        thread::scope(|s| {
            s.spawn(|| chan.run_consumer(trans));
            s.spawn(|| {
                chan.run_producer(trans);
                done.store(true, Relaxed);
            });
            // Sample both sequences while the handshake runs. Loading
            // backward before forward means a racing update can only make
            // the forward value larger than the backward value paired with
            // it, so backward <= forward must hold in every sample.
            let mut last_forward = 0;
            let mut last_backward = 0;
            while !done.load(Relaxed) {
                let backward = chan.backward_seq();
                let forward = chan.forward_seq();
                assert!(backward <= forward);
                assert!(forward >= last_forward);
                assert!(backward >= last_backward);
                last_forward = forward;
                last_backward = backward;
            }
        });
    }
}
