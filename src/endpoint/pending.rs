//! Pending-request bookkeeping: the table correlating outstanding requests
//! with responses, retransmission state, and waiter rendezvous.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::message::Msg;

/// How an outstanding request ended.
#[derive(Debug)]
pub(crate) enum RequestOutcome {
    /// A response with the matching sequence arrived.
    Response(Msg),
    /// Retransmissions were exhausted without an answer.
    NoResponse,
    /// The caller withdrew the request.
    Cancelled,
}

/// One-shot rendezvous between the receive path and the awaiting caller.
#[derive(Debug, Default)]
pub(crate) struct WaitSlot {
    state: Mutex<Option<RequestOutcome>>,
    cond: Condvar,
}

impl WaitSlot {
    /// Stores the outcome and wakes the waiter. Returns false if an outcome
    /// was already delivered, in which case the new one is dropped.
    pub(crate) fn fulfil(&self, outcome: RequestOutcome) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.is_some() {
            return false;
        }
        *state = Some(outcome);
        self.cond.notify_all();
        true
    }

    /// Blocks until an outcome arrives or the timeout elapses, consuming the
    /// outcome if there is one.
    pub(crate) fn wait(&self, timeout: Duration) -> Option<RequestOutcome> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(outcome) = state.take() {
                return Some(outcome);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (next, _) = self.cond.wait_timeout(state, deadline - now).unwrap();
            state = next;
        }
    }
}

/// A request awaiting its response.
#[derive(Debug)]
pub(crate) struct PendingEntry {
    pub bytes: Vec<u8>,
    pub dest: SocketAddr,
    pub sent_at: Instant,
    pub retransmit_count: u32,
    pub slot: Arc<WaitSlot>,
    /// Set once an outcome was delivered; the entry then only lingers so a
    /// late `await_response` can still find its slot.
    pub done_at: Option<Instant>,
}

/// What the receive path learned when handing a response to the table.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Delivery {
    Fulfilled,
    /// The entry was already completed; late duplicate, discard.
    Duplicate,
    /// No entry with that sequence; stray or long-expired, discard.
    Unknown,
}

/// The pending-request table: a single mutex over a sequence-keyed map.
#[derive(Debug, Default)]
pub(crate) struct PendingTable {
    entries: Mutex<HashMap<u32, PendingEntry>>,
}

impl PendingTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn contains(&self, sequence: u32) -> bool {
        self.entries.lock().unwrap().contains_key(&sequence)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub(crate) fn insert(&self, sequence: u32, bytes: Vec<u8>, dest: SocketAddr) {
        let entry = PendingEntry {
            bytes,
            dest,
            sent_at: Instant::now(),
            retransmit_count: 0,
            slot: Arc::new(WaitSlot::default()),
            done_at: None,
        };
        self.entries.lock().unwrap().insert(sequence, entry);
    }

    pub(crate) fn slot(&self, sequence: u32) -> Option<Arc<WaitSlot>> {
        self.entries
            .lock()
            .unwrap()
            .get(&sequence)
            .map(|e| Arc::clone(&e.slot))
    }

    pub(crate) fn remove(&self, sequence: u32) {
        self.entries.lock().unwrap().remove(&sequence);
    }

    /// Hands a response to the entry's waiter. The entry stays in the table
    /// (marked done) until the waiter collects it or the linger purge runs.
    pub(crate) fn deliver_response(&self, sequence: u32, msg: Msg) -> Delivery {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(&sequence) {
            Some(entry) => {
                if entry.slot.fulfil(RequestOutcome::Response(msg)) {
                    entry.done_at = Some(Instant::now());
                    Delivery::Fulfilled
                } else {
                    Delivery::Duplicate
                }
            }
            None => Delivery::Unknown,
        }
    }

    /// Cancels an outstanding request, waking its waiter.
    pub(crate) fn cancel(&self, sequence: u32) -> bool {
        let mut entries = self.entries.lock().unwrap();
        match entries.remove(&sequence) {
            Some(entry) => {
                entry.slot.fulfil(RequestOutcome::Cancelled);
                true
            }
            None => false,
        }
    }

    /// One scheduler pass: collects retransmissions due, expires entries out
    /// of retransmit budget, and purges completed entries past their linger.
    ///
    /// I/O happens outside the lock; the returned list carries everything a
    /// resend needs.
    pub(crate) fn scan(
        &self,
        now: Instant,
        t1: Duration,
        n1: u32,
    ) -> Vec<(u32, Vec<u8>, SocketAddr)> {
        let linger = t1 * 2;
        let mut resend = Vec::new();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|sequence, entry| {
            if let Some(done_at) = entry.done_at {
                return now.duration_since(done_at) < linger;
            }
            if now.duration_since(entry.sent_at) <= t1 {
                return true;
            }
            if entry.retransmit_count < n1 {
                entry.retransmit_count += 1;
                entry.sent_at = now;
                resend.push((*sequence, entry.bytes.clone(), entry.dest));
                return true;
            }
            // Out of budget and a further T1 has elapsed since the last
            // transmit: fail the waiter and drop the entry.
            entry.slot.fulfil(RequestOutcome::NoResponse);
            false
        });
        resend
    }
}
