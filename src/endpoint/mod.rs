//! UDP endpoint: the connection layer of the library.
//!
//! An [`Endpoint`] owns one UDP socket (PFCP uses port 8805), allocates
//! 24-bit sequence numbers, correlates responses to outstanding requests,
//! retransmits on a timer, and answers inbound requests through a caller
//! handler. The receive loop and the retransmission scheduler share nothing
//! but the pending table's lock, so the endpoint works the same whether the
//! host spawns one thread for [`Endpoint::run`] or drives everything from a
//! single loop.

mod pending;
mod sequence;

pub use sequence::SequenceGenerator;

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::codec::{Reader, Writer};
use crate::error::PfcpError;
use crate::ie::cause::CauseValue;
use crate::message::version_not_supported::VersionNotSupportedResponse;
use crate::message::{reject_response, Header, Msg, MsgType};

use pending::{Delivery, PendingTable, RequestOutcome};

/// Tuning knobs for the endpoint.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// T1: how long to wait for a response before retransmitting.
    pub retransmit_timeout: Duration,
    /// N1: how many retransmissions before a request is failed. An
    /// unanswered request is transmitted `1 + N1` times in total.
    pub max_retransmits: u32,
    /// Socket read timeout; also the granularity of the retransmission
    /// scheduler when driven by [`Endpoint::run`].
    pub tick: Duration,
    /// Upper bound for encoded datagrams, send and receive.
    pub max_message_size: usize,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        EndpointConfig {
            retransmit_timeout: Duration::from_secs(5),
            max_retransmits: 3,
            tick: Duration::from_millis(100),
            max_message_size: crate::MAX_MESSAGE_SIZE,
        }
    }
}

/// A PFCP endpoint bound to a local UDP address.
///
/// All methods take `&self`; share the endpoint across threads with an
/// `Arc` and call [`run`](Self::run) from whichever thread should own the
/// receive loop.
#[derive(Debug)]
pub struct Endpoint {
    socket: UdpSocket,
    sequences: SequenceGenerator,
    pending: PendingTable,
    config: EndpointConfig,
    shutdown: AtomicBool,
}

impl Endpoint {
    /// Binds with default configuration.
    pub fn bind<A: ToSocketAddrs>(addr: A) -> Result<Self, PfcpError> {
        Self::bind_with(addr, EndpointConfig::default())
    }

    /// Binds with explicit configuration.
    pub fn bind_with<A: ToSocketAddrs>(addr: A, config: EndpointConfig) -> Result<Self, PfcpError> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_read_timeout(Some(config.tick))?;
        Ok(Endpoint {
            socket,
            sequences: SequenceGenerator::new(),
            pending: PendingTable::new(),
            config,
            shutdown: AtomicBool::new(false),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, PfcpError> {
        Ok(self.socket.local_addr()?)
    }

    /// Number of requests currently awaiting a response.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Allocates a sequence number that is not currently outstanding.
    ///
    /// Plain wraparound could hand out a sequence that is still pending
    /// after 2^24 requests; skipping those makes correlation unambiguous.
    fn allocate_sequence(&self) -> Result<u32, PfcpError> {
        for _ in 0..=0x00FF_FFFFu32 {
            let sequence = self.sequences.next();
            if !self.pending.contains(sequence) {
                return Ok(sequence);
            }
        }
        Err(PfcpError::Transport(io::Error::other(
            "sequence space exhausted by outstanding requests",
        )))
    }

    /// Sends a request: assigns a sequence, serialises, records the pending
    /// entry, transmits once, and returns the sequence for
    /// [`await_response`](Self::await_response).
    ///
    /// A serialisation failure transmits nothing; a send failure removes the
    /// pending entry before propagating.
    pub fn send_request(&self, msg: &mut Msg, dest: SocketAddr) -> Result<u32, PfcpError> {
        let sequence = self.allocate_sequence()?;
        msg.set_sequence(sequence);
        let bytes = self.serialize(msg)?;
        // The entry must exist before the datagram leaves, or a fast
        // response could race the insert and be dropped as unknown.
        self.pending.insert(sequence, bytes.clone(), dest);
        if let Err(e) = self.socket.send_to(&bytes, dest) {
            self.pending.remove(sequence);
            return Err(e.into());
        }
        debug!(sequence, %dest, msg_type = ?msg.msg_type(), "request sent");
        Ok(sequence)
    }

    /// Blocks until the response for `sequence` arrives, the request is
    /// cancelled, or the deadline passes. The pending entry is removed on
    /// return, so each outcome is observed at most once.
    pub fn await_response(&self, sequence: u32, timeout: Duration) -> Result<Msg, PfcpError> {
        let Some(slot) = self.pending.slot(sequence) else {
            // Already expired, cancelled and collected, or never sent.
            return Err(PfcpError::Timeout);
        };
        let outcome = slot.wait(timeout);
        self.pending.remove(sequence);
        match outcome {
            Some(RequestOutcome::Response(msg)) => Ok(msg),
            Some(RequestOutcome::NoResponse) | None => Err(PfcpError::Timeout),
            Some(RequestOutcome::Cancelled) => Err(PfcpError::Cancelled),
        }
    }

    /// Convenience: send and await in one call.
    pub fn request(
        &self,
        msg: &mut Msg,
        dest: SocketAddr,
        timeout: Duration,
    ) -> Result<Msg, PfcpError> {
        let sequence = self.send_request(msg, dest)?;
        self.await_response(sequence, timeout)
    }

    /// Withdraws an outstanding request; its waiter resolves with
    /// [`PfcpError::Cancelled`].
    pub fn cancel(&self, sequence: u32) -> bool {
        self.pending.cancel(sequence)
    }

    /// One retransmission-scheduler pass. [`run`](Self::run) calls this on
    /// every socket timeout; hosts driving the socket themselves call it on
    /// their own tick.
    pub fn tick(&self) {
        let resend = self.pending.scan(
            Instant::now(),
            self.config.retransmit_timeout,
            self.config.max_retransmits,
        );
        for (sequence, bytes, dest) in resend {
            match self.socket.send_to(&bytes, dest) {
                Ok(_) => debug!(sequence, %dest, "request retransmitted"),
                Err(e) => warn!(sequence, %dest, error = %e, "retransmit failed"),
            }
        }
    }

    /// Requests that [`run`](Self::run) return after its current iteration.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Receive loop: parses datagrams, correlates responses, answers
    /// requests via `handler` (the response is re-stamped with the request's
    /// sequence), and drives the retransmission scheduler.
    ///
    /// Returns when [`shutdown`](Self::shutdown) is called or the socket
    /// fails hard. Malformed datagrams are logged and skipped.
    pub fn run<H>(&self, mut handler: H) -> Result<(), PfcpError>
    where
        H: FnMut(&Msg, SocketAddr) -> Option<Msg>,
    {
        let mut buf = vec![0u8; self.config.max_message_size];
        while !self.shutdown.load(Ordering::Relaxed) {
            match self.socket.recv_from(&mut buf) {
                Ok((n, src)) => self.handle_datagram(&buf[..n], src, &mut handler),
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) => return Err(e.into()),
            }
            self.tick();
        }
        Ok(())
    }

    fn handle_datagram<H>(&self, data: &[u8], src: SocketAddr, handler: &mut H)
    where
        H: FnMut(&Msg, SocketAddr) -> Option<Msg>,
    {
        let (header, _) = match Header::decode_lenient(&mut Reader::new(data)) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(%src, error = %e, "dropping undecodable datagram");
                return;
            }
        };
        if header.version != 1 {
            warn!(%src, version = header.version, "unsupported version, answering");
            self.answer_version_not_supported(header.sequence, src);
            return;
        }
        if let MsgType::Unknown(code) = header.message_type {
            warn!(%src, code, "unknown message type, answering");
            self.answer_version_not_supported(header.sequence, src);
            return;
        }
        match Msg::parse(data) {
            Ok(msg) if msg.msg_type().is_response() => {
                let sequence = msg.sequence();
                match self.pending.deliver_response(sequence, msg) {
                    Delivery::Fulfilled => debug!(sequence, %src, "response correlated"),
                    Delivery::Duplicate => debug!(sequence, %src, "duplicate response discarded"),
                    Delivery::Unknown => debug!(sequence, %src, "response with no pending request dropped"),
                }
            }
            Ok(msg) => {
                if let Some(mut resp) = handler(&msg, src) {
                    resp.set_sequence(msg.sequence());
                    if let Err(e) = self.send_message(&resp, src) {
                        warn!(%src, error = %e, "failed to send response");
                    }
                }
            }
            Err(e) => {
                warn!(%src, error = %e, msg_type = ?header.message_type, "malformed message");
                if !header.message_type.is_response() {
                    if let Some(resp) = reject_response(
                        header.message_type,
                        header.sequence,
                        CauseValue::MandatoryIeMissing,
                        e.offending_ie(),
                    ) {
                        if let Err(e) = self.send_message(&resp, src) {
                            warn!(%src, error = %e, "failed to send rejection");
                        }
                    }
                }
            }
        }
    }

    fn answer_version_not_supported(&self, sequence: u32, src: SocketAddr) {
        let resp = Msg::VersionNotSupportedResponse(VersionNotSupportedResponse::new(sequence));
        if let Err(e) = self.send_message(&resp, src) {
            warn!(%src, error = %e, "failed to send version not supported response");
        }
    }

    /// Sends a message as-is (no sequence allocation, no pending entry).
    /// Used for responses and available to hosts that manage their own
    /// correlation.
    pub fn send_message(&self, msg: &Msg, dest: SocketAddr) -> Result<(), PfcpError> {
        let bytes = self.serialize(msg)?;
        self.socket.send_to(&bytes, dest)?;
        Ok(())
    }

    fn serialize(&self, msg: &Msg) -> Result<Vec<u8>, PfcpError> {
        let mut buf = vec![0u8; self.config.max_message_size];
        let mut w = Writer::new(&mut buf);
        msg.encode(&mut w)?;
        let n = w.position();
        buf.truncate(n);
        Ok(buf)
    }
}
