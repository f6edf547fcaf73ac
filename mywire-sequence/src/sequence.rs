//! The per-exchange sequence state machine.

use crate::command::CommandSequence;
use mywire_protocol::{OkPacket, Packet, ProtocolError, ServerError};
use tokio::sync::mpsc;

/// Outcome delivered to the completion callback and observers.
///
/// `Ok(Some(packet))` is a server-acknowledged success, `Ok(None)` an
/// externally-forced clean end (e.g. teardown on disconnect), `Err` a
/// translated server failure.
pub type SequenceOutcome = Result<Option<OkPacket>, ServerError>;

type CompletionCallback = Box<dyn FnOnce(SequenceOutcome) + Send + 'static>;

/// State machine for one request/response exchange.
///
/// A sequence is created when a command is issued, fed decoded packets in
/// arrival order, and discarded once it has ended. It owns no transport
/// resources, only its rolling packet counter and observer registry.
///
/// Exactly one logical reader feeds packets to a given sequence, so all
/// mutation happens through `&mut self` and no locking is involved.
pub struct Sequence {
    next_packet_number: u8,
    ended: bool,
    callback: Option<CompletionCallback>,
    packet_txs: Vec<mpsc::UnboundedSender<(u8, Packet)>>,
    error_txs: Vec<mpsc::UnboundedSender<ServerError>>,
    end_txs: Vec<mpsc::UnboundedSender<()>>,
    /// Set when a caller subscribes to the error channel. Tracked as an
    /// explicit flag so [`has_failure_observer`](Sequence::has_failure_observer)
    /// does not have to count listeners.
    error_observed: bool,
}

impl Sequence {
    /// Creates a sequence with no completion callback.
    pub fn new() -> Self {
        Self {
            next_packet_number: 0,
            ended: false,
            callback: None,
            packet_txs: Vec::new(),
            error_txs: Vec::new(),
            end_txs: Vec::new(),
            error_observed: false,
        }
    }

    /// Creates a sequence whose callback receives the completion outcome.
    ///
    /// The callback is invoked at most once, on a task spawned after the
    /// sequence ends, with the exact outcome passed to
    /// [`complete`](Sequence::complete).
    pub fn with_callback<F>(callback: F) -> Self
    where
        F: FnOnce(SequenceOutcome) + Send + 'static,
    {
        let mut seq = Self::new();
        seq.callback = Some(Box::new(callback));
        seq
    }

    /// Expected number of the next incoming packet.
    pub fn next_packet_number(&self) -> u8 {
        self.next_packet_number
    }

    /// Whether the sequence has ended.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Checks an observed packet number against the rolling counter.
    ///
    /// On a match the counter advances by one modulo 256 (packet numbers
    /// are a byte-wide rolling counter). A mismatch means the connection
    /// is desynchronized; the error is returned synchronously and the
    /// counter stays put so the caller can react before processing
    /// further bytes.
    pub fn verify_and_advance(&mut self, number: u8) -> Result<(), ProtocolError> {
        if number != self.next_packet_number {
            return Err(ProtocolError::PacketsOutOfOrder {
                got: number,
                expected: self.next_packet_number,
            });
        }
        self.advance();
        Ok(())
    }

    /// Delivers a payload packet to `packet` observers and advances the
    /// counter.
    ///
    /// This is the alternative advance path to
    /// [`verify_and_advance`](Sequence::verify_and_advance): command logic
    /// calls this after accepting a payload packet, while the transport
    /// calls the former to guard raw incoming packets ahead of dispatch.
    /// A given packet takes one path or the other, never both.
    pub fn dispatch_packet(&mut self, packet: Packet) {
        tracing::debug!("dispatching packet {} to observers", self.next_packet_number);
        for tx in &self.packet_txs {
            let _ = tx.send((self.next_packet_number, packet.clone()));
        }
        self.advance();
    }

    /// Routes a decoded packet to the handler slot named by its variant.
    ///
    /// Terminal packets go to `on_ok` / `on_eof` / `on_err`; anything
    /// else is a command-specific payload and goes to `on_packet`.
    pub fn handle(&mut self, packet: Packet, handler: &mut dyn CommandSequence) {
        match packet {
            Packet::Ok(ok) => handler.on_ok(self, ok),
            Packet::Eof(eof) => handler.on_eof(self, eof),
            Packet::Err(err) => handler.on_err(self, err),
            Packet::Other(payload) => handler.on_packet(self, payload),
        }
    }

    /// Subscribes to `(packet number, packet)` notifications emitted by
    /// [`dispatch_packet`](Sequence::dispatch_packet).
    pub fn subscribe_packets(&mut self) -> mpsc::UnboundedReceiver<(u8, Packet)> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.packet_txs.push(tx);
        rx
    }

    /// Subscribes to the failure channel, notified before the completion
    /// callback when the sequence ends in error.
    pub fn subscribe_errors(&mut self) -> mpsc::UnboundedReceiver<ServerError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.error_txs.push(tx);
        self.error_observed = true;
        rx
    }

    /// Subscribes to the terminal `end` notification, delivered last.
    pub fn subscribe_end(&mut self) -> mpsc::UnboundedReceiver<()> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.end_txs.push(tx);
        rx
    }

    /// Whether a failure would reach something other than the logging
    /// safety net: a completion callback or an error subscriber.
    ///
    /// Orchestrating code checks this before issuing a command without
    /// failure handling of its own.
    pub fn has_failure_observer(&self) -> bool {
        self.callback.is_some() || self.error_observed
    }

    /// Ends the sequence and schedules completion delivery.
    ///
    /// Idempotent: only the first call has any effect. Notification never
    /// runs synchronously with the caller; it is deferred to a spawned
    /// task so that whatever the callback or an observer does cannot be
    /// attributed to the packet-processing call stack that triggered
    /// completion. Within that one task the order is fixed: error
    /// observers, then the completion callback, then `end` observers.
    ///
    /// Callers tearing a sequence down early (e.g. on transport
    /// disconnect) invoke this directly with the outcome to report.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime context.
    pub fn complete(&mut self, outcome: SequenceOutcome) {
        if self.ended {
            tracing::debug!("sequence already ended, ignoring completion");
            return;
        }
        self.ended = true;

        let unhandled = !self.has_failure_observer();
        let callback = self.callback.take();
        let error_txs = std::mem::take(&mut self.error_txs);
        let end_txs = std::mem::take(&mut self.end_txs);

        tracing::debug!("sequence ended, scheduling completion delivery");
        tokio::spawn(async move {
            if let Err(err) = &outcome {
                if unhandled {
                    tracing::warn!("sequence failed with no failure observer: {}", err);
                }
                for tx in &error_txs {
                    let _ = tx.send(err.clone());
                }
            }

            if let Some(callback) = callback {
                callback(outcome);
            }

            for tx in &end_txs {
                let _ = tx.send(());
            }
        });
    }

    fn advance(&mut self) {
        self.next_packet_number = self.next_packet_number.wrapping_add(1);
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mywire_protocol::{EofPacket, ErrPacket};
    use proptest::prelude::*;
    use tokio_test::assert_ok;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn server_error(errno: u16, message: &str) -> ServerError {
        ServerError::from_packet(&ErrPacket {
            error_code: errno,
            sql_state: String::new(),
            message: message.to_string(),
        })
    }

    #[test]
    fn test_accepts_packets_in_order() {
        let mut seq = Sequence::new();
        assert_ok!(seq.verify_and_advance(0));
        assert_ok!(seq.verify_and_advance(1));
        assert_ok!(seq.verify_and_advance(2));
        assert_eq!(seq.next_packet_number(), 3);
    }

    #[test]
    fn test_out_of_order_fails_without_advancing() {
        let mut seq = Sequence::new();
        let err = seq.verify_and_advance(5).unwrap_err();
        match err {
            ProtocolError::PacketsOutOfOrder { got, expected } => {
                assert_eq!(got, 5);
                assert_eq!(expected, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seq.next_packet_number(), 0);
        assert!(!seq.ended());
    }

    #[test]
    fn test_counter_wraps_after_256_packets() {
        let mut seq = Sequence::new();
        for i in 0..256usize {
            seq.verify_and_advance(i as u8).unwrap();
        }
        assert_eq!(seq.next_packet_number(), 0);
        seq.verify_and_advance(0).unwrap();
        assert_eq!(seq.next_packet_number(), 1);
    }

    #[test]
    fn test_dispatch_packet_emits_and_advances() {
        let mut seq = Sequence::new();
        let mut packet_rx = seq.subscribe_packets();

        seq.dispatch_packet(Packet::Other(Bytes::from_static(&[0x01, 0x61])));
        seq.dispatch_packet(Packet::Eof(EofPacket::default()));
        assert_eq!(seq.next_packet_number(), 2);

        let (number, packet) = packet_rx.try_recv().unwrap();
        assert_eq!(number, 0);
        assert_eq!(packet, Packet::Other(Bytes::from_static(&[0x01, 0x61])));

        let (number, packet) = packet_rx.try_recv().unwrap();
        assert_eq!(number, 1);
        assert_eq!(packet, Packet::Eof(EofPacket::default()));
    }

    #[test]
    fn test_handle_routes_by_variant() {
        struct Recording {
            events: Vec<String>,
        }

        impl CommandSequence for Recording {
            fn start(&mut self, _seq: &mut Sequence) -> Result<(), ProtocolError> {
                Ok(())
            }

            fn on_ok(&mut self, _seq: &mut Sequence, packet: OkPacket) {
                self.events.push(format!("ok:{}", packet.affected_rows));
            }

            fn on_err(&mut self, _seq: &mut Sequence, packet: ErrPacket) {
                self.events.push(format!("err:{}", packet.error_code));
            }

            fn on_eof(&mut self, _seq: &mut Sequence, _packet: EofPacket) {
                self.events.push("eof".to_string());
            }

            fn on_packet(&mut self, _seq: &mut Sequence, payload: Bytes) {
                self.events.push(format!("packet:{}", payload.len()));
            }
        }

        let mut seq = Sequence::new();
        let mut cmd = Recording { events: Vec::new() };

        seq.handle(
            Packet::Ok(OkPacket {
                affected_rows: 7,
                ..Default::default()
            }),
            &mut cmd,
        );
        seq.handle(Packet::Other(Bytes::from_static(&[0x02, 0x03])), &mut cmd);
        seq.handle(Packet::Eof(EofPacket::default()), &mut cmd);
        seq.handle(
            Packet::Err(ErrPacket {
                error_code: 1064,
                ..Default::default()
            }),
            &mut cmd,
        );

        assert_eq!(cmd.events, vec!["ok:7", "packet:2", "eof", "err:1064"]);
    }

    #[test]
    fn test_has_failure_observer() {
        let seq = Sequence::new();
        assert!(!seq.has_failure_observer());

        let seq = Sequence::with_callback(|_| {});
        assert!(seq.has_failure_observer());

        let mut seq = Sequence::new();
        let _error_rx = seq.subscribe_errors();
        assert!(seq.has_failure_observer());

        // Packet and end subscribers are not failure observers.
        let mut seq = Sequence::new();
        let _packet_rx = seq.subscribe_packets();
        let _end_rx = seq.subscribe_end();
        assert!(!seq.has_failure_observer());
    }

    #[tokio::test]
    async fn test_completion_is_deferred() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_in_callback = fired.clone();
        let mut seq = Sequence::with_callback(move |_| {
            fired_in_callback.store(true, Ordering::SeqCst);
        });
        let mut end_rx = seq.subscribe_end();

        seq.complete(Ok(None));
        assert!(seq.ended());
        // Nothing may run inside the caller's stack.
        assert!(!fired.load(Ordering::SeqCst));
        assert!(end_rx.try_recv().is_err());

        end_rx.recv().await.unwrap();
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_complete_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_in_callback = calls.clone();
        let mut seq = Sequence::with_callback(move |_| {
            calls_in_callback.fetch_add(1, Ordering::SeqCst);
        });
        let mut end_rx = seq.subscribe_end();

        seq.complete(Ok(None));
        seq.complete(Err(server_error(1045, "Access denied")));
        seq.complete(Ok(None));

        end_rx.recv().await.unwrap();
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(end_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_first_completion_wins() {
        let outcome_slot: Arc<Mutex<Option<SequenceOutcome>>> = Arc::new(Mutex::new(None));
        let slot = outcome_slot.clone();
        let mut seq = Sequence::with_callback(move |outcome| {
            *slot.lock().unwrap() = Some(outcome);
        });
        let mut end_rx = seq.subscribe_end();

        seq.complete(Err(server_error(1205, "Lock wait timeout exceeded")));
        seq.complete(Ok(None));

        end_rx.recv().await.unwrap();
        let outcome = outcome_slot.lock().unwrap().take().unwrap();
        assert_eq!(
            outcome.unwrap_err().code,
            "ER_LOCK_WAIT_TIMEOUT"
        );
    }

    #[tokio::test]
    async fn test_error_delivered_before_callback_before_end() {
        let error_rx_slot: Arc<Mutex<Option<mpsc::UnboundedReceiver<ServerError>>>> =
            Arc::new(Mutex::new(None));
        let slot = error_rx_slot.clone();
        let error_seen_at_callback = Arc::new(AtomicBool::new(false));
        let seen = error_seen_at_callback.clone();

        let mut seq = Sequence::with_callback(move |outcome| {
            assert!(outcome.is_err());
            let mut error_rx = slot.lock().unwrap().take().unwrap();
            // The error channel must already hold the failure when the
            // callback runs.
            seen.store(error_rx.try_recv().is_ok(), Ordering::SeqCst);
        });
        *error_rx_slot.lock().unwrap() = Some(seq.subscribe_errors());
        let mut end_rx = seq.subscribe_end();

        seq.complete(Err(server_error(1045, "Access denied")));

        end_rx.recv().await.unwrap();
        assert!(error_seen_at_callback.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_error_observers_receive_failure() {
        let mut seq = Sequence::new();
        let mut error_rx = seq.subscribe_errors();
        let mut end_rx = seq.subscribe_end();

        seq.complete(Err(server_error(1045, "Access denied")));

        let err = error_rx.recv().await.unwrap();
        assert_eq!(err.code, "ER_ACCESS_DENIED_ERROR");
        assert_eq!(err.to_string(), "ER_ACCESS_DENIED_ERROR: Access denied");
        end_rx.recv().await.unwrap();
    }

    #[tokio::test]
    async fn test_success_skips_error_channel() {
        let mut seq = Sequence::new();
        let mut error_rx = seq.subscribe_errors();
        let mut end_rx = seq.subscribe_end();

        seq.complete(Ok(Some(OkPacket::default())));

        end_rx.recv().await.unwrap();
        assert!(error_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unobserved_failure_does_not_panic() {
        let mut seq = Sequence::new();
        let mut end_rx = seq.subscribe_end();
        assert!(!seq.has_failure_observer());

        seq.complete(Err(server_error(1045, "Access denied")));
        end_rx.recv().await.unwrap();
    }

    proptest! {
        #[test]
        fn prop_counter_tracks_accepted_count(count in 0usize..1024) {
            let mut seq = Sequence::new();
            for i in 0..count {
                prop_assert!(seq.verify_and_advance((i % 256) as u8).is_ok());
            }
            prop_assert_eq!(seq.next_packet_number(), (count % 256) as u8);
        }

        #[test]
        fn prop_mismatch_fails_and_keeps_counter(got in 1u8..=255) {
            let mut seq = Sequence::new();
            let err = seq.verify_and_advance(got).unwrap_err();
            if let ProtocolError::PacketsOutOfOrder { got: observed, expected } = &err {
                prop_assert_eq!(*observed, got);
                prop_assert_eq!(*expected, 0);
            } else {
                prop_assert!(false, "unexpected error variant: {err}");
            }
            prop_assert_eq!(seq.next_packet_number(), 0);
        }
    }
}
