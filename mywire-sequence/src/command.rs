//! Command-specific sequence behavior.

use crate::sequence::Sequence;
use bytes::Bytes;
use mywire_protocol::{EofPacket, ErrPacket, OkPacket, ProtocolError, ServerError};

/// Strategy for one kind of command exchange.
///
/// A generic [`Sequence`] supplies packet ordering, terminal-packet
/// shortcuts and the completion lifecycle; implementations of this trait
/// supply what the command actually means: how the exchange starts and
/// how its non-terminal packets are interpreted. Implementations may also
/// override the OK/ERR defaults, e.g. to keep reading after an OK that
/// announces more results.
pub trait CommandSequence: Send {
    /// Begins the exchange, typically by encoding and writing the command
    /// to the transport. Invoked exactly once, before any packet arrives.
    fn start(&mut self, seq: &mut Sequence) -> Result<(), ProtocolError>;

    /// Server acknowledged success. The default completes the sequence
    /// with the OK packet as its result.
    fn on_ok(&mut self, seq: &mut Sequence, packet: OkPacket) {
        seq.complete(Ok(Some(packet)));
    }

    /// Server reported a failure. The default translates the packet into
    /// a [`ServerError`] and completes the sequence with it.
    fn on_err(&mut self, seq: &mut Sequence, packet: ErrPacket) {
        seq.complete(Err(ServerError::from_packet(&packet)));
    }

    /// End-of-data marker. There is no generic meaning at this layer;
    /// each command decides what "no more data" is (end of rows, end of
    /// column definitions, an auth switch on old servers).
    fn on_eof(&mut self, seq: &mut Sequence, packet: EofPacket);

    /// A non-terminal, command-specific payload packet.
    fn on_packet(&mut self, seq: &mut Sequence, payload: Bytes);
}
