//! # mywire-sequence
//!
//! The sequence state machine driving a single request/response exchange
//! over the MySQL-family wire protocol.
//!
//! A [`Sequence`] validates packet ordering, routes decoded packets to
//! command-specific handling by their leading discriminator byte, and
//! guarantees exactly-once, deferred completion notification to the
//! issuer of the request — whether completion came from a success packet,
//! a server error, or an explicit early end.
//!
//! Command-specific exchanges (query execution, handshake negotiation,
//! statement preparation) plug in through the [`CommandSequence`] trait;
//! this crate owns only the generic terminal-packet handling they all
//! share.

pub mod command;
pub mod sequence;

pub use command::CommandSequence;
pub use sequence::{Sequence, SequenceOutcome};
