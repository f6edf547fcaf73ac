//! # mywire-protocol
//!
//! Shared protocol vocabulary for mywire (MySQL-family wire protocol).
//!
//! This crate provides:
//! - Structured terminal packet types (OK / EOF / ERR)
//! - Leading-byte classification of terminal packets
//! - Translation of server error codes into typed failures
//! - Protocol error types shared by the sequence engine and its extensions
//!
//! Byte-level framing and payload parsing live in the transport layer;
//! everything here operates on already-decoded packet values.

pub mod constants;
pub mod error;
pub mod packet;

pub use constants::{error_symbol, UNKNOWN_CODE};
pub use error::{ProtocolError, ServerError};
pub use packet::{
    EofPacket, ErrPacket, OkPacket, Packet, PacketVariant, EOF_MARKER, ERR_MARKER, OK_MARKER,
};

/// Maximum payload size of a single MySQL packet (24-bit length field).
pub const MAX_PACKET_SIZE: usize = 0xff_ffff;
