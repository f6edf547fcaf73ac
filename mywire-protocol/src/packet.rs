//! Structured packet values consumed by the sequence engine.
//!
//! Packets arrive already decoded from the transport. This module defines
//! the closed set of terminal packet types every exchange understands, and
//! the leading-byte classification that routes a packet to its handler.

use bytes::Bytes;

/// Discriminator byte of an OK packet.
pub const OK_MARKER: u8 = 0x00;

/// Discriminator byte of an EOF packet.
pub const EOF_MARKER: u8 = 0xfe;

/// Discriminator byte of an ERR packet.
pub const ERR_MARKER: u8 = 0xff;

/// The three universally-recognized terminal packet variants.
///
/// Any other leading byte belongs to a command-specific payload and is
/// interpreted by the command sequence, not at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketVariant {
    Ok,
    Eof,
    Err,
}

impl PacketVariant {
    /// Classifies a packet by its leading byte.
    ///
    /// Returns `None` when the byte does not name a universal terminal
    /// variant, meaning command-specific logic must interpret the payload.
    pub fn from_marker(byte: u8) -> Option<PacketVariant> {
        match byte {
            OK_MARKER => Some(PacketVariant::Ok),
            EOF_MARKER => Some(PacketVariant::Eof),
            ERR_MARKER => Some(PacketVariant::Err),
            _ => None,
        }
    }

    /// The discriminator byte for this variant.
    pub fn marker(&self) -> u8 {
        match self {
            PacketVariant::Ok => OK_MARKER,
            PacketVariant::Eof => EOF_MARKER,
            PacketVariant::Err => ERR_MARKER,
        }
    }
}

/// Success packet (leading byte `0x00`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OkPacket {
    pub affected_rows: u64,
    pub last_insert_id: u64,
    pub status_flags: u16,
    pub warnings: u16,
    /// Human-readable status info, often empty.
    pub info: String,
}

/// End-of-data packet (leading byte `0xfe`).
///
/// What "no more data" means is up to the command: end of rows, end of
/// column definitions, an auth plugin switch during handshake.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EofPacket {
    pub warnings: u16,
    pub status_flags: u16,
}

/// Server error packet (leading byte `0xff`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrPacket {
    /// Numeric server error code (e.g. 1045).
    pub error_code: u16,
    /// Five-character SQLSTATE, empty when the server sent none.
    pub sql_state: String,
    /// Human-readable message from the server.
    pub message: String,
}

/// A decoded packet delivered to a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Ok(OkPacket),
    Eof(EofPacket),
    Err(ErrPacket),
    /// Command-specific payload; its first byte is the discriminator.
    Other(Bytes),
}

impl Packet {
    /// The leading discriminator byte of this packet.
    ///
    /// `Other` payloads report their first raw byte; an empty payload has
    /// no discriminator.
    pub fn marker(&self) -> Option<u8> {
        match self {
            Packet::Ok(_) => Some(OK_MARKER),
            Packet::Eof(_) => Some(EOF_MARKER),
            Packet::Err(_) => Some(ERR_MARKER),
            Packet::Other(payload) => payload.first().copied(),
        }
    }

    /// The terminal variant of this packet, if it is one.
    pub fn variant(&self) -> Option<PacketVariant> {
        match self {
            Packet::Ok(_) => Some(PacketVariant::Ok),
            Packet::Eof(_) => Some(PacketVariant::Eof),
            Packet::Err(_) => Some(PacketVariant::Err),
            Packet::Other(_) => None,
        }
    }
}
