//! Protocol error types and server error translation.

use crate::constants::{error_symbol, UNKNOWN_CODE};
use crate::packet::ErrPacket;
use thiserror::Error;

/// Protocol-level failures raised synchronously to the caller.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The observed packet number does not match the rolling counter.
    ///
    /// Signals a desynchronized or corrupted connection; the caller must
    /// stop feeding packets and tear the connection down.
    #[error("packets out of order: got {got}, expected {expected}")]
    PacketsOutOfOrder { got: u8, expected: u8 },

    #[error("server error: {0}")]
    Server(#[from] ServerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A failure reported by the server through an ERR packet.
///
/// Cloned to every error observer of a sequence, so it carries owned data
/// only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ServerError {
    /// Symbolic `ER_*` name, or [`UNKNOWN_CODE`] for unmapped codes.
    pub code: &'static str,
    /// Numeric server error code.
    pub errno: u16,
    /// Five-character SQLSTATE, empty when the server sent none.
    pub sql_state: String,
    /// Human-readable message from the server.
    pub message: String,
}

impl ServerError {
    /// Translates a server ERR packet into a typed failure.
    ///
    /// Pure translation: unmapped codes fall back to the sentinel symbol,
    /// and nothing here ends a sequence.
    pub fn from_packet(packet: &ErrPacket) -> ServerError {
        ServerError {
            code: error_symbol(packet.error_code).unwrap_or(UNKNOWN_CODE),
            errno: packet.error_code,
            sql_state: packet.sql_state.clone(),
            message: packet.message.clone(),
        }
    }
}
