//! Error types for decoding authoritative data
//!
//! These only occur when the client and the authority disagree about encodings
//! (table drift, version skew, a buggy relay). They are surfaced, never papered
//! over with defaults.

use thiserror::Error;

/// A packed value from a snapshot could not be materialized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Piece index outside the catalog (0..=14)
    #[error("unknown piece index {index} in subpack {subpack}")]
    UnknownPiece { subpack: u8, index: u8 },

    /// Orientation index outside 0..=4
    #[error("unknown orientation index {index} in subpack {subpack}")]
    UnknownOrientation { subpack: u8, index: u8 },

    /// The packed piece set holds more slots than a game can offer
    #[error("packed piece set {packed:#x} holds more than {max} pieces")]
    TooManyPieces { packed: u64, max: usize },

    /// A slot decodes to the `None` piece or the `None` orientation
    #[error("packed piece set holds an empty slot (subpack {subpack})")]
    EmptySlot { subpack: u8 },

    /// A big integer field does not fit or is not a number
    #[error("malformed snapshot field `{field}`: {reason}")]
    MalformedField { field: &'static str, reason: String },

    /// The player's name is not a valid short string
    #[error("malformed player name: {0}")]
    Name(#[from] ShortStringError),
}

impl DecodeError {
    /// True for index-table drift between client and authority
    pub fn is_table_drift(&self) -> bool {
        matches!(
            self,
            DecodeError::UnknownPiece { .. } | DecodeError::UnknownOrientation { .. }
        )
    }
}

/// Encoding or decoding a felt short string failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortStringError {
    #[error("short string longer than {max} bytes ({len})")]
    TooLong { len: usize, max: usize },

    #[error("short string contains non-ASCII character {0:?}")]
    NonAscii(char),

    #[error("invalid hex felt `{0}`")]
    InvalidHex(String),
}

/// Why a local placement attempt was dropped
///
/// Local rejects are silent towards the authority: nothing is sent. The reason
/// is reported so callers can log or assert on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlaceRejection {
    #[error("no active game")]
    NotActive,
    #[error("a placement is already in flight")]
    InFlight,
    #[error("no piece selected")]
    NoSelection,
    #[error("selected piece has no shape")]
    EmptyPiece,
    #[error("piece does not fit at that position")]
    Blocked,
}
