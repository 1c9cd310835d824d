//! Piece-set decoder - packed offered pieces -> ordered (piece, orientation) list
//!
//! The authority packs the offered pieces into one integer, one slot of
//! [`SUBPACK_BITS`] bits per piece, first piece in the least significant slot.
//! Each slot holds a subpack id `orientation * 16 + piece`.

use arrayvec::ArrayVec;

use crate::catalog;
use crate::codec::{bitmap_to_matrix, PieceMatrix};
use crate::error::DecodeError;
use crate::types::{Color, Orientation, Piece, MAX_OFFERED_PIECES, PIECE_RADIX, SUBPACK_BITS};

/// Offered pieces in authority order
pub type PieceSet = ArrayVec<OfferedPiece, MAX_OFFERED_PIECES>;

/// Subpack id naming a (piece, orientation) pair
///
/// ```
/// use grimblock_core::pieces::subpack_id;
/// use grimblock_core::types::{Orientation, Piece};
///
/// assert_eq!(subpack_id(Piece::Domino, Orientation::Up), 21);
/// ```
pub fn subpack_id(piece: Piece, orientation: Orientation) -> u8 {
    orientation.index() * PIECE_RADIX + piece.index()
}

/// Split a subpack id back into its pair
///
/// Indices outside the tables are reported, never coerced to `None`.
pub fn decode_subpack(subpack: u8) -> Result<(Piece, Orientation), DecodeError> {
    let piece_index = subpack % PIECE_RADIX;
    let orientation_index = subpack / PIECE_RADIX;
    let piece = Piece::from_index(piece_index).ok_or(DecodeError::UnknownPiece {
        subpack,
        index: piece_index,
    })?;
    let orientation =
        Orientation::from_index(orientation_index).ok_or(DecodeError::UnknownOrientation {
            subpack,
            index: orientation_index,
        })?;
    Ok((piece, orientation))
}

/// Raw slot values, least significant first, stopping when the value runs out
pub fn unpack(packed: u64) -> Result<ArrayVec<u8, MAX_OFFERED_PIECES>, DecodeError> {
    let radix = 1u64 << SUBPACK_BITS;
    let mut slots = ArrayVec::new();
    let mut rest = packed;
    while rest != 0 {
        slots
            .try_push((rest % radix) as u8)
            .map_err(|_| DecodeError::TooManyPieces {
                packed,
                max: MAX_OFFERED_PIECES,
            })?;
        rest /= radix;
    }
    Ok(slots)
}

/// Inverse of [`unpack`]
pub fn pack(subpacks: &[u8]) -> u64 {
    subpacks
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &s)| acc | ((s as u64) << (i as u32 * SUBPACK_BITS)))
}

/// Decode the packed offered pieces of a game
pub fn decode_piece_set(packed: u64) -> Result<PieceSet, DecodeError> {
    let mut set = PieceSet::new();
    for subpack in unpack(packed)? {
        let (piece, orientation) = decode_subpack(subpack)?;
        if piece.is_none() || orientation.is_none() {
            return Err(DecodeError::EmptySlot { subpack });
        }
        set.push(OfferedPiece::new(piece, orientation));
    }
    Ok(set)
}

/// One offered piece with its geometry resolved from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OfferedPiece {
    pub piece: Piece,
    pub orientation: Orientation,
    pub subpack: u8,
    pub matrix: PieceMatrix,
}

impl OfferedPiece {
    pub fn new(piece: Piece, orientation: Orientation) -> Self {
        let spec = catalog::spec(piece, orientation);
        Self {
            piece,
            orientation,
            subpack: subpack_id(piece, orientation),
            matrix: bitmap_to_matrix(spec.bitmap, spec.height, spec.width),
        }
    }

    pub fn color(&self) -> Color {
        catalog::color(self.piece)
    }

    pub fn score(&self) -> u32 {
        catalog::score(self.piece)
    }
}
