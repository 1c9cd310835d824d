//! Authoritative snapshots and their decoded models
//!
//! A [`GameSnapshot`] is what the feed delivers: packed integers, untouched.
//! A [`GameModel`] is the same state with the piece set decoded; building one
//! is where malformed packed values are caught.

use crate::board::Board;
use crate::codec;
use crate::error::DecodeError;
use crate::pieces::{decode_piece_set, PieceSet};
use crate::short_string::decode_short_string;
use crate::types::GRID_CELLS;

/// Raw game state as reported by the authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameSnapshot {
    /// Owner address as a hex felt
    pub player_id: String,
    /// 0 means "no game"
    pub id: u32,
    pub streak: bool,
    pub over: bool,
    pub combo: u32,
    pub score: u32,
    /// Packed offered pieces
    pub pieces: u64,
    /// Packed grid occupancy
    pub grid: u64,
    /// Piece-generation seed, opaque to the client
    pub seed: String,
}

/// Raw player record as reported by the authority
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PlayerSnapshot {
    pub id: String,
    /// Packed short-string name as a hex felt
    pub name: String,
}

/// Canonical form of a hex felt: lowercase, `0x` prefix, no leading zeros
///
/// ```
/// use grimblock_core::snapshot::normalize_felt;
///
/// assert_eq!(normalize_felt("0x00ABc"), "0xabc");
/// assert_eq!(normalize_felt("0x000"), "0x0");
/// ```
pub fn normalize_felt(felt: &str) -> String {
    let trimmed = felt.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .trim_start_matches('0')
        .to_ascii_lowercase();
    if digits.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{digits}")
    }
}

/// Decoded game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameModel {
    pub player_id: String,
    pub id: u32,
    pub streak: bool,
    pub over: bool,
    pub combo: u32,
    pub score: u32,
    pub pieces: PieceSet,
    pub packed_pieces: u64,
    pub grid: u64,
    pub seed: String,
}

impl GameModel {
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Result<Self, DecodeError> {
        Ok(Self {
            player_id: normalize_felt(&snapshot.player_id),
            id: snapshot.id,
            streak: snapshot.streak,
            over: snapshot.over,
            combo: snapshot.combo,
            score: snapshot.score,
            pieces: decode_piece_set(snapshot.pieces)?,
            packed_pieces: snapshot.pieces,
            grid: snapshot.grid,
            seed: snapshot.seed.clone(),
        })
    }

    pub fn exists(&self) -> bool {
        self.id != 0
    }

    /// Pieces have been dealt
    pub fn has_started(&self) -> bool {
        !self.pieces.is_empty()
    }

    /// Grid bit `index` is empty; out-of-range indices count as idle
    pub fn is_idle(&self, index: u8) -> bool {
        (index as usize) >= GRID_CELLS || self.grid & (1u64 << index) == 0
    }

    pub fn board(&self) -> Board {
        codec::decode(self.grid)
    }
}

/// Decoded player
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PlayerModel {
    pub id: String,
    pub name: String,
}

impl PlayerModel {
    pub fn from_snapshot(snapshot: &PlayerSnapshot) -> Result<Self, DecodeError> {
        Ok(Self {
            id: normalize_felt(&snapshot.id),
            name: decode_short_string(&snapshot.name)?,
        })
    }

    /// Registered players always carry a name
    pub fn exists(&self) -> bool {
        !self.name.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{pack, subpack_id};
    use crate::types::{Orientation, Piece};

    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            player_id: "0x0ABC".to_string(),
            id: 7,
            score: 12,
            pieces: pack(&[
                subpack_id(Piece::Corner, Orientation::Left),
                subpack_id(Piece::Hero, Orientation::Right),
            ]),
            grid: 0b1000_0001,
            ..Default::default()
        }
    }

    #[test]
    fn game_model_decodes_pieces_and_grid() {
        let model = GameModel::from_snapshot(&snapshot()).unwrap();
        assert!(model.exists());
        assert!(model.has_started());
        assert_eq!(model.player_id, "0xabc");
        assert_eq!(model.pieces[1].piece, Piece::Hero);
        assert!(!model.is_idle(0));
        assert!(!model.is_idle(7));
        assert!(model.is_idle(1));
        assert!(model.is_idle(64));
        let board = model.board();
        assert!(board.is_filled(7, 7));
        assert!(board.is_filled(7, 0));
    }

    #[test]
    fn game_model_surfaces_malformed_pieces() {
        let mut raw = snapshot();
        raw.pieces = 0x0F;
        assert!(GameModel::from_snapshot(&raw).unwrap_err().is_table_drift());
    }

    #[test]
    fn default_model_does_not_exist() {
        let model = GameModel::default();
        assert!(!model.exists());
        assert!(!model.has_started());
    }

    #[test]
    fn player_name_is_decoded() {
        let player = PlayerModel::from_snapshot(&PlayerSnapshot {
            id: "0x1".to_string(),
            name: "0x616c696365".to_string(),
        })
        .unwrap();
        assert_eq!(player.name, "alice");
        assert!(player.exists());

        let unnamed = PlayerModel::from_snapshot(&PlayerSnapshot {
            id: "0x2".to_string(),
            name: "0x0".to_string(),
        })
        .unwrap();
        assert!(!unnamed.exists());
    }
}
