//! Core logic - pure, deterministic, and testable
//!
//! Everything the client needs to understand the authority's packed state and
//! to predict the effect of a placement. No I/O, no clocks, no logging.
//!
//! # Module Structure
//!
//! - [`catalog`]: piece × orientation → bitmap, size, score, color
//! - [`codec`]: packed `u64` grid ↔ [`Board`], bitmap → [`PieceMatrix`]
//! - [`board`]: 8×8 matrix of colored cells
//! - [`placement`]: collision, stamping, row/column clearing, anchor index
//! - [`pieces`]: packed piece set ↔ offered pieces
//! - [`short_string`]: felt short strings for player names
//! - [`snapshot`]: raw authoritative records and their decoded models
//! - [`entities`]: games and players by id, latest game, leaderboard
//! - [`action`]: calldata for each contract entrypoint
//! - [`controller`]: optimistic visible state reconciled against snapshots
//!
//! # Grid Encoding
//!
//! Bit `i` of the packed grid is cell `(row, col)` with
//! `i = (7 - row) * 8 + (7 - col)`: bit 0 is the bottom-right cell, bit 63 the
//! top-left. Piece bitmaps use the same lane layout relative to their own box.
//!
//! # Example
//!
//! ```
//! use grimblock_core::controller::{Controller, Phase};
//! use grimblock_core::pieces::{pack, subpack_id};
//! use grimblock_core::snapshot::GameSnapshot;
//! use grimblock_core::types::{Orientation, Piece};
//!
//! let mut controller = Controller::default();
//! let snapshot = GameSnapshot {
//!     id: 1,
//!     score: 4,
//!     pieces: pack(&[subpack_id(Piece::Smashboy, Orientation::Up)]),
//!     ..Default::default()
//! };
//! controller.observe_snapshot(&snapshot).unwrap();
//! assert_eq!(controller.phase(), Phase::Active);
//!
//! controller.select_piece(0);
//! let request = controller.attempt_place(6, 6).unwrap();
//! assert_eq!(controller.visible().board.filled_count(), 4);
//! controller.resolve_placement(request.ticket, true);
//! ```

pub use grimblock_types as types;

pub mod action;
pub mod board;
pub mod catalog;
pub mod codec;
pub mod controller;
pub mod entities;
pub mod error;
pub mod pieces;
pub mod placement;
pub mod short_string;
pub mod snapshot;

pub use board::Board;
pub use codec::PieceMatrix;
pub use controller::{Controller, ControllerConfig, Phase, VisibleState};
pub use entities::EntityStore;
pub use error::{DecodeError, PlaceRejection, ShortStringError};
pub use pieces::{OfferedPiece, PieceSet};
pub use snapshot::{GameModel, GameSnapshot, PlayerModel, PlayerSnapshot};
