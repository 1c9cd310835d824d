//! Catalog module - piece shapes, sizes, score weights and colors
//!
//! Every (piece, orientation) pair maps to a bounding box and a bitmap.
//! Each box row sits in its own 8-bit lane, bit 0 being the bottom-right cell
//! of the box. The table mirrors the authority's own shape table bit-for-bit:
//! placement indices cross the trust boundary, so any drift here shows up as
//! rejected placements.

use crate::types::{Color, Orientation, Piece};

/// Geometry and scoring for one (piece, orientation) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceSpec {
    pub height: u8,
    pub width: u8,
    pub bitmap: u64,
    pub score: u32,
    pub color: Color,
}

impl PieceSpec {
    /// Result for `None` inputs
    pub const EMPTY: PieceSpec = PieceSpec {
        height: 0,
        width: 0,
        bitmap: 0,
        score: 0,
        color: Color::NEUTRAL,
    };

    pub fn cell_count(&self) -> u32 {
        self.bitmap.count_ones()
    }
}

/// Full catalog lookup; total, `None` on either side yields [`PieceSpec::EMPTY`]
pub fn spec(piece: Piece, orientation: Orientation) -> PieceSpec {
    if piece.is_none() || orientation.is_none() {
        return PieceSpec::EMPTY;
    }
    let (height, width) = size(piece, orientation);
    PieceSpec {
        height,
        width,
        bitmap: bitmap(piece, orientation),
        score: score(piece),
        color: color(piece),
    }
}

/// Bounding box `(height, width)`
pub fn size(piece: Piece, orientation: Orientation) -> (u8, u8) {
    if orientation.is_none() {
        return (0, 0);
    }
    let tall = orientation.is_vertical();
    match piece {
        Piece::None => (0, 0),
        Piece::BigBoy | Piece::LargeCorner => (3, 3),
        Piece::Corner | Piece::Smashboy => (2, 2),
        Piece::BlueRicky
        | Piece::ClevelandZ
        | Piece::OrangeRicky
        | Piece::RhodeIsland
        | Piece::Teewee => {
            if tall {
                (2, 3)
            } else {
                (3, 2)
            }
        }
        Piece::Tallboy => {
            if tall {
                (3, 2)
            } else {
                (2, 3)
            }
        }
        Piece::Domino => line(2, tall),
        Piece::Triomino => line(3, tall),
        Piece::Hero => line(4, tall),
        Piece::SuperHero => line(5, tall),
    }
}

fn line(len: u8, tall: bool) -> (u8, u8) {
    if tall {
        (len, 1)
    } else {
        (1, len)
    }
}

/// Occupancy bitmap, one 8-bit lane per box row, top row in the highest lane
pub fn bitmap(piece: Piece, orientation: Orientation) -> u64 {
    use Orientation::{Down, Left, Right, Up};

    match (piece, orientation) {
        (_, Orientation::None) | (Piece::None, _) => 0,

        (Piece::BigBoy, _) => 0b00000111_00000111_00000111,

        (Piece::BlueRicky, Up) => 0b00000100_00000111,
        (Piece::BlueRicky, Down) => 0b00000111_00000001,
        (Piece::BlueRicky, Left) => 0b00000001_00000001_00000011,
        (Piece::BlueRicky, Right) => 0b00000011_00000010_00000010,

        (Piece::ClevelandZ, Up | Down) => 0b00000110_00000011,
        (Piece::ClevelandZ, Left | Right) => 0b00000001_00000011_00000010,

        (Piece::Corner, Up) => 0b00000001_00000011,
        (Piece::Corner, Down) => 0b00000011_00000010,
        (Piece::Corner, Left) => 0b00000011_00000001,
        (Piece::Corner, Right) => 0b00000010_00000011,

        (Piece::Domino, Up | Down) => 0b00000001_00000001,
        (Piece::Domino, Left | Right) => 0b00000011,

        (Piece::Hero, Up | Down) => 0b00000001_00000001_00000001_00000001,
        (Piece::Hero, Left | Right) => 0b00001111,

        (Piece::LargeCorner, Up) => 0b00000001_00000001_00000111,
        (Piece::LargeCorner, Down) => 0b00000111_00000100_00000100,
        (Piece::LargeCorner, Left) => 0b00000111_00000001_00000001,
        (Piece::LargeCorner, Right) => 0b00000100_00000100_00000111,

        (Piece::OrangeRicky, Up) => 0b00000001_00000111,
        (Piece::OrangeRicky, Down) => 0b00000111_00000100,
        (Piece::OrangeRicky, Left) => 0b00000011_00000001_00000001,
        (Piece::OrangeRicky, Right) => 0b00000010_00000010_00000011,

        (Piece::RhodeIsland, Up | Down) => 0b00000011_00000110,
        (Piece::RhodeIsland, Left | Right) => 0b00000010_00000011_00000001,

        (Piece::Smashboy, _) => 0b00000011_00000011,

        (Piece::SuperHero, Up | Down) => 0b00000001_00000001_00000001_00000001_00000001,
        (Piece::SuperHero, Left | Right) => 0b00011111,

        (Piece::Tallboy, Up | Down) => 0b00000011_00000011_00000011,
        (Piece::Tallboy, Left | Right) => 0b00000111_00000111,

        (Piece::Teewee, Up) => 0b00000010_00000111,
        (Piece::Teewee, Down) => 0b00000111_00000010,
        (Piece::Teewee, Left) => 0b00000001_00000011_00000001,
        (Piece::Teewee, Right) => 0b00000010_00000011_00000010,

        (Piece::Triomino, Up | Down) => 0b00000001_00000001_00000001,
        (Piece::Triomino, Left | Right) => 0b00000111,
    }
}

/// Score weight awarded by the authority when the piece is placed
pub fn score(piece: Piece) -> u32 {
    match piece {
        Piece::None => 0,
        Piece::BigBoy => 9,
        Piece::Tallboy => 6,
        Piece::LargeCorner | Piece::SuperHero => 5,
        Piece::BlueRicky
        | Piece::ClevelandZ
        | Piece::Hero
        | Piece::OrangeRicky
        | Piece::RhodeIsland
        | Piece::Smashboy
        | Piece::Teewee => 4,
        Piece::Corner | Piece::Triomino => 3,
        Piece::Domino => 2,
    }
}

pub fn color(piece: Piece) -> Color {
    match piece {
        Piece::None => Color::NEUTRAL,
        Piece::BigBoy => Color(0xFF6B6B),
        Piece::BlueRicky => Color(0x4ECDC4),
        Piece::ClevelandZ => Color(0x45B7D1),
        Piece::Corner => Color(0xFFA07A),
        Piece::Domino => Color(0x98D8C8),
        Piece::Hero => Color(0xF7DC6F),
        Piece::LargeCorner => Color(0xBB8FCE),
        Piece::OrangeRicky => Color(0xF39C12),
        Piece::RhodeIsland => Color(0x52C97E),
        Piece::Smashboy => Color(0xE74C3C),
        Piece::SuperHero => Color(0x3498DB),
        Piece::Tallboy => Color(0x9B59B6),
        Piece::Teewee => Color(0x1ABC9C),
        Piece::Triomino => Color(0xE67E22),
    }
}

/// Human-readable name; empty for `None`
pub fn name(piece: Piece) -> &'static str {
    match piece {
        Piece::None => "",
        Piece::BigBoy => "Big Boy",
        Piece::BlueRicky => "Blue Ricky",
        Piece::ClevelandZ => "Cleveland Z",
        Piece::Corner => "Corner",
        Piece::Domino => "Domino",
        Piece::Hero => "Hero",
        Piece::LargeCorner => "Large Corner",
        Piece::OrangeRicky => "Orange Ricky",
        Piece::RhodeIsland => "Rhode Island",
        Piece::Smashboy => "Smashboy",
        Piece::SuperHero => "Super Hero",
        Piece::Tallboy => "Tallboy",
        Piece::Teewee => "Teewee",
        Piece::Triomino => "Triomino",
    }
}

pub fn description(piece: Piece) -> &'static str {
    match piece {
        Piece::None => "",
        Piece::BigBoy => "A massive 3x3 block, the ultimate space filler",
        Piece::BlueRicky => "L-shaped piece, perfect for corners",
        Piece::ClevelandZ => "Z-shaped piece for those tricky spots",
        Piece::Corner => "Small L corner, compact and versatile",
        Piece::Domino => "Simple 2-block piece, easy to place",
        Piece::Hero => "Classic I-piece with 4 blocks in a row",
        Piece::LargeCorner => "Extended L corner for bigger combos",
        Piece::OrangeRicky => "Reverse L-shaped piece",
        Piece::RhodeIsland => "S-shaped piece, zigzag your way to victory",
        Piece::Smashboy => "Solid 2x2 square block",
        Piece::SuperHero => "Extended I-piece with 5 blocks",
        Piece::Tallboy => "Tall 3x2 rectangle",
        Piece::Teewee => "T-shaped piece, great for filling gaps",
        Piece::Triomino => "3-block line piece",
    }
}
