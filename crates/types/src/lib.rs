//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the client.
//! All types are pure data with no external dependencies, making them usable
//! in any context (core logic, reconciliation, transport protocol).
//!
//! # Grid Dimensions
//!
//! The playfield is a fixed 8x8 grid:
//!
//! - **Rows**: 8 (indexed 0-7, top to bottom)
//! - **Columns**: 8 (indexed 0-7, left to right)
//! - **Packed form**: one `u64`, bit 0 = bottom-right, bit 63 = top-left
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `LINE_CLEAR_DELAY_MS` | 200 | Colored placement shown before lines clear |
//! | `COUNTDOWN_MS` | 7000 | Interactivity gate after a fresh game appears |
//! | `SUBMIT_TIMEOUT_MS` | 30000 | Placement result wait before giving up |
//!
//! # Examples
//!
//! ```
//! use grimblock_types::{Orientation, Piece, GRID_SIZE};
//!
//! let piece = Piece::from_str("domino").unwrap();
//! assert_eq!(piece, Piece::Domino);
//! assert_eq!(piece.index(), 5);
//!
//! assert_eq!(Orientation::from_index(3), Some(Orientation::Left));
//! assert_eq!(GRID_SIZE, 8);
//! ```

use std::fmt;

/// Grid side length in cells (8)
pub const GRID_SIZE: u8 = 8;

/// Total number of cells on the grid
pub const GRID_CELLS: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

/// Width in bits of one bitmap row lane, independent of piece width
pub const LANE_BITS: u32 = 8;

/// Largest bounding-box side of any piece (SuperHero / Hero)
pub const MAX_SPAN: usize = 5;

/// Number of real pieces (excluding `Piece::None`)
pub const PIECE_COUNT: usize = 14;

/// Number of real orientations (excluding `Orientation::None`)
pub const ORIENTATION_COUNT: usize = 4;

/// Multiplier separating orientation from piece in a subpack id
pub const PIECE_RADIX: u8 = 16;

/// Bits per slot in a packed piece set
pub const SUBPACK_BITS: u32 = 8;

/// Upper bound on offered pieces per game
pub const MAX_OFFERED_PIECES: usize = 3;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delay between the colored optimistic placement and the local line clear
pub const LINE_CLEAR_DELAY_MS: u32 = 200;

/// Countdown gating interactivity on a freshly created game
pub const COUNTDOWN_MS: u32 = 7000;

/// How long a submitted placement may stay unresolved
pub const SUBMIT_TIMEOUT_MS: u32 = 30_000;

/// Points shown per combo step on the combo notification
pub const COMBO_POINTS_PER_STEP: u32 = 10;

/// RGB display color, stored as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// Color the authority reports for every settled cell
    pub const SETTLED: Color = Color(0x64748B);

    /// Color of `Piece::None` and unknown inputs
    pub const NEUTRAL: Color = Color(0x95A5A6);

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive)
    ///
    /// ```
    /// use grimblock_types::Color;
    ///
    /// assert_eq!(Color::from_hex("#64748b"), Some(Color::SETTLED));
    /// assert_eq!(Color::from_hex("zzz"), None);
    /// ```
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0xFF_FFFF)
    }
}

/// A cell on the visible grid
///
/// - `None`: Empty cell
/// - `Some(Color)`: Filled cell with its display color
pub type Cell = Option<Color>;

/// The piece shapes, indexed exactly as the authority indexes them
///
/// `None` is an explicit sentinel (index 0), not an absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Piece {
    None,
    BigBoy,
    BlueRicky,
    ClevelandZ,
    Corner,
    Domino,
    Hero,
    LargeCorner,
    OrangeRicky,
    RhodeIsland,
    Smashboy,
    SuperHero,
    Tallboy,
    Teewee,
    Triomino,
}

impl Piece {
    /// Every variant in index order, `None` first
    pub const ALL: [Piece; PIECE_COUNT + 1] = [
        Piece::None,
        Piece::BigBoy,
        Piece::BlueRicky,
        Piece::ClevelandZ,
        Piece::Corner,
        Piece::Domino,
        Piece::Hero,
        Piece::LargeCorner,
        Piece::OrangeRicky,
        Piece::RhodeIsland,
        Piece::Smashboy,
        Piece::SuperHero,
        Piece::Tallboy,
        Piece::Teewee,
        Piece::Triomino,
    ];

    /// Wire index of this piece (0 = `None`)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Look up a piece by wire index; `None` (the Rust option) when out of table
    ///
    /// ```
    /// use grimblock_types::Piece;
    ///
    /// assert_eq!(Piece::from_index(0), Some(Piece::None));
    /// assert_eq!(Piece::from_index(14), Some(Piece::Triomino));
    /// assert_eq!(Piece::from_index(15), None);
    /// ```
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn is_none(self) -> bool {
        self == Piece::None
    }

    /// Parse piece from its identifier (case-insensitive, e.g. "bigBoy")
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().to_lowercase() == lower)
    }

    /// Stable camelCase identifier
    pub fn as_str(self) -> &'static str {
        match self {
            Piece::None => "none",
            Piece::BigBoy => "bigBoy",
            Piece::BlueRicky => "blueRicky",
            Piece::ClevelandZ => "clevelandZ",
            Piece::Corner => "corner",
            Piece::Domino => "domino",
            Piece::Hero => "hero",
            Piece::LargeCorner => "largeCorner",
            Piece::OrangeRicky => "orangeRicky",
            Piece::RhodeIsland => "rhodeIsland",
            Piece::Smashboy => "smashboy",
            Piece::SuperHero => "superHero",
            Piece::Tallboy => "tallboy",
            Piece::Teewee => "teewee",
            Piece::Triomino => "triomino",
        }
    }
}

/// Piece orientations; `None` is index 0
///
/// Symmetric pieces present the same bitmap for Up/Down and for Left/Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Orientation {
    pub const ALL: [Orientation; ORIENTATION_COUNT + 1] = [
        Orientation::None,
        Orientation::Up,
        Orientation::Down,
        Orientation::Left,
        Orientation::Right,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    pub fn is_none(self) -> bool {
        self == Orientation::None
    }

    /// True for Up/Down, the orientations that keep the catalog's "tall" box
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Up | Orientation::Down)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::None => "none",
            Orientation::Up => "up",
            Orientation::Down => "down",
            Orientation::Left => "left",
            Orientation::Right => "right",
        }
    }
}

/// Contract entrypoints the client can submit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entrypoint {
    Create,
    Place,
    Spawn,
    Rename,
}

impl Entrypoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entrypoint::Create => "create",
            Entrypoint::Place => "place",
            Entrypoint::Spawn => "spawn",
            Entrypoint::Rename => "rename",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "create" => Some(Entrypoint::Create),
            "place" => Some(Entrypoint::Place),
            "spawn" => Some(Entrypoint::Spawn),
            "rename" => Some(Entrypoint::Rename),
            _ => None,
        }
    }
}

/// An action submitted to the remote authority
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Start a fresh game for the calling player
    Create,
    /// Place offered piece `piece_index` with its bit-0 anchor at `grid_index`
    Place {
        game_id: u32,
        piece_index: u8,
        grid_index: u8,
    },
    /// Register the calling account under `name`
    Spawn { name: String },
    /// Change the calling player's display name
    Rename { name: String },
}

impl Action {
    pub fn entrypoint(&self) -> Entrypoint {
        match self {
            Action::Create => Entrypoint::Create,
            Action::Place { .. } => Entrypoint::Place,
            Action::Spawn { .. } => Entrypoint::Spawn,
            Action::Rename { .. } => Entrypoint::Rename,
        }
    }
}
