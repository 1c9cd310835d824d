//! Grid codec - packed `u64` grid <-> visible board, and piece bitmaps <-> matrices
//!
//! Index convention shared with the authority:
//!
//! ```text
//! bit = (SIZE - 1 - row) * SIZE + (SIZE - 1 - col)
//! ```
//!
//! so bit 0 is the bottom-right cell and bit 63 the top-left. Piece bitmaps use
//! the same orientation (bit 0 = bottom-right of the bounding box), which is what
//! makes a piece's bit 0 and the grid's bit 0 line up on placement.

use crate::board::Board;
use crate::types::{Color, GRID_SIZE, LANE_BITS, MAX_SPAN};

/// Bit index of cell (row, col)
///
/// `row` and `col` must both be below [`GRID_SIZE`]; callers clip positions
/// first (see [`crate::placement::position_to_grid_index`]).
///
/// ```
/// use grimblock_core::codec::encode_index;
///
/// assert_eq!(encode_index(7, 7), 0);
/// assert_eq!(encode_index(7, 0), 7);
/// assert_eq!(encode_index(0, 7), 56);
/// assert_eq!(encode_index(0, 0), 63);
/// ```
#[inline]
pub fn encode_index(row: u8, col: u8) -> u8 {
    debug_assert!(row < GRID_SIZE && col < GRID_SIZE, "cell ({row}, {col}) off the grid");
    (GRID_SIZE - 1 - row) * GRID_SIZE + (GRID_SIZE - 1 - col)
}

/// Inverse of [`encode_index`]; `None` for indices past the grid
///
/// ```
/// use grimblock_core::codec::decode_index;
///
/// assert_eq!(decode_index(0), Some((7, 7)));
/// assert_eq!(decode_index(64), None);
/// ```
#[inline]
pub fn decode_index(index: u8) -> Option<(u8, u8)> {
    if index >= GRID_SIZE * GRID_SIZE {
        return None;
    }
    let row = GRID_SIZE - 1 - index / GRID_SIZE;
    let col = GRID_SIZE - 1 - index % GRID_SIZE;
    Some((row, col))
}

/// Materialize a packed grid; filled cells carry [`Color::SETTLED`]
pub fn decode(packed: u64) -> Board {
    let mut board = Board::new();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if packed & (1u64 << encode_index(row, col)) != 0 {
                board.set(row as i8, col as i8, Some(Color::SETTLED));
            }
        }
    }
    board
}

/// Pack a board's occupancy; colors are dropped
pub fn encode(board: &Board) -> u64 {
    let mut packed = 0u64;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if board.is_filled(row as i8, col as i8) {
                packed |= 1u64 << encode_index(row, col);
            }
        }
    }
    packed
}

/// Filled/empty cells of one piece's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceMatrix {
    height: u8,
    width: u8,
    cells: [[bool; MAX_SPAN]; MAX_SPAN],
}

impl PieceMatrix {
    pub const EMPTY: PieceMatrix = PieceMatrix {
        height: 0,
        width: 0,
        cells: [[false; MAX_SPAN]; MAX_SPAN],
    };

    /// Build from explicit rows (top to bottom); for tests and tooling
    ///
    /// Rows longer than [`MAX_SPAN`] or more than [`MAX_SPAN`] rows are truncated.
    pub fn from_rows(rows: &[&[bool]]) -> Self {
        let height = rows.len().min(MAX_SPAN);
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0).min(MAX_SPAN);
        let mut matrix = PieceMatrix {
            height: height as u8,
            width: width as u8,
            ..Self::EMPTY
        };
        for (r, row) in rows.iter().take(height).enumerate() {
            for (c, &filled) in row.iter().take(width).enumerate() {
                matrix.cells[r][c] = filled;
            }
        }
        matrix
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn get(&self, row: u8, col: u8) -> bool {
        row < self.height && col < self.width && self.cells[row as usize][col as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.filled_cells().next().is_none()
    }

    /// Filled cells as (row, col), top-left first
    pub fn filled_cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        (0..self.height).flat_map(move |r| {
            (0..self.width)
                .filter_map(move |c| self.cells[r as usize][c as usize].then_some((r, c)))
        })
    }
}

/// Expand a lane-encoded bitmap into its bounding-box matrix
///
/// Lane `row` (bits `row*8 .. row*8+8`) fills matrix row `height-1-row`; bit
/// `col` of the lane lands in matrix column `width-1-col`. Dimensions beyond
/// [`MAX_SPAN`] are clamped.
///
/// ```
/// use grimblock_core::codec::bitmap_to_matrix;
///
/// // Domino, Up: two stacked cells
/// let m = bitmap_to_matrix(0b00000001_00000001, 2, 1);
/// assert!(m.get(0, 0) && m.get(1, 0));
/// ```
pub fn bitmap_to_matrix(bitmap: u64, height: u8, width: u8) -> PieceMatrix {
    let height = height.min(MAX_SPAN as u8);
    let width = width.min(MAX_SPAN as u8);
    let mut matrix = PieceMatrix {
        height,
        width,
        ..PieceMatrix::EMPTY
    };
    for row in 0..height {
        let lane = (bitmap >> (row as u32 * LANE_BITS)) & 0xFF;
        for col in 0..width {
            matrix.cells[(height - 1 - row) as usize][(width - 1 - col) as usize] =
                (lane >> col) & 1 == 1;
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        for index in 0..64u8 {
            let (row, col) = decode_index(index).unwrap();
            assert!(row < 8 && col < 8);
            assert_eq!(encode_index(row, col), index);
        }
    }

    #[test]
    fn decode_index_rejects_off_grid_bits() {
        assert_eq!(decode_index(63), Some((0, 0)));
        for index in [64u8, 100, u8::MAX] {
            assert_eq!(decode_index(index), None);
        }
    }

    #[test]
    fn decode_corners() {
        let board = decode(1);
        assert!(board.is_filled(7, 7));
        assert_eq!(board.filled_count(), 1);

        let board = decode(1 << 63);
        assert!(board.is_filled(0, 0));
        assert_eq!(board.filled_count(), 1);
    }

    #[test]
    fn encode_inverts_decode() {
        for packed in [0u64, 1, 0xFF, 0x8000_0000_0000_0001, u64::MAX, 0x0123_4567_89AB_CDEF] {
            assert_eq!(encode(&decode(packed)), packed);
        }
    }

    #[test]
    fn bottom_row_is_low_byte() {
        let board = decode(0xFF);
        assert!(board.is_row_full(7));
        assert_eq!(board.filled_count(), 8);
    }

    #[test]
    fn bitmap_bit_zero_is_bottom_right() {
        // Corner, Up: 01/11
        let m = bitmap_to_matrix(0b00000001_00000011, 2, 2);
        assert!(!m.get(0, 0));
        assert!(m.get(0, 1));
        assert!(m.get(1, 0));
        assert!(m.get(1, 1));

        let only_bit_zero = bitmap_to_matrix(1, 3, 3);
        assert_eq!(only_bit_zero.filled_cells().collect::<Vec<_>>(), vec![(2, 2)]);
    }

    #[test]
    fn from_rows_matches_bitmap() {
        let teewee_up = bitmap_to_matrix(0b00000010_00000111, 2, 3);
        let rows = PieceMatrix::from_rows(&[&[false, true, false], &[true, true, true]]);
        assert_eq!(teewee_up, rows);
    }
}
