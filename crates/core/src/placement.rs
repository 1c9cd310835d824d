//! Placement engine - collision, stamping, line clearing
//!
//! All operations are pure: they read a [`Board`] and return a new one.
//! Positions are the top-left corner of the piece's bounding box and may be
//! negative or past the edge; such positions simply fail [`can_place`].

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::codec::{encode_index, PieceMatrix};
use crate::types::{Color, GRID_SIZE};

/// Outcome of [`clear_completed_lines`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearResult {
    pub board: Board,
    pub rows: ArrayVec<u8, { GRID_SIZE as usize }>,
    pub cols: ArrayVec<u8, { GRID_SIZE as usize }>,
}

impl ClearResult {
    /// Complete rows plus complete columns; an intersection cell counts once per line
    pub fn lines_cleared(&self) -> u32 {
        (self.rows.len() + self.cols.len()) as u32
    }
}

/// Every filled piece cell lands inside the grid on an empty cell
pub fn can_place(board: &Board, piece: &PieceMatrix, top_row: i8, top_left: i8) -> bool {
    for (r, c) in piece.filled_cells() {
        let row = top_row as i16 + r as i16;
        let col = top_left as i16 + c as i16;
        if row < 0 || row >= GRID_SIZE as i16 || col < 0 || col >= GRID_SIZE as i16 {
            return false;
        }
        if !board.is_vacant(row as i8, col as i8) {
            return false;
        }
    }
    true
}

/// Stamp `piece` onto a copy of `board`
///
/// Callers validate with [`can_place`] first; cells falling outside the grid are
/// skipped rather than wrapped.
pub fn place(board: &Board, piece: &PieceMatrix, top_row: i8, top_left: i8, color: Color) -> Board {
    let mut out = *board;
    for (r, c) in piece.filled_cells() {
        let row = top_row as i16 + r as i16;
        let col = top_left as i16 + c as i16;
        if (0..GRID_SIZE as i16).contains(&row) && (0..GRID_SIZE as i16).contains(&col) {
            out.set(row as i8, col as i8, Some(color));
        }
    }
    out
}

/// Clear every complete row and column
///
/// Completeness is judged on the input board before anything is emptied, so a
/// full row never hides a full column that shares cells with it.
pub fn clear_completed_lines(board: &Board) -> ClearResult {
    let mut rows = ArrayVec::new();
    let mut cols = ArrayVec::new();
    for i in 0..GRID_SIZE {
        if board.is_row_full(i as usize) {
            rows.push(i);
        }
        if board.is_col_full(i as usize) {
            cols.push(i);
        }
    }

    let mut out = *board;
    for &row in &rows {
        out.clear_row(row as usize);
    }
    for &col in &cols {
        out.clear_col(col as usize);
    }

    ClearResult {
        board: out,
        rows,
        cols,
    }
}

/// Grid bit index of the piece's bit-0 anchor (bottom-right of its box)
///
/// This is the `grid_index` the authority expects in a `place` call. Returns
/// `None` when the anchor falls outside the grid.
pub fn position_to_grid_index(top_row: i8, top_left: i8, piece: &PieceMatrix) -> Option<u8> {
    let bottom = top_row as i16 + piece.height() as i16 - 1;
    let right = top_left as i16 + piece.width() as i16 - 1;
    if !(0..GRID_SIZE as i16).contains(&bottom) || !(0..GRID_SIZE as i16).contains(&right) {
        return None;
    }
    Some(encode_index(bottom as u8, right as u8))
}

/// First top-left position where `piece` fits, scanning rows then columns
pub fn find_position(board: &Board, piece: &PieceMatrix) -> Option<(i8, i8)> {
    if piece.is_empty() {
        return None;
    }
    for row in 0..GRID_SIZE as i8 {
        for col in 0..GRID_SIZE as i8 {
            if can_place(board, piece, row, col) {
                return Some((row, col));
            }
        }
    }
    None
}

/// Some non-empty piece fits somewhere on the board
///
/// Informational only: whether the game is over is the authority's call.
pub fn has_valid_moves<'a, I>(board: &Board, pieces: I) -> bool
where
    I: IntoIterator<Item = &'a PieceMatrix>,
{
    pieces
        .into_iter()
        .any(|piece| find_position(board, piece).is_some())
}
