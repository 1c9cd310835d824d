//! Board module - the visible 8x8 grid
//!
//! The board is an 8x8 matrix where each cell is empty or filled with a color.
//! Uses a flat array for cache locality and cheap copies.
//! Coordinates: (row, col) where row ranges 0..7 (top to bottom) and col
//! ranges 0..7 (left to right).
//!
//! The board is never authoritative; it is derived from the packed grid
//! (see [`crate::codec`]) or from an optimistic placement on top of one.

use std::fmt;

use crate::types::{Cell, Color, GRID_CELLS, GRID_SIZE};

/// The visible grid - 8 rows x 8 columns using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [Cell; GRID_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; GRID_CELLS],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: i8, col: i8) -> Option<usize> {
        if row < 0 || row >= GRID_SIZE as i8 || col < 0 || col >= GRID_SIZE as i8 {
            return None;
        }
        Some((row as usize) * (GRID_SIZE as usize) + (col as usize))
    }

    /// Get cell at (row, col); `None` if out of bounds
    pub fn get(&self, row: i8, col: i8) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at (row, col); returns false if out of bounds
    pub fn set(&mut self, row: i8, col: i8, cell: Cell) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and empty
    pub fn is_vacant(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(None))
    }

    /// Within bounds and filled
    pub fn is_filled(&self, row: i8, col: i8) -> bool {
        matches!(self.get(row, col), Some(Some(_)))
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= GRID_SIZE as usize {
            return false;
        }
        let start = row * GRID_SIZE as usize;
        let end = start + GRID_SIZE as usize;
        self.cells[start..end].iter().all(|cell| cell.is_some())
    }

    pub fn is_col_full(&self, col: usize) -> bool {
        if col >= GRID_SIZE as usize {
            return false;
        }
        self.cells
            .iter()
            .skip(col)
            .step_by(GRID_SIZE as usize)
            .all(|cell| cell.is_some())
    }

    pub fn clear_row(&mut self, row: usize) {
        if row >= GRID_SIZE as usize {
            return;
        }
        let start = row * GRID_SIZE as usize;
        for cell in &mut self.cells[start..start + GRID_SIZE as usize] {
            *cell = None;
        }
    }

    pub fn clear_col(&mut self, col: usize) {
        if col >= GRID_SIZE as usize {
            return;
        }
        for cell in self.cells.iter_mut().skip(col).step_by(GRID_SIZE as usize) {
            *cell = None;
        }
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_none())
    }

    /// Copy of this board with every filled cell painted `color`
    pub fn recolored(&self, color: Color) -> Board {
        let mut out = *self;
        for cell in out.cells.iter_mut().filter(|c| c.is_some()) {
            *cell = Some(color);
        }
        out
    }

    /// Same filled/empty pattern, colors ignored
    pub fn same_occupancy(&self, other: &Board) -> bool {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .all(|(a, b)| a.is_some() == b.is_some())
    }

    /// Row-major view of the cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(GRID_SIZE as usize)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per row, `#` for filled and `.` for empty
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                f.write_str(if cell.is_some() { "#" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
