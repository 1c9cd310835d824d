//! Board tests - grid codec and placement engine

use grimblock::core::codec::{self, bitmap_to_matrix, decode_index, encode_index, PieceMatrix};
use grimblock::core::placement::{
    can_place, clear_completed_lines, find_position, has_valid_moves, place,
    position_to_grid_index,
};
use grimblock::core::Board;
use grimblock::types::{Color, GRID_SIZE};

fn domino_up() -> PieceMatrix {
    bitmap_to_matrix(0b00000001_00000001, 2, 1)
}

fn hero_flat() -> PieceMatrix {
    bitmap_to_matrix(0b00001111, 1, 4)
}

// ============== Board ==============

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    for row in 0..GRID_SIZE as i8 {
        for col in 0..GRID_SIZE as i8 {
            assert_eq!(board.get(row, col), Some(None));
        }
    }
    assert!(board.is_empty());
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(GRID_SIZE as i8, 0), None);
    assert_eq!(board.get(0, GRID_SIZE as i8), None);
}

#[test]
fn test_board_set_rejects_out_of_bounds() {
    let mut board = Board::new();
    assert!(!board.set(8, 0, Some(Color::SETTLED)));
    assert!(board.set(3, 4, Some(Color::SETTLED)));
    assert!(board.is_filled(3, 4));
    assert!(!board.is_vacant(3, 4));
    assert!(!board.is_vacant(-1, 4));
}

// ============== Codec ==============

#[test]
fn test_index_convention_corners() {
    assert_eq!(encode_index(7, 7), 0);
    assert_eq!(encode_index(0, 0), 63);
    assert_eq!(decode_index(8), Some((6, 7)));
    assert_eq!(decode_index(64), None);
}

#[test]
fn test_decode_colors_filled_cells_settled() {
    let board = codec::decode(0b11);
    assert_eq!(board.get(7, 7), Some(Some(Color::SETTLED)));
    assert_eq!(board.get(7, 6), Some(Some(Color::SETTLED)));
    assert_eq!(board.filled_count(), 2);
}

#[test]
fn test_encode_ignores_colors() {
    let mut board = Board::new();
    board.set(0, 0, Some(Color(0xFF6B6B)));
    board.set(7, 7, Some(Color::SETTLED));
    assert_eq!(codec::encode(&board), (1 << 63) | 1);
}

#[test]
fn test_top_row_is_high_byte() {
    let board = codec::decode(0xFF << 56);
    assert!(board.is_row_full(0));
    assert_eq!(board.filled_count(), 8);
}

// ============== Placement ==============

#[test]
fn test_place_at_bottom_right_anchors_bit_zero() {
    let board = Board::new();
    assert!(can_place(&board, &domino_up(), 6, 7));
    assert_eq!(position_to_grid_index(6, 7, &domino_up()), Some(0));

    let placed = place(&board, &domino_up(), 6, 7, Color::SETTLED);
    assert_eq!(codec::encode(&placed), (1 << 0) | (1 << 8));
}

#[test]
fn test_place_rejects_overlap_and_overhang() {
    let mut board = Board::new();
    board.set(2, 3, Some(Color::SETTLED));
    assert!(!can_place(&board, &hero_flat(), 2, 0));
    assert!(can_place(&board, &hero_flat(), 2, 4));
    assert!(!can_place(&board, &hero_flat(), 2, 5));
    assert!(!can_place(&board, &domino_up(), 7, 0));
    assert!(!can_place(&board, &domino_up(), 0, -1));
}

#[test]
fn test_clear_row_and_column_together() {
    // Full column 0 and full row 7 share the bottom-left cell
    let mut packed = 0xFFu64;
    for row in 0..8 {
        packed |= 1 << encode_index(row, 0);
    }
    packed |= 1 << encode_index(0, 4);

    let result = clear_completed_lines(&codec::decode(packed));
    assert_eq!(result.lines_cleared(), 2);
    assert_eq!(codec::encode(&result.board), 1 << encode_index(0, 4));
}

#[test]
fn test_clear_nothing_when_no_line_complete() {
    let board = codec::decode(0x7F);
    let result = clear_completed_lines(&board);
    assert_eq!(result.lines_cleared(), 0);
    assert_eq!(result.board, board);
}

#[test]
fn test_find_position_scans_top_left_first() {
    let mut board = Board::new();
    assert_eq!(find_position(&board, &hero_flat()), Some((0, 0)));
    board.set(0, 1, Some(Color::SETTLED));
    assert_eq!(find_position(&board, &hero_flat()), Some((0, 2)));
    assert_eq!(find_position(&board, &PieceMatrix::EMPTY), None);
}

#[test]
fn test_no_valid_moves_on_full_board() {
    let board = codec::decode(u64::MAX);
    assert!(!has_valid_moves(&board, [&domino_up(), &hero_flat()]));
    assert!(has_valid_moves(&Board::new(), [&domino_up()]));
}
