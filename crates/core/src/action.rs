//! Action calldata - the argument list each contract entrypoint expects

use crate::error::ShortStringError;
use crate::short_string::encode_short_string;
use crate::types::Action;

/// Felt arguments for `action`, as `0x`-prefixed hex strings
///
/// ```
/// use grimblock_core::action::calldata;
/// use grimblock_core::types::Action;
///
/// let place = Action::Place { game_id: 12, piece_index: 1, grid_index: 45 };
/// assert_eq!(calldata(&place).unwrap(), vec!["0xc", "0x1", "0x2d"]);
/// assert!(calldata(&Action::Create).unwrap().is_empty());
/// ```
pub fn calldata(action: &Action) -> Result<Vec<String>, ShortStringError> {
    Ok(match action {
        Action::Create => Vec::new(),
        Action::Place {
            game_id,
            piece_index,
            grid_index,
        } => vec![
            format!("{game_id:#x}"),
            format!("{piece_index:#x}"),
            format!("{grid_index:#x}"),
        ],
        Action::Spawn { name } | Action::Rename { name } => vec![encode_short_string(name)?],
    })
}
