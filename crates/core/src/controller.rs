//! Reconciliation controller - optimistic visible state over authoritative snapshots
//!
//! The controller owns what the player sees. Snapshots from the authority
//! always win; between snapshots the controller shows predicted frames so the
//! board reacts instantly.
//!
//! # Phases
//!
//! ```text
//! NoSession -> AwaitingStart -> Countdown -> Active -> GameOver
//!      ^______________ any new session id ______________|
//! ```
//!
//! | Event | Effect |
//! |-------|--------|
//! | snapshot with a new id | bookkeeping reset, state adopted, phase chosen by score/pieces |
//! | snapshot with the same id | visible state overwritten unless nothing changed |
//! | [`Controller::attempt_place`] | colored placement shown, one submission in flight |
//! | [`Controller::tick`] | countdown and deferred line clear advance |
//!
//! # Timing
//!
//! Nothing here reads a clock. [`Controller::tick`] is called with the elapsed
//! time (normally [`TICK_MS`](crate::types::TICK_MS)). Deferred work records
//! the generation it was computed against and is dropped once a newer
//! authoritative state lands.

use std::collections::HashMap;
use std::fmt;

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::codec;
use crate::error::{DecodeError, PlaceRejection};
use crate::pieces::OfferedPiece;
use crate::placement::{
    can_place, clear_completed_lines, has_valid_moves, place, position_to_grid_index,
};
use crate::snapshot::{GameModel, GameSnapshot};
use crate::types::{
    Action, Color, COMBO_POINTS_PER_STEP, COUNTDOWN_MS, LINE_CLEAR_DELAY_MS, MAX_OFFERED_PIECES,
};

/// Controller timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub countdown_ms: u32,
    pub line_clear_delay_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            countdown_ms: COUNTDOWN_MS,
            line_clear_delay_ms: LINE_CLEAR_DELAY_MS,
        }
    }
}

/// Session lifecycle as seen by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    NoSession,
    /// Game exists but no pieces dealt yet
    AwaitingStart,
    Countdown { remaining_ms: u32 },
    Active,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NoSession => "no_session",
            Phase::AwaitingStart => "awaiting_start",
            Phase::Countdown { .. } => "countdown",
            Phase::Active => "active",
            Phase::GameOver => "game_over",
        }
    }
}

/// Stable UI identity of an offered piece within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u64);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisiblePiece {
    pub id: PieceId,
    pub offered: OfferedPiece,
}

/// Combo notification, shown until acknowledged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComboNotice {
    pub id: u64,
    pub combo: u32,
}

impl ComboNotice {
    pub fn points(&self) -> u32 {
        self.combo * COMBO_POINTS_PER_STEP
    }
}

/// What the player sees
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VisibleState {
    pub board: Board,
    pub score: u32,
    pub pieces: ArrayVec<VisiblePiece, MAX_OFFERED_PIECES>,
    pub game_over: bool,
    pub selected: Option<usize>,
    /// Last snapshot that failed to decode, cleared by the next good one
    pub fault: Option<DecodeError>,
}

impl VisibleState {
    pub fn selected_piece(&self) -> Option<&VisiblePiece> {
        self.selected.and_then(|i| self.pieces.get(i))
    }

    /// Some offered piece still fits; informational only
    pub fn has_valid_moves(&self) -> bool {
        has_valid_moves(&self.board, self.pieces.iter().map(|p| &p.offered.matrix))
    }

    fn matches(&self, board: &Board, score: u32, game_over: bool, pieces: &[OfferedPiece]) -> bool {
        self.board == *board
            && self.score == score
            && self.game_over == game_over
            && self.pieces.len() == pieces.len()
            && self
                .pieces
                .iter()
                .zip(pieces)
                .all(|(v, p)| v.offered.subpack == p.subpack)
    }
}

/// A validated local placement, ready to submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRequest {
    /// Pass back to [`Controller::resolve_placement`]
    pub ticket: u64,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingClear {
    remaining_ms: u32,
    generation: u64,
}

/// Monotonic id source for pieces, combos and tickets
#[derive(Debug, Clone, Default)]
struct Sequence(u64);

impl Sequence {
    fn next(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Controller {
    config: ControllerConfig,
    phase: Phase,
    visible: VisibleState,
    authoritative: Option<GameModel>,
    /// Id of the observed session, 0 when none
    session_id: u32,
    /// A fresh game (score 0) waiting for its pieces owes a countdown
    countdown_owed: bool,
    piece_ids: HashMap<(u8, usize), PieceId>,
    ids: Sequence,
    /// Bumped whenever a newer authoritative state replaces what is shown
    generation: u64,
    /// Bumped on every visible mutation
    revision: u64,
    in_flight: Option<u64>,
    last_submission_failed: bool,
    pending_clear: Option<PendingClear>,
    combos: Vec<ComboNotice>,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            phase: Phase::NoSession,
            visible: VisibleState::default(),
            authoritative: None,
            session_id: 0,
            countdown_owed: false,
            piece_ids: HashMap::new(),
            ids: Sequence::default(),
            generation: 0,
            revision: 0,
            in_flight: None,
            last_submission_failed: false,
            pending_clear: None,
            combos: Vec::new(),
        }
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn visible(&self) -> &VisibleState {
        &self.visible
    }

    pub fn authoritative(&self) -> Option<&GameModel> {
        self.authoritative.as_ref()
    }

    pub fn session_id(&self) -> u32 {
        self.session_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    /// The most recent submission was refused by the authority
    pub fn last_submission_failed(&self) -> bool {
        self.last_submission_failed
    }

    pub fn combos(&self) -> &[ComboNotice] {
        &self.combos
    }

    pub fn countdown_remaining_ms(&self) -> u32 {
        match self.phase {
            Phase::Countdown { remaining_ms } => remaining_ms,
            _ => 0,
        }
    }

    /// Placement is currently accepted
    pub fn is_interactive(&self) -> bool {
        self.phase == Phase::Active && !self.visible.game_over && self.in_flight.is_none()
    }

    /// Decode and observe a raw snapshot
    ///
    /// A snapshot that fails to decode leaves the visible state untouched apart
    /// from recording the fault.
    pub fn observe_snapshot(&mut self, snapshot: &GameSnapshot) -> Result<bool, DecodeError> {
        match GameModel::from_snapshot(snapshot) {
            Ok(model) => Ok(self.observe(Some(&model))),
            Err(err) => {
                self.report_fault(err.clone());
                Err(err)
            }
        }
    }

    /// Record a decode failure on the visible state
    pub fn report_fault(&mut self, err: DecodeError) {
        if self.visible.fault.as_ref() != Some(&err) {
            self.visible.fault = Some(err);
            self.revision += 1;
        }
    }

    /// Observe the authoritative state of the player's latest game
    ///
    /// Returns true when the visible state or phase changed.
    pub fn observe(&mut self, game: Option<&GameModel>) -> bool {
        let mut changed = false;
        if self.visible.fault.take().is_some() {
            changed = true;
        }

        let game = match game {
            Some(game) if game.exists() => game,
            _ => {
                if self.session_id != 0 || self.phase != Phase::NoSession {
                    self.end_session();
                    changed = true;
                }
                if changed {
                    self.revision += 1;
                }
                return changed;
            }
        };

        if game.id != self.session_id {
            self.start_session(game);
            return true;
        }

        if self.authoritative.as_ref() != Some(game) {
            self.authoritative = Some(game.clone());
            self.generation += 1;
        }

        let previous = self.phase;
        self.phase = match self.phase {
            _ if game.over => Phase::GameOver,
            Phase::AwaitingStart if game.has_started() => self.entry_phase(self.countdown_owed),
            phase => phase,
        };
        if self.phase != Phase::AwaitingStart {
            self.countdown_owed = false;
        }
        changed |= self.phase != previous;
        changed |= self.refresh(game);

        if changed {
            self.revision += 1;
        }
        changed
    }

    fn entry_phase(&self, fresh: bool) -> Phase {
        if fresh && self.config.countdown_ms > 0 {
            Phase::Countdown {
                remaining_ms: self.config.countdown_ms,
            }
        } else {
            Phase::Active
        }
    }

    fn start_session(&mut self, game: &GameModel) {
        self.session_id = game.id;
        self.piece_ids.clear();
        self.in_flight = None;
        self.pending_clear = None;
        self.combos.clear();
        self.generation += 1;
        self.authoritative = Some(game.clone());

        let fresh = game.score == 0;
        self.phase = if game.over {
            Phase::GameOver
        } else if !game.has_started() {
            Phase::AwaitingStart
        } else {
            self.entry_phase(fresh)
        };
        self.countdown_owed = fresh && self.phase == Phase::AwaitingStart;

        self.visible.selected = None;
        self.overwrite(game);
        self.revision += 1;
    }

    fn end_session(&mut self) {
        self.session_id = 0;
        self.phase = Phase::NoSession;
        self.authoritative = None;
        self.countdown_owed = false;
        self.piece_ids.clear();
        self.in_flight = None;
        self.pending_clear = None;
        self.combos.clear();
        self.generation += 1;
        let fault = self.visible.fault.take();
        self.visible = VisibleState {
            fault,
            ..VisibleState::default()
        };
    }

    /// Same-session refresh; skipped when nothing the player sees would change
    fn refresh(&mut self, game: &GameModel) -> bool {
        let board = game.board();
        if self
            .visible
            .matches(&board, game.score, game.over, &game.pieces)
        {
            return false;
        }
        // Optimistic frames are discarded wholesale
        self.pending_clear = None;
        self.generation += 1;
        self.overwrite(game);
        true
    }

    fn overwrite(&mut self, game: &GameModel) {
        self.visible.board = game.board();
        self.visible.score = game.score;
        self.visible.game_over = game.over;
        self.visible.pieces = self.stable_pieces(&game.pieces);
        if self
            .visible
            .selected
            .is_some_and(|i| i >= self.visible.pieces.len())
        {
            self.visible.selected = None;
        }
    }

    /// Attach ids that survive refreshes, keyed by subpack and its occurrence
    fn stable_pieces(
        &mut self,
        pieces: &[OfferedPiece],
    ) -> ArrayVec<VisiblePiece, MAX_OFFERED_PIECES> {
        let mut seen: ArrayVec<u8, MAX_OFFERED_PIECES> = ArrayVec::new();
        let mut out = ArrayVec::new();
        for offered in pieces {
            let occurrence = seen.iter().filter(|&&s| s == offered.subpack).count();
            seen.push(offered.subpack);
            let ids = &mut self.ids;
            let id = *self
                .piece_ids
                .entry((offered.subpack, occurrence))
                .or_insert_with(|| PieceId(ids.next()));
            out.push(VisiblePiece {
                id,
                offered: *offered,
            });
        }
        out
    }

    /// Select an offered piece; only while the game is playable
    pub fn select_piece(&mut self, index: usize) -> bool {
        if self.phase != Phase::Active
            || index >= self.visible.pieces.len()
            || self.visible.selected == Some(index)
        {
            return false;
        }
        self.visible.selected = Some(index);
        self.revision += 1;
        true
    }

    pub fn deselect(&mut self) -> bool {
        if self.visible.selected.take().is_some() {
            self.revision += 1;
            true
        } else {
            false
        }
    }

    /// Try to place the selected piece with its top-left corner at `(row, col)`
    ///
    /// On success the colored placement is shown at once, the piece is
    /// deselected, a line clear is scheduled and the returned request must be
    /// submitted. Rejections change nothing.
    pub fn attempt_place(&mut self, row: i8, col: i8) -> Result<PlaceRequest, PlaceRejection> {
        if self.phase != Phase::Active || self.visible.game_over {
            return Err(PlaceRejection::NotActive);
        }
        if self.in_flight.is_some() {
            return Err(PlaceRejection::InFlight);
        }
        let index = self.visible.selected.ok_or(PlaceRejection::NoSelection)?;
        let piece = self
            .visible
            .pieces
            .get(index)
            .map(|p| p.offered)
            .ok_or(PlaceRejection::NoSelection)?;
        if piece.matrix.is_empty() {
            return Err(PlaceRejection::EmptyPiece);
        }
        if !can_place(&self.visible.board, &piece.matrix, row, col) {
            return Err(PlaceRejection::Blocked);
        }
        let grid_index =
            position_to_grid_index(row, col, &piece.matrix).ok_or(PlaceRejection::Blocked)?;

        let ticket = self.ids.next();
        self.in_flight = Some(ticket);
        self.visible.board = place(&self.visible.board, &piece.matrix, row, col, piece.color());
        self.visible.selected = None;
        self.pending_clear = Some(PendingClear {
            remaining_ms: self.config.line_clear_delay_ms,
            generation: self.generation,
        });
        self.revision += 1;

        Ok(PlaceRequest {
            ticket,
            action: Action::Place {
                game_id: self.session_id,
                piece_index: index as u8,
                grid_index,
            },
        })
    }

    /// Settle the in-flight submission
    ///
    /// Returns false for stale tickets. A failure keeps the optimistic grid;
    /// the next snapshot corrects it.
    pub fn resolve_placement(&mut self, ticket: u64, success: bool) -> bool {
        if self.in_flight != Some(ticket) {
            return false;
        }
        self.in_flight = None;
        self.last_submission_failed = !success;
        true
    }

    /// Advance local timers
    ///
    /// Returns true when the phase or the visible state changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let mut changed = false;

        if let Phase::Countdown { remaining_ms } = self.phase {
            let remaining_ms = remaining_ms.saturating_sub(elapsed_ms);
            self.phase = if remaining_ms == 0 {
                changed = true;
                Phase::Active
            } else {
                Phase::Countdown { remaining_ms }
            };
        }

        if let Some(pending) = self.pending_clear {
            if pending.generation != self.generation {
                self.pending_clear = None;
            } else if pending.remaining_ms > elapsed_ms {
                self.pending_clear = Some(PendingClear {
                    remaining_ms: pending.remaining_ms - elapsed_ms,
                    ..pending
                });
            } else {
                self.pending_clear = None;
                self.settle_lines();
                changed = true;
            }
        }

        if changed {
            self.revision += 1;
        }
        changed
    }

    fn settle_lines(&mut self) {
        let result = clear_completed_lines(&self.visible.board);
        self.visible.board = result.board.recolored(Color::SETTLED);
        if result.lines_cleared() > 0 {
            let combo = self.authoritative.as_ref().map_or(0, |g| g.combo) + 1;
            self.combos.push(ComboNotice {
                id: self.ids.next(),
                combo,
            });
        }
    }

    /// Dismiss a combo notification
    pub fn ack_combo(&mut self, id: u64) -> bool {
        let before = self.combos.len();
        self.combos.retain(|c| c.id != id);
        before != self.combos.len()
    }

    /// Rebuild the visible state from the last authoritative snapshot
    ///
    /// An in-flight submission stays in flight.
    pub fn resync(&mut self) {
        self.pending_clear = None;
        self.generation += 1;
        self.visible.selected = None;
        match self.authoritative.clone() {
            Some(game) => self.overwrite(&game),
            None => {
                self.visible = VisibleState {
                    fault: self.visible.fault.take(),
                    ..VisibleState::default()
                }
            }
        }
        self.revision += 1;
    }

    /// Packed form of the visible grid
    pub fn visible_grid(&self) -> u64 {
        codec::encode(&self.visible.board)
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::{decode_piece_set, pack, subpack_id};
    use crate::types::{Orientation, Piece};

    fn game(id: u32, score: u32, pieces: &[(Piece, Orientation)], grid: u64) -> GameModel {
        let subpacks: Vec<u8> = pieces.iter().map(|&(p, o)| subpack_id(p, o)).collect();
        let packed = pack(&subpacks);
        GameModel {
            id,
            player_id: "0x1".to_string(),
            score,
            pieces: decode_piece_set(packed).unwrap(),
            packed_pieces: packed,
            grid,
            ..Default::default()
        }
    }

    fn three() -> [(Piece, Orientation); 3] {
        [
            (Piece::Domino, Orientation::Up),
            (Piece::Smashboy, Orientation::Up),
            (Piece::Hero, Orientation::Left),
        ]
    }

    fn active() -> Controller {
        let mut c = Controller::default();
        c.observe(Some(&game(1, 5, &three(), 0)));
        assert_eq!(c.phase(), Phase::Active);
        c
    }

    #[test]
    fn no_game_means_no_session() {
        let mut c = Controller::default();
        assert!(!c.observe(None));
        assert!(!c.observe(Some(&GameModel::default())));
        assert_eq!(c.phase(), Phase::NoSession);
    }

    #[test]
    fn fresh_game_counts_down() {
        let mut c = Controller::default();
        assert!(c.observe(Some(&game(1, 0, &three(), 0))));
        assert_eq!(c.phase(), Phase::Countdown { remaining_ms: 7000 });
        assert!(!c.select_piece(0));
        c.tick(6999);
        assert_eq!(c.countdown_remaining_ms(), 1);
        assert!(c.tick(16));
        assert_eq!(c.phase(), Phase::Active);
        assert!(c.select_piece(0));
    }

    #[test]
    fn awaiting_start_then_countdown() {
        let mut c = Controller::default();
        c.observe(Some(&game(4, 0, &[], 0)));
        assert_eq!(c.phase(), Phase::AwaitingStart);
        c.observe(Some(&game(4, 0, &three(), 0)));
        assert!(matches!(c.phase(), Phase::Countdown { .. }));
    }

    #[test]
    fn resumed_game_skips_countdown() {
        let c = active();
        assert_eq!(c.visible().score, 5);
        assert_eq!(c.visible().pieces.len(), 3);
    }

    #[test]
    fn identical_refresh_is_a_no_op() {
        let mut c = active();
        let revision = c.revision();
        assert!(!c.observe(Some(&game(1, 5, &three(), 0))));
        assert_eq!(c.revision(), revision);
    }

    #[test]
    fn piece_ids_survive_refresh_and_reset_with_session() {
        let mut c = active();
        let first = c.visible().pieces[1].id;
        c.observe(Some(&game(1, 9, &three()[1..], 0)));
        assert_eq!(c.visible().pieces[0].id, first);
        c.observe(Some(&game(2, 9, &three()[1..], 0)));
        assert_ne!(c.visible().pieces[0].id, first);
    }

    #[test]
    fn duplicate_pieces_get_distinct_ids() {
        let mut c = Controller::default();
        let pair = [(Piece::Corner, Orientation::Up), (Piece::Corner, Orientation::Up)];
        c.observe(Some(&game(3, 1, &pair, 0)));
        let pieces = &c.visible().pieces;
        assert_ne!(pieces[0].id, pieces[1].id);
    }

    #[test]
    fn rejections_change_nothing() {
        let mut c = active();
        assert_eq!(c.attempt_place(0, 0), Err(PlaceRejection::NoSelection));
        c.select_piece(1);
        assert_eq!(c.attempt_place(7, 7), Err(PlaceRejection::Blocked));
        assert!(c.visible().board.is_empty());
        assert_eq!(c.in_flight(), None);
    }

    #[test]
    fn one_placement_in_flight() {
        let mut c = active();
        c.select_piece(0);
        let request = c.attempt_place(0, 0).unwrap();
        assert_eq!(
            request.action,
            Action::Place {
                game_id: 1,
                piece_index: 0,
                grid_index: 55,
            }
        );
        assert_eq!(c.visible().selected, None);
        assert_eq!(c.visible().board.get(0, 0), Some(Some(Color(0x98D8C8))));

        c.select_piece(1);
        assert_eq!(c.attempt_place(4, 4), Err(PlaceRejection::InFlight));
        assert!(!c.resolve_placement(request.ticket + 100, true));
        assert!(c.resolve_placement(request.ticket, false));
        assert!(c.last_submission_failed());
        assert_eq!(c.visible().board.filled_count(), 2);
        assert!(c.attempt_place(4, 4).is_ok());
    }

    #[test]
    fn deferred_clear_recolors_and_raises_combo() {
        let mut c = Controller::default();
        // row 7 full except its last two cells
        let mut model = game(1, 5, &[(Piece::Domino, Orientation::Left)], 0xFC);
        model.combo = 2;
        c.observe(Some(&model));
        c.select_piece(0);
        c.attempt_place(7, 6).unwrap();
        assert!(c.visible().board.is_row_full(7));

        assert!(!c.tick(150));
        assert!(c.tick(50));
        assert!(c.visible().board.is_empty());
        assert_eq!(c.combos().len(), 1);
        let notice = c.combos()[0];
        assert_eq!(notice.combo, 3);
        assert_eq!(notice.points(), 30);
        assert!(c.ack_combo(notice.id));
        assert!(c.combos().is_empty());
    }

    #[test]
    fn stale_clear_is_dropped() {
        let mut c = active();
        c.select_piece(1);
        c.attempt_place(0, 0).unwrap();
        // authority lands first with its own view
        c.observe(Some(&game(1, 9, &three()[..2], 0x03)));
        assert!(!c.tick(1000));
        assert_eq!(c.visible().board, codec::decode(0x03));
        assert!(c.combos().is_empty());
    }

    #[test]
    fn game_over_only_left_by_new_session() {
        let mut c = active();
        let mut over = game(1, 5, &three(), 0);
        over.over = true;
        c.observe(Some(&over));
        assert_eq!(c.phase(), Phase::GameOver);
        c.observe(Some(&game(1, 5, &three(), 0)));
        assert_eq!(c.phase(), Phase::GameOver);
        c.observe(Some(&game(2, 0, &three(), 0)));
        assert!(matches!(c.phase(), Phase::Countdown { .. }));
    }

    #[test]
    fn resync_restores_authoritative_view() {
        let mut c = active();
        c.select_piece(0);
        let request = c.attempt_place(2, 2).unwrap();
        assert!(!c.visible().board.is_empty());
        c.resync();
        assert!(c.visible().board.is_empty());
        assert_eq!(c.in_flight(), Some(request.ticket));
        assert!(!c.tick(1000));
    }

    #[test]
    fn fault_is_recorded_and_cleared() {
        let mut c = active();
        let bad = GameSnapshot {
            id: 1,
            pieces: 0x0F,
            ..Default::default()
        };
        assert!(c.observe_snapshot(&bad).is_err());
        assert!(c.visible().fault.is_some());
        assert_eq!(c.visible().score, 5);
        c.observe(Some(&game(1, 5, &three(), 0)));
        assert!(c.visible().fault.is_none());
    }
}
