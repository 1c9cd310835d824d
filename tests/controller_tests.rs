use grimblock::core::codec;
use grimblock::core::controller::{Controller, ControllerConfig, Phase};
use grimblock::core::pieces::{pack, subpack_id};
use grimblock::core::{GameSnapshot, PlaceRejection};
use grimblock::types::{Action, Color, Orientation, Piece, COUNTDOWN_MS};

const PLAYER: &str = "0x5a";

fn snapshot(id: u32, score: u32, pieces: &[(Piece, Orientation)], grid: u64) -> GameSnapshot {
    let subpacks: Vec<u8> = pieces.iter().map(|&(p, o)| subpack_id(p, o)).collect();
    GameSnapshot {
        player_id: PLAYER.to_string(),
        id,
        score,
        pieces: pack(&subpacks),
        grid,
        seed: "0x9".to_string(),
        ..GameSnapshot::default()
    }
}

const DEAL: [(Piece, Orientation); 3] = [
    (Piece::Domino, Orientation::Up),
    (Piece::Corner, Orientation::Left),
    (Piece::Hero, Orientation::Right),
];

#[test]
fn fresh_game_runs_countdown_then_accepts_a_placement() {
    let mut controller = Controller::default();
    assert_eq!(controller.phase(), Phase::NoSession);

    controller
        .observe_snapshot(&snapshot(7, 0, &DEAL, 0))
        .unwrap();
    assert_eq!(
        controller.phase(),
        Phase::Countdown {
            remaining_ms: COUNTDOWN_MS
        }
    );
    assert_eq!(controller.visible().pieces.len(), 3);

    // A same-id refresh during the countdown does not skip it
    controller
        .observe_snapshot(&snapshot(7, 0, &DEAL, 1 << 63))
        .unwrap();
    assert!(matches!(controller.phase(), Phase::Countdown { .. }));
    assert!(!controller.select_piece(0));

    controller.tick(COUNTDOWN_MS - 1);
    assert_eq!(controller.countdown_remaining_ms(), 1);
    assert!(controller.tick(1));
    assert_eq!(controller.phase(), Phase::Active);

    assert!(controller.select_piece(0));
    let request = controller.attempt_place(6, 7).unwrap();
    assert_eq!(
        request.action,
        Action::Place {
            game_id: 7,
            piece_index: 0,
            grid_index: 0,
        }
    );

    // Optimistic frame shows the piece color before the authority answers
    let board = &controller.visible().board;
    assert_eq!(board.get(6, 7), Some(Some(Color(0x98D8C8))));
    assert_eq!(board.get(7, 7), Some(Some(Color(0x98D8C8))));
    assert_eq!(controller.visible().selected, None);
    assert_eq!(controller.attempt_place(0, 0), Err(PlaceRejection::InFlight));

    assert!(controller.resolve_placement(request.ticket, true));
    assert!(!controller.last_submission_failed());

    let after = snapshot(
        7,
        2,
        &DEAL[1..],
        (1 << 63) | (1 << 0) | (1 << 8),
    );
    assert!(controller.observe_snapshot(&after).unwrap());
    let visible = controller.visible();
    assert_eq!(visible.score, 2);
    assert_eq!(visible.pieces.len(), 2);
    assert_eq!(visible.board, codec::decode(after.grid));
    assert_eq!(controller.visible_grid(), after.grid);
}

#[test]
fn countdown_survives_a_score_change() {
    let mut controller = Controller::default();
    controller
        .observe_snapshot(&snapshot(7, 0, &DEAL, 0))
        .unwrap();
    controller.tick(1000);

    controller
        .observe_snapshot(&snapshot(7, 10, &DEAL[1..], 0xFF))
        .unwrap();
    assert_eq!(
        controller.phase(),
        Phase::Countdown {
            remaining_ms: COUNTDOWN_MS - 1000
        }
    );
    assert_eq!(controller.visible().score, 10);
    assert!(!controller.select_piece(0));
    assert_eq!(controller.attempt_place(0, 0), Err(PlaceRejection::NotActive));

    assert!(!controller.tick(COUNTDOWN_MS - 1001));
    assert!(!controller.select_piece(0));
    assert!(controller.tick(1));
    assert_eq!(controller.phase(), Phase::Active);
    assert!(controller.select_piece(0));
}

#[test]
fn repeated_snapshot_leaves_visible_state_alone() {
    let mut controller = Controller::new(ControllerConfig {
        countdown_ms: 0,
        line_clear_delay_ms: 200,
    });
    let snap = snapshot(3, 12, &DEAL, 0xF0);
    assert!(controller.observe_snapshot(&snap).unwrap());
    assert_eq!(controller.phase(), Phase::Active);

    let revision = controller.revision();
    assert!(!controller.observe_snapshot(&snap).unwrap());
    assert_eq!(controller.revision(), revision);
}

#[test]
fn piece_ids_survive_refreshes_of_the_same_deal() {
    let mut controller = Controller::default();
    controller
        .observe_snapshot(&snapshot(3, 12, &DEAL, 0))
        .unwrap();
    let before: Vec<_> = controller.visible().pieces.iter().map(|p| p.id).collect();

    controller
        .observe_snapshot(&snapshot(3, 14, &DEAL[1..], 3))
        .unwrap();
    let after: Vec<_> = controller.visible().pieces.iter().map(|p| p.id).collect();
    assert_eq!(after, before[1..].to_vec());
}

#[test]
fn undecodable_snapshot_is_reported_and_ignored() {
    let mut controller = Controller::default();
    controller
        .observe_snapshot(&snapshot(3, 12, &DEAL, 0))
        .unwrap();
    let shown = controller.visible().board;

    let mut broken = snapshot(3, 14, &DEAL, 0xFF);
    // Piece index 15 is outside the catalog
    broken.pieces = 0x0F;
    let err = controller.observe_snapshot(&broken).unwrap_err();
    assert!(err.is_table_drift());
    assert_eq!(controller.visible().fault, Some(err));
    assert_eq!(controller.visible().board, shown);
    assert_eq!(controller.visible().score, 12);
}

#[test]
fn completed_line_clears_after_delay_and_announces_combo() {
    let mut controller = Controller::new(ControllerConfig {
        countdown_ms: 0,
        line_clear_delay_ms: 200,
    });
    // Bottom row filled except its two rightmost cells
    let grid = 0xFC;
    controller
        .observe_snapshot(&snapshot(4, 30, &[(Piece::Domino, Orientation::Left)], grid))
        .unwrap();
    assert!(controller.select_piece(0));
    let request = controller.attempt_place(7, 6).unwrap();
    assert!(controller.visible().board.is_row_full(7));

    assert!(!controller.tick(199));
    assert!(controller.tick(1));
    assert!(controller.visible().board.is_empty());
    assert_eq!(controller.combos().len(), 1);
    assert_eq!(controller.combos()[0].combo, 1);
    assert_eq!(controller.combos()[0].points(), 10);

    let id = controller.combos()[0].id;
    assert!(controller.ack_combo(id));
    assert!(controller.combos().is_empty());
    assert!(controller.resolve_placement(request.ticket, true));
}

#[test]
fn newer_snapshot_cancels_pending_clear() {
    let mut controller = Controller::new(ControllerConfig {
        countdown_ms: 0,
        line_clear_delay_ms: 200,
    });
    controller
        .observe_snapshot(&snapshot(4, 30, &[(Piece::Domino, Orientation::Left)], 0xFC))
        .unwrap();
    controller.select_piece(0);
    controller.attempt_place(7, 6).unwrap();

    let authority = snapshot(4, 50, &DEAL, 0);
    controller.observe_snapshot(&authority).unwrap();
    controller.tick(500);
    assert!(controller.combos().is_empty());
    assert!(controller.visible().board.is_empty());
    assert_eq!(controller.visible().score, 50);
}

#[test]
fn failed_submission_keeps_grid_until_resync() {
    let mut controller = Controller::new(ControllerConfig {
        countdown_ms: 0,
        line_clear_delay_ms: 200,
    });
    controller
        .observe_snapshot(&snapshot(5, 8, &DEAL, 0))
        .unwrap();
    controller.select_piece(0);
    let request = controller.attempt_place(0, 0).unwrap();
    assert!(controller.resolve_placement(request.ticket, false));
    assert!(controller.last_submission_failed());
    assert_eq!(controller.visible().board.filled_count(), 2);
    assert!(controller.is_interactive());

    controller.resync();
    assert!(controller.visible().board.is_empty());
    assert_eq!(controller.visible().pieces.len(), 3);
}

#[test]
fn game_over_and_new_session() {
    let mut controller = Controller::default();
    controller
        .observe_snapshot(&snapshot(5, 8, &DEAL, 0))
        .unwrap();

    let mut over = snapshot(5, 8, &DEAL, 0xFFFF);
    over.over = true;
    controller.observe_snapshot(&over).unwrap();
    assert_eq!(controller.phase(), Phase::GameOver);
    assert!(controller.visible().game_over);
    assert!(!controller.select_piece(0));

    controller
        .observe_snapshot(&snapshot(6, 0, &[], 0))
        .unwrap();
    assert_eq!(controller.session_id(), 6);
    assert_eq!(controller.phase(), Phase::AwaitingStart);

    controller.observe(None);
    assert_eq!(controller.phase(), Phase::NoSession);
    assert_eq!(controller.session_id(), 0);
}
