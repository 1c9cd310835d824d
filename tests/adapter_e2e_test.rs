use std::time::Duration;

use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio_test::assert_ok;

use grimblock::adapter::{
    create_error, create_game, create_result, create_welcome, parse_request, Client, ClientConfig,
    ClientEvent, ErrorCode, Felt, ParsedRequest, WireGame,
};
use grimblock::core::codec;
use grimblock::core::pieces::{pack, subpack_id};
use grimblock::core::{GameSnapshot, Phase};
use grimblock::types::{Entrypoint, Orientation, Piece};

const PLAYER: &str = "0x5a";

/// Fake relay end of one connection
struct Relay {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl Relay {
    async fn accept(listener: &TcpListener) -> Self {
        let (stream, _) = tokio::time::timeout(Duration::from_secs(2), listener.accept())
            .await
            .expect("client did not connect")
            .unwrap();
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send<T: serde::Serialize>(&mut self, msg: &T) {
        let line = serde_json::to_string(msg).unwrap();
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> String {
        tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("expected a line from the client")
            .unwrap()
            .expect("client closed the connection")
    }
}

/// The part of an execute line the relay forwards to the executor
#[derive(Debug, Deserialize)]
struct ExecuteLine {
    seq: u64,
    entrypoint: String,
    calldata: Vec<String>,
}

fn game(id: u32, score: u32, pieces: &[(Piece, Orientation)], grid: u64) -> WireGame {
    let subpacks: Vec<u8> = pieces.iter().map(|&(p, o)| subpack_id(p, o)).collect();
    WireGame::from_snapshot(&GameSnapshot {
        player_id: PLAYER.to_string(),
        id,
        score,
        pieces: pack(&subpacks),
        grid,
        seed: "0x9".to_string(),
        ..GameSnapshot::default()
    })
}

const DEAL: [(Piece, Orientation); 3] = [
    (Piece::Domino, Orientation::Up),
    (Piece::Corner, Orientation::Left),
    (Piece::Hero, Orientation::Right),
];

async fn start(player_id: &str) -> (TcpListener, ClientConfig) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let config = ClientConfig {
        port: listener.local_addr().unwrap().port(),
        player_id: player_id.to_string(),
        countdown_ms: 0,
        ..ClientConfig::default()
    };
    (listener, config)
}

async fn handshake(relay: &mut Relay, assign: Option<&str>) {
    match parse_request(&relay.recv().await).unwrap() {
        ParsedRequest::Hello(hello) => assert_eq!(hello.protocol_version, "1.0.0"),
        other => panic!("expected hello, got {:?}", other),
    }
    relay
        .send(&create_welcome(1, assign.map(|id| Felt::parse(id).unwrap())))
        .await;
}

#[tokio::test]
async fn place_submits_calldata_and_snapshot_settles_board() {
    let (listener, config) = start(PLAYER).await;
    let (client, relay) = tokio::join!(Client::connect(config), Relay::accept(&listener));
    let mut client = assert_ok!(client);
    let mut relay = relay;

    handshake(&mut relay, None).await;
    relay.send(&create_game(2, game(3, 4, &DEAL, 0))).await;

    let view = tokio::time::timeout(
        Duration::from_secs(2),
        client.wait_for(|v| v.game_id == 3 && v.phase == Phase::Active),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(view.visible.pieces.len(), 3);

    client.select_piece(0).await.unwrap();
    let (accepted, ()) = tokio::join!(client.place(6, 7), async {
        let line = relay.recv().await;
        let execute: ExecuteLine = serde_json::from_str(&line).unwrap();
        assert_eq!(execute.entrypoint, "place");
        assert_eq!(execute.calldata, vec!["0x3", "0x0", "0x0"]);
        assert!(matches!(
            parse_request(&line).unwrap(),
            ParsedRequest::Execute(ref m) if m.entrypoint.0 == Entrypoint::Place
        ));
        relay.send(&create_result(3, execute.seq, true)).await;
    });
    assert!(assert_ok!(accepted));

    let grid = (1 << 0) | (1 << 8);
    relay.send(&create_game(4, game(3, 6, &DEAL[1..], grid))).await;
    let view = tokio::time::timeout(
        Duration::from_secs(2),
        client.wait_for(|v| v.visible.score == 6),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(view.visible.pieces.len(), 2);
    assert_eq!(view.visible.board, codec::decode(grid));
    assert!(!view.in_flight);

    assert_ok!(client.shutdown().await);
}

#[tokio::test]
async fn relay_error_fails_the_submission() {
    let (listener, config) = start(PLAYER).await;
    let (client, relay) = tokio::join!(Client::connect(config), Relay::accept(&listener));
    let mut client = assert_ok!(client);
    let mut relay = relay;

    handshake(&mut relay, None).await;
    relay.send(&create_game(2, game(3, 4, &DEAL, 0))).await;
    client
        .wait_for(|v| v.phase == Phase::Active)
        .await
        .unwrap();

    let (created, ()) = tokio::join!(client.create_game(), async {
        let execute: ExecuteLine = serde_json::from_str(&relay.recv().await).unwrap();
        assert_eq!(execute.entrypoint, "create");
        assert!(execute.calldata.is_empty());
        relay
            .send(&create_error(
                3,
                ErrorCode::ExecutionFailed,
                "out of gas",
                Some(execute.seq),
            ))
            .await;
    });
    assert!(!assert_ok!(created));

    let mut saw_failure = false;
    for _ in 0..5 {
        match tokio::time::timeout(Duration::from_secs(2), client.next_event()).await {
            Ok(Some(ClientEvent::SubmissionFailed { entrypoint, reason })) => {
                assert_eq!(entrypoint, Entrypoint::Create);
                assert_eq!(reason, "out of gas");
                saw_failure = true;
                break;
            }
            Ok(Some(_)) => continue,
            _ => break,
        }
    }
    assert!(saw_failure);

    assert_ok!(client.shutdown().await);
}

#[tokio::test]
async fn welcome_assigns_player_and_blocked_place_sends_nothing() {
    let (listener, config) = start("").await;
    let (client, relay) = tokio::join!(Client::connect(config), Relay::accept(&listener));
    let mut client = assert_ok!(client);
    let mut relay = relay;

    handshake(&mut relay, Some(PLAYER)).await;
    relay.send(&create_game(2, game(8, 10, &DEAL, u64::MAX))).await;
    let view = client.wait_for(|v| v.game_id == 8).await.unwrap();
    assert!(!view.visible.has_valid_moves());

    client.select_piece(0).await.unwrap();
    assert!(!assert_ok!(client.place(0, 0).await));

    // The next line the relay sees is the one sent after the rejected place
    let (created, ()) = tokio::join!(client.create_game(), async {
        let execute: ExecuteLine = serde_json::from_str(&relay.recv().await).unwrap();
        assert_eq!(execute.entrypoint, "create");
        relay.send(&create_result(3, execute.seq, true)).await;
    });
    assert!(assert_ok!(created));

    assert_ok!(client.shutdown().await);
}
