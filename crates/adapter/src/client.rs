//! TCP client for the relay link
//!
//! One task owns the connection, the entity store and the reconciliation
//! controller. It multiplexes relay lines, UI commands and a fixed-rate tick;
//! nothing else touches the controller, so no locks are needed.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::ClientConfig;
use crate::core::action::calldata;
use crate::core::snapshot::normalize_felt;
use crate::core::{Controller, DecodeError, EntityStore, GameModel, PlayerModel};
use crate::protocol::*;
use crate::runtime::{ClientCommand, ClientEvent, ClientView};
use crate::types::{Action, Entrypoint, TICK_MS};

/// Open the wire log, if configured; every line in either direction is appended
fn spawn_wire_log(path: Option<String>) -> Option<mpsc::UnboundedSender<Vec<u8>>> {
    let path = path?;
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                eprintln!("[Client] Cannot open wire log {}: {}", path, e);
                return;
            }
        };

        while let Some(bytes) = rx.recv().await {
            if file.write_all(&bytes).await.is_err() {
                break;
            }
            if file.write_all(b"\n").await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    Some(tx)
}

/// Connect to the relay and run until the relay hangs up or a shutdown arrives
pub async fn run_client(
    config: ClientConfig,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
    view_tx: watch::Sender<ClientView>,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = spawn_wire_log(config.log_path.clone());

    let addr = config.socket_addr()?;
    let stream = TcpStream::connect(addr)
        .await
        .with_context(|| format!("connecting to relay at {}", addr))?;
    let peer = stream.peer_addr()?;
    println!("[Client] Connected to relay at {}", peer);

    let (reader, mut writer) = stream.into_split();
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    let wire_log_tx_out = wire_log_tx.clone();
    let write_task = tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            let bytes = line.into_bytes();
            if writer.write_all(&bytes).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
            if let Some(tx) = wire_log_tx_out.as_ref() {
                let _ = tx.send(bytes);
            }
        }
    });

    let mut session = Session::new(&config, line_tx, view_tx, event_tx);
    session.send_hello(&config.client_name);
    if let Some(tx) = ready_tx {
        let _ = tx.send(peer);
    }

    let mut lines = BufReader::new(reader).lines();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MS as u64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    let result = loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if let Some(tx) = wire_log_tx.as_ref() {
                        let _ = tx.send(line.as_bytes().to_vec());
                    }
                    session.handle_line(&line);
                }
                Ok(None) => {
                    println!("[Client] Relay closed the connection");
                    break Ok(());
                }
                Err(e) => break Err(anyhow::Error::from(e).context("reading from relay")),
            },
            cmd = cmd_rx.recv() => match cmd {
                Some(ClientCommand::Shutdown) | None => break Ok(()),
                Some(cmd) => session.handle_command(cmd),
            },
            _ = ticker.tick() => {
                let now = Instant::now();
                let elapsed = now
                    .duration_since(last_tick)
                    .as_millis()
                    .min(u32::MAX as u128) as u32;
                last_tick = now;
                session.on_tick(elapsed, now);
            }
        }
        session.publish();
    };

    session.fail_all("connection closed");
    session.publish();
    drop(session);
    let _ = write_task.await;
    println!("[Client] Disconnected from {}", peer);
    result
}

/// Submission awaiting its `result`
struct PendingRequest {
    entrypoint: Entrypoint,
    /// Controller ticket for placements
    ticket: Option<u64>,
    reply: Option<oneshot::Sender<bool>>,
    deadline: Instant,
}

/// Client-side state behind the connection
struct Session {
    controller: Controller,
    store: EntityStore,
    player_id: String,
    submit_timeout: Duration,
    seq: u64,
    pending: HashMap<u64, PendingRequest>,
    /// Highest combo id already announced
    announced_combo: u64,
    out_tx: mpsc::UnboundedSender<String>,
    view_tx: watch::Sender<ClientView>,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
}

impl Session {
    fn new(
        config: &ClientConfig,
        out_tx: mpsc::UnboundedSender<String>,
        view_tx: watch::Sender<ClientView>,
        event_tx: mpsc::UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            controller: Controller::new(config.controller_config()),
            store: EntityStore::new(),
            player_id: config.player_id.clone(),
            submit_timeout: Duration::from_millis(config.submit_timeout_ms as u64),
            seq: 0,
            pending: HashMap::new(),
            announced_combo: 0,
            out_tx,
            view_tx,
            event_tx,
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn is_ours(&self, player_id: &str) -> bool {
        !self.player_id.is_empty() && normalize_felt(player_id) == normalize_felt(&self.player_id)
    }

    fn send_line<T: serde::Serialize>(&self, msg: &T) -> bool {
        match serde_json::to_string(msg) {
            Ok(line) => self.out_tx.send(line).is_ok(),
            Err(e) => {
                eprintln!("[Client] Cannot encode message: {}", e);
                false
            }
        }
    }

    fn send_hello(&mut self, client_name: &str) {
        let seq = self.next_seq();
        let hello = create_hello(seq, client_name, &self.player_id);
        self.send_line(&hello);
    }

    fn handle_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Welcome(welcome)) => {
                if !welcome.protocol_version.starts_with("1.") {
                    eprintln!(
                        "[Client] Relay speaks protocol {}, expected {}",
                        welcome.protocol_version, PROTOCOL_VERSION
                    );
                }
                if self.player_id.is_empty() {
                    if let Some(id) = welcome.player_id {
                        self.player_id = id.to_string();
                    }
                }
                println!("[Client] Welcome received, playing as {}", self.player_id);
                let _ = self.event_tx.send(ClientEvent::Welcome {
                    player_id: self.player_id.clone(),
                });
                self.observe_latest();
            }
            Ok(ParsedMessage::Game(msg)) => self.on_game(&msg.game),
            Ok(ParsedMessage::Player(msg)) => self.on_player(&msg.player),
            Ok(ParsedMessage::Result(result)) => {
                self.settle(result.request_seq, result.success, "rejected by the authority");
            }
            Ok(ParsedMessage::Error(err)) => {
                eprintln!("[Client] Relay error {:?}: {}", err.code, err.message);
                let _ = self.event_tx.send(ClientEvent::RelayError {
                    code: err.code,
                    message: err.message.clone(),
                });
                if let Some(request_seq) = err.request_seq {
                    self.settle(request_seq, false, &err.message);
                }
            }
            Ok(ParsedMessage::Unknown(_)) => {}
            Err(e) => {
                eprintln!("[Client] Unparsable line from relay: {}", e);
                self.on_unparsable(trimmed, &e);
            }
        }
    }

    /// A `game`/`player` record of ours that fails to parse is still an inconsistency
    fn on_unparsable(&mut self, line: &str, err: &serde_json::Error) {
        let Some(header) = parse_lenient_header(line) else {
            return;
        };
        let field = match header.msg_type.as_str() {
            "game" => "game",
            "player" => "player",
            _ => return,
        };
        if header.owner.as_deref().is_some_and(|owner| self.is_ours(owner)) {
            self.surface_fault(DecodeError::MalformedField {
                field,
                reason: err.to_string(),
            });
        }
    }

    fn on_game(&mut self, wire: &WireGame) {
        let decoded = wire
            .to_snapshot()
            .and_then(|snapshot| GameModel::from_snapshot(&snapshot));
        match decoded {
            Ok(model) => {
                self.store.upsert_game(model);
                self.observe_latest();
            }
            Err(err) => {
                eprintln!("[Client] Cannot decode game {}: {}", wire.id, err);
                if self.is_ours(wire.player_id.as_str()) {
                    self.surface_fault(err);
                }
            }
        }
    }

    fn on_player(&mut self, wire: &WirePlayer) {
        match PlayerModel::from_snapshot(&wire.to_snapshot()) {
            Ok(player) => {
                self.store.upsert_player(player);
            }
            Err(err) => {
                eprintln!("[Client] Cannot decode player {}: {}", wire.id, err);
                if self.is_ours(wire.id.as_str()) {
                    self.surface_fault(err);
                }
            }
        }
    }

    fn surface_fault(&mut self, err: DecodeError) {
        self.controller.report_fault(err.clone());
        let _ = self.event_tx.send(ClientEvent::Inconsistency(err));
    }

    fn observe_latest(&mut self) {
        let latest = self.store.latest_game_for(&self.player_id).cloned();
        self.controller.observe(latest.as_ref());
    }

    fn handle_command(&mut self, cmd: ClientCommand) {
        match cmd {
            ClientCommand::SelectPiece(index) => {
                self.controller.select_piece(index);
            }
            ClientCommand::Deselect => {
                self.controller.deselect();
            }
            ClientCommand::Place { row, col, reply } => {
                match self.controller.attempt_place(row, col) {
                    Ok(request) => self.submit(request.action, Some(request.ticket), reply),
                    Err(_) => {
                        let _ = reply.send(false);
                    }
                }
            }
            ClientCommand::Execute { action, reply } => self.submit(action, None, reply),
            ClientCommand::AckCombo(id) => {
                self.controller.ack_combo(id);
            }
            ClientCommand::Resync => self.controller.resync(),
            ClientCommand::Shutdown => {}
        }
    }

    fn submit(&mut self, action: Action, ticket: Option<u64>, reply: oneshot::Sender<bool>) {
        let entrypoint = action.entrypoint();
        let args = calldata(&action)
            .map_err(|e| e.to_string())
            .and_then(|args| {
                Calldata::from_args(&args).ok_or_else(|| "calldata out of range".to_string())
            });

        let seq = self.next_seq();
        let sent = match args {
            Ok(args) => self.send_line(&create_execute(seq, entrypoint, args)),
            Err(reason) => {
                eprintln!("[Client] Cannot build {} call: {}", entrypoint.as_str(), reason);
                false
            }
        };

        self.pending.insert(
            seq,
            PendingRequest {
                entrypoint,
                ticket,
                reply: Some(reply),
                deadline: Instant::now() + self.submit_timeout,
            },
        );
        if sent {
            println!("[Client] Submitted {} (seq {})", entrypoint.as_str(), seq);
        } else {
            self.settle(seq, false, "not sent");
        }
    }

    /// Resolve a submission; failures are logged and never retried
    fn settle(&mut self, request_seq: u64, success: bool, reason: &str) {
        let Some(mut request) = self.pending.remove(&request_seq) else {
            return;
        };
        if let Some(ticket) = request.ticket {
            self.controller.resolve_placement(ticket, success);
        }
        if !success {
            eprintln!(
                "[Client] {} (seq {}) failed: {}",
                request.entrypoint.as_str(),
                request_seq,
                reason
            );
            let _ = self.event_tx.send(ClientEvent::SubmissionFailed {
                entrypoint: request.entrypoint,
                reason: reason.to_string(),
            });
        }
        if let Some(reply) = request.reply.take() {
            let _ = reply.send(success);
        }
    }

    fn on_tick(&mut self, elapsed_ms: u32, now: Instant) {
        self.controller.tick(elapsed_ms);

        let fresh: Vec<_> = self
            .controller
            .combos()
            .iter()
            .filter(|c| c.id > self.announced_combo)
            .copied()
            .collect();
        for combo in fresh {
            println!("[Client] Combo x{} (+{})", combo.combo, combo.points());
            self.announced_combo = self.announced_combo.max(combo.id);
            let _ = self.event_tx.send(ClientEvent::Combo(combo));
        }

        let expired: Vec<u64> = self
            .pending
            .iter()
            .filter(|(_, p)| p.deadline <= now)
            .map(|(&seq, _)| seq)
            .collect();
        for seq in expired {
            self.settle(seq, false, "timed out");
        }
    }

    fn fail_all(&mut self, reason: &str) {
        let seqs: Vec<u64> = self.pending.keys().copied().collect();
        for seq in seqs {
            self.settle(seq, false, reason);
        }
    }

    fn publish(&self) {
        let player = self.store.player(&self.player_id);
        let view = ClientView::from_controller(&self.controller, player);
        self.view_tx.send_if_modified(|current| {
            if *current == view {
                false
            } else {
                *current = view;
                true
            }
        });
    }
}
