//! Client runtime integration
//!
//! Bridges a UI (sync or async) with the async relay client: commands go in
//! over an mpsc channel, the visible state comes back over a watch channel and
//! notifications over an event stream.

use std::net::SocketAddr;

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::client::run_client;
use crate::config::ClientConfig;
use crate::core::controller::{ComboNotice, Controller, Phase, VisibleState};
use crate::core::{DecodeError, PlayerModel};
use crate::protocol::ErrorCode;
use crate::types::{Action, Entrypoint};

/// Bound on queued UI commands
const COMMAND_QUEUE: usize = 64;

/// Command delivered to the client loop
#[derive(Debug)]
pub enum ClientCommand {
    SelectPiece(usize),
    Deselect,
    /// Place the selected piece with its top-left corner at `(row, col)`
    Place {
        row: i8,
        col: i8,
        reply: oneshot::Sender<bool>,
    },
    /// Submit a non-placement action (create, spawn, rename)
    Execute {
        action: Action,
        reply: oneshot::Sender<bool>,
    },
    AckCombo(u64),
    Resync,
    Shutdown,
}

/// Notification from the client loop
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Welcome { player_id: String },
    /// An authoritative record for this player could not be decoded
    Inconsistency(DecodeError),
    Combo(ComboNotice),
    SubmissionFailed { entrypoint: Entrypoint, reason: String },
    RelayError { code: ErrorCode, message: String },
}

/// Everything a UI renders
#[derive(Debug, Clone, PartialEq)]
pub struct ClientView {
    pub phase: Phase,
    pub countdown_ms: u32,
    pub visible: VisibleState,
    pub combos: Vec<ComboNotice>,
    pub in_flight: bool,
    pub game_id: u32,
    pub player: Option<PlayerModel>,
}

impl Default for ClientView {
    fn default() -> Self {
        Self {
            phase: Phase::NoSession,
            countdown_ms: 0,
            visible: VisibleState::default(),
            combos: Vec::new(),
            in_flight: false,
            game_id: 0,
            player: None,
        }
    }
}

impl ClientView {
    pub fn from_controller(controller: &Controller, player: Option<&PlayerModel>) -> Self {
        Self {
            phase: controller.phase(),
            countdown_ms: controller.countdown_remaining_ms(),
            visible: controller.visible().clone(),
            combos: controller.combos().to_vec(),
            in_flight: controller.in_flight().is_some(),
            game_id: controller.session_id(),
            player: player.cloned(),
        }
    }
}

/// Running client instance
pub struct Client {
    relay_addr: SocketAddr,
    cmd_tx: mpsc::Sender<ClientCommand>,
    view_rx: watch::Receiver<ClientView>,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl Client {
    /// Connect to the relay and start the client loop
    ///
    /// Resolves once the hello is on the wire.
    pub async fn connect(config: ClientConfig) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>(COMMAND_QUEUE);
        let (view_tx, view_rx) = watch::channel(ClientView::default());
        let (event_tx, event_rx) = mpsc::unbounded_channel::<ClientEvent>();
        let (ready_tx, ready_rx) = oneshot::channel::<SocketAddr>();

        let task = tokio::spawn(run_client(config, cmd_rx, view_tx, event_tx, Some(ready_tx)));

        match ready_rx.await {
            Ok(relay_addr) => Ok(Self {
                relay_addr,
                cmd_tx,
                view_rx,
                event_rx,
                task,
            }),
            Err(_) => match task.await {
                Ok(Err(e)) => Err(e),
                Ok(Ok(())) => Err(anyhow!("client stopped before connecting")),
                Err(e) => Err(e.into()),
            },
        }
    }

    pub fn relay_addr(&self) -> SocketAddr {
        self.relay_addr
    }

    async fn send(&self, cmd: ClientCommand) -> anyhow::Result<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| anyhow!("client loop has stopped"))
    }

    pub async fn select_piece(&self, index: usize) -> anyhow::Result<()> {
        self.send(ClientCommand::SelectPiece(index)).await
    }

    pub async fn deselect(&self) -> anyhow::Result<()> {
        self.send(ClientCommand::Deselect).await
    }

    /// Place the selected piece; true once the authority accepted it
    ///
    /// Local rejects, remote failures and timeouts all yield false.
    pub async fn place(&self, row: i8, col: i8) -> anyhow::Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::Place { row, col, reply }).await?;
        Ok(rx.await.unwrap_or(false))
    }

    pub async fn execute(&self, action: Action) -> anyhow::Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::Execute { action, reply }).await?;
        Ok(rx.await.unwrap_or(false))
    }

    pub async fn create_game(&self) -> anyhow::Result<bool> {
        self.execute(Action::Create).await
    }

    pub async fn spawn_player(&self, name: &str) -> anyhow::Result<bool> {
        self.execute(Action::Spawn {
            name: name.to_string(),
        })
        .await
    }

    pub async fn rename(&self, name: &str) -> anyhow::Result<bool> {
        self.execute(Action::Rename {
            name: name.to_string(),
        })
        .await
    }

    pub async fn ack_combo(&self, id: u64) -> anyhow::Result<()> {
        self.send(ClientCommand::AckCombo(id)).await
    }

    pub async fn resync(&self) -> anyhow::Result<()> {
        self.send(ClientCommand::Resync).await
    }

    /// Latest published view
    pub fn view(&self) -> ClientView {
        self.view_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ClientView> {
        self.view_rx.clone()
    }

    /// Wait until the published view satisfies `f`
    pub async fn wait_for<F>(&mut self, f: F) -> anyhow::Result<ClientView>
    where
        F: FnMut(&ClientView) -> bool,
    {
        let view = self
            .view_rx
            .wait_for(f)
            .await
            .map_err(|_| anyhow!("client loop has stopped"))?;
        Ok(view.clone())
    }

    pub async fn next_event(&mut self) -> Option<ClientEvent> {
        self.event_rx.recv().await
    }

    pub fn try_event(&mut self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Stop the loop and wait for it to finish
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.cmd_tx.send(ClientCommand::Shutdown).await;
        self.task.await?
    }
}
