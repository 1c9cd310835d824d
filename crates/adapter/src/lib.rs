//! Adapter - relay link over TCP with a JSON line protocol
//!
//! The client does not talk to the ledger directly. A relay bridges the
//! indexer's model feed and the transaction executor; this crate speaks to
//! that relay and drives the reconciliation controller from it.
//!
//! # Protocol Overview
//!
//! **Line-delimited JSON** over TCP:
//!
//! 1. **Connection**: client connects to the relay (default: 127.0.0.1:7878)
//! 2. **Handshake**: client sends `hello`, relay responds with `welcome`
//! 3. **Model feed**: relay pushes `game` and `player` records as they change
//! 4. **Execution**: client sends `execute`, relay answers with `result`
//!
//! # Message Types
//!
//! ## Client → Relay
//!
//! - **hello**: client info, protocol version, optional player id
//! - **execute**: one contract call (`create`, `place`, `spawn`, `rename`) with calldata
//!
//! ## Relay → Client
//!
//! - **welcome**: response to hello, may assign the player id
//! - **game** / **player**: model snapshots, big integers as felts
//! - **result**: outcome of an `execute`, keyed by `request_seq`
//! - **error**: error response with code and message
//!
//! # Environment Variables
//!
//! - `GRIMBLOCK_RELAY_HOST`: relay address (default: "127.0.0.1")
//! - `GRIMBLOCK_RELAY_PORT`: port number (default: 7878)
//! - `GRIMBLOCK_PLAYER_ID`: local account as a hex felt
//! - `GRIMBLOCK_COUNTDOWN_MS`, `GRIMBLOCK_LINE_CLEAR_DELAY_MS`,
//!   `GRIMBLOCK_SUBMIT_TIMEOUT_MS`: timing
//! - `GRIMBLOCK_LOG_PATH`: append every wire line to this file
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Relay: {"type":"hello","seq":1,"ts":1734000000000,"client":{"name":"grimblock","version":"0.1.0"},"protocol_version":"1.0.0","player_id":"0x5a"}
//! Relay -> Client: {"type":"welcome","seq":1,"ts":1734000000001,"protocol_version":"1.0.0"}
//! Relay -> Client: {"type":"game","seq":2,"ts":1734000000002,"game":{"player_id":"0x5a","id":"0x3","over":false,"combo":"0x0","score":"0x4","pieces":"0x1535","grid":"0x0","seed":"0x9"}}
//! Client -> Relay: {"type":"execute","seq":2,"ts":1734000000100,"entrypoint":"place","calldata":["0x3","0x0","0x0"]}
//! Relay -> Client: {"type":"result","seq":3,"ts":1734000001100,"request_seq":2,"success":true}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking and timers
//! - See [`protocol`] for message structure definitions
//! - See [`client`] for the connection loop
//! - See [`runtime`] for the UI-facing handle

pub mod client;
pub mod config;
pub mod protocol;
pub mod runtime;

pub use grimblock_core as core;
pub use grimblock_types as types;

pub use client::run_client;
pub use config::ClientConfig;
pub use protocol::*;
pub use runtime::{Client, ClientCommand, ClientEvent, ClientView};
