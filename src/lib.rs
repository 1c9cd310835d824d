//! Grimblock (workspace facade crate).
//!
//! Exposes `grimblock::{core,adapter,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use grimblock_adapter as adapter;
pub use grimblock_core as core;
pub use grimblock_types as types;
