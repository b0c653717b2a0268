//! Healing — bounded retry with backoff, and its orchestration.
//!
//! `engine` is the pure retry driver; `orchestrator` wires it to the
//! session store and the wallet transport.

pub mod engine;
pub mod orchestrator;

pub use engine::heal;
pub use orchestrator::{ErrorCallback, LynkStatus, Orchestrator};
