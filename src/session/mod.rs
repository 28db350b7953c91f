//! Call session lifecycle
//!
//! This module provides the `PeerSession` state machine that owns one
//! connection provider, one capture stream, one recognizer, and at most one
//! data channel to a remote peer, and drives them all from a single event
//! loop.

mod config;
mod events;
mod session;

pub use config::SessionConfig;
pub use events::SessionEvent;
pub use session::{PeerSession, SessionPhase};
