//! Serial split-pad controller engine.
//!
//! railpad merges two serial-attached half-controllers into one virtual
//! gamepad: binary frame codec, header validation, an indefinitely
//! retrying handshake, liveness-driven reconnection, status polling and
//! fixed-cadence input emission.
//!
//! # Crate Structure
//!
//! - [`transport`] — Serial port abstraction and an in-memory test port
//! - [`wire`] — Frame codec, command ids, button field and report parsing
//! - [`session`] — Engine, per-port sessions and input aggregation
//!   (behind `session` feature)

/// Re-export transport types.
pub mod transport {
    pub use railpad_transport::*;
}

/// Re-export wire types.
pub mod wire {
    pub use railpad_wire::*;
}

/// Re-export session-engine types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use railpad_session::*;
}

/// Logging bootstrap for embedding binaries (requires `logging` feature).
#[cfg(feature = "logging")]
pub mod logging;
