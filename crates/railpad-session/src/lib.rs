//! Session engine for serial split-pad controllers.
//!
//! One [`Engine`] merges up to two half-controllers into a single virtual
//! input device:
//!
//! - Each attached serial port gets a [`Session`] that handshakes with its
//!   half (retrying indefinitely), resolves which side it is from the
//!   hardware address, and decodes its input reports.
//! - A per-session liveness monitor re-handshakes whenever the report
//!   stream stalls; a status poller requests reports at ~60 Hz.
//! - Reports land in a [`SharedControllerState`], partitioned by side so
//!   the halves can never overwrite each other.
//! - The emitter snapshots the merged state every 10 ms and pushes a
//!   complete frame into the [`InputSink`].
//!
//! The engine never reads a device node itself: the embedding shim owns the
//! port's read side and feeds bytes through [`SessionHandle::receive`].

pub mod config;
pub mod emitter;
pub mod engine;
pub mod error;
pub mod monitor;
pub mod session;
pub mod sink;
pub mod state;

pub use config::{EngineConfig, HIGH_SPEED_BAUD_RATE, INITIAL_BAUD_RATE};
pub use engine::{Engine, SessionHandle};
pub use error::{Result, SessionError};
pub use session::{Phase, Session};
pub use sink::{Axis, DeviceCapabilities, InputSink, RegistrationError};
pub use state::{ControllerFrame, SharedControllerState, Side, AXIS_NEUTRAL};
