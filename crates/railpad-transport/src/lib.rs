//! Serial transport boundary for the railpad split-pad engine.
//!
//! The engine never touches a device node directly. It drives anything that
//! implements [`Transport`]: open, baud rate, flow control, and bounded
//! writes. Inbound bytes travel the other way: the embedding shim pushes
//! them into the session layer as they arrive.
//!
//! [`VirtualPort`] is an in-memory implementation used by the test suites
//! and by host-side simulators.

pub mod error;
pub mod traits;
pub mod virtual_port;

pub use error::{Result, TransportError};
pub use traits::Transport;
pub use virtual_port::{VirtualPort, VirtualPortPeer};
