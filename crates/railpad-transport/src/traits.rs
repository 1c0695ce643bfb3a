use std::future::Future;
use std::time::Duration;

use crate::error::Result;

/// A duplex serial port as seen by the session engine.
///
/// Outbound traffic goes through [`Transport::write`]; inbound bytes are
/// pushed by the embedding shim into the session layer, so the trait has no
/// read side. Implementations must be safe to share across tasks; the
/// status poller and the liveness monitor both write to the same port.
///
/// All methods return `Send` futures so engine tasks holding a transport can
/// be spawned onto a multi-threaded runtime.
pub trait Transport: Send + Sync + 'static {
    /// Open the underlying device.
    fn open(&self) -> impl Future<Output = Result<()>> + Send;

    /// Reconfigure the line rate, in baud.
    fn set_baud_rate(&self, rate: u32) -> impl Future<Output = Result<()>> + Send;

    /// Enable or disable hardware flow control.
    fn set_flow_control(&self, enabled: bool) -> impl Future<Output = Result<()>> + Send;

    /// Write `bytes` to the port, bounded by `timeout`.
    ///
    /// A write that cannot complete within the bound must return
    /// [`TransportError::WriteTimeout`](crate::TransportError::WriteTimeout)
    /// rather than block the caller indefinitely.
    fn write(&self, bytes: &[u8], timeout: Duration) -> impl Future<Output = Result<()>> + Send;
}
