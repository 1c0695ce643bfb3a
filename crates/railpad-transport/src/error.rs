use std::time::Duration;

/// Errors that can occur at the serial transport boundary.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The port has not been opened yet.
    #[error("port not open")]
    NotOpen,

    /// A write did not complete within its bound.
    #[error("write timed out after {timeout:?}")]
    WriteTimeout { timeout: Duration },

    /// The peer end of the port is gone.
    #[error("port closed")]
    Closed,

    /// An I/O error occurred on the underlying device.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
