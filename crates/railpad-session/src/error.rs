use crate::sink::RegistrationError;

/// Errors surfaced by the session engine.
///
/// Parse and dispatch problems never show up here: malformed frames and
/// unknown commands are logged and dropped inside the receive path. What
/// remains is transport setup and input-device registration.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error during session setup.
    #[error("transport error: {0}")]
    Transport(#[from] railpad_transport::TransportError),

    /// The input sink refused to register the virtual device.
    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
