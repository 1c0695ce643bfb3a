/// Errors that can occur while decoding or encoding frames.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The frame header does not start with the protocol magic.
    #[error("invalid frame magic")]
    InvalidMagic,

    /// The declared total length cannot describe a valid frame.
    #[error("invalid declared frame length {declared}")]
    InvalidLength { declared: usize },

    /// The payload does not fit the one-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
