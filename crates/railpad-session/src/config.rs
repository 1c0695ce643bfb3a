use std::time::Duration;

/// Line rate used when a session is first brought up.
pub const INITIAL_BAUD_RATE: u32 = 1_000_000;

/// Line rate after a baud-shift reply. The request that would trigger it is
/// not sent in the default flow; the capability is kept regardless.
pub const HIGH_SPEED_BAUD_RATE: u32 = 3_125_000;

/// Timing and line-rate knobs for the session engine.
///
/// The defaults are the protocol's native cadences; overrides exist mainly
/// so tests can tighten or stretch them.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Bound on every outbound write.
    pub write_timeout: Duration,
    /// Randomized delay between handshake attempts, lower bound.
    pub handshake_retry_min: Duration,
    /// Randomized delay between handshake attempts, upper bound.
    pub handshake_retry_max: Duration,
    /// Liveness monitor cadence per session.
    pub liveness_interval: Duration,
    /// Status poll cadence per initialized session (~60 Hz).
    pub status_poll_interval: Duration,
    /// Merged-frame emission cadence.
    pub emit_interval: Duration,
    /// Baud rate applied when a session is attached.
    pub initial_baud_rate: u32,
    /// Baud rate applied on a baud-shift reply.
    pub high_speed_baud_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            write_timeout: Duration::from_millis(200),
            handshake_retry_min: Duration::from_millis(180),
            handshake_retry_max: Duration::from_millis(200),
            liveness_interval: Duration::from_millis(200),
            status_poll_interval: Duration::from_millis(16),
            emit_interval: Duration::from_millis(10),
            initial_baud_rate: INITIAL_BAUD_RATE,
            high_speed_baud_rate: HIGH_SPEED_BAUD_RATE,
        }
    }
}

impl EngineConfig {
    /// Override the outbound write bound.
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Override the liveness monitor cadence.
    pub fn with_liveness_interval(mut self, interval: Duration) -> Self {
        self.liveness_interval = interval;
        self
    }

    /// Override the status poll cadence.
    pub fn with_status_poll_interval(mut self, interval: Duration) -> Self {
        self.status_poll_interval = interval;
        self
    }

    /// Override the emission cadence.
    pub fn with_emit_interval(mut self, interval: Duration) -> Self {
        self.emit_interval = interval;
        self
    }
}
