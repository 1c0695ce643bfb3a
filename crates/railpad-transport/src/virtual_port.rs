use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

/// In-memory serial port with an inspectable far end.
///
/// Each `write` is delivered to the [`VirtualPortPeer`] as one chunk,
/// mirroring how serial device callbacks hand the driver one frame at a
/// time. The peer can saturate the line to make writes time out.
#[derive(Clone)]
pub struct VirtualPort {
    shared: Arc<Shared>,
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

/// The device end of a [`VirtualPort`].
pub struct VirtualPortPeer {
    shared: Arc<Shared>,
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

struct Shared {
    open: AtomicBool,
    baud_rate: AtomicU32,
    flow_control: AtomicBool,
    saturated: AtomicBool,
}

impl VirtualPort {
    /// Create a connected port/peer pair.
    pub fn pair() -> (Self, VirtualPortPeer) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            open: AtomicBool::new(false),
            baud_rate: AtomicU32::new(0),
            flow_control: AtomicBool::new(false),
            saturated: AtomicBool::new(false),
        });
        let port = Self {
            shared: Arc::clone(&shared),
            tx,
        };
        let peer = VirtualPortPeer { shared, rx };
        (port, peer)
    }
}

impl Transport for VirtualPort {
    async fn open(&self) -> Result<()> {
        self.shared.open.store(true, Ordering::SeqCst);
        debug!("virtual port opened");
        Ok(())
    }

    async fn set_baud_rate(&self, rate: u32) -> Result<()> {
        self.shared.baud_rate.store(rate, Ordering::SeqCst);
        debug!(rate, "virtual port baud rate set");
        Ok(())
    }

    async fn set_flow_control(&self, enabled: bool) -> Result<()> {
        self.shared.flow_control.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    async fn write(&self, bytes: &[u8], timeout: Duration) -> Result<()> {
        if !self.shared.open.load(Ordering::SeqCst) {
            return Err(TransportError::NotOpen);
        }
        if self.shared.saturated.load(Ordering::SeqCst) {
            tokio::time::sleep(timeout).await;
            return Err(TransportError::WriteTimeout { timeout });
        }
        self.tx
            .send(bytes.to_vec())
            .map_err(|_| TransportError::Closed)
    }
}

impl VirtualPortPeer {
    /// Receive the next outbound chunk, or `None` if the port was dropped.
    pub async fn recv(&mut self) -> Option<Vec<u8>> {
        self.rx.recv().await
    }

    /// Receive without waiting.
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        self.rx.try_recv().ok()
    }

    /// Drain every chunk currently queued.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Ok(chunk) = self.rx.try_recv() {
            out.push(chunk);
        }
        out
    }

    /// Make subsequent writes block until their timeout expires.
    pub fn set_saturated(&self, saturated: bool) {
        self.shared.saturated.store(saturated, Ordering::SeqCst);
    }

    /// Whether the engine side has opened the port.
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Last baud rate configured by the engine side.
    pub fn baud_rate(&self) -> u32 {
        self.shared.baud_rate.load(Ordering::SeqCst)
    }

    /// Whether flow control is currently enabled.
    pub fn flow_control(&self) -> bool {
        self.shared.flow_control.load(Ordering::SeqCst)
    }
}
