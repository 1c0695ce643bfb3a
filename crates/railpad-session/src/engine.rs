//! Engine lifecycle: device registration, session attachment, shutdown.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::emitter::run_emitter;
use crate::error::Result;
use crate::monitor::{run_liveness, run_status_poll};
use crate::session::Session;
use crate::sink::{DeviceCapabilities, InputSink};
use crate::state::SharedControllerState;
use railpad_transport::Transport;

/// The split-pad engine.
///
/// Owns the merged controller state, one registered sink device and the
/// emitter task. Serial half-controllers come and go through
/// [`Engine::attach`]; the merged device exists for the engine's whole
/// lifetime regardless of how many halves are attached.
pub struct Engine<S: InputSink> {
    config: EngineConfig,
    state: Arc<SharedControllerState>,
    root: CancellationToken,
    _sink: Arc<S>,
}

impl<S: InputSink> Engine<S> {
    /// Build an engine with default timing.
    ///
    /// Registers the merged virtual device and starts the emitter. Must be
    /// called from within a tokio runtime.
    pub fn new(sink: S) -> Result<Self> {
        Self::with_config(sink, EngineConfig::default())
    }

    pub fn with_config(sink: S, config: EngineConfig) -> Result<Self> {
        let sink = Arc::new(sink);
        let caps = DeviceCapabilities::merged_pad(config.emit_interval);
        let handle = sink.register_device(&caps)?;
        info!(name = caps.name, "input device registered");

        let state = Arc::new(SharedControllerState::new());
        let root = CancellationToken::new();
        tokio::spawn(run_emitter(
            state.clone(),
            sink.clone(),
            handle,
            config.emit_interval,
            root.child_token(),
        ));

        Ok(Self {
            config,
            state,
            root,
            _sink: sink,
        })
    }

    /// Attach one half-controller over its serial transport.
    ///
    /// Opens the port, enables flow control, applies the initial line rate
    /// and starts the liveness and status-poll tasks. The handshake begins
    /// immediately and retries until the peer answers or the session is
    /// detached.
    pub async fn attach<T: Transport>(&self, transport: T) -> Result<SessionHandle<T>> {
        transport.open().await?;
        transport.set_flow_control(true).await?;
        transport.set_baud_rate(self.config.initial_baud_rate).await?;

        let session = Arc::new(Session::new(
            transport,
            self.config.clone(),
            self.state.clone(),
        ));
        let cancel = self.root.child_token();
        tokio::spawn(run_liveness(session.clone(), cancel.clone()));
        tokio::spawn(run_status_poll(session.clone(), cancel.clone()));
        debug!("session attached");

        Ok(SessionHandle {
            session,
            state: self.state.clone(),
            cancel,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<SharedControllerState> {
        &self.state
    }

    /// Stop the emitter and every attached session.
    pub fn shutdown(&self) {
        self.root.cancel();
    }
}

impl<S: InputSink> Drop for Engine<S> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

/// A live attached session.
///
/// Inbound bytes from the port are fed through [`SessionHandle::receive`].
/// Dropping the handle stops the session's tasks; [`SessionHandle::detach`]
/// additionally clears the side's contribution from the merged state.
pub struct SessionHandle<T: Transport> {
    session: Arc<Session<T>>,
    state: Arc<SharedControllerState>,
    cancel: CancellationToken,
}

impl<T: Transport> SessionHandle<T> {
    /// Push bytes received from the port into the session.
    pub async fn receive(&self, bytes: &[u8]) {
        self.session.receive(bytes).await;
    }

    pub fn session(&self) -> &Arc<Session<T>> {
        &self.session
    }

    /// Tear the session down and neutralize its contribution, so the
    /// departed half's last-held buttons do not stay latched.
    pub fn detach(self) {
        self.cancel.cancel();
        let side = self.session.side();
        self.state.clear_side(side);
        info!(?side, "session detached");
    }
}

impl<T: Transport> Drop for SessionHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
