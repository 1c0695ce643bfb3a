//! Background tasks driving one session: liveness and status polling.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::session::Session;
use railpad_transport::Transport;

/// Bring the session up, then watch it.
///
/// The initial handshake runs first; after that the session is checked on
/// every liveness interval and re-handshaken when stalled. Runs until
/// cancelled. The handshake itself retries indefinitely, so cancellation
/// must be able to interrupt it mid-attempt.
pub async fn run_liveness<T: Transport>(session: Arc<Session<T>>, cancel: CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => return,
        _ = session.run_handshake() => {}
    }

    let interval = session.config().liveness_interval;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = session.liveness_tick() => {}
        }
    }
    debug!("liveness monitor stopped");
}

/// Request an input report at the poll cadence, once the session is
/// initialized. Runs until cancelled.
pub async fn run_status_poll<T: Transport>(session: Arc<Session<T>>, cancel: CancellationToken) {
    let interval = session.config().status_poll_interval;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
        session.status_poll_tick().await;
    }
    debug!("status poller stopped");
}
