//! Per-port session: handshake, command dispatch and sample accounting.

use std::sync::Mutex;

use railpad_wire::codec::{Deframer, Packet};
use railpad_wire::command::{
    command_name, init_reply_name, CMD_EXT_REPLY, CMD_HANDSHAKE_ACK, CMD_INIT_REPLY,
    EXT_INPUT_REPORT, INIT_BAUD_RATE, INIT_IDENTITY,
};
use railpad_wire::frames::{
    GET_IDENTITY, HANDSHAKE_START, INIT_FRAME_1, INIT_FRAME_2, INIT_FRAME_3, MAGIC_START,
};
use railpad_wire::report::{parse_identity, InputReport};
use rand::Rng;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::state::{SharedControllerState, Side};
use railpad_transport::Transport;

/// Where a session stands in the bring-up sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No handshake attempt in flight.
    Disconnected,
    /// Handshake frames are being sent; waiting for the peer's ack.
    AwaitingHandshakeAck,
    /// Handshake acked, identity requested, address not yet known.
    AwaitingIdentity,
    /// Identity resolved; input reports flow.
    Active,
}

#[derive(Debug)]
struct SessionInner {
    phase: Phase,
    /// Set once the post-ack init frames have gone out. Distinct from
    /// [`Phase`]: the liveness monitor keys off this flag, and it drops
    /// again the moment a re-handshake starts.
    initialized: bool,
    /// Sticky across re-handshakes; the half does not change sides by
    /// reconnecting.
    side: Side,
    deframer: Deframer,
    /// Raw 24-bit field from this half's latest report, unmasked.
    last_buttons: u32,
    samples_received: u64,
    samples_at_last_check: u64,
}

/// One serial-attached half-controller.
///
/// All inbound bytes funnel through [`Session::receive`]; the handshake,
/// liveness and status-poll tasks drive the outbound side. Shared mutable
/// state sits behind one short-lived lock that is never held across an
/// await.
pub struct Session<T: Transport> {
    transport: T,
    config: EngineConfig,
    state: std::sync::Arc<SharedControllerState>,
    inner: Mutex<SessionInner>,
    /// Serializes writers: the status poller and the liveness monitor both
    /// write to the same port.
    write_lock: tokio::sync::Mutex<()>,
}

impl<T: Transport> Session<T> {
    pub fn new(
        transport: T,
        config: EngineConfig,
        state: std::sync::Arc<SharedControllerState>,
    ) -> Self {
        Self {
            transport,
            config,
            state,
            inner: Mutex::new(SessionInner {
                phase: Phase::Disconnected,
                initialized: false,
                side: Side::Unknown,
                deframer: Deframer::new(),
                last_buttons: 0,
                samples_received: 0,
                samples_at_last_check: 0,
            }),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn force_initialized_for_tests(&self) {
        self.lock().initialized = true;
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn side(&self) -> Side {
        self.lock().side
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn samples_received(&self) -> u64 {
        self.lock().samples_received
    }

    /// The raw button field from this half's latest report, before side
    /// masking.
    pub fn last_buttons(&self) -> u32 {
        self.lock().last_buttons
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Feed freshly received bytes into the session.
    ///
    /// Complete frames are collected under the lock, then dispatched with
    /// the lock released; a baud-shift reply awaits the transport.
    pub async fn receive(&self, bytes: &[u8]) {
        let packets = {
            let mut inner = self.lock();
            inner.deframer.push(bytes);
            let mut packets = Vec::new();
            while let Some(packet) = inner.deframer.next_packet() {
                packets.push(packet);
            }
            packets
        };

        for packet in packets {
            self.handle_packet(packet).await;
        }
    }

    async fn handle_packet(&self, packet: Packet) {
        trace!(
            command = command_name(packet.command),
            payload_len = packet.payload.len(),
            "frame received"
        );
        match packet.command {
            CMD_HANDSHAKE_ACK => self.handle_handshake_ack(),
            CMD_INIT_REPLY => self.handle_init_reply(&packet).await,
            CMD_EXT_REPLY => self.handle_ext_reply(&packet),
            other => {
                warn!("unknown command {other:#04X}, dropping frame");
            }
        }
    }

    fn handle_handshake_ack(&self) {
        let mut inner = self.lock();
        match inner.phase {
            Phase::AwaitingHandshakeAck => {
                debug!("handshake acknowledged");
                inner.phase = Phase::AwaitingIdentity;
            }
            phase => {
                debug!(?phase, "handshake ack outside handshake, ignoring");
            }
        }
    }

    async fn handle_init_reply(&self, packet: &Packet) {
        let subcommand = packet.data[0];
        match subcommand {
            INIT_IDENTITY => match parse_identity(&packet.payload) {
                Some(addr) => {
                    let side = Side::from_address(&addr);
                    let mut inner = self.lock();
                    if inner.side != Side::Unknown && inner.side != side {
                        warn!(%addr, previous = ?inner.side, resolved = ?side,
                            "side changed across reconnect");
                    }
                    inner.side = side;
                    inner.phase = Phase::Active;
                    info!(%addr, ?side, "identity resolved");
                }
                None => {
                    warn!(payload_len = packet.payload.len(), "short identity reply, dropping");
                }
            },
            INIT_BAUD_RATE => {
                let rate = self.config.high_speed_baud_rate;
                info!(rate, "peer confirmed baud shift");
                if let Err(err) = self.transport.set_baud_rate(rate).await {
                    warn!(%err, "failed to raise line rate");
                }
            }
            other => {
                debug!(
                    subcommand = init_reply_name(other),
                    "init reply acknowledged"
                );
            }
        }
    }

    fn handle_ext_reply(&self, packet: &Packet) {
        let Some(&subcommand) = packet.payload.first() else {
            warn!("empty extended reply, dropping");
            return;
        };
        match subcommand {
            EXT_INPUT_REPORT => match InputReport::parse(&packet.payload) {
                Some(report) => {
                    let side = {
                        let mut inner = self.lock();
                        inner.last_buttons = report.buttons;
                        inner.samples_received += 1;
                        inner.side
                    };
                    self.state.apply_report(side, &report);
                }
                None => {
                    warn!(payload_len = packet.payload.len(), "short input report, dropping");
                }
            },
            other => {
                debug!("unhandled extended reply {other:#04X}");
            }
        }
    }

    async fn write_frame(&self, bytes: &[u8]) -> railpad_transport::Result<()> {
        let _guard = self.write_lock.lock().await;
        self.transport.write(bytes, self.config.write_timeout).await
    }

    /// Run the handshake to completion.
    ///
    /// Retries indefinitely: the peer may not exist yet, and the magic
    /// marker plus handshake frame go out again after every randomized
    /// delay until an ack moves the phase forward. A write failure abandons
    /// the current attempt, never the loop. Cancellation comes from the
    /// caller dropping this future.
    pub async fn run_handshake(&self) {
        {
            let mut inner = self.lock();
            inner.phase = Phase::AwaitingHandshakeAck;
            inner.initialized = false;
        }
        info!("starting handshake");

        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            // A failed write abandons this attempt; the next one starts
            // after the usual delay.
            match self.write_frame(&MAGIC_START).await {
                Ok(()) => {
                    if let Err(err) = self.write_frame(&HANDSHAKE_START).await {
                        debug!(%err, attempts, "handshake write failed");
                    }
                }
                Err(err) => {
                    debug!(%err, attempts, "magic marker write failed");
                }
            }

            let delay = rand::thread_rng()
                .gen_range(self.config.handshake_retry_min..=self.config.handshake_retry_max);
            tokio::time::sleep(delay).await;

            if self.phase() != Phase::AwaitingHandshakeAck {
                break;
            }
        }
        debug!(attempts, "handshake acknowledged, sending init sequence");

        for frame in [
            &GET_IDENTITY[..],
            &INIT_FRAME_1,
            &INIT_FRAME_2,
            &INIT_FRAME_3,
        ] {
            if let Err(err) = self.write_frame(frame).await {
                warn!(%err, "init frame write failed");
            }
        }

        let mut inner = self.lock();
        inner.samples_received = 0;
        inner.samples_at_last_check = 0;
        inner.initialized = true;
    }

    /// One liveness check: re-handshake if the session looks stalled.
    ///
    /// Stalled means no new sample arrived since the previous check while
    /// at least one had ever arrived, or the session was never brought up.
    pub async fn liveness_tick(&self) {
        let stalled = {
            let inner = self.lock();
            (inner.samples_received == inner.samples_at_last_check && inner.samples_received != 0)
                || !inner.initialized
        };

        if stalled {
            warn!(side = ?self.side(), "session stalled, reconnecting");
            self.run_handshake().await;
        }

        let mut inner = self.lock();
        inner.samples_at_last_check = inner.samples_received;
    }

    /// One status-poll tick: request an extended input report.
    ///
    /// Skipped while the session is not initialized; the handshake path
    /// owns the port until then.
    pub async fn status_poll_tick(&self) {
        if !self.is_initialized() {
            return;
        }
        if let Err(err) = self.write_frame(&railpad_wire::frames::REQUEST_STATUS).await {
            debug!(%err, "status poll write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HIGH_SPEED_BAUD_RATE, INITIAL_BAUD_RATE};
    use bytes::BytesMut;
    use railpad_transport::VirtualPort;
    use railpad_wire::codec::encode_packet;
    use std::sync::Arc;

    fn session() -> (Session<VirtualPort>, railpad_transport::VirtualPortPeer) {
        let (port, peer) = VirtualPort::pair();
        let state = Arc::new(SharedControllerState::new());
        (Session::new(port, EngineConfig::default(), state), peer)
    }

    fn wire(packet: &Packet) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_packet(packet, &mut buf).unwrap();
        buf
    }

    fn ack_frame() -> BytesMut {
        wire(&Packet::new(CMD_HANDSHAKE_ACK, [0x02, 0x01, 0x7E, 0x00, 0x00]))
    }

    fn identity_frame(prefix: u8) -> BytesMut {
        // Address field on the wire is descending; the prefix byte lands
        // last.
        let payload = vec![0x66, 0x55, 0x44, 0x33, 0x22, 0x11, prefix];
        wire(&Packet::with_payload(
            CMD_INIT_REPLY,
            [INIT_IDENTITY, 0, 0, 0, 0],
            payload,
        ))
    }

    fn input_report_frame(buttons: u32) -> BytesMut {
        let mut payload = vec![0u8; 12];
        payload[0] = EXT_INPUT_REPORT;
        payload[3] = buttons as u8;
        payload[4] = (buttons >> 8) as u8;
        payload[5] = (buttons >> 16) as u8;
        wire(&Packet::with_payload(CMD_EXT_REPLY, [0; 5], payload))
    }

    #[tokio::test]
    async fn ack_advances_phase_only_during_handshake() {
        let (session, _peer) = session();
        assert_eq!(session.phase(), Phase::Disconnected);

        session.receive(&ack_frame()).await;
        assert_eq!(session.phase(), Phase::Disconnected);

        session.lock().phase = Phase::AwaitingHandshakeAck;
        session.receive(&ack_frame()).await;
        assert_eq!(session.phase(), Phase::AwaitingIdentity);
    }

    #[tokio::test]
    async fn identity_resolves_side_and_activates() {
        let (session, _peer) = session();
        session.lock().phase = Phase::AwaitingIdentity;

        session.receive(&identity_frame(0x7C)).await;
        assert_eq!(session.phase(), Phase::Active);
        assert_eq!(session.side(), Side::Right);
    }

    #[tokio::test]
    async fn input_report_counts_samples() {
        let (session, _peer) = session();
        {
            let mut inner = session.lock();
            inner.phase = Phase::Active;
            inner.side = Side::Left;
            inner.initialized = true;
        }

        session.receive(&input_report_frame(0x00_E900)).await;
        session.receive(&input_report_frame(0x00_0100)).await;
        assert_eq!(session.samples_received(), 2);
        assert_eq!(session.last_buttons(), 0x00_0100);
    }

    #[tokio::test]
    async fn baud_shift_reply_reconfigures_transport() {
        let (session, peer) = session();
        session.transport().open().await.unwrap();
        session
            .transport()
            .set_baud_rate(INITIAL_BAUD_RATE)
            .await
            .unwrap();

        let frame = wire(&Packet::new(CMD_INIT_REPLY, [INIT_BAUD_RATE, 0, 0, 0, 0]));
        session.receive(&frame).await;
        assert_eq!(peer.baud_rate(), HIGH_SPEED_BAUD_RATE);
    }

    #[tokio::test]
    async fn malformed_bytes_do_not_disturb_state() {
        let (session, _peer) = session();
        session.receive(&[0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x11, 0x22]).await;
        assert_eq!(session.phase(), Phase::Disconnected);
        assert_eq!(session.samples_received(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_retries_until_acked() {
        let (session, mut peer) = session();
        let session = Arc::new(session);
        session.transport().open().await.unwrap();

        let hs = {
            let session = session.clone();
            tokio::spawn(async move { session.run_handshake().await })
        };

        // Let a few attempts go out unanswered.
        tokio::time::sleep(std::time::Duration::from_millis(700)).await;
        assert_eq!(session.phase(), Phase::AwaitingHandshakeAck);
        let sent = peer.drain();
        assert!(sent.len() >= 6, "expected repeated marker+handshake pairs");
        assert_eq!(sent[0], MAGIC_START.to_vec());
        assert_eq!(sent[1], HANDSHAKE_START.to_vec());

        session.receive(&ack_frame()).await;
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        hs.await.unwrap();

        assert!(session.is_initialized());
        let sent = peer.drain();
        let tail: Vec<Vec<u8>> = sent[sent.len() - 4..].to_vec();
        assert_eq!(tail[0], GET_IDENTITY.to_vec());
        assert_eq!(tail[3], INIT_FRAME_3.to_vec());
    }

    #[tokio::test(start_paused = true)]
    async fn handshake_survives_write_timeouts() {
        let (session, mut peer) = session();
        let session = Arc::new(session);
        session.transport().open().await.unwrap();
        peer.set_saturated(true);

        let hs = {
            let session = session.clone();
            tokio::spawn(async move { session.run_handshake().await })
        };

        // Every write times out at the 200 ms bound; the loop must keep
        // retrying without advancing phase or panicking.
        tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
        assert_eq!(session.phase(), Phase::AwaitingHandshakeAck);
        assert!(!session.is_initialized());
        assert!(peer.try_recv().is_none());

        // Unblock the line; the next attempt goes through and the ack
        // completes bring-up.
        peer.set_saturated(false);
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        assert!(!peer.drain().is_empty());

        session.receive(&ack_frame()).await;
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        hs.await.unwrap();
        assert!(session.is_initialized());
    }

    #[tokio::test(start_paused = true)]
    async fn liveness_rehandshakes_on_stall() {
        let (session, mut peer) = session();
        let session = Arc::new(session);
        session.transport().open().await.unwrap();
        {
            let mut inner = session.lock();
            inner.initialized = true;
            inner.samples_received = 5;
            inner.samples_at_last_check = 5;
        }

        let tick = {
            let session = session.clone();
            tokio::spawn(async move { session.liveness_tick().await })
        };

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(session.phase(), Phase::AwaitingHandshakeAck);
        assert!(!session.is_initialized());

        session.receive(&ack_frame()).await;
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
        tick.await.unwrap();

        assert!(session.is_initialized());
        assert_eq!(session.samples_received(), 0);
        assert!(!peer.drain().is_empty());
    }

    #[tokio::test]
    async fn liveness_quiet_when_samples_flow() {
        let (session, _peer) = session();
        session.transport().open().await.unwrap();
        {
            let mut inner = session.lock();
            inner.initialized = true;
            inner.samples_received = 10;
            inner.samples_at_last_check = 5;
        }

        session.liveness_tick().await;
        assert!(session.is_initialized());
        assert_eq!(session.lock().samples_at_last_check, 10);
    }

    #[tokio::test]
    async fn liveness_trusts_initialized_session_before_first_sample() {
        let (session, mut peer) = session();
        session.transport().open().await.unwrap();
        session.lock().initialized = true;

        // Brought up but no report yet: not a stall, no reconnect traffic.
        session.liveness_tick().await;
        assert!(session.is_initialized());
        assert_eq!(session.phase(), Phase::Disconnected);
        assert!(peer.drain().is_empty());
    }

    #[tokio::test]
    async fn status_poll_skipped_before_init() {
        let (session, mut peer) = session();
        session.transport().open().await.unwrap();

        session.status_poll_tick().await;
        assert!(peer.drain().is_empty());

        session.lock().initialized = true;
        session.status_poll_tick().await;
        assert_eq!(peer.drain(), vec![railpad_wire::frames::REQUEST_STATUS.to_vec()]);
    }
}
