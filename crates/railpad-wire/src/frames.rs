//! Fixed outbound frames, byte-exact as captured from the wire.
//!
//! These are sent verbatim; their checksum bytes are opaque constants from
//! the capture and are not recomputed. `SWITCH_BAUD` is part of the
//! protocol vocabulary but is not issued in the default handshake flow.

/// Bare magic marker, the very first bytes of every handshake attempt.
/// Not a frame; the peer answers nothing to it directly.
pub const MAGIC_START: [u8; 4] = [0xA1, 0xA2, 0xA3, 0xA4];

/// Handshake request. The peer answers with a handshake-ack command.
pub const HANDSHAKE_START: [u8; 12] = [
    0x19, 0x01, 0x03, 0x07, 0x00, 0xA5, 0x02, 0x01, 0x7E, 0x00, 0x00, 0x00,
];

/// Request the peer's hardware address.
pub const GET_IDENTITY: [u8; 12] = [
    0x19, 0x01, 0x03, 0x07, 0x00, 0x91, 0x01, 0x00, 0x00, 0x00, 0x00, 0x24,
];

/// Request a shift to the high-speed line rate. Unused in the default flow.
pub const SWITCH_BAUD: [u8; 20] = [
    0x19, 0x01, 0x03, 0x0F, 0x00, 0x91, 0x20, 0x08, 0x00, 0x00, 0xBD, 0xB1, 0xC0, 0xC6, 0x2D,
    0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Request extended input status. Sent on every status-poll tick.
pub const REQUEST_STATUS: [u8; 13] = [
    0x19, 0x01, 0x03, 0x08, 0x00, 0x92, 0x00, 0x01, 0x00, 0x00, 0x69, 0x2D, 0x1F,
];

/// Opaque vendor initialization frames sent after the handshake completes.
/// Their replies carry the matching sub-command ids and are ignored.
pub const INIT_FRAME_1: [u8; 12] = [
    0x19, 0x01, 0x03, 0x07, 0x00, 0x91, 0x11, 0x00, 0x00, 0x00, 0x00, 0x0E,
];
pub const INIT_FRAME_2: [u8; 12] = [
    0x19, 0x01, 0x03, 0x07, 0x00, 0x91, 0x10, 0x00, 0x00, 0x00, 0x00, 0x3D,
];
pub const INIT_FRAME_3: [u8; 16] = [
    0x19, 0x01, 0x03, 0x0B, 0x00, 0x91, 0x12, 0x04, 0x00, 0x00, 0x12, 0xA6, 0x0F, 0x00, 0x00,
    0x00,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{HEADER_SIZE, INITIAL_SIZE, MAGIC};
    use crate::command::{CMD_EXT_SEND, CMD_HANDSHAKE_ACK};

    fn check_layout(frame: &[u8]) {
        assert_eq!(&frame[..3], &MAGIC);
        // Declared length covers everything after the initial block.
        assert_eq!(frame[3] as usize, frame.len() - INITIAL_SIZE);
        assert_eq!(frame[4], 0x00);
        assert!(frame.len() >= HEADER_SIZE);
    }

    #[test]
    fn fixed_frames_have_consistent_headers() {
        check_layout(&HANDSHAKE_START);
        check_layout(&GET_IDENTITY);
        check_layout(&SWITCH_BAUD);
        check_layout(&REQUEST_STATUS);
        check_layout(&INIT_FRAME_1);
        check_layout(&INIT_FRAME_2);
        check_layout(&INIT_FRAME_3);
    }

    #[test]
    fn handshake_start_is_a_handshake_command() {
        assert_eq!(HANDSHAKE_START[5], CMD_HANDSHAKE_ACK);
    }

    #[test]
    fn init_frames_are_extended_sends() {
        for frame in [&GET_IDENTITY[..], &INIT_FRAME_1, &INIT_FRAME_2, &INIT_FRAME_3] {
            assert_eq!(frame[5], CMD_EXT_SEND);
        }
    }

    #[test]
    fn magic_marker_is_not_a_frame() {
        assert_ne!(&MAGIC_START[..3], &MAGIC);
    }
}
