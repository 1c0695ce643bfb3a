//! Field decoding for extended input reports and identity replies.

use std::fmt;

/// Input-report payload indices, relative to the extended-reply sub-payload
/// (`payload[0]` is the sub-command byte).
const BUTTONS_OFFSET: usize = 3;
const LEFT_STICK_OFFSET: usize = 6;
const RIGHT_STICK_OFFSET: usize = 9;
const REPORT_MIN_LEN: usize = 12;

/// Identity-reply layout: the address is transmitted in descending byte
/// order over a 7-byte field; only the 6 high bytes are the address.
const ADDRESS_FIELD_OFFSET: usize = 0;
const ADDRESS_FIELD_LEN: usize = 7;

/// Decode a 12-bit packed X axis sample to 8 bits.
///
/// The sample is split across two bytes: the low nibble of `hi` carries the
/// high 4 bits and the high nibble of `lo` the low 4 bits.
pub const fn stick_x(hi: u8, lo: u8) -> u8 {
    ((hi & 0x0F) << 4) | ((lo & 0xF0) >> 4)
}

/// Decode a Y axis sample. The inversion reflects the sensor's polarity.
pub const fn stick_y(raw: u8) -> u8 {
    0u8.wrapping_sub(raw)
}

/// One half-controller's decoded input report.
///
/// Both stick pairs are decoded; only the pair owned by the reporting side
/// is meaningful, and the aggregation layer applies that filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReport {
    /// Raw 24-bit button field.
    pub buttons: u32,
    /// Decoded left stick (x, y).
    pub left_stick: (u8, u8),
    /// Decoded right stick (x, y).
    pub right_stick: (u8, u8),
}

impl InputReport {
    /// Parse an input report from an extended-reply sub-payload.
    ///
    /// Returns `None` if the payload is too short to carry the fixed
    /// offsets.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        if payload.len() < REPORT_MIN_LEN {
            return None;
        }

        let buttons = payload[BUTTONS_OFFSET] as u32
            | (payload[BUTTONS_OFFSET + 1] as u32) << 8
            | (payload[BUTTONS_OFFSET + 2] as u32) << 16;

        let left_stick = (
            stick_x(payload[LEFT_STICK_OFFSET + 1], payload[LEFT_STICK_OFFSET]),
            stick_y(payload[LEFT_STICK_OFFSET + 2]),
        );
        let right_stick = (
            stick_x(payload[RIGHT_STICK_OFFSET + 1], payload[RIGHT_STICK_OFFSET]),
            stick_y(payload[RIGHT_STICK_OFFSET + 2]),
        );

        Some(Self {
            buttons,
            left_stick,
            right_stick,
        })
    }
}

/// A half-controller's 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HwAddress(pub [u8; 6]);

impl HwAddress {
    /// The first (most significant) address byte, used by the side
    /// heuristic.
    pub fn prefix(&self) -> u8 {
        self.0[0]
    }
}

impl fmt::Display for HwAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a[0], a[1], a[2], a[3], a[4], a[5]
        )
    }
}

/// Parse the hardware address from an identity-reply payload.
///
/// The wire field holds 7 bytes in descending order starting at the known
/// offset; the destination index starts at 0 and exactly 6 bytes are taken,
/// so the address is read back most-significant first.
pub fn parse_identity(payload: &[u8]) -> Option<HwAddress> {
    let field = payload.get(ADDRESS_FIELD_OFFSET..ADDRESS_FIELD_OFFSET + ADDRESS_FIELD_LEN)?;
    let mut addr = [0u8; 6];
    for (i, byte) in addr.iter_mut().enumerate() {
        *byte = field[ADDRESS_FIELD_LEN - 1 - i];
    }
    Some(HwAddress(addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stick_x_reference_vector() {
        // hi=0xA5, lo=0x3F → ((0xA5 & 0x0F) << 4) | ((0x3F & 0xF0) >> 4)
        assert_eq!(stick_x(0xA5, 0x3F), 0x53);
    }

    #[test]
    fn stick_y_reference_vector() {
        assert_eq!(stick_y(0x10), 240);
        assert_eq!(stick_y(0x00), 0);
        assert_eq!(stick_y(0xFF), 1);
    }

    fn report_payload() -> Vec<u8> {
        let mut payload = vec![0u8; REPORT_MIN_LEN];
        payload[0] = 0x30;
        payload[3] = 0x0D; // Y | B | A
        payload[4] = 0x01; // Minus
        payload[5] = 0x80; // ZL
        payload[6] = 0x3F; // left X low nibble source
        payload[7] = 0xA5; // left X high nibble source
        payload[8] = 0x10; // left Y
        payload[9] = 0xF0;
        payload[10] = 0x0F;
        payload[11] = 0x01;
        payload
    }

    #[test]
    fn parse_extracts_buttons_and_sticks() {
        let report = InputReport::parse(&report_payload()).unwrap();
        assert_eq!(report.buttons, 0x80010D);
        assert_eq!(report.left_stick, (0x53, 240));
        assert_eq!(report.right_stick, (0xFF, 255));
    }

    #[test]
    fn parse_rejects_short_payload() {
        assert!(InputReport::parse(&[0x30, 0, 0]).is_none());
        assert!(InputReport::parse(&report_payload()[..11]).is_none());
    }

    #[test]
    fn identity_reads_descending_field() {
        // Field bytes on the wire, ascending offsets; address is the
        // reverse of the 6 high bytes.
        let payload = [0x99, 0x66, 0x55, 0x44, 0x33, 0x22, 0x7C];
        let addr = parse_identity(&payload).unwrap();
        assert_eq!(addr.0, [0x7C, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(addr.prefix(), 0x7C);
        // The 7th field byte never lands in the address.
        assert!(!addr.0.contains(&0x99));
    }

    #[test]
    fn identity_rejects_short_payload() {
        assert!(parse_identity(&[0x01, 0x02, 0x03]).is_none());
    }

    #[test]
    fn address_display() {
        let addr = HwAddress([0x7C, 0xBB, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(addr.to_string(), "7C:BB:01:02:03:04");
    }
}
