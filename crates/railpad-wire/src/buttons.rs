//! The 24-bit button field and its side-owned partitions.
//!
//! Each half-controller reports the full 24-bit field, but only the bits in
//! its own partition are trustworthy. The two masks are disjoint so a stale
//! report from one side can never disturb the other side's bits.

/// Bits owned by the left half: minus, left stick press, capture, the two
/// unused rail bits, and the top byte (dpad, SL/SR, L, ZL).
pub const LEFT_MASK: u32 = 0x00FF_E900;

/// Bits owned by the right half: the face buttons and triggers in the low
/// byte, plus, right stick press, and home.
pub const RIGHT_MASK: u32 = 0x0000_16FF;

/// Every bit either side can own.
pub const ALL_MASK: u32 = LEFT_MASK | RIGHT_MASK;

/// A logical button of the merged virtual controller.
///
/// Discriminants are the bit positions in the 24-bit field. `Extra4` and
/// `Extra5` are carried on the wire but absent from retail hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Button {
    Y = 0,
    X = 1,
    B = 2,
    A = 3,
    RightSl = 4,
    RightSr = 5,
    R = 6,
    Zr = 7,
    Minus = 8,
    Plus = 9,
    RightStick = 10,
    LeftStick = 11,
    Home = 12,
    Capture = 13,
    Extra4 = 14,
    Extra5 = 15,
    Down = 16,
    Up = 17,
    Right = 18,
    Left = 19,
    LeftSl = 20,
    LeftSr = 21,
    L = 22,
    Zl = 23,
}

impl Button {
    /// Every logical button, in bit order.
    pub const ALL: [Button; 24] = [
        Button::Y,
        Button::X,
        Button::B,
        Button::A,
        Button::RightSl,
        Button::RightSr,
        Button::R,
        Button::Zr,
        Button::Minus,
        Button::Plus,
        Button::RightStick,
        Button::LeftStick,
        Button::Home,
        Button::Capture,
        Button::Extra4,
        Button::Extra5,
        Button::Down,
        Button::Up,
        Button::Right,
        Button::Left,
        Button::LeftSl,
        Button::LeftSr,
        Button::L,
        Button::Zl,
    ];

    /// The button's bit in the 24-bit field.
    pub const fn bit(self) -> u32 {
        1 << (self as u8)
    }

    /// Whether this button is set in `field`.
    pub const fn is_set(self, field: u32) -> bool {
        field & self.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_are_disjoint() {
        assert_eq!(LEFT_MASK & RIGHT_MASK, 0);
    }

    #[test]
    fn masks_cover_all_buttons() {
        let covered: u32 = Button::ALL.iter().map(|b| b.bit()).sum();
        assert_eq!(covered, ALL_MASK);
    }

    #[test]
    fn bit_positions_match_discriminants() {
        assert_eq!(Button::Y.bit(), 0x000001);
        assert_eq!(Button::Minus.bit(), 0x000100);
        assert_eq!(Button::Down.bit(), 0x010000);
        assert_eq!(Button::Zl.bit(), 0x800000);
    }

    #[test]
    fn side_ownership_samples() {
        assert_ne!(LEFT_MASK & Button::Zl.bit(), 0);
        assert_ne!(LEFT_MASK & Button::Minus.bit(), 0);
        assert_ne!(RIGHT_MASK & Button::A.bit(), 0);
        assert_ne!(RIGHT_MASK & Button::Home.bit(), 0);
        assert_eq!(RIGHT_MASK & Button::Capture.bit(), 0);
    }

    #[test]
    fn is_set_reads_field() {
        let field = Button::A.bit() | Button::Up.bit();
        assert!(Button::A.is_set(field));
        assert!(Button::Up.is_set(field));
        assert!(!Button::B.is_set(field));
    }
}
