//! The merged controller state shared by both half-sessions and the
//! emitter.

use std::sync::Mutex;

use railpad_wire::{HwAddress, InputReport, LEFT_MASK, RIGHT_MASK};

/// Neutral axis sample used when a side has no contribution.
pub const AXIS_NEUTRAL: u8 = 128;

/// Which half of the split controller a session speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    /// Identity not yet resolved; contributes nothing to the merged state.
    Unknown,
}

impl Side {
    /// Resolve a side from the hardware address.
    ///
    /// Heuristic carried over from observed hardware: the reserved vendor
    /// prefix byte `0x7C` marks a right half, anything else a left half.
    /// There is no protocol guarantee behind this mapping.
    pub fn from_address(addr: &HwAddress) -> Self {
        if addr.prefix() == 0x7C {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// The subset of the merged button mask this side owns.
    pub const fn button_mask(self) -> u32 {
        match self {
            Side::Left => LEFT_MASK,
            Side::Right => RIGHT_MASK,
            Side::Unknown => 0,
        }
    }
}

/// A point-in-time snapshot of the merged state, taken by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerFrame {
    /// Merged 24-bit button field.
    pub buttons: u32,
    pub left_stick: (u8, u8),
    pub right_stick: (u8, u8),
}

#[derive(Debug)]
struct StateInner {
    buttons: u32,
    left_stick: (u8, u8),
    right_stick: (u8, u8),
}

/// The merged view of both half-controllers.
///
/// One exclusive lock guards the whole struct. Writers clear only their own
/// side's button subset before OR-ing in fresh bits, so a report from one
/// side can never disturb the other side's last-known state. No I/O happens
/// under the lock.
#[derive(Debug)]
pub struct SharedControllerState {
    inner: Mutex<StateInner>,
}

impl Default for SharedControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedControllerState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StateInner {
                buttons: 0,
                left_stick: (AXIS_NEUTRAL, AXIS_NEUTRAL),
                right_stick: (AXIS_NEUTRAL, AXIS_NEUTRAL),
            }),
        }
    }

    /// Merge one side's input report.
    ///
    /// A session with an unresolved side contributes nothing.
    pub fn apply_report(&self, side: Side, report: &InputReport) {
        let mask = side.button_mask();
        if mask == 0 {
            return;
        }

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.buttons &= !mask;
        inner.buttons |= report.buttons & mask;
        match side {
            Side::Left => inner.left_stick = report.left_stick,
            Side::Right => inner.right_stick = report.right_stick,
            Side::Unknown => unreachable!(),
        }
    }

    /// Remove a departing side's contribution so stale buttons and axes do
    /// not latch forever in the merged view.
    pub fn clear_side(&self, side: Side) {
        let mask = side.button_mask();
        if mask == 0 {
            return;
        }

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.buttons &= !mask;
        match side {
            Side::Left => inner.left_stick = (AXIS_NEUTRAL, AXIS_NEUTRAL),
            Side::Right => inner.right_stick = (AXIS_NEUTRAL, AXIS_NEUTRAL),
            Side::Unknown => unreachable!(),
        }
    }

    /// Snapshot the merged state.
    pub fn snapshot(&self) -> ControllerFrame {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        ControllerFrame {
            buttons: inner.buttons,
            left_stick: inner.left_stick,
            right_stick: inner.right_stick,
        }
    }
}
