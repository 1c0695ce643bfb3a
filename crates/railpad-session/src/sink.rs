//! The boundary between the engine and whatever consumes merged input
//! frames.
//!
//! The engine registers one virtual device at startup and pushes complete
//! frames through [`InputSink::emit`]. Implementations decide what a frame
//! becomes: an OS input device, a test recorder, a network message.

use std::time::Duration;

use railpad_wire::Button;

/// Decoded axis range reported by the hardware.
pub const AXIS_MIN: u8 = 32;
pub const AXIS_MAX: u8 = 223;
pub const AXIS_FUZZ: u8 = 0;
pub const AXIS_FLAT: u8 = 4;

/// The four analog axes of the merged controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    LeftX,
    LeftY,
    RightX,
    RightY,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::LeftX, Axis::LeftY, Axis::RightX, Axis::RightY];
}

/// Static description of the virtual device the engine registers.
#[derive(Debug, Clone)]
pub struct DeviceCapabilities {
    pub name: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
    /// Every button the merged device can report.
    pub buttons: &'static [Button],
    /// Every axis, with a shared decoded range.
    pub axes: &'static [Axis],
    pub axis_min: u8,
    pub axis_max: u8,
    pub axis_fuzz: u8,
    pub axis_flat: u8,
    /// Cadence at which frames will arrive.
    pub emit_interval: Duration,
}

impl DeviceCapabilities {
    /// The merged split-pad device as the hardware identifies itself.
    pub fn merged_pad(emit_interval: Duration) -> Self {
        Self {
            name: "Railpad Merged Controller",
            vendor_id: 0x057E,
            product_id: 0x2008,
            version: 0x0100,
            buttons: &Button::ALL,
            axes: &Axis::ALL,
            axis_min: AXIS_MIN,
            axis_max: AXIS_MAX,
            axis_fuzz: AXIS_FUZZ,
            axis_flat: AXIS_FLAT,
            emit_interval,
        }
    }
}

/// The sink rejected device registration.
#[derive(Debug, thiserror::Error)]
#[error("input device registration failed: {reason}")]
pub struct RegistrationError {
    pub reason: String,
}

impl RegistrationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Destination for merged input frames.
///
/// `emit` is synchronous and called from the emitter task on every tick;
/// implementations must not block. Once `emit` returns the frame is
/// considered delivered.
pub trait InputSink: Send + Sync + 'static {
    /// Sink-side identifier for a registered device.
    type Handle: Send + Sync + 'static;

    /// Register the merged virtual device. Called once, before any frame.
    fn register_device(
        &self,
        caps: &DeviceCapabilities,
    ) -> Result<Self::Handle, RegistrationError>;

    /// Deliver one complete frame: the state of every button and axis.
    fn emit(&self, handle: &Self::Handle, buttons: &[(Button, bool)], axes: &[(Axis, u8); 4]);
}
