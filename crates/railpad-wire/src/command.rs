//! Command and sub-command ids.
//!
//! Top-level ids select the handler; extended commands carry a further
//! sub-command id (in the first payload byte for extended replies, in the
//! first header data byte for init replies).

/// Extended command, host to controller.
pub const CMD_EXT_SEND: u8 = 0x91;

/// Extended reply, controller to host (input reports and friends).
pub const CMD_EXT_REPLY: u8 = 0x92;

/// Initialization reply (identity, vendor init acks, baud shift).
pub const CMD_INIT_REPLY: u8 = 0x94;

/// Handshake acknowledgment.
pub const CMD_HANDSHAKE_ACK: u8 = 0xA5;

/// Init-reply sub-command: hardware address report.
pub const INIT_IDENTITY: u8 = 0x01;

/// Init-reply sub-command: line rate shifted to high speed.
pub const INIT_BAUD_RATE: u8 = 0x20;

/// Init-reply sub-commands for the three opaque vendor init frames.
/// Acknowledged and otherwise ignored.
pub const INIT_VENDOR_1: u8 = 0x11;
pub const INIT_VENDOR_2: u8 = 0x10;
pub const INIT_VENDOR_3: u8 = 0x12;

/// Extended-reply sub-command: input report.
pub const EXT_INPUT_REPORT: u8 = 0x30;

/// Returns a human-readable name for a top-level command id.
pub fn command_name(id: u8) -> &'static str {
    match id {
        CMD_EXT_SEND => "EXT_SEND",
        CMD_EXT_REPLY => "EXT_REPLY",
        CMD_INIT_REPLY => "INIT_REPLY",
        CMD_HANDSHAKE_ACK => "HANDSHAKE_ACK",
        _ => "UNKNOWN",
    }
}

/// Returns a human-readable name for an init-reply sub-command id.
pub fn init_reply_name(id: u8) -> &'static str {
    match id {
        INIT_IDENTITY => "IDENTITY",
        INIT_BAUD_RATE => "BAUD_RATE",
        INIT_VENDOR_1 => "VENDOR_1",
        INIT_VENDOR_2 => "VENDOR_2",
        INIT_VENDOR_3 => "VENDOR_3",
        _ => "UNKNOWN",
    }
}
