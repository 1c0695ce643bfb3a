//! Binary frame codec and field layouts for the railpad serial protocol.
//!
//! Every frame after the initial magic marker carries:
//! - A 3-byte magic header for stream synchronization
//! - A 1-byte total length (everything after the 5-byte initial block)
//! - A reserved byte, the command id, 5 command data bytes, a checksum
//! - An optional variable sub-payload for extended commands
//!
//! This crate is pure: no I/O, no timers. The session layer feeds it bytes
//! and sends the fixed frames it exposes.

pub mod buttons;
pub mod codec;
pub mod command;
pub mod error;
pub mod frames;
pub mod report;

pub use buttons::{Button, ALL_MASK, LEFT_MASK, RIGHT_MASK};
pub use codec::{decode_packet, encode_packet, Deframer, Packet, HEADER_SIZE, MAGIC};
pub use command::{
    command_name, init_reply_name, CMD_EXT_REPLY, CMD_EXT_SEND, CMD_HANDSHAKE_ACK, CMD_INIT_REPLY,
    EXT_INPUT_REPORT, INIT_BAUD_RATE, INIT_IDENTITY, INIT_VENDOR_1, INIT_VENDOR_2, INIT_VENDOR_3,
};
pub use error::{Result, WireError};
pub use report::{parse_identity, stick_x, stick_y, HwAddress, InputReport};
