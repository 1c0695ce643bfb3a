use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::warn;

use crate::error::{Result, WireError};

/// Initial block: magic (3) + total length (1) + reserved (1).
pub const INITIAL_SIZE: usize = 5;

/// Full header: initial block + command (1) + data (5) + checksum (1).
pub const HEADER_SIZE: usize = 12;

/// Frame magic.
pub const MAGIC: [u8; 3] = [0x19, 0x01, 0x03];

/// Largest frame the protocol can describe (one-byte length field plus the
/// initial block).
pub const MAX_FRAME_SIZE: usize = INITIAL_SIZE + u8::MAX as usize;

// total length = command + data + checksum (+ payload)
const MIN_TOTAL: usize = 7;

/// A parsed frame.
///
/// The byte at frame offset 11 is a vendor checksum whose algorithm is
/// undocumented; no known implementation validates it, so it is skipped on
/// decode and written as zero on encode. The fixed outbound frames in
/// [`frames`](crate::frames) carry their captured values verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Top-level command id.
    pub command: u8,
    /// The 5 command-specific header data bytes.
    pub data: [u8; 5],
    /// Variable sub-payload for extended commands (may be empty).
    pub payload: Bytes,
}

impl Packet {
    /// Create a packet with no sub-payload.
    pub fn new(command: u8, data: [u8; 5]) -> Self {
        Self {
            command,
            data,
            payload: Bytes::new(),
        }
    }

    /// Create a packet with a sub-payload.
    pub fn with_payload(command: u8, data: [u8; 5], payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            data,
            payload: payload.into(),
        }
    }

    /// The total wire size of this packet.
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a packet into the wire format, appending to `dst`.
pub fn encode_packet(packet: &Packet, dst: &mut BytesMut) -> Result<()> {
    let total = MIN_TOTAL + packet.payload.len();
    if total > u8::MAX as usize {
        return Err(WireError::PayloadTooLarge {
            size: packet.payload.len(),
            max: u8::MAX as usize - MIN_TOTAL,
        });
    }

    dst.reserve(INITIAL_SIZE + total);
    dst.put_slice(&MAGIC);
    dst.put_u8(total as u8);
    dst.put_u8(0x00);
    dst.put_u8(packet.command);
    dst.put_slice(&packet.data);
    // Opaque vendor checksum slot; nothing validates it.
    dst.put_u8(0x00);
    dst.put_slice(&packet.payload);
    Ok(())
}

/// Decode one packet from the front of `src`.
///
/// Returns `Ok(None)` if the buffer does not yet hold a complete frame; the
/// partial frame stays in the buffer for the next read. On bad magic or an
/// undecodable length nothing is consumed and the caller must resynchronize.
pub fn decode_packet(src: &mut BytesMut) -> Result<Option<Packet>> {
    if src.len() < INITIAL_SIZE {
        return Ok(None);
    }

    if src[0..3] != MAGIC {
        return Err(WireError::InvalidMagic);
    }

    let total = src[3] as usize;
    if total < MIN_TOTAL {
        return Err(WireError::InvalidLength { declared: total });
    }

    let frame_len = INITIAL_SIZE + total;
    if src.len() < frame_len {
        return Ok(None);
    }

    let command = src[5];
    let mut data = [0u8; 5];
    data.copy_from_slice(&src[6..11]);

    src.advance(HEADER_SIZE);
    let payload = src.split_to(frame_len - HEADER_SIZE).freeze();

    Ok(Some(Packet {
        command,
        data,
        payload,
    }))
}

/// Accumulates pushed bytes and yields decoded packets.
///
/// Malformed input is logged and dropped here so that no decode error ever
/// propagates into the receive path. After a malformed prefix the buffer is
/// resynchronized on the next magic occurrence, so valid frames queued
/// behind garbage still come out. Observed traffic delivers one complete
/// frame per push, but nothing here depends on that.
#[derive(Debug, Default)]
pub struct Deframer {
    buf: BytesMut,
}

impl Deframer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append freshly received bytes.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Take the next complete packet, if any.
    pub fn next_packet(&mut self) -> Option<Packet> {
        loop {
            match decode_packet(&mut self.buf) {
                Ok(packet) => return packet,
                Err(err) => {
                    warn!("dropping malformed bytes: {err}");
                    if !self.resync() {
                        return None;
                    }
                }
            }
        }
    }

    /// Drop the malformed prefix up to the next possible frame start.
    ///
    /// Returns false when no magic (or magic prefix at the tail) remains
    /// and the buffer was cleared.
    fn resync(&mut self) -> bool {
        for i in 1..self.buf.len() {
            let candidate = &self.buf[i..(i + MAGIC.len()).min(self.buf.len())];
            if candidate == &MAGIC[..candidate.len()] {
                self.buf.advance(i);
                return true;
            }
        }
        self.buf.clear();
        false
    }

    /// Bytes currently buffered waiting for a complete frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
