/*!
Wire packet layout, validation and channel extraction.

Every telemetry packet shares the same framing across device families:

```text
[0..2)   start marker (two bytes, unique per family)
[2]      device-type identifier
[3]      payload length in bytes
[4..4+N) payload: N/2 signed little-endian 16-bit channel values
last 2   CRC-16 over the payload region, little-endian
```

Packet and payload sizes are fixed per family, so the channel count is a
const parameter of [`PacketLayout`] and layout/decoder agreement is checked
at definition time rather than at runtime.
*/

use crate::crc16::compute_crc16;
use crate::keys::KeyStatus;

/// Bytes preceding the payload: marker (2) + device id (1) + length (1)
pub const PACKET_PREAMBLE_BYTES: usize = 4;

/// Bytes trailing the payload: little-endian CRC-16
pub const PACKET_CRC_BYTES: usize = 2;

/// Fixed-size wire packet description for one device family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketLayout<const CHANNELS: usize> {
    /// Two-byte start marker distinguishing this family's stream
    pub marker: [u8; 2],
    /// Device-type identifier byte
    pub device_id: u8,
}

impl<const CHANNELS: usize> PacketLayout<CHANNELS> {
    /// Payload size in bytes (two bytes per channel)
    pub const PAYLOAD_SIZE: usize = CHANNELS * 2;

    /// Total packet size in bytes
    pub const PACKET_SIZE: usize = PACKET_PREAMBLE_BYTES + Self::PAYLOAD_SIZE + PACKET_CRC_BYTES;

    /// Create a layout for the given marker and device id
    pub const fn new(marker: [u8; 2], device_id: u8) -> Self {
        Self { marker, device_id }
    }

    /// Validate a raw buffer against this layout.
    ///
    /// Checks, in order: total length, start marker, device id, CRC-16
    /// trailer over the payload region. Short-circuits on the first failure
    /// so the checksum scan only runs on plausible packets. Never panics;
    /// garbled datagrams and cross-talk from other device types are a
    /// normal, frequent outcome here.
    pub fn is_valid(&self, raw: &[u8]) -> bool {
        if raw.len() != Self::PACKET_SIZE {
            return false;
        }
        if raw[0..2] != self.marker {
            return false;
        }
        if raw[2] != self.device_id {
            return false;
        }

        let payload = &raw[PACKET_PREAMBLE_BYTES..PACKET_PREAMBLE_BYTES + Self::PAYLOAD_SIZE];
        let crc = u16::from_le_bytes([raw[Self::PACKET_SIZE - 2], raw[Self::PACKET_SIZE - 1]]);
        crc == compute_crc16(payload)
    }

    /// Extract the channel vector from a validated buffer, in declared
    /// order. Callers must have confirmed [`Self::is_valid`] first.
    pub fn channels(&self, raw: &[u8]) -> [i16; CHANNELS] {
        debug_assert!(self.is_valid(raw), "channels() called on unvalidated packet");

        let mut channels = [0i16; CHANNELS];
        for (i, ch) in channels.iter_mut().enumerate() {
            let at = PACKET_PREAMBLE_BYTES + i * 2;
            *ch = i16::from_le_bytes([raw[at], raw[at + 1]]);
        }
        channels
    }

    /// Build a wire packet from a channel vector; the inverse of
    /// [`Self::channels`]. Used by tests and transmitter simulators.
    pub fn encode(&self, channels: &[i16; CHANNELS]) -> Vec<u8> {
        let mut packet = Vec::with_capacity(Self::PACKET_SIZE);
        packet.extend_from_slice(&self.marker);
        packet.push(self.device_id);
        packet.push(Self::PAYLOAD_SIZE as u8);
        for ch in channels {
            packet.extend_from_slice(&ch.to_le_bytes());
        }
        let crc = compute_crc16(&packet[PACKET_PREAMBLE_BYTES..]);
        packet.extend_from_slice(&crc.to_le_bytes());
        packet
    }
}

/// Per-family protocol decoder.
///
/// A closed set of two implementors ([`crate::Retroid`], [`crate::Skydroid`])
/// shares this seam; the receiver is generic over it rather than dispatching
/// on a device tag at runtime.
pub trait Protocol: Send + 'static {
    /// Fixed total packet size for this family; datagrams of any other
    /// length are discarded before validation
    const PACKET_SIZE: usize;

    /// Decoded key-state shape for this family
    type Keys: Copy + Default + Send + 'static;

    /// Check marker, device id and CRC-16 of a raw datagram
    fn is_valid(raw: &[u8]) -> bool;

    /// Decode a validated datagram into key state.
    ///
    /// Precondition: `is_valid(raw)` returned true. Pure function of the
    /// input bytes.
    fn decode(raw: &[u8]) -> Self::Keys;
}

/// Normalize a raw axis channel against the device's maximum stick range.
///
/// No clamping: the hardware already bounds raw values by the range.
#[inline]
pub(crate) fn axis(raw: i16, range: i16) -> f32 {
    raw as f32 / range as f32
}

/// Directional button derived from a two-way stick axis hitting one exact
/// extreme.
///
/// Only `value == pressed_at` reports pressed; everything else, including the
/// opposite extreme, reports released. This matches the transmitter's
/// observed behavior and is intentionally asymmetric.
#[inline]
pub(crate) fn direction_from_axis(value: i16, pressed_at: i16) -> KeyStatus {
    if value == pressed_at {
        KeyStatus::Pressed
    } else {
        KeyStatus::Released
    }
}

/// Pack each channel's non-zero test into successive bits, LSB first
pub(crate) fn pack_channel_bits(channels: &[i16]) -> u16 {
    debug_assert!(channels.len() <= 16);
    let mut value = 0u16;
    for (i, &ch) in channels.iter().enumerate() {
        if ch != 0 {
            value |= 1 << i;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAYOUT: PacketLayout<4> = PacketLayout::new([0x55, 0xAA], 0x07);

    #[test]
    fn test_packet_size_constants() {
        assert_eq!(PacketLayout::<4>::PAYLOAD_SIZE, 8);
        assert_eq!(PacketLayout::<4>::PACKET_SIZE, 14);
        assert_eq!(PacketLayout::<16>::PACKET_SIZE, 38);
    }

    #[test]
    fn test_encode_validate_roundtrip() {
        let channels = [100i16, -100, 0, 32767];
        let packet = LAYOUT.encode(&channels);

        assert_eq!(packet.len(), PacketLayout::<4>::PACKET_SIZE);
        assert_eq!(packet[3] as usize, PacketLayout::<4>::PAYLOAD_SIZE);
        assert!(LAYOUT.is_valid(&packet));
        assert_eq!(LAYOUT.channels(&packet), channels);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let packet = LAYOUT.encode(&[0; 4]);

        // Any other total length fails the cheap gate before field access
        assert!(!LAYOUT.is_valid(&[]));
        assert!(!LAYOUT.is_valid(&packet[..packet.len() - 1]));
        let mut long = packet.clone();
        long.push(0);
        assert!(!LAYOUT.is_valid(&long));
    }

    #[test]
    fn test_wrong_marker_rejected() {
        let mut packet = LAYOUT.encode(&[1, 2, 3, 4]);
        packet[0] = 0x56;
        assert!(!LAYOUT.is_valid(&packet));
    }

    #[test]
    fn test_wrong_device_id_rejected() {
        let mut packet = LAYOUT.encode(&[1, 2, 3, 4]);
        packet[2] = 0x08;
        assert!(!LAYOUT.is_valid(&packet));
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let packet = LAYOUT.encode(&[1, 2, 3, 4]);
        for i in PACKET_PREAMBLE_BYTES..PACKET_PREAMBLE_BYTES + PacketLayout::<4>::PAYLOAD_SIZE {
            let mut corrupted = packet.clone();
            corrupted[i] ^= 0x01;
            assert!(!LAYOUT.is_valid(&corrupted), "flip at byte {}", i);
        }
    }

    #[test]
    fn test_corrupted_crc_rejected() {
        let mut packet = LAYOUT.encode(&[1, 2, 3, 4]);
        let last = packet.len() - 1;
        packet[last] = packet[last].wrapping_add(1);
        assert!(!LAYOUT.is_valid(&packet));
    }

    #[test]
    fn test_axis_normalization() {
        assert_eq!(axis(100, 100), 1.0);
        assert_eq!(axis(-100, 100), -1.0);
        assert_eq!(axis(50, 100), 0.5);
        assert_eq!(axis(0, 100), 0.0);
    }

    #[test]
    fn test_direction_only_exact_extreme() {
        assert_eq!(direction_from_axis(100, 100), KeyStatus::Pressed);
        assert_eq!(direction_from_axis(-100, 100), KeyStatus::Released);
        assert_eq!(direction_from_axis(99, 100), KeyStatus::Released);
        assert_eq!(direction_from_axis(0, 100), KeyStatus::Released);
        assert_eq!(direction_from_axis(-100, -100), KeyStatus::Pressed);
    }

    #[test]
    fn test_pack_channel_bits() {
        assert_eq!(pack_channel_bits(&[0, 0, 0, 0]), 0b0000);
        assert_eq!(pack_channel_bits(&[1, 0, -5, 0]), 0b0101);
        assert_eq!(pack_channel_bits(&[1; 16]), 0xFFFF);
    }
}
