/*!
Retroid (Lite3) protocol decoder.

The Retroid transmitter reports 16 channels: four joystick axes followed by
twelve discrete buttons. The d-pad directions are not channels of their own;
they are derived from the left stick hitting its exact extremes.
*/

use crate::keys::{KeyStatus, RetroidKeys};
use crate::protocol::{axis, direction_from_axis, pack_channel_bits, PacketLayout, Protocol};

/// Start marker of the Retroid telemetry stream
pub const RETROID_MARKER: [u8; 2] = [0x55, 0xAA];

/// Device-type identifier byte
pub const RETROID_DEVICE_ID: u8 = 0x01;

/// Channels per packet: 4 axes + 12 buttons
pub const RETROID_CHANNELS: usize = 16;

/// Maximum magnitude of a raw axis channel value
pub const RETROID_JOYSTICK_RANGE: i16 = 100;

/// Wire layout of a Retroid packet
pub const RETROID_LAYOUT: PacketLayout<RETROID_CHANNELS> =
    PacketLayout::new(RETROID_MARKER, RETROID_DEVICE_ID);

// Channel order as declared by the transmitter
const CH_LEFT_X: usize = 0;
const CH_LEFT_Y: usize = 1;
const CH_RIGHT_X: usize = 2;
const CH_RIGHT_Y: usize = 3;
const CH_A: usize = 4;
const CH_B: usize = 5;
const CH_X: usize = 6;
const CH_Y: usize = 7;
const CH_L1: usize = 8;
const CH_L2: usize = 9;
const CH_R1: usize = 10;
const CH_R2: usize = 11;
const CH_SELECT: usize = 12;
const CH_START: usize = 13;
const CH_LEFT_AXIS_BTN: usize = 14;
const CH_RIGHT_AXIS_BTN: usize = 15;

/// Retroid protocol decoder
pub struct Retroid;

impl Protocol for Retroid {
    const PACKET_SIZE: usize = PacketLayout::<RETROID_CHANNELS>::PACKET_SIZE;

    type Keys = RetroidKeys;

    fn is_valid(raw: &[u8]) -> bool {
        RETROID_LAYOUT.is_valid(raw)
    }

    fn decode(raw: &[u8]) -> RetroidKeys {
        let ch = RETROID_LAYOUT.channels(raw);
        let range = RETROID_JOYSTICK_RANGE;

        RetroidKeys {
            value: pack_channel_bits(&ch),

            a: KeyStatus::from_channel(ch[CH_A]),
            b: KeyStatus::from_channel(ch[CH_B]),
            x: KeyStatus::from_channel(ch[CH_X]),
            y: KeyStatus::from_channel(ch[CH_Y]),
            l1: KeyStatus::from_channel(ch[CH_L1]),
            l2: KeyStatus::from_channel(ch[CH_L2]),
            r1: KeyStatus::from_channel(ch[CH_R1]),
            r2: KeyStatus::from_channel(ch[CH_R2]),
            select: KeyStatus::from_channel(ch[CH_SELECT]),
            start: KeyStatus::from_channel(ch[CH_START]),
            left_axis_button: KeyStatus::from_channel(ch[CH_LEFT_AXIS_BTN]),
            right_axis_button: KeyStatus::from_channel(ch[CH_RIGHT_AXIS_BTN]),

            // D-pad directions fire only at the exact mapped extreme of the
            // left stick; the opposite extreme reports released
            left: direction_from_axis(ch[CH_LEFT_X], -range),
            right: direction_from_axis(ch[CH_LEFT_X], range),
            up: direction_from_axis(ch[CH_LEFT_Y], range),
            down: direction_from_axis(ch[CH_LEFT_Y], -range),

            left_axis_x: axis(ch[CH_LEFT_X], range),
            left_axis_y: axis(ch[CH_LEFT_Y], range),
            right_axis_x: axis(ch[CH_RIGHT_X], range),
            right_axis_y: axis(ch[CH_RIGHT_Y], range),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(channels: [i16; RETROID_CHANNELS]) -> Vec<u8> {
        RETROID_LAYOUT.encode(&channels)
    }

    #[test]
    fn test_valid_packet_accepted() {
        let raw = packet([0; RETROID_CHANNELS]);
        assert_eq!(raw.len(), Retroid::PACKET_SIZE);
        assert!(Retroid::is_valid(&raw));
    }

    #[test]
    fn test_axes_normalized() {
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[0] = RETROID_JOYSTICK_RANGE;
        ch[1] = -RETROID_JOYSTICK_RANGE;
        ch[2] = RETROID_JOYSTICK_RANGE / 2;
        ch[3] = 0;

        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.left_axis_x, 1.0);
        assert_eq!(keys.left_axis_y, -1.0);
        assert_eq!(keys.right_axis_x, 0.5);
        assert_eq!(keys.right_axis_y, 0.0);
    }

    #[test]
    fn test_buttons_from_channels() {
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[4] = 1; // a
        ch[9] = 1; // l2
        ch[13] = 1; // start

        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.a, KeyStatus::Pressed);
        assert_eq!(keys.l2, KeyStatus::Pressed);
        assert_eq!(keys.start, KeyStatus::Pressed);
        assert_eq!(keys.b, KeyStatus::Released);
        assert_eq!(keys.select, KeyStatus::Released);
    }

    #[test]
    fn test_directional_buttons_at_extremes() {
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[0] = RETROID_JOYSTICK_RANGE;
        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.right, KeyStatus::Pressed);
        assert_eq!(keys.left, KeyStatus::Released);

        ch[0] = -RETROID_JOYSTICK_RANGE;
        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.left, KeyStatus::Pressed);
        assert_eq!(keys.right, KeyStatus::Released);

        ch[0] = 0;
        ch[1] = RETROID_JOYSTICK_RANGE;
        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.up, KeyStatus::Pressed);
        assert_eq!(keys.down, KeyStatus::Released);

        ch[1] = -RETROID_JOYSTICK_RANGE;
        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.down, KeyStatus::Pressed);
        assert_eq!(keys.up, KeyStatus::Released);
    }

    #[test]
    fn test_directional_buttons_mid_range_released() {
        // Only the two exact extremes fire; anything in between does not
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[0] = RETROID_JOYSTICK_RANGE - 1;
        ch[1] = -(RETROID_JOYSTICK_RANGE - 1);

        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.left, KeyStatus::Released);
        assert_eq!(keys.right, KeyStatus::Released);
        assert_eq!(keys.up, KeyStatus::Released);
        assert_eq!(keys.down, KeyStatus::Released);
    }

    #[test]
    fn test_value_bit_pack() {
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[0] = 50; // bit 0
        ch[4] = 1; // bit 4
        ch[15] = -1; // bit 15

        let keys = Retroid::decode(&packet(ch));
        assert_eq!(keys.value, (1 << 0) | (1 << 4) | (1 << 15));
    }

    #[test]
    fn test_decode_idempotent() {
        let mut ch = [0i16; RETROID_CHANNELS];
        ch[0] = -RETROID_JOYSTICK_RANGE;
        ch[5] = 1;
        let raw = packet(ch);

        assert_eq!(Retroid::decode(&raw), Retroid::decode(&raw));
    }

    #[test]
    fn test_corrupted_packet_rejected() {
        let mut raw = packet([7; RETROID_CHANNELS]);
        raw[6] ^= 0x40;
        assert!(!Retroid::is_valid(&raw));
    }

    #[test]
    fn test_truncated_packet_rejected() {
        let raw = packet([0; RETROID_CHANNELS]);
        for len in 0..raw.len() {
            assert!(!Retroid::is_valid(&raw[..len]), "length {}", len);
        }
    }
}
