/*!
Skydroid X30 protocol decoder.

The X30 reports 16 channels: four joystick axes, eight discrete buttons and
four multi-position switches. Switches are exposed as raw channel values;
there is no bit-packed summary and no derived d-pad on this family.
*/

use crate::keys::{KeyStatus, SkydroidKeys};
use crate::protocol::{axis, PacketLayout, Protocol};

/// Start marker of the Skydroid telemetry stream
pub const SKYDROID_MARKER: [u8; 2] = [0x5A, 0xA5];

/// Device-type identifier byte
pub const SKYDROID_DEVICE_ID: u8 = 0x02;

/// Channels per packet: 4 axes + 8 buttons + 4 switches
pub const SKYDROID_CHANNELS: usize = 16;

/// Maximum magnitude of a raw axis channel value
pub const SKYDROID_JOYSTICK_RANGE: i16 = 670;

/// Wire layout of a Skydroid packet
pub const SKYDROID_LAYOUT: PacketLayout<SKYDROID_CHANNELS> =
    PacketLayout::new(SKYDROID_MARKER, SKYDROID_DEVICE_ID);

const CH_LEFT_X: usize = 0;
const CH_LEFT_Y: usize = 1;
const CH_RIGHT_X: usize = 2;
const CH_RIGHT_Y: usize = 3;
const CH_A: usize = 4;
const CH_B: usize = 5;
const CH_C: usize = 6;
const CH_D: usize = 7;
const CH_E: usize = 8;
const CH_F: usize = 9;
const CH_RESERVED: usize = 10;
const CH_RIGHT_BTN: usize = 11;
const CH_SW1: usize = 12;
const CH_SW2: usize = 13;
const CH_SW3: usize = 14;
const CH_SW4: usize = 15;

/// Skydroid protocol decoder
pub struct Skydroid;

impl Protocol for Skydroid {
    const PACKET_SIZE: usize = PacketLayout::<SKYDROID_CHANNELS>::PACKET_SIZE;

    type Keys = SkydroidKeys;

    fn is_valid(raw: &[u8]) -> bool {
        SKYDROID_LAYOUT.is_valid(raw)
    }

    fn decode(raw: &[u8]) -> SkydroidKeys {
        let ch = SKYDROID_LAYOUT.channels(raw);
        let range = SKYDROID_JOYSTICK_RANGE;

        SkydroidKeys {
            a: KeyStatus::from_channel(ch[CH_A]),
            b: KeyStatus::from_channel(ch[CH_B]),
            c: KeyStatus::from_channel(ch[CH_C]),
            d: KeyStatus::from_channel(ch[CH_D]),
            e: KeyStatus::from_channel(ch[CH_E]),
            f: KeyStatus::from_channel(ch[CH_F]),
            reserved: KeyStatus::from_channel(ch[CH_RESERVED]),
            right: KeyStatus::from_channel(ch[CH_RIGHT_BTN]),

            sw1: ch[CH_SW1],
            sw2: ch[CH_SW2],
            sw3: ch[CH_SW3],
            sw4: ch[CH_SW4],

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
    use crate::retroid::{Retroid, RETROID_LAYOUT};

    fn packet(channels: [i16; SKYDROID_CHANNELS]) -> Vec<u8> {
        SKYDROID_LAYOUT.encode(&channels)
    }

    #[test]
    fn test_axes_and_switches() {
        let mut ch = [0i16; SKYDROID_CHANNELS];
        ch[0] = SKYDROID_JOYSTICK_RANGE;
        ch[3] = -SKYDROID_JOYSTICK_RANGE;
        ch[12] = 3;
        ch[15] = -2;

        let keys = Skydroid::decode(&packet(ch));
        assert_eq!(keys.left_axis_x, 1.0);
        assert_eq!(keys.right_axis_y, -1.0);
        assert_eq!(keys.sw1, 3);
        assert_eq!(keys.sw4, -2);
        assert_eq!(keys.sw2, 0);
    }

    #[test]
    fn test_buttons_from_channels() {
        let mut ch = [0i16; SKYDROID_CHANNELS];
        ch[4] = 1; // a
        ch[9] = 1; // f
        ch[11] = 1; // right

        let keys = Skydroid::decode(&packet(ch));
        assert_eq!(keys.a, KeyStatus::Pressed);
        assert_eq!(keys.f, KeyStatus::Pressed);
        assert_eq!(keys.right, KeyStatus::Pressed);
        assert_eq!(keys.b, KeyStatus::Released);
        assert_eq!(keys.reserved, KeyStatus::Released);
    }

    #[test]
    fn test_cross_family_rejection() {
        // A well-formed Retroid packet must not validate as Skydroid and
        // vice versa; the marker check catches cross-talk before the CRC
        let retroid = RETROID_LAYOUT.encode(&[0; 16]);
        let skydroid = SKYDROID_LAYOUT.encode(&[0; 16]);

        assert!(Retroid::is_valid(&retroid));
        assert!(Skydroid::is_valid(&skydroid));
        assert!(!Skydroid::is_valid(&retroid));
        assert!(!Retroid::is_valid(&skydroid));
    }

    #[test]
    fn test_corrupted_packet_rejected() {
        let mut raw = packet([1; SKYDROID_CHANNELS]);
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        assert!(!Skydroid::is_valid(&raw));
    }
}
