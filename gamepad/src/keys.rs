/*!
Decoded key-state types.

Each device family decodes into its own flat key-state record. Buttons carry a
[`KeyStatus`]; joystick axes are normalized floats in [-1.0, 1.0]. Records are
plain `Copy` values so the receiver can publish them wholesale and readers can
take full snapshots without holding any lock across field accesses.
*/

use serde::{Deserialize, Serialize};

/// Pressed/released status of a single button
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum KeyStatus {
    #[default]
    Released = 0,
    Pressed = 1,
}

impl KeyStatus {
    /// Map a raw channel value to a button status (non-zero means pressed)
    pub fn from_channel(value: i16) -> Self {
        if value != 0 {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    /// Check if this button is pressed
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }

    /// Label index for this status (0 = released, 1 = pressed)
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Decoded key state for the Retroid (Lite3) gamepad.
///
/// `value` packs the non-zero test of every raw channel into successive bits,
/// least-significant bit first, for compact transmission to other subsystems.
/// `up`/`down`/`left`/`right` are derived from the left stick hitting its
/// exact extremes, not from dedicated channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetroidKeys {
    pub value: u16,

    pub a: KeyStatus,
    pub b: KeyStatus,
    pub x: KeyStatus,
    pub y: KeyStatus,
    pub l1: KeyStatus,
    pub l2: KeyStatus,
    pub r1: KeyStatus,
    pub r2: KeyStatus,
    pub select: KeyStatus,
    pub start: KeyStatus,
    pub left_axis_button: KeyStatus,
    pub right_axis_button: KeyStatus,

    pub up: KeyStatus,
    pub down: KeyStatus,
    pub left: KeyStatus,
    pub right: KeyStatus,

    pub left_axis_x: f32,
    pub left_axis_y: f32,
    pub right_axis_x: f32,
    pub right_axis_y: f32,
}

/// Decoded key state for the Skydroid X30 transmitter.
///
/// The X30 reports its multi-position switches as raw channel values rather
/// than booleans, so `sw1`..`sw4` are exposed verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkydroidKeys {
    pub a: KeyStatus,
    pub b: KeyStatus,
    pub c: KeyStatus,
    pub d: KeyStatus,
    pub e: KeyStatus,
    pub f: KeyStatus,
    pub reserved: KeyStatus,
    pub right: KeyStatus,

    pub sw1: i16,
    pub sw2: i16,
    pub sw3: i16,
    pub sw4: i16,

    pub left_axis_x: f32,
    pub left_axis_y: f32,
    pub right_axis_x: f32,
    pub right_axis_y: f32,
}

/// Ordered pair of display strings for button status; index 0 = released,
/// index 1 = pressed. Built once at startup, indexed by [`KeyStatus::index`].
#[derive(Debug, Clone)]
pub struct ButtonLabels {
    labels: [String; 2],
}

impl ButtonLabels {
    /// ANSI-colored labels centered to 20 columns (white released, green
    /// pressed), matching the terminal presentation layer's cell width
    pub fn new() -> Self {
        Self {
            labels: [
                format!("\x1b[37m{:^20}\x1b[0m", "released"),
                format!("\x1b[32m{:^20}\x1b[0m", "pressed"),
            ],
        }
    }

    /// Get the label for a button status
    pub fn get(&self, status: KeyStatus) -> &str {
        &self.labels[status.index()]
    }
}

impl Default for ButtonLabels {
    fn default() -> Self {
        Self::new()
    }
}
