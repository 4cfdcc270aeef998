/*!
# RC Gamepad Telemetry Library

This crate decodes the periodic UDP telemetry packets broadcast by handheld
radio-control gamepads into a structured, thread-safe snapshot of button and
joystick state.

Two device families are supported:

- [`Retroid`] - the Retroid handheld (Lite3 transmitter)
- [`Skydroid`] - the Skydroid X30 transmitter

## Core Types

- [`GamepadReceiver`] - background UDP reception loop publishing key state
- [`RetroidKeys`] / [`SkydroidKeys`] - decoded per-family key state
- [`KeyStatus`] - pressed/released button status
- [`PacketLayout`] - fixed-size wire packet description

## Modules

- [`crc16`] - packet checksum routine
- [`protocol`] - wire layout, validation and channel extraction
- [`keys`] - decoded key-state types
- [`retroid`] / [`skydroid`] - per-family decoders
- [`receiver`] - threaded UDP receiver
- [`error`] - common error types
*/

pub mod crc16;
pub mod error;
pub mod keys;
pub mod protocol;
pub mod receiver;
pub mod retroid;
pub mod skydroid;

// Re-export commonly used types
pub use error::{GamepadError, Result};
pub use keys::{ButtonLabels, KeyStatus, RetroidKeys, SkydroidKeys};
pub use protocol::{PacketLayout, Protocol};
pub use receiver::GamepadReceiver;
pub use retroid::Retroid;
pub use skydroid::Skydroid;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
