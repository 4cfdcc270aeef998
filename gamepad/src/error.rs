/*!
Common error types for the gamepad library.

Only transport failures are error values here. Malformed packets (wrong size,
bad marker, wrong device id, checksum mismatch) are an expected, frequent
condition on a fire-and-forget UDP link and are handled as a boolean
validation outcome inside the receive loop, never as an error.
*/

use thiserror::Error;

/// Common result type used throughout the gamepad library
pub type Result<T> = std::result::Result<T, GamepadError>;

/// Error type for gamepad operations
#[derive(Error, Debug)]
pub enum GamepadError {
    /// Socket bind or receive failure; fatal to the receiver and not retried
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}
