//! CRC-16 checksum for telemetry packets.
//!
//! The transmitter firmware appends a CRC-16/MODBUS checksum over the payload
//! region of every packet; the same routine is used here both to validate
//! received packets and to construct packets in tests and simulators.

use crc::{Crc, CRC_16_MODBUS};

/// CRC-16/MODBUS calculator with 256-entry lookup table.
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Calculate the CRC-16 checksum of a byte slice.
#[inline]
#[must_use]
pub fn compute_crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_known_vector() {
        // CRC-16/MODBUS check value from the catalogue of parametrised CRCs
        assert_eq!(compute_crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_crc16_empty() {
        // Empty payload yields the initial value
        assert_eq!(compute_crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_crc16_detects_single_byte_corruption() {
        let payload = [0x12u8, 0x34, 0x56, 0x78, 0x9A, 0xBC];
        let good = compute_crc16(&payload);

        for i in 0..payload.len() {
            let mut corrupted = payload;
            corrupted[i] ^= 0x01;
            assert_ne!(compute_crc16(&corrupted), good, "flip at byte {}", i);
        }
    }

    #[test]
    fn test_crc16_deterministic() {
        let payload = [0xDEu8, 0xAD, 0xBE, 0xEF];
        assert_eq!(compute_crc16(&payload), compute_crc16(&payload));
    }
}
