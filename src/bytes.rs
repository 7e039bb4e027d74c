//! # Word and Bit Packing
//!
//! Conversions between the wire representation of Modbus data and the typed
//! values handed to callers.
//!
//! ## Words
//!
//! Registers travel as big-endian 16-bit words:
//! `[0x04D2, 0x000A]` ↔ `[0x04, 0xD2, 0x00, 0x0A]`.
//!
//! A trailing odd byte becomes the low-order byte of one final word:
//! `[0x04, 0xD2, 0x0A]` → `[0x04D2, 0x000A]`.
//!
//! ## Bits
//!
//! Coils and discrete inputs travel packed eight per byte, least significant
//! bit first. Unused high-order bits of the last byte are zero.

// ============================================================================
// Word Conversions
// ============================================================================

/// Encode words as big-endian bytes, two per word, in input order.
///
/// # Example
///
/// ```rust
/// use voltage_modbus_master::bytes::words_to_bytes;
///
/// assert_eq!(words_to_bytes(&[5, 0x1234]), vec![0x00, 0x05, 0x12, 0x34]);
/// ```
#[inline]
pub fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

/// Decode big-endian bytes into words.
///
/// An odd trailing byte is taken as the low-order byte of a final word.
///
/// # Example
///
/// ```rust
/// use voltage_modbus_master::bytes::bytes_to_words;
///
/// assert_eq!(bytes_to_words(&[0x04, 0xD2, 0x0A]), vec![1234, 10]);
/// ```
#[inline]
pub fn bytes_to_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|chunk| match chunk {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            _ => u16::from(chunk[0]),
        })
        .collect()
}

// ============================================================================
// Bit Conversions
// ============================================================================

/// Pack booleans LSB-first, eight per byte.
///
/// # Example
///
/// ```rust
/// use voltage_modbus_master::bytes::pack_bits;
///
/// assert_eq!(pack_bits(&[true, false, true]), vec![0b0000_0101]);
/// ```
pub fn pack_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            chunk
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| if bit { byte | (1 << i) } else { byte })
        })
        .collect()
}

/// Unpack `count` booleans LSB-first from `bytes`.
///
/// Returns at most `8 * bytes.len()` values; callers check the length when
/// they need exactly `count`.
pub fn unpack_bits(bytes: &[u8], count: usize) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).map(move |bit| byte & (1 << bit) != 0))
        .take(count)
        .collect()
}

/// Number of bytes needed to carry `count` packed bits.
#[inline]
pub fn packed_len(count: usize) -> usize {
    count.div_ceil(8)
}

// ============================================================================
// Tests
// ============================================================================
