//! Payload capacity of a single QR symbol.
//!
//! The numbers here are a practical approximation, not a per-version table:
//! [`MAX_QR_CAPACITY`] is the byte-mode capacity of the largest symbol
//! (version 40) at error-correction level L, and [`BASE64_OVERHEAD`] is the
//! growth of arbitrary bytes once they have been base64-encoded.

/// Largest number of characters a single symbol accepts (version 40, level L).
pub const MAX_QR_CAPACITY: usize = 2953;

/// Size multiplier of base64 text over the raw bytes it encodes (~4/3).
pub const BASE64_OVERHEAD: f64 = 1.33;

/// Capacity limits applied before a payload is handed to the encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    raw_capacity: usize,
    expansion_factor: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(MAX_QR_CAPACITY, BASE64_OVERHEAD)
    }
}

impl Limits {
    pub fn new(raw_capacity: usize, expansion_factor: f64) -> Self {
        Self {
            raw_capacity,
            expansion_factor,
        }
    }

    /// Maximum character count of a text payload embedded as-is.
    pub fn max_text_chars(&self) -> usize {
        self.raw_capacity
    }

    /// Maximum size in bytes of a binary file that still fits once
    /// base64-encoded: `floor(raw_capacity / expansion_factor)`.
    pub fn max_binary_bytes(&self) -> u64 {
        (self.raw_capacity as f64 / self.expansion_factor).floor() as u64
    }
}

/// Render a byte or character count as kilobytes with one decimal place.
pub fn format_kb(size: u64) -> String {
    format!("{:.1} KB", size as f64 / 1024.0)
}
