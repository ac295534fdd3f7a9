use log::debug;
use thiserror::Error;

use crate::bitbuffer::BitBuffer;
use crate::window::{Window, LEADING_FIELD_BITS, SPAN_FIELD_BITS};

/// Error type for compression failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressError {
    /// The input slice contained no samples. The stream format has no way
    /// to represent an empty sequence — the first 64 bits are always a
    /// sample.
    #[error("cannot compress an empty sample sequence")]
    EmptyInput,
}

/// Compresses a sequence of doubles into an XOR-delta bit stream.
///
/// The round-trip through [`decompress`](crate::decompress) is bit-exact:
/// negative zero, infinities and NaN payloads all survive unchanged.
///
/// # Errors
///
/// Returns [`CompressError::EmptyInput`] if `values` is empty.
///
/// # Example
/// ```
/// let block = fxor::compress(&[42.0, 42.5, 42.5]).unwrap();
/// assert_eq!(block.count, 3);
/// ```
pub fn compress(values: &[f64]) -> Result<CompressedBlock, CompressError> {
    if values.is_empty() {
        return Err(CompressError::EmptyInput);
    }
    let mut encoder = Encoder::new();
    for &value in values {
        encoder.encode(value);
    }
    let block = encoder.into_compressed();
    debug!(
        "compressed {} samples into {} bits ({:.2} bits/sample)",
        block.count,
        block.total_bits,
        block.total_bits as f64 / block.count as f64
    );
    Ok(block)
}

/// The XOR-delta compressor.
///
/// Each sample is XORed with its predecessor's bit pattern. A zero delta
/// costs a single bit; a non-zero delta is written either through the
/// previous meaningful-bit window (when it still fits) or through a freshly
/// declared one.
///
/// # Example
/// ```
/// use fxor::Encoder;
///
/// let mut encoder = Encoder::new();
/// encoder.encode(12.0);
/// encoder.encode(12.5);
/// encoder.encode(12.5);
///
/// let block = encoder.into_compressed();
/// assert_eq!(block.count, 3);
/// ```
pub struct Encoder {
    buf: BitBuffer,
    /// Number of samples encoded so far.
    count: u64,
    /// Previous sample as raw bits — the XOR base for the next delta.
    prev_bits: u64,
    /// Meaningful-bit window of the last "new window" encoding.
    window: Window,
}

impl Encoder {
    /// Creates a new `Encoder`.
    pub fn new() -> Self {
        Self {
            buf: BitBuffer::with_capacity(128),
            count: 0,
            prev_bits: 0,
            window: Window::default(),
        }
    }

    /// Encodes one sample into the compressed stream.
    pub fn encode(&mut self, value: f64) {
        let bits = value.to_bits();
        if self.count == 0 {
            // First sample: the full 64-bit pattern, no control bit.
            self.buf.write_bits(bits, 64);
        } else {
            self.encode_delta(bits ^ self.prev_bits);
        }
        self.prev_bits = bits;
        self.count += 1;
    }

    /// Returns the number of samples encoded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns a reference to the underlying `BitBuffer`.
    pub fn buffer(&self) -> &BitBuffer {
        &self.buf
    }

    /// Consumes the encoder and returns the compressed stream.
    pub fn into_compressed(self) -> CompressedBlock {
        CompressedBlock {
            total_bits: self.buf.len_bits(),
            bytes: self.buf.into_bytes(),
            count: self.count,
        }
    }

    /// Encodes the XOR of a sample with its predecessor:
    ///
    /// 1. Zero delta: a single `0` bit.
    /// 2. Otherwise a `1` control bit, then:
    ///    a. mode `0` — the delta fits the previous window; write the bits
    ///       of that window verbatim.
    ///    b. mode `1` — declare a new window: 6-bit leading-zero count,
    ///       6-bit span length, then the span bits.
    fn encode_delta(&mut self, delta: u64) {
        if delta == 0 {
            self.buf.write_bit(false);
            return;
        }
        self.buf.write_bit(true);

        let leading = delta.leading_zeros() as u8;
        let trailing = delta.trailing_zeros() as u8;

        if self.window.fits(leading, trailing) {
            // Reuse path. The delta's span may be narrower than the window;
            // the extra high-order bits are simply zero.
            self.buf.write_bit(false);
            let span = self.window.span();
            self.buf
                .write_bits((delta >> self.window.trailing) & bitmask(span), span);
        } else {
            self.buf.write_bit(true);
            let span = 64 - leading - trailing;
            self.buf.write_bits(leading as u64, LEADING_FIELD_BITS);
            // A full 64-bit span wraps to 0 in the 6-bit field; the decoder
            // maps it back. A true span of 0 cannot occur here.
            self.buf
                .write_bits(Window::span_to_field(span), SPAN_FIELD_BITS);
            self.buf.write_bits((delta >> trailing) & bitmask(span), span);

            self.window = Window::new(leading, trailing);
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a bitmask with the lowest `n` bits set. Handles `n == 64`
/// without overflow.
#[inline]
fn bitmask(n: u8) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// A compressed block of XOR-delta encoded samples.
///
/// The stream has no terminator, so `total_bits` is part of the format:
/// decoding stops exactly when that many bits have been consumed. Trailing
/// padding in the final byte is never interpreted.
#[derive(Debug, Clone)]
pub struct CompressedBlock {
    /// The compressed byte data.
    pub bytes: Vec<u8>,
    /// Total number of valid bits in `bytes`.
    pub total_bits: usize,
    /// Number of samples in this block.
    pub count: u64,
}
