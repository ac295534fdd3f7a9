use log::debug;
use thiserror::Error;

use crate::bitbuffer::BitReader;
use crate::encoder::CompressedBlock;
use crate::window::{Window, LEADING_FIELD_BITS, SPAN_FIELD_BITS};

/// Error type for decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A declared field (the first sample, a length field, or window
    /// payload bits) extends past the end of the stream.
    #[error("compressed stream ended inside a declared field")]
    TruncatedStream,
    /// A new-window declaration spans more than 64 bits. The encoder can
    /// never produce this; the two 6-bit fields can still express it.
    #[error("declared window exceeds 64 bits (leading {leading}, span {span})")]
    InvalidWindow {
        /// Declared leading-zero count.
        leading: u8,
        /// Declared span length.
        span: u8,
    },
}

/// Decompresses an XOR-delta bit stream back into the original samples.
///
/// The output is bit-identical to the sequence that was compressed,
/// element for element.
///
/// # Errors
///
/// Returns [`DecodeError::TruncatedStream`] if the stream ends inside a
/// declared field, or [`DecodeError::InvalidWindow`] on a window
/// declaration no encoder can produce.
///
/// # Example
/// ```
/// let samples = [0.0, 0.1, 0.80566, 0.80566, 0.80567];
/// let block = fxor::compress(&samples).unwrap();
/// let restored = fxor::decompress(&block).unwrap();
/// assert_eq!(restored, samples);
/// ```
pub fn decompress(block: &CompressedBlock) -> Result<Vec<f64>, DecodeError> {
    Decoder::decode(block)
}

/// The XOR-delta decompressor.
///
/// Mirrors the encoder exactly: it maintains the same chain value and the
/// same meaningful-bit window, advanced by the control and mode bits read
/// inline. There is no end marker — decoding stops when the stream's bit
/// count is exhausted.
pub struct Decoder;

impl Decoder {
    /// Decodes all samples from a `CompressedBlock`.
    pub fn decode(block: &CompressedBlock) -> Result<Vec<f64>, DecodeError> {
        let mut reader = BitReader::from_raw(&block.bytes, block.total_bits);
        let values = Self::decode_from_reader(&mut reader, block.count as usize)?;
        debug!(
            "decompressed {} samples from {} bits",
            values.len(),
            block.total_bits
        );
        Ok(values)
    }

    /// Decodes all samples from raw bytes plus the total bit count the
    /// caller tracked alongside them.
    pub fn decode_raw(bytes: &[u8], total_bits: usize) -> Result<Vec<f64>, DecodeError> {
        let mut reader = BitReader::from_raw(bytes, total_bits);
        Self::decode_from_reader(&mut reader, 0)
    }

    fn decode_from_reader(
        reader: &mut BitReader<'_>,
        count_hint: usize,
    ) -> Result<Vec<f64>, DecodeError> {
        let mut values = Vec::with_capacity(count_hint.max(1));

        // First sample: an unconditional 64-bit pattern.
        let first = reader
            .read_bits(64)
            .ok_or(DecodeError::TruncatedStream)?;
        let mut prev_bits = first;
        let mut window = Window::default();
        values.push(f64::from_bits(first));

        while !reader.is_exhausted() {
            let changed = reader.read_bit().ok_or(DecodeError::TruncatedStream)?;
            if !changed {
                // Zero delta: the previous value repeats.
                values.push(f64::from_bits(prev_bits));
                continue;
            }

            let declares_window = reader.read_bit().ok_or(DecodeError::TruncatedStream)?;
            if declares_window {
                let leading = reader
                    .read_bits(LEADING_FIELD_BITS)
                    .ok_or(DecodeError::TruncatedStream)? as u8;
                let raw_span = reader
                    .read_bits(SPAN_FIELD_BITS)
                    .ok_or(DecodeError::TruncatedStream)? as u8;
                let span = Window::span_from_field(raw_span);
                if leading as u16 + span as u16 > 64 {
                    return Err(DecodeError::InvalidWindow { leading, span });
                }
                window = Window::new(leading, 64 - leading - span);
            }

            // With mode 0 the previous window is reused verbatim; either way
            // the payload occupies the window's span.
            let meaningful = reader
                .read_bits(window.span())
                .ok_or(DecodeError::TruncatedStream)?;
            prev_bits ^= meaningful << window.trailing;
            values.push(f64::from_bits(prev_bits));
        }

        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitbuffer::BitBuffer;
    use crate::encoder::compress;

    fn assert_bit_identical(a: &[f64], b: &[f64]) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_roundtrip_basic() {
        let input = [12.0, 12.5, 13.0, 11.5, 12.0];
        let block = compress(&input).unwrap();
        assert_bit_identical(&decompress(&block).unwrap(), &input);
    }

    #[test]
    fn test_roundtrip_single() {
        let input = [99.99];
        let block = compress(&input).unwrap();
        assert_bit_identical(&decompress(&block).unwrap(), &input);
    }

    #[test]
    fn test_roundtrip_identical_values() {
        let input = [42.0; 100];
        let block = compress(&input).unwrap();
        assert_bit_identical(&decompress(&block).unwrap(), &input);
    }

    #[test]
    fn test_decode_raw_matches_decode() {
        let input = [1.0, 2.0, 4.0, 8.0];
        let block = compress(&input).unwrap();
        let via_raw = Decoder::decode_raw(&block.bytes, block.total_bits).unwrap();
        assert_bit_identical(&via_raw, &decompress(&block).unwrap());
    }

    #[test]
    fn test_empty_stream_is_truncated() {
        let err = Decoder::decode_raw(&[], 0).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedStream);
    }

    #[test]
    fn test_stream_shorter_than_first_sample() {
        let bytes = [0u8; 8];
        let err = Decoder::decode_raw(&bytes, 63).unwrap_err();
        assert_eq!(err, DecodeError::TruncatedStream);
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        // Header, control 1, mode 1, leading 63, span 10: 63 + 10 > 64.
        let mut buf = BitBuffer::new();
        buf.write_bits(0, 64);
        buf.write_bit(true);
        buf.write_bit(true);
        buf.write_bits(63, LEADING_FIELD_BITS);
        buf.write_bits(10, SPAN_FIELD_BITS);
        buf.write_bits(0x3FF, 10);

        let err = Decoder::decode_raw(buf.as_bytes(), buf.len_bits()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidWindow {
                leading: 63,
                span: 10
            }
        );
    }
}
