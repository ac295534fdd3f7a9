//! # fxor
//!
//! Lossless, bit-exact compression for sequences of IEEE 754 doubles, using
//! the XOR-delta value scheme from *"Gorilla: A Fast, Scalable, In-Memory
//! Time Series Database"* (VLDB 2015).
//!
//! ## Algorithm overview
//!
//! Adjacent samples in slowly changing data share most of their bit
//! pattern, so the XOR of two consecutive bit patterns is mostly zeros.
//! The codec exploits this three ways:
//!
//! - An unchanged value costs a single `0` bit.
//! - A changed value whose XOR fits the previously declared
//!   leading/trailing-zero window stores only the bits of that window.
//! - Otherwise a new window is declared: a 6-bit leading-zero count, a
//!   6-bit span length, and the span bits themselves.
//!
//! Samples are always handled through their raw 64-bit patterns, never
//! compared arithmetically, so negative zero, infinities and NaNs with
//! arbitrary payloads round-trip exactly.
//!
//! The compressed stream has no framing and no terminator: its length in
//! bits is tracked alongside the bytes in [`CompressedBlock`], and the
//! decoder consumes exactly that many bits.
//!
//! ## Example
//!
//! ```rust
//! let samples = [0.0, 0.1, 0.80566, 0.80566, 0.80567];
//!
//! let block = fxor::compress(&samples).unwrap();
//! println!(
//!     "compressed {} samples into {} bits",
//!     block.count, block.total_bits
//! );
//!
//! let restored = fxor::decompress(&block).unwrap();
//! assert_eq!(restored, samples);
//! ```

pub mod bitbuffer;
pub mod decoder;
pub mod encoder;
pub mod window;

// Re-export the primary surface at the crate root.
pub use decoder::{decompress, DecodeError, Decoder};
pub use encoder::{compress, CompressError, CompressedBlock, Encoder};
