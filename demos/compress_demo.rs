//! Demonstration driver: compresses a small hard-coded sample array,
//! prints the resulting bit stream and reports the compression factor.
//!
//! Run with `cargo run --example compress_demo`; set `RUST_LOG=debug` to
//! see the library's summary lines.

use fxor::bitbuffer::BitReader;
use fxor::{compress, decompress};

fn main() {
    env_logger::init();

    let samples = [
        0.0, 0.1, 0.80566, 0.80566, 0.80567, 0.8061, 12.0, 24.0, 15.0, 15.5, 14.0, 14.0, 16.0,
        16.5, 18.0, 18.0, 18.0, 18.0, 20.0, 18.0, 14.0, 16.0, 16.0, 16.5, 18.0, 18.0, 18.0, 18.0,
        20.0, 18.0,
    ];

    let block = compress(&samples).expect("non-empty input");
    println!("Length : {}", block.total_bits);

    let mut reader = BitReader::from_raw(&block.bytes, block.total_bits);
    let mut stream = String::with_capacity(block.total_bits);
    while let Some(bit) = reader.read_bit() {
        stream.push(if bit { '1' } else { '0' });
    }
    println!("{stream}");

    let restored = decompress(&block).expect("stream produced by compress");
    let mut mismatches = 0;
    for (i, (a, b)) in samples.iter().zip(restored.iter()).enumerate() {
        if a.to_bits() != b.to_bits() {
            println!("Mismatch i : {i} : {a} = {b}");
            mismatches += 1;
        }
    }
    if mismatches == 0 {
        println!("All {} samples restored bit-exactly", samples.len());
    }

    let raw_bits = restored.len() * 64;
    println!(
        "Compression factor: {:.3}",
        raw_bits as f64 / block.total_bits as f64
    );
    println!(
        "Bits per double: {:.3}",
        block.total_bits as f64 / samples.len() as f64
    );
}
