//! The tone codec.
//!
//! Every byte, header or pixel, becomes a sine tone of fixed length whose
//! frequency sits linearly inside [`FrequencyBand`](crate::config::FrequencyBand).
//! The stream is four header tones carrying width and height, followed by one
//! tone per pixel in row-major order. Decoding estimates the frequency of each
//! segment from a windowed, zero-padded FFT.

mod decoder;
mod encoder;
pub mod estimator;
pub mod fft;
pub mod header;
pub mod tone;

pub use decoder::{
    DecodeError,
    Decoded,
    Decoder,
    decode,
};
pub use encoder::{
    Encoder,
    encode,
};

/// Segments are zero-padded to this many times their length before the FFT.
pub const ZERO_PADDING: usize = 4;

/// Segments shorter than this decode with errors of several values.
pub const MIN_SAMPLES_PER_PIXEL: usize = 80;
