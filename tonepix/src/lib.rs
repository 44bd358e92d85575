//! Encodes 8-bit grayscale images as audio and back.
//!
//! Each pixel becomes a short sine tone, brighter pixels being higher in
//! pitch. A four-tone header in front of the pixels carries the image size.
//!
//! ```no_run
//! use tonepix::{
//!     CodecConfig,
//!     Raster,
//!     modem::{
//!         decode,
//!         encode,
//!     },
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CodecConfig::default();
//! let raster = Raster::radial_gradient(16, 16);
//! let audio = encode(&raster, &config)?;
//! tonepix::wav::create_wav("gradient.wav", &audio)?;
//!
//! let audio = tonepix::wav::open_wav("gradient.wav")?;
//! let decoded = decode(&audio, &config)?.into_raster();
//! # Ok(())
//! # }
//! ```

pub mod audio;
pub mod compare;
pub mod config;
pub mod modem;
pub mod raster;
pub mod sample;
mod util;
pub mod wav;

pub use crate::{
    audio::AudioBuffer,
    compare::Comparison,
    config::{
        CodecConfig,
        Resolution,
        TruncationPolicy,
    },
    raster::Raster,
};

pub trait GetSampleRate {
    fn sample_rate(&self) -> u32;
}

impl<T: GetSampleRate> GetSampleRate for &T {
    #[inline]
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}

impl<T: GetSampleRate> GetSampleRate for &mut T {
    #[inline]
    fn sample_rate(&self) -> u32 {
        (**self).sample_rate()
    }
}
