//! Codec configuration
//!
//! Encoder and decoder have to agree on the configuration for the image to be
//! recovered. The only exception is the sample rate: a decoder that receives
//! audio at a different rate derives a new configuration with
//! [`CodecConfig::adapted_to`] and keeps going.

use std::{
    fmt::Display,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    GetSampleRate,
    util::{
        lerp,
        unlerp,
    },
};

/// Number of tones in the header: high and low byte of width and height.
pub const HEADER_TONES: usize = 4;

/// The tone band spans `carrier * LOW_RATIO ..= carrier * HIGH_RATIO`.
pub const LOW_RATIO: f64 = 0.8;
pub const HIGH_RATIO: f64 = 1.2;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("sample rate must be greater than 0")]
    ZeroSampleRate,
    #[error("carrier frequency must be positive and finite: {carrier_frequency}")]
    InvalidCarrierFrequency { carrier_frequency: f64 },
    #[error("pixel duration must be positive and finite: {pixel_duration}")]
    InvalidPixelDuration { pixel_duration: f64 },
    #[error("pixel duration of {pixel_duration} s is shorter than one sample at {sample_rate} Hz")]
    NoSamplesPerPixel {
        sample_rate: u32,
        pixel_duration: f64,
    },
    #[error("tone band reaches {high} Hz, above the Nyquist frequency {nyquist} Hz")]
    AboveNyquist { high: f64, nyquist: f64 },
    #[error("unknown truncation policy: {0}")]
    UnknownTruncationPolicy(String),
}

/// What the decoder does when the audio ends before all pixels were read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TruncationPolicy {
    /// Fail with [`DecodeError::Truncated`](crate::DecodeError::Truncated).
    #[default]
    Strict,
    /// Return the pixels that could be decoded.
    Partial,
}

impl FromStr for TruncationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "partial" => Ok(Self::Partial),
            _ => Err(ConfigError::UnknownTruncationPolicy(s.to_owned())),
        }
    }
}

impl Display for TruncationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Partial => write!(f, "partial"),
        }
    }
}

/// The band of tone frequencies pixel values are mapped into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencyBand {
    pub low: f64,
    pub high: f64,
}

impl FrequencyBand {
    #[inline]
    pub fn around_carrier(carrier_frequency: f64) -> Self {
        Self {
            low: carrier_frequency * LOW_RATIO,
            high: carrier_frequency * HIGH_RATIO,
        }
    }

    #[inline(always)]
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Frequency difference between two adjacent byte values.
    #[inline(always)]
    pub fn step(&self) -> f64 {
        self.width() / 255.0
    }

    /// Tone frequency for a byte value. 0 maps to `low`, 255 to `high`.
    #[inline]
    pub fn frequency(&self, value: u8) -> f64 {
        lerp(f64::from(value) / 255.0, self.low, self.high)
    }

    /// Inverse of [`frequency`](Self::frequency). Frequencies outside of the
    /// band are clamped, so this is total.
    pub fn value(&self, frequency: f64) -> u8 {
        let frequency = frequency.clamp(self.low, self.high);
        let value = (unlerp(frequency, self.low, self.high) * 255.0).clamp(0.0, 255.0);
        value.round_ties_even() as u8
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Center of the tone band in Hz.
    pub carrier_frequency: f64,
    /// Length of one tone in seconds.
    pub pixel_duration: f64,
    pub truncation: TruncationPolicy,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            carrier_frequency: 1000.0,
            pixel_duration: 0.05,
            truncation: TruncationPolicy::default(),
        }
    }
}

impl CodecConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_carrier_frequency(mut self, carrier_frequency: f64) -> Self {
        self.carrier_frequency = carrier_frequency;
        self
    }

    pub fn with_pixel_duration(mut self, pixel_duration: f64) -> Self {
        self.pixel_duration = pixel_duration;
        self
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if !(self.carrier_frequency.is_finite() && self.carrier_frequency > 0.0) {
            return Err(ConfigError::InvalidCarrierFrequency {
                carrier_frequency: self.carrier_frequency,
            });
        }
        if !(self.pixel_duration.is_finite() && self.pixel_duration > 0.0) {
            return Err(ConfigError::InvalidPixelDuration {
                pixel_duration: self.pixel_duration,
            });
        }
        if self.samples_per_pixel() == 0 {
            return Err(ConfigError::NoSamplesPerPixel {
                sample_rate: self.sample_rate,
                pixel_duration: self.pixel_duration,
            });
        }

        let nyquist = f64::from(self.sample_rate) / 2.0;
        let band = self.band();
        if band.high >= nyquist {
            return Err(ConfigError::AboveNyquist {
                high: band.high,
                nyquist,
            });
        }

        Ok(())
    }

    #[inline]
    pub fn samples_per_pixel(&self) -> usize {
        (f64::from(self.sample_rate) * self.pixel_duration).floor() as usize
    }

    #[inline]
    pub fn band(&self) -> FrequencyBand {
        FrequencyBand::around_carrier(self.carrier_frequency)
    }

    /// Number of samples taken up by the header.
    #[inline]
    pub fn header_len(&self) -> usize {
        HEADER_TONES * self.samples_per_pixel()
    }

    /// Number of samples an encoded `width` x `height` image takes up.
    #[inline]
    pub fn encoded_len(&self, width: u16, height: u16) -> usize {
        self.samples_per_pixel() * (HEADER_TONES + usize::from(width) * usize::from(height))
    }

    /// Playing time of an encoded `width` x `height` image in seconds.
    pub fn encoded_duration(&self, width: u16, height: u16) -> f64 {
        self.encoded_len(width, height) as f64 / f64::from(self.sample_rate)
    }

    /// Returns the configuration a decoder uses for audio recorded at
    /// `sample_rate`. The pixel duration stays the same, so the number of
    /// samples per pixel is recomputed.
    pub fn adapted_to(&self, sample_rate: u32) -> Self {
        self.with_sample_rate(sample_rate)
    }
}

impl GetSampleRate for CodecConfig {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// How well a configuration can tell adjacent byte values apart.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub samples_per_pixel: usize,
    pub fft_size: usize,
    /// Bin width of an unpadded FFT over one segment, in Hz.
    pub bin_width: f64,
    /// Bin width after zero-padding, in Hz.
    pub padded_bin_width: f64,
    pub band: FrequencyBand,
    /// Frequency difference between adjacent byte values, in Hz.
    pub value_step: f64,
    /// Number of unpadded bins that fit into the band.
    pub bins_in_band: f64,
}

impl Resolution {
    pub fn of(config: &CodecConfig) -> Self {
        let samples_per_pixel = config.samples_per_pixel();
        let fft_size = crate::modem::ZERO_PADDING * samples_per_pixel;
        let sample_rate = f64::from(config.sample_rate);
        let band = config.band();
        let bin_width = sample_rate / samples_per_pixel as f64;

        Self {
            samples_per_pixel,
            fft_size,
            bin_width,
            padded_bin_width: sample_rate / fft_size as f64,
            band,
            value_step: band.step(),
            bins_in_band: band.width() / bin_width,
        }
    }

    /// Whether the unpadded bin width is at most one value step, which
    /// guarantees all 256 values are distinguishable.
    #[inline]
    pub fn resolves_all_values(&self) -> bool {
        self.bin_width <= self.value_step
    }

    /// Segment length needed for the bin width to match one value step.
    pub fn required_samples_per_pixel(&self) -> usize {
        (self.bin_width * self.samples_per_pixel as f64 / self.value_step).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn default_config_matches_reference_values() {
        let config = CodecConfig::default();
        assert_eq!(config.sample_rate, 44100);
        assert_eq!(config.samples_per_pixel(), 2205);
        assert_eq!(config.header_len(), 4 * 2205);
        assert_eq!(config.encoded_len(4, 4), 20 * 2205);
        config.validate().unwrap();
    }

    #[test]
    fn samples_per_pixel_is_floored() {
        let config = CodecConfig::default().with_pixel_duration(0.01);
        assert_eq!(config.samples_per_pixel(), 441);

        let config = CodecConfig::default().with_pixel_duration(0.0001);
        assert_eq!(config.samples_per_pixel(), 4);
    }

    #[test]
    fn band_maps_extremes_to_edges() {
        let band = CodecConfig::default().band();
        assert_abs_diff_eq!(band.low, 800.0);
        assert_abs_diff_eq!(band.high, 1200.0);
        assert_abs_diff_eq!(band.frequency(0), 800.0);
        assert_abs_diff_eq!(band.frequency(255), 1200.0);
        assert_eq!(band.value(band.frequency(0)), 0);
        assert_eq!(band.value(band.frequency(255)), 255);
    }

    #[test]
    fn band_mapping_is_strictly_monotonic() {
        let band = CodecConfig::default().band();
        for value in 0..255u8 {
            assert!(band.frequency(value) < band.frequency(value + 1));
        }
    }

    #[test]
    fn band_value_clamps_out_of_band_frequencies() {
        let band = CodecConfig::default().band();
        assert_eq!(band.value(0.0), 0);
        assert_eq!(band.value(-100.0), 0);
        assert_eq!(band.value(20000.0), 255);
    }

    #[test]
    fn band_value_inverts_frequency() {
        let band = FrequencyBand::around_carrier(1234.5);
        for value in 0..=255u8 {
            assert_eq!(band.value(band.frequency(value)), value);
        }
    }

    #[test]
    fn it_rejects_invalid_configs() {
        assert!(matches!(
            CodecConfig::default().with_sample_rate(0).validate(),
            Err(ConfigError::ZeroSampleRate)
        ));
        assert!(matches!(
            CodecConfig::default().with_carrier_frequency(-1.0).validate(),
            Err(ConfigError::InvalidCarrierFrequency { .. })
        ));
        assert!(matches!(
            CodecConfig::default()
                .with_pixel_duration(f64::NAN)
                .validate(),
            Err(ConfigError::InvalidPixelDuration { .. })
        ));
        assert!(matches!(
            CodecConfig::default()
                .with_pixel_duration(1e-6)
                .validate(),
            Err(ConfigError::NoSamplesPerPixel { .. })
        ));
        assert!(matches!(
            CodecConfig::default()
                .with_carrier_frequency(20000.0)
                .validate(),
            Err(ConfigError::AboveNyquist { .. })
        ));
    }

    #[test]
    fn adapting_keeps_duration_and_recomputes_segment_length() {
        let config = CodecConfig::default();
        let adapted = config.adapted_to(22050);
        assert_eq!(adapted.samples_per_pixel(), 1102);
        assert_eq!(adapted.pixel_duration, config.pixel_duration);
        assert_eq!(config.samples_per_pixel(), 2205);
    }

    #[test]
    fn resolution_threshold() {
        let resolution = Resolution::of(&CodecConfig::default());
        assert_eq!(resolution.fft_size, 4 * 2205);
        assert_abs_diff_eq!(resolution.bin_width, 20.0);
        assert_abs_diff_eq!(resolution.padded_bin_width, 5.0);
        assert!(!resolution.resolves_all_values());
        assert_eq!(resolution.required_samples_per_pixel(), 28114);

        let resolution = Resolution::of(&CodecConfig::default().with_pixel_duration(1.0));
        assert!(resolution.resolves_all_values());
    }

    #[test]
    fn truncation_policy_parses() {
        assert_eq!(
            "partial".parse::<TruncationPolicy>().unwrap(),
            TruncationPolicy::Partial
        );
        assert_eq!(TruncationPolicy::Strict.to_string(), "strict");
        assert!("lenient".parse::<TruncationPolicy>().is_err());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: CodecConfig =
            toml::from_str("pixel_duration = 0.02\ntruncation = \"partial\"").unwrap();
        assert_eq!(config.sample_rate, 44100);
        assert_abs_diff_eq!(config.pixel_duration, 0.02);
        assert_eq!(config.truncation, TruncationPolicy::Partial);
    }
}
