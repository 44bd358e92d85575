use rayon::{
    iter::ParallelIterator,
    slice::ParallelSlice,
};

use crate::{
    GetSampleRate,
    audio::AudioBuffer,
    config::{
        CodecConfig,
        ConfigError,
        TruncationPolicy,
    },
    modem::{
        estimator::FrequencyEstimator,
        header::decode_header_with,
    },
    raster::Raster,
};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("insufficient samples for header: got {available}, need {required}")]
    InsufficientHeader { available: usize, required: usize },
    #[error("audio holds {available} of {expected} pixels")]
    Truncated { available: usize, expected: usize },
    #[error("invalid configuration")]
    Config(#[from] ConfigError),
}

/// A decoded image, together with the segment length and sample rate that
/// were actually used to decode it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub width: u16,
    pub height: u16,
    /// Row-major. Shorter than `width * height` if the audio was truncated and
    /// [`TruncationPolicy::Partial`] is in effect.
    pub pixels: Vec<u8>,
    pub samples_per_pixel: usize,
    pub sample_rate: u32,
}

impl Decoded {
    #[inline]
    pub fn expected_len(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }

    /// Missing pixels at the end are filled with 0.
    pub fn into_raster(mut self) -> Raster {
        self.pixels.resize(self.expected_len(), 0);
        Raster::from_raw(self.width, self.height, self.pixels)
    }
}

/// Turns audio back into rasters.
///
/// Holds nothing but the configuration, so decoding the same audio twice
/// gives the same result.
#[derive(Clone, Copy, Debug)]
pub struct Decoder {
    config: CodecConfig,
}

impl Decoder {
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decodes `audio`. If it was recorded at a different sample rate than
    /// configured, the segment length is derived from the audio's rate and the
    /// configured pixel duration.
    pub fn decode(&self, audio: &AudioBuffer) -> Result<Decoded, DecodeError> {
        if audio.sample_rate() == self.config.sample_rate() {
            decode_with(&audio.samples, &self.config)
        }
        else {
            let config = self.config.adapted_to(audio.sample_rate());
            tracing::warn!(
                configured = self.config.sample_rate,
                actual = audio.sample_rate,
                samples_per_pixel = config.samples_per_pixel(),
                "sample rate differs from configuration, adapting"
            );
            config.validate()?;
            decode_with(&audio.samples, &config)
        }
    }

    /// Decodes raw samples at the configured sample rate.
    pub fn decode_samples(&self, samples: &[f32]) -> Result<Decoded, DecodeError> {
        decode_with(samples, &self.config)
    }
}

pub fn decode(audio: &AudioBuffer, config: &CodecConfig) -> Result<Decoded, DecodeError> {
    Decoder::new(*config)?.decode(audio)
}

fn decode_with(samples: &[f32], config: &CodecConfig) -> Result<Decoded, DecodeError> {
    let samples_per_pixel = config.samples_per_pixel();
    let mut estimator = FrequencyEstimator::from_config(config);
    let (width, height) = decode_header_with(samples, &mut estimator)?;

    let expected = usize::from(width) * usize::from(height);
    let body = &samples[config.header_len()..];
    let available = body.len() / samples_per_pixel;

    let num_pixels = if available >= expected {
        expected
    }
    else {
        match config.truncation {
            TruncationPolicy::Strict => {
                return Err(DecodeError::Truncated {
                    available,
                    expected,
                });
            }
            TruncationPolicy::Partial => {
                tracing::warn!(available, expected, "audio is truncated, decoding partially");
                available
            }
        }
    };

    tracing::debug!(width, height, samples_per_pixel, num_pixels, "decoding");

    let pixels = body[..num_pixels * samples_per_pixel]
        .par_chunks_exact(samples_per_pixel)
        .map_init(
            || FrequencyEstimator::from_config(config),
            |estimator, segment| estimator.estimate(segment),
        )
        .collect();

    Ok(Decoded {
        width,
        height,
        pixels,
        samples_per_pixel,
        sample_rate: config.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modem::encode;

    fn test_raster() -> Raster {
        Raster::from_rows(&[
            [0u8, 85, 170, 255],
            [50, 100, 150, 200],
            [25, 75, 125, 175],
            [10, 20, 30, 40],
        ])
        .unwrap()
    }

    #[test]
    fn reference_grid_round_trips() {
        let config = CodecConfig::default();
        let raster = test_raster();
        let decoded = decode(&encode(&raster, &config).unwrap(), &config).unwrap();

        assert_eq!((decoded.width, decoded.height), (4, 4));
        assert_eq!(decoded.samples_per_pixel, 2205);
        assert!(decoded.is_complete());
        let decoded = decoded.into_raster();
        for (a, b) in raster.pixels().iter().zip(decoded.pixels()) {
            assert!(a.abs_diff(*b) <= 1, "{a} decoded as {b}");
        }
    }

    #[test]
    fn decoding_is_repeatable() {
        let config = CodecConfig::default();
        let audio = encode(&Raster::radial_gradient(5, 3), &config).unwrap();
        let decoder = Decoder::new(config).unwrap();
        assert_eq!(decoder.decode(&audio).unwrap(), decoder.decode(&audio).unwrap());
    }

    #[test]
    fn short_audio_fails_on_header() {
        let config = CodecConfig::default();
        let audio = AudioBuffer::new(vec![0.0; 100], 44100);
        assert!(matches!(
            decode(&audio, &config),
            Err(DecodeError::InsufficientHeader {
                available: 100,
                required: 8820,
            })
        ));
    }

    #[test]
    fn truncated_audio_is_rejected_by_default() {
        let config = CodecConfig::default();
        let mut audio = encode(&test_raster(), &config).unwrap();
        audio.truncate(config.header_len() + 5 * 2205 + 1000);

        assert!(matches!(
            decode(&audio, &config),
            Err(DecodeError::Truncated {
                available: 5,
                expected: 16,
            })
        ));
    }

    #[test]
    fn truncated_audio_decodes_partially_when_allowed() {
        let config = CodecConfig::default().with_truncation(TruncationPolicy::Partial);
        let raster = test_raster();
        let mut audio = encode(&raster, &config).unwrap();
        audio.truncate(config.header_len() + 5 * 2205 + 1000);

        let decoded = decode(&audio, &config).unwrap();
        assert!(!decoded.is_complete());
        assert_eq!(decoded.pixels, &raster.pixels()[..5]);

        let filled = decoded.into_raster();
        assert_eq!(filled.len(), 16);
        assert!(filled.pixels()[5..].iter().all(|&pixel| pixel == 0));
    }

    #[test]
    fn header_only_audio_decodes_nothing_when_partial() {
        let config = CodecConfig::default().with_truncation(TruncationPolicy::Partial);
        let mut audio = encode(&test_raster(), &config).unwrap();
        audio.truncate(config.header_len());
        let decoded = decode(&audio, &config).unwrap();
        assert!(decoded.pixels.is_empty());
    }

    #[test]
    fn decoder_adapts_to_the_audio_sample_rate() {
        let raster = test_raster();
        let audio = encode(&raster, &CodecConfig::default().with_sample_rate(22050)).unwrap();

        let config = CodecConfig::default();
        let decoded = decode(&audio, &config).unwrap();
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.samples_per_pixel, 1102);
        assert_eq!(decoded.into_raster(), raster);
        assert_eq!(config.samples_per_pixel(), 2205);
    }

    #[test]
    fn extra_trailing_audio_is_ignored() {
        let config = CodecConfig::default();
        let raster = test_raster();
        let mut audio = encode(&raster, &config).unwrap();
        audio.samples.extend(std::iter::repeat_n(0.0, 3000));
        assert_eq!(decode(&audio, &config).unwrap().into_raster(), raster);
    }
}
