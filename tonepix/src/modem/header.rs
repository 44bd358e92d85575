//! Image dimensions, sent as four tones ahead of the pixels.
//!
//! Each dimension is split into its high and low byte, width before height:
//! `[width_high, width_low, height_high, height_low]`.

use crate::{
    config::{
        CodecConfig,
        HEADER_TONES,
    },
    modem::{
        DecodeError,
        estimator::FrequencyEstimator,
        tone::Tone,
    },
};

#[inline]
pub fn dimension_bytes(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

#[inline]
pub fn header_bytes(width: u16, height: u16) -> [u8; HEADER_TONES] {
    let [width_high, width_low] = dimension_bytes(width);
    let [height_high, height_low] = dimension_bytes(height);
    [width_high, width_low, height_high, height_low]
}

/// Two tones, high byte first.
pub fn encode_dimension(value: u16, config: &CodecConfig) -> Vec<f32> {
    dimension_bytes(value)
        .into_iter()
        .flat_map(|byte| Tone::from_config(byte, config).samples())
        .collect()
}

/// Four tones: width, then height.
pub fn encode_header(width: u16, height: u16, config: &CodecConfig) -> Vec<f32> {
    let mut samples = encode_dimension(width, config);
    samples.extend(encode_dimension(height, config));
    samples
}

/// Reads `(width, height)` from the first four segments of `audio`.
pub fn decode_header(audio: &[f32], config: &CodecConfig) -> Result<(u16, u16), DecodeError> {
    let mut estimator = FrequencyEstimator::from_config(config);
    decode_header_with(audio, &mut estimator)
}

pub(crate) fn decode_header_with(
    audio: &[f32],
    estimator: &mut FrequencyEstimator,
) -> Result<(u16, u16), DecodeError> {
    let segment_len = estimator.segment_len();
    let required = HEADER_TONES * segment_len;
    if audio.len() < required {
        return Err(DecodeError::InsufficientHeader {
            available: audio.len(),
            required,
        });
    }

    let mut bytes = [0u8; HEADER_TONES];
    for (byte, segment) in bytes
        .iter_mut()
        .zip(audio[..required].chunks_exact(segment_len))
    {
        *byte = estimator.estimate(segment);
    }

    let [width_high, width_low, height_high, height_low] = bytes;
    let width = u16::from_be_bytes([width_high, width_low]);
    let height = u16::from_be_bytes([height_high, height_low]);
    tracing::debug!(width, height, "decoded header");

    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_is_split_high_byte_first() {
        assert_eq!(dimension_bytes(0x1234), [0x12, 0x34]);
        assert_eq!(header_bytes(256, 65535), [1, 0, 255, 255]);
    }

    #[test]
    fn header_is_four_tones_long() {
        let config = CodecConfig::default();
        assert_eq!(encode_dimension(300, &config).len(), 2 * 2205);
        assert_eq!(encode_header(300, 200, &config).len(), config.header_len());
    }

    #[test]
    fn header_round_trips() {
        let config = CodecConfig::default();
        let values = [0, 1, 255, 256, 65535];
        for width in values {
            for height in values {
                let audio = encode_header(width, height, &config);
                assert_eq!(decode_header(&audio, &config).unwrap(), (width, height));
            }
        }
    }

    #[test]
    fn header_ignores_trailing_samples() {
        let config = CodecConfig::default();
        let mut audio = encode_header(640, 480, &config);
        audio.extend(std::iter::repeat_n(0.25, 1000));
        assert_eq!(decode_header(&audio, &config).unwrap(), (640, 480));
    }

    #[test]
    fn short_header_is_rejected() {
        let config = CodecConfig::default();
        let audio = encode_header(4, 4, &config);
        let error = decode_header(&audio[..audio.len() - 1], &config).unwrap_err();
        assert!(matches!(
            error,
            DecodeError::InsufficientHeader {
                available,
                required,
            } if available == 4 * 2205 - 1 && required == 4 * 2205
        ));
    }
}
