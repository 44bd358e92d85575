use crate::{
    GetSampleRate,
    sample::IntoSample,
};

/// Mono audio, normalized to `[-1, 1]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioBuffer {
    #[inline]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn from_i16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&sample| sample.into_sample()).collect(),
            sample_rate,
        )
    }

    pub fn to_i16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&sample| sample.into_sample())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playing time in seconds.
    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        }
        else {
            self.samples.len() as f64 / f64::from(self.sample_rate)
        }
    }

    /// Shortens the buffer to at most `len` samples.
    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }
}

impl GetSampleRate for AudioBuffer {
    #[inline]
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn duration_in_seconds() {
        let audio = AudioBuffer::new(vec![0.0; 22050], 44100);
        assert_abs_diff_eq!(audio.duration(), 0.5);
        assert_eq!(AudioBuffer::default().duration(), 0.0);
    }

    #[test]
    fn pcm_conversion_is_close_to_identity() {
        let audio = AudioBuffer::new(vec![0.0, 0.5, -0.25, 1.0, -1.0], 8000);
        let restored = AudioBuffer::from_i16(&audio.to_i16(), 8000);
        for (a, b) in audio.samples.iter().zip(&restored.samples) {
            assert_abs_diff_eq!(a, b, epsilon = 1.0 / 32767.0);
        }
    }
}
