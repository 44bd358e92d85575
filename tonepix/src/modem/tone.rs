use std::f64::consts::TAU;

use crate::config::{
    CodecConfig,
    FrequencyBand,
};

/// A fixed-length sine tone representing one byte value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    frequency: f64,
    duration: f64,
    num_samples: usize,
}

impl Tone {
    pub fn new(frequency: f64, duration: f64, sample_rate: u32) -> Self {
        Self {
            frequency,
            duration,
            num_samples: (f64::from(sample_rate) * duration).floor() as usize,
        }
    }

    /// Tone for `value`, with its frequency placed linearly in `band`.
    #[inline]
    pub fn for_value(value: u8, band: &FrequencyBand, duration: f64, sample_rate: u32) -> Self {
        Self::new(band.frequency(value), duration, sample_rate)
    }

    #[inline]
    pub fn from_config(value: u8, config: &CodecConfig) -> Self {
        Self::for_value(
            value,
            &config.band(),
            config.pixel_duration,
            config.sample_rate,
        )
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.num_samples
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Sample `k` is `sin(2π f t_k)` with `t_k = k * duration / len`, so the
    /// samples cover `[0, duration)`.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = f32> + use<> {
        let step = if self.num_samples == 0 {
            0.0
        }
        else {
            self.duration / self.num_samples as f64
        };
        let omega = TAU * self.frequency;
        (0..self.num_samples).map(move |k| (omega * (k as f64 * step)).sin() as f32)
    }

    /// Writes the tone into `output`, which must be exactly [`len`](Self::len)
    /// samples long.
    pub fn write_to(&self, output: &mut [f32]) {
        assert_eq!(output.len(), self.num_samples);
        for (output, sample) in output.iter_mut().zip(self.samples()) {
            *output = sample;
        }
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.samples().collect()
    }
}

/// Synthesizes the tone for `value` as `floor(sample_rate * duration)`
/// samples.
pub fn synthesize(value: u8, duration: f64, sample_rate: u32, carrier_frequency: f64) -> Vec<f32> {
    Tone::for_value(
        value,
        &FrequencyBand::around_carrier(carrier_frequency),
        duration,
        sample_rate,
    )
    .to_vec()
}
