use crate::{
    config::{
        CodecConfig,
        FrequencyBand,
    },
    modem::{
        ZERO_PADDING,
        fft::Fft,
    },
};

/// Peaks whose neighbours are this close to colinear are not interpolated.
const MIN_CURVATURE: f32 = 1e-10;

/// Recovers the byte value of a tone segment from its dominant frequency.
///
/// Owns the FFT plan and buffers for one segment length, so it can be reused
/// for every segment of a stream.
#[derive(Debug)]
pub struct FrequencyEstimator {
    fft: Fft,
    magnitudes: Vec<f32>,
    sample_rate: u32,
    band: FrequencyBand,
}

impl FrequencyEstimator {
    pub fn new(segment_len: usize, sample_rate: u32, band: FrequencyBand) -> Self {
        let fft = Fft::new(segment_len, ZERO_PADDING);
        Self {
            magnitudes: Vec::with_capacity(fft.num_bins()),
            fft,
            sample_rate,
            band,
        }
    }

    #[inline]
    pub fn from_config(config: &CodecConfig) -> Self {
        Self::new(config.samples_per_pixel(), config.sample_rate, config.band())
    }

    #[inline]
    pub fn segment_len(&self) -> usize {
        self.fft.segment_len()
    }

    #[inline]
    fn bin_width(&self) -> f64 {
        f64::from(self.sample_rate) / self.fft.size() as f64
    }

    /// Dominant frequency of `segment` in Hz, ignoring the DC bin.
    ///
    /// The peak bin is refined by fitting a parabola through its magnitude and
    /// those of its neighbours. Peaks in the first or last searchable bin are
    /// used as is.
    pub fn estimate_frequency(&mut self, segment: &[f32]) -> f64 {
        let spectrum = self.fft.forward(segment);
        self.magnitudes.clear();
        self.magnitudes.extend(spectrum.iter().map(|bin| bin.norm()));

        let magnitudes = &self.magnitudes;
        let last_index = magnitudes.len() - 1;

        // first maximum wins
        let mut peak = 1;
        for (index, magnitude) in magnitudes.iter().enumerate().skip(2) {
            if *magnitude > magnitudes[peak] {
                peak = index;
            }
        }

        let bin_width = self.bin_width();
        let mut frequency = peak as f64 * bin_width;

        if peak > 1 && peak < last_index {
            let alpha = magnitudes[peak - 1];
            let beta = magnitudes[peak];
            let gamma = magnitudes[peak + 1];

            let denominator = alpha - 2.0 * beta + gamma;
            if denominator.abs() > MIN_CURVATURE {
                let offset = 0.5 * (alpha - gamma) / denominator;
                frequency += f64::from(offset) * bin_width;
            }
        }

        frequency
    }

    /// Byte value whose tone best matches `segment`. Always succeeds; out of
    /// band frequencies are clamped to 0 or 255.
    #[inline]
    pub fn estimate(&mut self, segment: &[f32]) -> u8 {
        let frequency = self.estimate_frequency(segment);
        self.band.value(frequency)
    }
}

/// One-shot estimation of a single segment. Use [`FrequencyEstimator`] to
/// estimate many segments of the same length.
pub fn estimate(segment: &[f32], sample_rate: u32, carrier_frequency: f64) -> u8 {
    FrequencyEstimator::new(
        segment.len(),
        sample_rate,
        FrequencyBand::around_carrier(carrier_frequency),
    )
    .estimate(segment)
}
