use std::{
    f32::consts::PI,
    fmt::Debug,
    sync::Arc,
};

use num_complex::Complex;
use rustfft::FftPlanner;

/// Hann-windowed, zero-padded FFT of a real-valued segment.
pub struct Fft {
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    window: Vec<f32>,
    fft: Arc<dyn rustfft::Fft<f32>>,
    segment_len: usize,
    size: usize,
}

impl Fft {
    /// `segment_len` real samples are windowed and padded with zeros to
    /// `segment_len * padding` before transforming.
    pub fn new(segment_len: usize, padding: usize) -> Self {
        assert!(segment_len > 0, "Segment length must be greater than 0");
        assert!(padding > 0, "Padding factor must be greater than 0");

        let size = segment_len * padding;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Self {
            buffer: vec![Default::default(); size],
            scratch: vec![Default::default(); fft.get_inplace_scratch_len()],
            window: hann_window(segment_len),
            fft,
            segment_len,
            size,
        }
    }

    #[inline]
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Transform length, including the padding.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of non-negative frequency bins, `size / 2 + 1`.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.size / 2 + 1
    }

    /// Returns the non-negative half of the spectrum. Bin `k` is centered on
    /// `k * sample_rate / size`.
    pub fn forward(&mut self, samples: &[f32]) -> &[Complex<f32>] {
        assert_eq!(samples.len(), self.segment_len);

        let (windowed, padding) = self.buffer.split_at_mut(self.segment_len);
        for ((output, sample), window) in windowed.iter_mut().zip(samples).zip(&self.window) {
            *output = Complex::new(sample * window, 0.0);
        }
        padding.fill(Complex::default());

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        // the input is real, so the upper half mirrors the lower half.
        &self.buffer[..self.size / 2 + 1]
    }
}

impl Debug for Fft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft")
            .field("segment_len", &self.segment_len)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Symmetric Hann window, zero at both ends.
pub fn hann_window(size: usize) -> Vec<f32> {
    if size == 1 {
        return vec![1.0];
    }
    let n = (size - 1) as f32;
    (0..size)
        .map(|i| (PI * i as f32 / n).sin().powi(2))
        .collect()
}
