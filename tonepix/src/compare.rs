//! Pixel error statistics between an original and a decoded raster.

use std::fmt::Display;

use crate::raster::Raster;

#[derive(Debug, thiserror::Error)]
#[error("cannot compare {original_width}x{original_height} with {decoded_width}x{decoded_height}")]
pub struct ShapeMismatch {
    pub original_width: u16,
    pub original_height: u16,
    pub decoded_width: u16,
    pub decoded_height: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Quality {
    /// Identical.
    Perfect,
    /// Off by at most 1.
    Excellent,
    /// Off by at most 5.
    Good,
    Degraded,
}

impl Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Perfect => write!(f, "perfect match"),
            Self::Excellent => write!(f, "excellent, off by at most 1"),
            Self::Good => write!(f, "good, off by at most 5"),
            Self::Degraded => write!(f, "significant differences"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub max_error: u8,
    pub mean_error: f64,
    /// Number of pixels that differ at all.
    pub differing: usize,
    pub total: usize,
}

impl Comparison {
    pub fn new(original: &Raster, decoded: &Raster) -> Result<Self, ShapeMismatch> {
        if (original.width(), original.height()) != (decoded.width(), decoded.height()) {
            return Err(ShapeMismatch {
                original_width: original.width(),
                original_height: original.height(),
                decoded_width: decoded.width(),
                decoded_height: decoded.height(),
            });
        }

        let mut max_error = 0;
        let mut sum = 0u64;
        let mut differing = 0;
        for (a, b) in original.pixels().iter().zip(decoded.pixels()) {
            let error = a.abs_diff(*b);
            max_error = max_error.max(error);
            sum += u64::from(error);
            if error > 0 {
                differing += 1;
            }
        }

        let total = original.len();
        let mean_error = if total == 0 {
            0.0
        }
        else {
            sum as f64 / total as f64
        };

        Ok(Self {
            max_error,
            mean_error,
            differing,
            total,
        })
    }

    pub fn quality(&self) -> Quality {
        match self.max_error {
            0 => Quality::Perfect,
            1 => Quality::Excellent,
            2..=5 => Quality::Good,
            _ => Quality::Degraded,
        }
    }

    /// Share of differing pixels in percent.
    pub fn differing_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        }
        else {
            100.0 * self.differing as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn identical_rasters_are_perfect() {
        let raster = Raster::radial_gradient(8, 8);
        let comparison = Comparison::new(&raster, &raster).unwrap();
        assert_eq!(comparison.max_error, 0);
        assert_eq!(comparison.differing, 0);
        assert_eq!(comparison.total, 64);
        assert_eq!(comparison.quality(), Quality::Perfect);
    }

    #[test]
    fn statistics_over_differences() {
        let original = Raster::new(2, 2, vec![10, 20, 30, 40]).unwrap();
        let decoded = Raster::new(2, 2, vec![11, 20, 27, 40]).unwrap();
        let comparison = Comparison::new(&original, &decoded).unwrap();
        assert_eq!(comparison.max_error, 3);
        assert_abs_diff_eq!(comparison.mean_error, 1.0);
        assert_eq!(comparison.differing, 2);
        assert_abs_diff_eq!(comparison.differing_percent(), 50.0);
        assert_eq!(comparison.quality(), Quality::Good);
    }

    #[test]
    fn shape_mismatch_is_an_error() {
        let a = Raster::filled(2, 3, 0);
        let b = Raster::filled(3, 2, 0);
        assert!(Comparison::new(&a, &b).is_err());
    }
}
