//! Conversion between normalized `f32` samples and 16-bit PCM.
//!
//! Both directions scale by 32767, so `i16::MIN` maps slightly below -1.0.

pub const I16_SCALE: f32 = 32767.0;

pub trait FromSample<S> {
    fn from_sample(sample: S) -> Self;
}

impl<T> FromSample<T> for T {
    #[inline]
    fn from_sample(sample: T) -> Self {
        sample
    }
}

pub trait IntoSample<S> {
    fn into_sample(self) -> S;
}

impl<T, U> IntoSample<U> for T
where
    U: FromSample<T>,
{
    #[inline]
    fn into_sample(self) -> U {
        U::from_sample(self)
    }
}

impl FromSample<f32> for i16 {
    /// Truncates towards zero. Out of range values saturate.
    #[inline]
    fn from_sample(sample: f32) -> Self {
        (sample * I16_SCALE) as i16
    }
}

impl FromSample<i16> for f32 {
    #[inline]
    fn from_sample(sample: i16) -> Self {
        f32::from(sample) / I16_SCALE
    }
}
