use rayon::{
    iter::{
        IndexedParallelIterator,
        IntoParallelRefIterator,
        ParallelIterator,
    },
    slice::ParallelSliceMut,
};

use crate::{
    audio::AudioBuffer,
    config::{
        CodecConfig,
        ConfigError,
    },
    modem::{
        MIN_SAMPLES_PER_PIXEL,
        header::header_bytes,
        tone::Tone,
    },
    raster::{
        FrameBuffer,
        Raster,
        RasterError,
    },
};

/// Turns rasters into audio.
#[derive(Clone, Copy, Debug)]
pub struct Encoder {
    config: CodecConfig,
}

impl Encoder {
    pub fn new(config: CodecConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let samples_per_pixel = config.samples_per_pixel();
        if samples_per_pixel < MIN_SAMPLES_PER_PIXEL {
            tracing::warn!(
                samples_per_pixel,
                minimum = MIN_SAMPLES_PER_PIXEL,
                "pixel duration is too short to encode all values reliably"
            );
        }

        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encodes header and pixels into one buffer of
    /// [`encoded_len`](CodecConfig::encoded_len) samples.
    pub fn encode(&self, raster: &Raster) -> AudioBuffer {
        let config = &self.config;
        let samples_per_pixel = config.samples_per_pixel();
        let band = config.band();
        let tone = |value| {
            Tone::for_value(
                value,
                &band,
                config.pixel_duration,
                config.sample_rate,
            )
        };

        let mut samples = vec![0.0; config.encoded_len(raster.width(), raster.height())];
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            samples_per_pixel,
            num_samples = samples.len(),
            "encoding"
        );

        let (header, body) = samples.split_at_mut(config.header_len());
        for (segment, byte) in header
            .chunks_exact_mut(samples_per_pixel)
            .zip(header_bytes(raster.width(), raster.height()))
        {
            tone(byte).write_to(segment);
        }

        body.par_chunks_exact_mut(samples_per_pixel)
            .zip(raster.pixels().par_iter())
            .for_each(|(segment, &value)| tone(value).write_to(segment));

        AudioBuffer::new(samples, config.sample_rate)
    }

    /// Encodes any frame buffer. Fails if a dimension exceeds 65535.
    pub fn encode_frame<F>(&self, frame: &F) -> Result<AudioBuffer, RasterError>
    where
        F: FrameBuffer,
    {
        Ok(self.encode(&Raster::from_frame(frame)?))
    }
}

pub fn encode(raster: &Raster, config: &CodecConfig) -> Result<AudioBuffer, ConfigError> {
    Ok(Encoder::new(*config)?.encode(raster))
}
