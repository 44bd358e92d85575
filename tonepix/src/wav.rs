//! WAV container boundary. Writes mono 16-bit PCM, reads mono 16-bit PCM or
//! 32-bit float.

use std::{
    io::{
        Read,
        Seek,
        Write,
    },
    path::Path,
};

use crate::{
    audio::AudioBuffer,
    sample::IntoSample,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("wav error")]
    Hound(#[from] hound::Error),
    #[error("expected {expected} channel(s), got {channels}")]
    UnexpectedChannelCount { channels: u16, expected: u16 },
    #[error("unsupported sample format: {bits_per_sample} bit {sample_format:?}")]
    UnsupportedFormat {
        bits_per_sample: u16,
        sample_format: hound::SampleFormat,
    },
}

/// WAV format of the files this crate writes.
#[inline]
pub fn pcm16_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

pub fn read_wav<R>(reader: R) -> Result<AudioBuffer, Error>
where
    R: Read,
{
    read_from(hound::WavReader::new(reader)?)
}

pub fn open_wav(path: impl AsRef<Path>) -> Result<AudioBuffer, Error> {
    read_from(hound::WavReader::open(path)?)
}

fn read_from<R>(reader: hound::WavReader<R>) -> Result<AudioBuffer, Error>
where
    R: Read,
{
    let spec = reader.spec();
    spec_expect_channels(&spec, 1)?;

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => {
            reader
                .into_samples::<i16>()
                .map(|sample| sample.map(|sample| sample.into_sample()))
                .collect::<Result<Vec<f32>, _>>()?
        }
        (hound::SampleFormat::Float, 32) => {
            reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()?
        }
        (sample_format, bits_per_sample) => {
            return Err(Error::UnsupportedFormat {
                bits_per_sample,
                sample_format,
            });
        }
    };

    tracing::debug!(
        num_samples = samples.len(),
        sample_rate = spec.sample_rate,
        "read wav"
    );

    Ok(AudioBuffer::new(samples, spec.sample_rate))
}

pub fn write_wav<W>(writer: W, audio: &AudioBuffer) -> Result<(), Error>
where
    W: Write + Seek,
{
    write_to(hound::WavWriter::new(writer, pcm16_spec(audio.sample_rate))?, audio)
}

pub fn create_wav(path: impl AsRef<Path>, audio: &AudioBuffer) -> Result<(), Error> {
    write_to(
        hound::WavWriter::create(path, pcm16_spec(audio.sample_rate))?,
        audio,
    )
}

fn write_to<W>(mut writer: hound::WavWriter<W>, audio: &AudioBuffer) -> Result<(), Error>
where
    W: Write + Seek,
{
    for &sample in &audio.samples {
        writer.write_sample::<i16>(sample.into_sample())?;
    }
    writer.finalize()?;

    tracing::debug!(
        num_samples = audio.samples.len(),
        sample_rate = audio.sample_rate,
        "wrote wav"
    );

    Ok(())
}

#[inline]
fn spec_expect_channels(spec: &hound::WavSpec, expected: u16) -> Result<(), Error> {
    if spec.channels == expected {
        Ok(())
    }
    else {
        Err(Error::UnexpectedChannelCount {
            channels: spec.channels,
            expected,
        })
    }
}
