use std::path::PathBuf;

use clap::Parser;
use tonepix::TruncationPolicy;

/// Encode grayscale images as audio tones, and decode them back.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    #[clap(flatten)]
    pub codec: CodecArgs,

    #[clap(subcommand)]
    pub command: Command,
}

/// Codec settings. Flags override the config file.
#[derive(Debug, clap::Args)]
pub struct CodecArgs {
    /// TOML file with codec settings. Defaults to `codec.toml` in the user
    /// config directory, if that exists.
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sample rate in Hz.
    #[clap(short, long = "sample-rate", global = true)]
    pub sample_rate: Option<u32>,

    /// Carrier frequency in Hz. Tones span 0.8x to 1.2x of it.
    #[clap(long, global = true)]
    pub carrier: Option<f64>,

    /// Duration of one pixel in seconds.
    #[clap(short, long, global = true)]
    pub pixel_duration: Option<f64>,

    /// What to do with audio that ends early: `strict` or `partial`.
    #[clap(long, global = true)]
    pub truncation: Option<TruncationPolicy>,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Encode an image into a WAV file.
    Encode { image: PathBuf, output: PathBuf },

    /// Decode a WAV file into an image.
    Decode { input: PathBuf, output: PathBuf },

    /// Print error statistics between two images.
    Compare { original: PathBuf, decoded: PathBuf },

    /// Print how well the codec settings resolve pixel values.
    Analyze,

    /// Write a radial gradient test image.
    Sample {
        output: PathBuf,

        #[clap(long, default_value = "50")]
        width: u16,

        #[clap(long, default_value = "50")]
        height: u16,
    },

    /// Encode, decode and compare in one go.
    Roundtrip {
        /// Image to encode. A radial gradient is generated if omitted.
        image: Option<PathBuf>,

        /// Directory for the intermediate WAV file and decoded image.
        #[clap(long, default_value = "output")]
        out_dir: PathBuf,
    },
}
