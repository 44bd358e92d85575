mod args;
mod settings;

use std::path::Path;

use clap::Parser;
use color_eyre::eyre::{
    Error,
    WrapErr,
};
use tonepix::{
    CodecConfig,
    Comparison,
    Raster,
    Resolution,
    modem::{
        Decoder,
        Encoder,
    },
    wav,
};
use tracing_subscriber::EnvFilter;

use crate::args::{
    Args,
    Command,
};

fn main() -> Result<(), Error> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::debug!(?args);

    let config = settings::load(&args.codec)?;
    tracing::debug!(?config);

    match args.command {
        Command::Encode { image, output } => {
            encode(&image, &output, &config)?;
        }
        Command::Decode { input, output } => {
            decode(&input, &output, &config)?;
        }
        Command::Compare { original, decoded } => compare(&original, &decoded)?,
        Command::Analyze => analyze(&config),
        Command::Sample {
            output,
            width,
            height,
        } => {
            Raster::radial_gradient(width, height).save(&output)?;
            println!("Sample image: {} ({width}x{height})", output.display());
        }
        Command::Roundtrip { image, out_dir } => {
            std::fs::create_dir_all(&out_dir)
                .wrap_err_with(|| format!("Could not create {}", out_dir.display()))?;

            let image = match image {
                Some(image) => image,
                None => {
                    let path = out_dir.join("sample_image.png");
                    Raster::radial_gradient(50, 50).save(&path)?;
                    println!("Sample image: {}", path.display());
                    path
                }
            };
            let encoded = out_dir.join("encoded_image.wav");
            let decoded = out_dir.join("decoded_image.png");

            encode(&image, &encoded, &config)?;
            decode(&encoded, &decoded, &config)?;
            compare(&image, &decoded)?;
        }
    }

    Ok(())
}

fn encode(image: &Path, output: &Path, config: &CodecConfig) -> Result<(), Error> {
    let raster = Raster::open(image)
        .wrap_err_with(|| format!("Could not load image {}", image.display()))?;
    tracing::info!(
        width = raster.width(),
        height = raster.height(),
        "encoding image"
    );

    let audio = Encoder::new(*config)?.encode(&raster);
    wav::create_wav(output, &audio)?;

    println!(
        "Encoded {}x{} image to {} ({:.2} s)",
        raster.width(),
        raster.height(),
        output.display(),
        audio.duration()
    );
    Ok(())
}

fn decode(input: &Path, output: &Path, config: &CodecConfig) -> Result<(), Error> {
    let audio = wav::open_wav(input)
        .wrap_err_with(|| format!("Could not load audio {}", input.display()))?;
    let decoded = Decoder::new(*config)?.decode(&audio)?;

    if !decoded.is_complete() {
        tracing::warn!(
            decoded = decoded.pixels.len(),
            expected = decoded.expected_len(),
            "audio was truncated, missing pixels are black"
        );
    }

    let (width, height) = (decoded.width, decoded.height);
    decoded.into_raster().save(output)?;

    println!(
        "Decoded {width}x{height} image to {}",
        output.display()
    );
    Ok(())
}

fn compare(original: &Path, decoded: &Path) -> Result<(), Error> {
    let original = Raster::open(original)?;
    let decoded = Raster::open(decoded)?;
    let comparison = Comparison::new(&original, &decoded)?;

    println!("Max error:  {}", comparison.max_error);
    println!("Mean error: {:.3}", comparison.mean_error);
    println!(
        "Differing:  {} / {} ({:.2}%)",
        comparison.differing,
        comparison.total,
        comparison.differing_percent()
    );
    println!("Result:     {}", comparison.quality());
    Ok(())
}

fn analyze(config: &CodecConfig) {
    let resolution = Resolution::of(config);

    println!("Samples per pixel:    {}", resolution.samples_per_pixel);
    println!("FFT size (padded):    {}", resolution.fft_size);
    println!("Bin width:            {:.2} Hz", resolution.bin_width);
    println!("Padded bin width:     {:.2} Hz", resolution.padded_bin_width);
    println!(
        "Tone band:            {:.1} - {:.1} Hz",
        resolution.band.low, resolution.band.high
    );
    println!("Step between values:  {:.3} Hz", resolution.value_step);
    println!("Bins inside the band: {:.1}", resolution.bins_in_band);
    println!(
        "Resolves all values:  {} (needs {} samples per pixel without interpolation)",
        resolution.resolves_all_values(),
        resolution.required_samples_per_pixel()
    );
}
