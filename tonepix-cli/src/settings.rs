use std::path::{
    Path,
    PathBuf,
};

use color_eyre::eyre::{
    Error,
    WrapErr,
};
use directories::ProjectDirs;
use tonepix::CodecConfig;

use crate::args::CodecArgs;

/// Default config file, `<config dir>/codec.toml`.
fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "tonepix", "tonepix")
        .map(|project_dirs| project_dirs.config_dir().join("codec.toml"))
}

fn read(path: &Path) -> Result<CodecConfig, Error> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read config file {}", path.display()))?;
    let config = toml::from_str(&text)
        .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}

/// Defaults, then the config file, then flags.
pub fn load(args: &CodecArgs) -> Result<CodecConfig, Error> {
    let mut config = if let Some(path) = &args.config {
        read(path)?
    }
    else if let Some(path) = default_path().filter(|path| path.exists()) {
        read(&path)?
    }
    else {
        CodecConfig::default()
    };

    if let Some(sample_rate) = args.sample_rate {
        config.sample_rate = sample_rate;
    }
    if let Some(carrier) = args.carrier {
        config.carrier_frequency = carrier;
    }
    if let Some(pixel_duration) = args.pixel_duration {
        config.pixel_duration = pixel_duration;
    }
    if let Some(truncation) = args.truncation {
        config.truncation = truncation;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn no_flags() -> CodecArgs {
        CodecArgs {
            config: None,
            sample_rate: None,
            carrier: None,
            pixel_duration: None,
            truncation: None,
        }
    }

    #[test]
    fn flags_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sample_rate = 48000\ncarrier_frequency = 1500.0").unwrap();

        let args = CodecArgs {
            config: Some(file.path().to_owned()),
            pixel_duration: Some(0.02),
            ..no_flags()
        };
        let config = load(&args).unwrap();

        assert_eq!(config.sample_rate, 48000);
        assert_eq!(config.carrier_frequency, 1500.0);
        assert_eq!(config.pixel_duration, 0.02);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = CodecArgs {
            config: Some(PathBuf::from("/nonexistent/codec.toml")),
            ..no_flags()
        };
        assert!(load(&args).is_err());
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pixel_duration = 0.05").unwrap();

        let args = CodecArgs {
            config: Some(file.path().to_owned()),
            sample_rate: Some(0),
            ..no_flags()
        };
        assert!(load(&args).is_err());
    }
}
