use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::bands::MIN_SPECTRUM_BINS;

fn get_config_path() -> Option<std::path::PathBuf> {
    let project_dirs = ProjectDirs::from("", "", "beatscope")?;
    Some(project_dirs.config_dir().join("config.toml"))
}

/// Stream and analysis constants shared by every pipeline stage.
///
/// The values are coupled: the spectrum bin to frequency mapping depends on
/// `sample_rate`, and every buffer capacity depends on `channels`. Changing
/// one field is fine as long as the whole struct still passes `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count delivered by the capture side.
    pub channels: usize,
    /// Frames per analysis window handed to the consumer on each poll.
    pub window_frames: usize,
    /// Number of magnitude bins in the computed spectrum.
    pub spectrum_bins: usize,
    /// Transfer ring capacity, as a multiple of `window_frames`.
    pub ring_window_multiple: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sample_rate: 48_000,
            channels: 2,
            window_frames: 1024,
            spectrum_bins: 64,
            ring_window_multiple: 8,
        }
    }
}

impl AudioConfig {
    /// Transfer ring capacity in frames.
    pub fn ring_frames(&self) -> usize {
        self.window_frames * self.ring_window_multiple
    }

    /// Samples per analysis window, all channels interleaved.
    pub fn window_samples(&self) -> usize {
        self.window_frames * self.channels
    }

    /// Checks the preconditions the analysis stages rely on. A failure here
    /// is a misconfiguration and fatal to pipeline initialization, never a
    /// runtime condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.channels == 0 {
            return Err(ConfigError::ZeroChannels);
        }
        if self.window_frames == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.spectrum_bins < MIN_SPECTRUM_BINS {
            return Err(ConfigError::SpectrumTooSmall(self.spectrum_bins));
        }
        if self.ring_window_multiple == 0 {
            return Err(ConfigError::ZeroRingMultiple);
        }
        Ok(())
    }

    /// Loads the configuration file from the platform config directory.
    /// Returns `Ok(None)` when no file exists so the caller can fall back
    /// to the defaults.
    pub fn load() -> Result<Option<AudioConfig>, ConfigError> {
        let Some(config_path) = get_config_path() else {
            return Ok(None);
        };
        if !config_path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(&config_path)?;
        let config: AudioConfig = toml::from_str(&data)?;
        config.validate()?;
        Ok(Some(config))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample_rate must be non-zero")]
    ZeroSampleRate,
    #[error("channels must be non-zero")]
    ZeroChannels,
    #[error("window_frames must be non-zero")]
    ZeroWindow,
    #[error("spectrum_bins must be at least {MIN_SPECTRUM_BINS}, got {0}")]
    SpectrumTooSmall(usize),
    #[error("ring_window_multiple must be non-zero")]
    ZeroRingMultiple,
    #[error("frame source delivers {actual} channels but the pipeline is configured for {expected}")]
    SourceChannelMismatch { expected: usize, actual: usize },
    #[error("frame source runs at {actual} Hz but the pipeline is configured for {expected} Hz")]
    SourceRateMismatch { expected: u32, actual: u32 },
    #[error("failed to read the configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse the configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}
