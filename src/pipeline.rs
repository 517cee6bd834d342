// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

use crate::config::{AudioConfig, ConfigError};
use crate::features::{AudioFeatures, BeatDetector, aggregate, analyze};
use crate::source::FrameSource;

/// Consumer-side analysis pipeline: pulls a window from its frame source
/// and runs it through the spectrum, band and beat stages in sequence.
///
/// Everything is synchronous on the polling thread and all detector state
/// lives here, so a pipeline must not be polled from more than one thread
/// at a time (ownership already enforces that).
pub struct FeaturePipeline {
    config: AudioConfig,
    source: Box<dyn FrameSource>,
    window: Vec<f32>,
    spectrum: Vec<f32>,
    detector: BeatDetector,
}

impl FeaturePipeline {
    /// Validates the configuration against the source format and allocates
    /// the analysis buffers once. Any error here leaves nothing running.
    pub fn new(config: AudioConfig, source: Box<dyn FrameSource>) -> Result<Self, ConfigError> {
        config.validate()?;
        if source.channels() != config.channels {
            return Err(ConfigError::SourceChannelMismatch {
                expected: config.channels,
                actual: source.channels(),
            });
        }
        if source.sample_rate() != config.sample_rate {
            return Err(ConfigError::SourceRateMismatch {
                expected: config.sample_rate,
                actual: source.sample_rate(),
            });
        }

        log::debug!(
            "feature pipeline: {} Hz, {} channels, {} frame window, {} bins",
            config.sample_rate,
            config.channels,
            config.window_frames,
            config.spectrum_bins
        );

        Ok(FeaturePipeline {
            window: vec![0.0; config.window_samples()],
            spectrum: vec![0.0; config.spectrum_bins],
            config,
            source,
            detector: BeatDetector::new(),
        })
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Runs one analysis cycle and returns the extracted features. Never
    /// blocks on data availability: a starved source just yields a
    /// silence-padded window and the features decay accordingly.
    pub fn poll(&mut self) -> AudioFeatures {
        let captured_frames = self.source.next_window(&mut self.window);
        analyze(
            &self.window,
            self.config.channels,
            self.config.sample_rate,
            &mut self.spectrum,
        );
        let levels = aggregate(&self.spectrum);
        let beat = self.detector.detect(levels.volume);

        AudioFeatures {
            spectrum: self.spectrum.clone(),
            levels,
            beat,
            captured_frames,
        }
    }
}
