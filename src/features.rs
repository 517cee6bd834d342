// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

pub mod bands;
pub mod beat;
pub mod spectrum;

pub use bands::{BandLevels, aggregate};
pub use beat::{BeatDetector, BeatEvent};
pub use spectrum::analyze;

/// Everything the pipeline extracts from one analysis window, the record a
/// rendering engine consumes once per frame.
#[derive(Debug, Clone)]
pub struct AudioFeatures {
    /// Magnitude per frequency bin, lowest frequency first.
    pub spectrum: Vec<f32>,
    pub levels: BandLevels,
    pub beat: BeatEvent,
    /// Frames of the analysis window that were real captured data rather
    /// than silence padding.
    pub captured_frames: usize,
}
