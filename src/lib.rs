// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

//! Perceptual audio feature extraction for music-driven rendering.
//!
//! A capture backend pushes interleaved samples into a [`transfer_channel`]
//! from its real-time thread; the renderer polls a [`FeaturePipeline`] once
//! per frame and gets back a magnitude spectrum, bass/mid/treble/volume
//! levels and beat events. Without a backend, [`TestSignalSource`] feeds
//! the same pipeline a deterministic tone.

pub mod config;
pub mod features;
pub mod pipeline;
pub mod source;
pub mod transfer;

pub use config::{AudioConfig, ConfigError};
pub use features::{AudioFeatures, BandLevels, BeatDetector, BeatEvent};
pub use pipeline::FeaturePipeline;
pub use source::{FrameSource, TestSignalSource};
pub use transfer::{TransferConsumer, TransferProducer, transfer_channel};
