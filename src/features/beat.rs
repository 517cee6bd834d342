// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

/// Rolling volume history length. Eight entries at a typical 30 to 60 Hz
/// poll rate covers roughly the last quarter second.
const HISTORY_LEN: usize = 8;

/// A beat fires when the volume exceeds the rolling average by this ratio.
const THRESHOLD_RATIO: f32 = 1.5;

/// Absolute volume floor. Keeps threshold crossings during silence or room
/// noise from registering as beats.
const VOLUME_FLOOR: f32 = 0.3;

/// Outcome of one detection call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    pub is_beat: bool,
    /// How far above the dynamic threshold the volume sat, normalized
    /// against the remaining headroom to 1.0. Zero when no beat fired.
    pub intensity: f32,
}

impl BeatEvent {
    fn none() -> Self {
        BeatEvent {
            is_beat: false,
            intensity: 0.0,
        }
    }
}

/// Adaptive-threshold beat detector over the volume signal.
///
/// An owned value with no hidden globals: callers that want several
/// independent detectors just create several. State is a rolling window of
/// recent volume samples plus the last derived threshold; it is only ever
/// meant to be fed from a single consumer thread.
#[derive(Debug, Clone)]
pub struct BeatDetector {
    history: [f32; HISTORY_LEN],
    cursor: usize,
    threshold: f32,
    intensity: f32,
}

impl Default for BeatDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl BeatDetector {
    pub fn new() -> Self {
        BeatDetector {
            history: [0.0; HISTORY_LEN],
            cursor: 0,
            threshold: 0.0,
            intensity: 0.0,
        }
    }

    /// Feeds one volume sample and reports whether it is a beat.
    ///
    /// The sample is inserted into the history first, so it participates in
    /// its own threshold. A constant volume therefore never fires once the
    /// window is warmed up: the threshold sits at 1.5 times the value
    /// itself. Volume is expected pre-clamped to [0, 1], which keeps the
    /// intensity normalization finite in practice.
    pub fn detect(&mut self, volume: f32) -> BeatEvent {
        self.history[self.cursor] = volume;
        self.cursor = (self.cursor + 1) % HISTORY_LEN;

        let avg = self.history.iter().sum::<f32>() / HISTORY_LEN as f32;
        self.threshold = avg * THRESHOLD_RATIO;

        if volume > self.threshold && volume > VOLUME_FLOOR {
            self.intensity = (volume - self.threshold) / (1.0 - self.threshold);
            BeatEvent {
                is_beat: true,
                intensity: self.intensity,
            }
        } else {
            self.intensity = 0.0;
            BeatEvent::none()
        }
    }

    /// Threshold derived on the most recent call.
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Intensity reported on the most recent call.
    pub fn last_intensity(&self) -> f32 {
        self.intensity
    }
}
