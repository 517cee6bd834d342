// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

use num_complex::Complex;
use std::f32::consts::TAU;

/// Upper bound on how many frames of the window each bin correlates
/// against. Keeps the estimator cost fixed for large windows.
pub const ANALYSIS_FRAME_LIMIT: usize = 512;

/// Estimates a magnitude spectrum of the interleaved `window` into
/// `spectrum`, one bin per output slot, linearly spaced from 0 Hz up to half
/// the sample rate.
///
/// Each bin is a direct correlation of the first channel against a complex
/// phasor at the bin's target frequency. That is quadratic in principle, but
/// the bin count and the frame limit are both small and fixed, and it keeps
/// the estimator free of any transform machinery. Magnitudes are compressed
/// with `ln(1 + 10m) / ln(11)` so typical input amplitudes land in [0, 1];
/// pathological inputs can still exceed 1 and are left for the band
/// aggregator to clamp.
pub fn analyze(window: &[f32], channels: usize, sample_rate: u32, spectrum: &mut [f32]) {
    debug_assert!(channels > 0);
    debug_assert_eq!(window.len() % channels, 0);
    let frames = window.len() / channels;
    if frames == 0 {
        spectrum.fill(0.0);
        return;
    }

    let bins = spectrum.len();
    let correlated_frames = frames.min(ANALYSIS_FRAME_LIMIT);
    for (bin, magnitude) in spectrum.iter_mut().enumerate() {
        let freq = bin as f32 / bins as f32 * sample_rate as f32 / 2.0;

        let mut acc = Complex::new(0.0f32, 0.0);
        for i in 0..correlated_frames {
            let t = i as f32 / sample_rate as f32;
            let angle = TAU * freq * t;
            acc += Complex::new(angle.cos(), angle.sin()) * window[i * channels];
        }

        let raw = acc.norm() / frames as f32;
        *magnitude = (1.0 + raw * 10.0).ln() / 11.0f32.ln();
    }
}
