// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

/// Smallest spectrum the fixed band partition stays non-degenerate for.
/// Anything below this is rejected at configuration time.
pub const MIN_SPECTRUM_BINS: usize = 8;

/// Gain applied to the bass band, which carries less raw energy than the
/// rest of the spectrum for typical music.
const BASS_GAIN: f32 = 2.0;

/// Per-window band energies, each clamped to [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandLevels {
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub volume: f32,
}

/// Reduces a magnitude spectrum to bass/mid/treble/volume scalars.
///
/// The partition is proportional: the first eighth of the bins is bass, up
/// to half is mid, the upper half is treble. Each level is the arithmetic
/// mean of its bins, volume the mean over all of them.
pub fn aggregate(spectrum: &[f32]) -> BandLevels {
    debug_assert!(spectrum.len() >= MIN_SPECTRUM_BINS);
    let bins = spectrum.len();
    let bass_end = bins / 8;
    let mid_end = bins / 2;

    let mut bass = 0.0;
    let mut mid = 0.0;
    let mut treble = 0.0;
    let mut volume = 0.0;
    for (i, &value) in spectrum.iter().enumerate() {
        volume += value;
        if i < bass_end {
            bass += value;
        } else if i < mid_end {
            mid += value;
        } else {
            treble += value;
        }
    }

    BandLevels {
        bass: (bass / bass_end as f32 * BASS_GAIN).min(1.0),
        mid: (mid / (mid_end - bass_end) as f32).min(1.0),
        treble: (treble / (bins - mid_end) as f32).min(1.0),
        volume: (volume / bins as f32).min(1.0),
    }
}
