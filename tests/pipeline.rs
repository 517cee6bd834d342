// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

//! End-to-end tests running the producer to feature-output path the way an
//! embedding application would.

use std::f32::consts::TAU;

use beatscope::{AudioConfig, FeaturePipeline, FrameSource, TestSignalSource, transfer_channel};

fn test_config() -> AudioConfig {
    AudioConfig {
        sample_rate: 48_000,
        channels: 2,
        window_frames: 512,
        spectrum_bins: 64,
        ring_window_multiple: 4,
    }
}

fn push_stereo_sine(producer: &beatscope::TransferProducer, config: &AudioConfig, freq: f32, frames: usize) {
    let samples: Vec<f32> = (0..frames)
        .flat_map(|i| {
            let s = (TAU * freq * i as f32 / config.sample_rate as f32).sin();
            [s, s]
        })
        .collect();
    producer.push(&samples);
}

#[test]
fn starved_pipeline_reports_silence() {
    let config = test_config();
    let (_producer, consumer) = transfer_channel(&config).unwrap();
    let mut pipeline = FeaturePipeline::new(config, Box::new(consumer)).unwrap();

    let features = pipeline.poll();
    assert_eq!(features.captured_frames, 0);
    assert!(features.spectrum.iter().all(|&m| m == 0.0));
    assert_eq!(features.levels.volume, 0.0);
    assert!(!features.beat.is_beat);
}

#[test]
fn captured_audio_flows_through_to_features() {
    let config = test_config();
    let (producer, consumer) = transfer_channel(&config).unwrap();
    let mut pipeline = FeaturePipeline::new(config, Box::new(consumer)).unwrap();

    // A bass-band tone: bin 4 of 64 at 48 kHz is 1500 Hz; use something
    // well inside the first eighth of the spectrum.
    push_stereo_sine(&producer, &config, 700.0, config.window_frames);
    let features = pipeline.poll();

    assert_eq!(features.captured_frames, config.window_frames);
    assert!(features.levels.volume > 0.0);
    assert!(features.levels.bass > features.levels.treble);

    // The ring is drained now, so the next poll degrades to silence again.
    let features = pipeline.poll();
    assert_eq!(features.captured_frames, 0);
    assert_eq!(features.levels.volume, 0.0);
}

#[test]
fn window_shorter_than_capture_gets_the_most_recent_audio_padded() {
    let config = test_config();
    let (producer, consumer) = transfer_channel(&config).unwrap();

    // Push more than the ring holds; only the most recent samples survive.
    push_stereo_sine(&producer, &config, 700.0, config.ring_frames() + 100);
    assert_eq!(consumer.available_frames(), config.ring_frames());

    let mut window = vec![0.0; config.window_samples()];
    assert_eq!(consumer.pull(&mut window), config.window_frames);
}

#[test]
fn producer_thread_feeds_a_polling_consumer() {
    let config = test_config();
    let (producer, consumer) = transfer_channel(&config).unwrap();

    let pusher = std::thread::spawn(move || {
        let mut signal = TestSignalSource::new(config.sample_rate, config.channels);
        let mut batch = vec![0.0; 128 * config.channels];
        for _ in 0..64 {
            signal.next_window(&mut batch);
            producer.push(&batch);
        }
    });
    pusher.join().unwrap();

    let mut pipeline = FeaturePipeline::new(config, Box::new(consumer)).unwrap();
    let features = pipeline.poll();
    assert_eq!(features.captured_frames, config.window_frames);
    assert!(features.levels.volume > 0.0);
    for level in [
        features.levels.bass,
        features.levels.mid,
        features.levels.treble,
        features.levels.volume,
    ] {
        assert!((0.0..=1.0).contains(&level));
    }
}

#[test]
fn fallback_and_capture_sources_share_the_contract() {
    let config = test_config();

    let mut fallback = TestSignalSource::new(config.sample_rate, config.channels);
    let (_producer, mut capture) = transfer_channel(&config).unwrap();
    let sources: [&mut dyn FrameSource; 2] = [&mut fallback, &mut capture];

    for source in sources {
        assert_eq!(source.sample_rate(), config.sample_rate);
        assert_eq!(source.channels(), config.channels);
        let mut window = vec![f32::NAN; config.window_samples()];
        let frames = source.next_window(&mut window);
        assert!(frames <= config.window_frames);
        assert!(window.iter().all(|s| s.is_finite()));
    }
}

#[test]
fn beat_fires_when_loud_audio_follows_silence() {
    let config = test_config();
    let (producer, consumer) = transfer_channel(&config).unwrap();
    let mut pipeline = FeaturePipeline::new(config, Box::new(consumer)).unwrap();

    // Warm the detector history up on silence.
    for _ in 0..8 {
        assert!(!pipeline.poll().beat.is_beat);
    }

    // A loud broadband burst: one component per spectrum bin, aligned to
    // the bin centers so every band carries strong energy at once.
    let bin_width = config.sample_rate as f32 / 2.0 / config.spectrum_bins as f32;
    let burst: Vec<f32> = (0..config.window_frames)
        .flat_map(|i| {
            let t = i as f32 / config.sample_rate as f32;
            let s: f32 = (1..config.spectrum_bins)
                .map(|k| 0.8 * (TAU * k as f32 * bin_width * t).sin())
                .sum();
            [s, s]
        })
        .collect();
    producer.push(&burst);
    let features = pipeline.poll();
    assert!(features.levels.volume > 0.3);
    assert!(features.beat.is_beat);
    assert!(features.beat.intensity > 0.0);
    assert!(features.beat.intensity.is_finite());
}
