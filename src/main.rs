// Copyright © 2025 Jocelyn Turcotte <turcotte.j@gmail.com>
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use beatscope::{AudioConfig, FeaturePipeline, FrameSource, TestSignalSource, transfer_channel};

/// Frames per push on the simulated capture thread. Small batches at a
/// matching cadence approximate how a real backend delivers audio.
const PUSH_BATCH_FRAMES: usize = 256;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// How long to run the meter, in seconds.
    #[arg(short = 's', long = "seconds", default_value_t = 10.0)]
    seconds: f64,

    /// Feature polls per second, standing in for the render frame rate.
    #[arg(long = "fps", default_value_t = 30)]
    fps: u32,

    /// Analyze the built-in test tone directly instead of running it
    /// through the capture transfer channel.
    #[arg(long = "tone")]
    tone: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match AudioConfig::load() {
        Ok(Some(config)) => config,
        Ok(None) => AudioConfig::default(),
        Err(e) => {
            log::warn!("Failed to load configuration, will use default: {e}");
            AudioConfig::default()
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let mut capture_thread = None;

    let source: Box<dyn FrameSource> = if args.tone {
        Box::new(TestSignalSource::new(config.sample_rate, config.channels))
    } else {
        // Run the test signal through a real transfer channel, with the
        // producer pushing from its own thread the way a capture backend
        // adapter would.
        let (producer, consumer) = transfer_channel(&config)?;
        let stop = stop.clone();
        capture_thread = Some(
            thread::Builder::new()
                .name("capture".into())
                .spawn(move || {
                    let mut signal = TestSignalSource::new(config.sample_rate, config.channels);
                    let mut batch = vec![0.0; PUSH_BATCH_FRAMES * config.channels];
                    let cadence =
                        Duration::from_secs_f64(PUSH_BATCH_FRAMES as f64 / config.sample_rate as f64);
                    while !stop.load(Ordering::Relaxed) {
                        signal.next_window(&mut batch);
                        producer.push(&batch);
                        thread::sleep(cadence);
                    }
                })?,
        );
        Box::new(consumer)
    };

    let mut pipeline = FeaturePipeline::new(config, source)?;
    log::info!(
        "metering {} Hz {} channel audio for {:.1}s at {} polls/s",
        config.sample_rate,
        config.channels,
        args.seconds,
        args.fps
    );

    let poll_interval = Duration::from_secs_f64(1.0 / args.fps.max(1) as f64);
    let polls = (args.seconds * args.fps as f64).ceil() as u64;
    for _ in 0..polls {
        let features = pipeline.poll();
        let levels = features.levels;
        if features.beat.is_beat {
            log::info!(
                "bass {:.2} mid {:.2} treble {:.2} volume {:.2}  BEAT {:.2}",
                levels.bass,
                levels.mid,
                levels.treble,
                levels.volume,
                features.beat.intensity
            );
        } else {
            log::debug!(
                "bass {:.2} mid {:.2} treble {:.2} volume {:.2} ({} captured frames)",
                levels.bass,
                levels.mid,
                levels.treble,
                levels.volume,
                features.captured_frames
            );
        }
        thread::sleep(poll_interval);
    }

    // Ordered teardown: stop the producer before the pipeline (and with it
    // the transfer buffer) goes away.
    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = capture_thread {
        handle.join().expect("capture thread panicked");
    }

    Ok(())
}
