use ringbuf::HeapRb;
use ringbuf::traits::{Consumer, Observer, RingBuffer};
use std::sync::{Arc, Mutex};

use crate::config::{AudioConfig, ConfigError};
use crate::source::FrameSource;

struct Shared {
    ring: Mutex<HeapRb<f32>>,
    channels: usize,
    sample_rate: u32,
}

/// Capture-side handle of a transfer channel. Owned by the backend adapter
/// that receives samples on the real-time thread.
pub struct TransferProducer {
    shared: Arc<Shared>,
}

/// Analysis-side handle of a transfer channel. Owned by the feature
/// pipeline, polled once per render frame.
pub struct TransferConsumer {
    shared: Arc<Shared>,
}

/// Creates the single-producer single-consumer channel that decouples the
/// real-time capture callback from the analysis consumer. The ring and its
/// lock are shared by the two returned handles and not otherwise reachable.
pub fn transfer_channel(
    config: &AudioConfig,
) -> Result<(TransferProducer, TransferConsumer), ConfigError> {
    config.validate()?;
    let shared = Arc::new(Shared {
        ring: Mutex::new(HeapRb::<f32>::new(config.ring_frames() * config.channels)),
        channels: config.channels,
        sample_rate: config.sample_rate,
    });
    let producer = TransferProducer {
        shared: shared.clone(),
    };
    let consumer = TransferConsumer { shared };
    Ok((producer, consumer))
}

impl TransferProducer {
    /// Appends interleaved samples, discarding the oldest queued samples on
    /// overflow so the writer never waits on the reader. Safe to call from a
    /// real-time thread: the critical section is a bounded copy with no
    /// allocation and no I/O.
    pub fn push(&self, samples: &[f32]) {
        let mut ring = self.shared.ring.lock().unwrap();
        ring.push_slice_overwrite(samples);
    }
}

impl TransferConsumer {
    /// Copies up to `out.len() / channels` frames into `out` and zero-fills
    /// whatever the ring could not provide, so the caller always gets a
    /// full-length window. Returns how many frames are real data rather than
    /// silence padding. `out` must hold a whole number of frames.
    pub fn pull(&self, out: &mut [f32]) -> usize {
        let channels = self.shared.channels;
        debug_assert_eq!(out.len() % channels, 0);
        let requested = out.len() / channels;

        let copied = {
            let mut ring = self.shared.ring.lock().unwrap();
            // Only whole frames leave the ring; a partial trailing frame
            // stays queued until its remaining channels arrive.
            let available = ring.occupied_len() / channels;
            let take = available.min(requested);
            ring.pop_slice(&mut out[..take * channels]);
            take
        };

        // Pad with silence outside the critical section.
        out[copied * channels..].fill(0.0);
        copied
    }

    /// Whole frames currently queued, for observability.
    pub fn available_frames(&self) -> usize {
        self.shared.ring.lock().unwrap().occupied_len() / self.shared.channels
    }
}

impl FrameSource for TransferConsumer {
    fn sample_rate(&self) -> u32 {
        self.shared.sample_rate
    }

    fn channels(&self) -> usize {
        self.shared.channels
    }

    fn next_window(&mut self, window: &mut [f32]) -> usize {
        self.pull(window)
    }
}
