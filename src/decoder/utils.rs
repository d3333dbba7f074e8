//! Helpers shared by the decoder implementations.

use std::time::Duration;

use crate::common::SampleRate;

/// Converts a frame count and sample rate to a duration with nanosecond
/// precision by handling the fractional part of the division separately.
pub(super) fn samples_to_duration(samples: u64, sample_rate: SampleRate) -> Duration {
    if sample_rate == 0 {
        return Duration::ZERO;
    }
    let sample_rate = sample_rate as u64;
    let secs = samples / sample_rate;
    let nanos = ((samples % sample_rate) * 1_000_000_000) / sample_rate;
    Duration::new(secs, nanos as u32)
}

/// Appends samples to a PCM byte buffer as little-endian i16.
pub(super) fn extend_pcm(pcm: &mut Vec<u8>, samples: &[i16]) {
    pcm.reserve(samples.len() * 2);
    for sample in samples {
        pcm.extend_from_slice(&sample.to_le_bytes());
    }
}
