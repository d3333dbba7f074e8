//! Decodes audio buffers into 16-bit PCM.
//!
//! [`decode`] is the single entry point: hand it a byte buffer and an
//! [`AudioFormat`] and it returns the whole stream as [`DecodedAudio`]. With
//! [`AudioFormat::Auto`] the decoders are probed in a fixed order: WAV first
//! because its magic header is the cheapest to reject, the Ogg-wrapped codecs
//! next, and MP3 last because its frame sync can spuriously match arbitrary
//! bytes, making it the most permissive detector.
//!
//! Failure is deliberately coarse: every unreadable buffer is
//! [`DecoderError::UnrecognizedFormat`], and no partial PCM ever reaches the
//! caller.

use std::time::Duration;

use crate::common::{ChannelCount, SampleRate};

mod mp3;
mod opus;
mod utils;
mod vorbis;
mod wav;

/// The source encoding of a buffer handed to [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// Probe WAV, Ogg/Opus, Ogg/Vorbis and MP3 in that order.
    Auto,
    /// RIFF/WAVE with a 16-bit PCM payload.
    Wav,
    /// Opus in an Ogg container.
    OggOpus,
    /// Vorbis in an Ogg container.
    OggVorbis,
    /// Raw MP3 elementary stream.
    Mp3,
}

/// Errors that can occur when decoding a buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecoderError {
    /// The format of the data has not been recognized or the data is invalid.
    #[error("Unrecognized or invalid audio data")]
    UnrecognizedFormat,
}

/// A fully decoded stream: interleaved signed 16-bit little-endian samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    channels: ChannelCount,
    sample_rate: SampleRate,
    pcm: Vec<u8>,
}

impl DecodedAudio {
    pub(crate) fn new(channels: ChannelCount, sample_rate: SampleRate, pcm: Vec<u8>) -> Self {
        DecodedAudio {
            channels,
            sample_rate,
            pcm,
        }
    }

    /// Number of channels, at least 1.
    pub fn channels(&self) -> ChannelCount {
        self.channels
    }

    /// Sample rate in Hz. Always 48 000 for Opus sources, which decode at
    /// the codec's internal reference rate regardless of the original.
    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    /// The interleaved i16 little-endian sample data.
    pub fn pcm(&self) -> &[u8] {
        &self.pcm
    }

    /// Consumes `self`, returning the PCM buffer.
    pub fn into_pcm(self) -> Vec<u8> {
        self.pcm
    }

    /// Number of sample frames (one sample per channel each).
    pub fn sample_count(&self) -> usize {
        self.pcm.len() / (self.channels as usize * 2)
    }

    /// Playback length of the decoded stream.
    pub fn total_duration(&self) -> Duration {
        utils::samples_to_duration(self.sample_count() as u64, self.sample_rate)
    }
}

type DecodeFn = fn(&[u8]) -> Option<DecodedAudio>;

/// Closed dispatch table, in auto-probe order. Adding a format means adding
/// a row here (and a variant above), not editing a chain.
const DECODERS: [(AudioFormat, DecodeFn); 4] = [
    (AudioFormat::Wav, wav::decode),
    (AudioFormat::OggOpus, opus::decode),
    (AudioFormat::OggVorbis, vorbis::decode),
    (AudioFormat::Mp3, mp3::decode),
];

/// Decodes `data` into interleaved 16-bit PCM.
///
/// With a specific [`AudioFormat`] only that decoder is attempted; with
/// [`AudioFormat::Auto`] the first decoder in probe order that accepts the
/// buffer wins.
///
/// # Errors
///
/// Returns [`DecoderError::UnrecognizedFormat`] if no decoder (or the one
/// requested) could decode the buffer.
pub fn decode(data: &[u8], format: AudioFormat) -> Result<DecodedAudio, DecoderError> {
    let decoded = match format {
        AudioFormat::Auto => DECODERS.iter().find_map(|(_format, decode)| {
            #[cfg(feature = "tracing")]
            tracing::debug!(format = ?_format, len = data.len(), "probing");
            decode(data)
        }),
        requested => DECODERS
            .iter()
            .find(|(format, _)| *format == requested)
            .and_then(|(_, decode)| decode(data)),
    };
    decoded.ok_or(DecoderError::UnrecognizedFormat)
}
