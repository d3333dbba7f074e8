//! Decode compressed audio byte buffers into interleaved 16-bit PCM.
//!
//! This crate turns an in-memory blob containing WAV, Ogg/Opus, Ogg/Vorbis or
//! raw MP3 data into a [`DecodedAudio`] buffer: interleaved signed 16-bit
//! little-endian samples plus channel count and sample rate. It is meant for
//! audio payloads embedded inside larger asset files, where the caller already
//! holds the complete blob and just wants PCM out of it.
//!
//! The Ogg-wrapped codecs are demuxed here: [`ogg`] walks physical pages and
//! reconstructs packets from the lacing table, and the per-codec decoders feed
//! those packets to `opus` and `lewton`. MP3 is decoded frame by frame with
//! `rmp3`, and WAV is a plain RIFF chunk walk with a verbatim PCM copy.
//!
//! # Examples
//!
//! ```no_run
//! use pcmdec::{decode, AudioFormat};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let blob = std::fs::read("clip.ogg")?;
//!     let audio = decode(&blob, AudioFormat::Auto)?;
//!     println!(
//!         "{} ch @ {} Hz, {} samples",
//!         audio.channels(),
//!         audio.sample_rate(),
//!         audio.sample_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Decoding never streams: one call consumes one buffer and returns the whole
//! result. Calls share no state, so independent buffers may be decoded from
//! multiple threads concurrently.

mod common;
pub mod decoder;
pub mod ogg;

pub use common::{ChannelCount, SampleRate};
pub use decoder::{decode, AudioFormat, DecodedAudio, DecoderError};
