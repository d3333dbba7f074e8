//! Decoder for Opus in an Ogg container.
//!
//! Demuxing happens here; only the packet decode is delegated to libopus via
//! the `opus` crate. The identification header fixes the channel count, and
//! output is always at 48 kHz, since Opus decodes at its internal reference
//! rate no matter what the source material was sampled at.

use opus::Channels;

use crate::common::{ChannelCount, SampleRate};
use crate::ogg::Pages;

use super::{utils, DecodedAudio};

/// Opus always decodes at its reference rate.
const OPUS_SAMPLE_RATE: SampleRate = 48_000;

/// Frames in the largest legal packet: 120 ms at 48 kHz.
const MAX_FRAME_SIZE: usize = 5760;

pub(super) fn decode(data: &[u8]) -> Option<DecodedAudio> {
    let mut pages = Pages::new(data);
    let (channels, serial) = find_opus_head(&mut pages)?;
    if channels < 1 {
        return None;
    }

    // libopus only instantiates mono and stereo decoders; multistream
    // surround files fail here, as they would in the reference decoder.
    let layout = match channels {
        1 => Channels::Mono,
        2 => Channels::Stereo,
        _ => return None,
    };
    let mut decoder = opus::Decoder::new(OPUS_SAMPLE_RATE, layout).ok()?;

    let mut scratch = vec![0i16; MAX_FRAME_SIZE * channels as usize];
    let mut pcm = Vec::new();
    for page in pages {
        if page.granule_position == 0 || page.serial != serial || page.segments.is_empty() {
            continue;
        }
        for &packet in &page.segments {
            match decoder.decode(packet, &mut scratch, false) {
                // A packet may legally decode to nothing (e.g. DTX).
                Ok(0) => {}
                Ok(frames) => utils::extend_pcm(&mut pcm, &scratch[..frames * channels as usize]),
                // Drop the rest of this page, keep what already decoded.
                Err(_) => break,
            }
        }
    }

    Some(DecodedAudio::new(
        ChannelCount::from(channels),
        OPUS_SAMPLE_RATE,
        pcm,
    ))
}

/// Scans forward to the `OpusHead` identification page, returning the channel
/// count it declares and the serial of the logical stream carrying it.
fn find_opus_head(pages: &mut Pages<'_>) -> Option<(u8, u32)> {
    pages.find_map(|page| {
        if page.granule_position != 0 || page.segments.len() != 1 {
            return None;
        }
        let head = page.segments[0];
        if head.len() != 19 || &head[0..8] != b"OpusHead" {
            return None;
        }
        Some((head[9], page.serial))
    })
}
