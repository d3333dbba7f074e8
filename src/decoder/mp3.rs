//! Decoder for raw MP3 elementary streams.
//!
//! The buffer is consumed frame by frame with minimp3's raw frame step
//! (`rmp3::RawDecoder`), advancing by each frame's consumed byte length.
//! Unlike the Ogg decoders, anything that is not a decodable audio frame is
//! fatal for the whole buffer: MP3 has no container to resynchronize on, and
//! its sync pattern matches random bytes too easily for partial results to
//! mean anything. Channel count and sample rate are taken from each frame,
//! last writer wins, matching constant-format files.

use rmp3::{Frame, RawDecoder, MAX_SAMPLES_PER_FRAME};

use crate::common::{ChannelCount, SampleRate};

use super::{utils, DecodedAudio};

pub(super) fn decode(data: &[u8]) -> Option<DecodedAudio> {
    let mut decoder = RawDecoder::new();
    let mut scratch = [0i16; MAX_SAMPLES_PER_FRAME];

    let mut channels: ChannelCount = 0;
    let mut sample_rate: SampleRate = 0;
    let mut pcm = Vec::new();
    let mut offset = 0;
    while offset < data.len() {
        let (frame, consumed) = decoder.next(&data[offset..], &mut scratch)?;
        let audio = match frame {
            Frame::Audio(audio) => audio,
            // Bytes that never resolve to an audio frame: give up entirely.
            Frame::Other(_) => return None,
        };
        if audio.sample_count() == 0 {
            return None;
        }

        channels = audio.channels();
        sample_rate = audio.sample_rate();
        utils::extend_pcm(&mut pcm, audio.samples());
        offset += consumed;
    }

    if channels < 1 || sample_rate == 0 {
        return None;
    }
    Some(DecodedAudio::new(channels, sample_rate, pcm))
}
