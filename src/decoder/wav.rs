//! Decoder for the WAV format.
//!
//! WAV needs no real decoding: the RIFF chunk walk locates the `fmt ` chunk
//! for channel count and sample rate and the `data` chunk for the payload,
//! which is copied verbatim. Only 16-bit integer PCM is accepted; anything
//! else would need sample conversion, which this crate does not do.

use crate::common::{ChannelCount, SampleRate};

use super::DecodedAudio;

struct FormatChunk {
    channels: ChannelCount,
    sample_rate: SampleRate,
}

pub(super) fn decode(data: &[u8]) -> Option<DecodedAudio> {
    if data.len() < 12 || &data[0..4] != b"RIFF" || &data[8..12] != b"WAVE" {
        return None;
    }

    let mut format: Option<FormatChunk> = None;
    let mut payload: Option<&[u8]> = None;
    let mut offset = 12;
    while format.is_none() || payload.is_none() {
        if offset + 8 > data.len() {
            return None;
        }
        let id = &data[offset..offset + 4];
        let size = u32::from_le_bytes([
            data[offset + 4],
            data[offset + 5],
            data[offset + 6],
            data[offset + 7],
        ]) as usize;
        let body = data.get(offset + 8..)?.get(..size)?;

        match id {
            b"fmt " => format = Some(parse_format(body)?),
            b"data" => payload = Some(body),
            _ => {}
        }

        // Chunk bodies are padded to even length.
        offset += 8 + size + (size & 1);
    }

    let format = format?;
    Some(DecodedAudio::new(
        format.channels,
        format.sample_rate,
        payload?.to_vec(),
    ))
}

fn parse_format(body: &[u8]) -> Option<FormatChunk> {
    if body.len() < 16 {
        return None;
    }
    let format_tag = u16::from_le_bytes([body[0], body[1]]);
    let channels = u16::from_le_bytes([body[2], body[3]]);
    let sample_rate = u32::from_le_bytes([body[4], body[5], body[6], body[7]]);
    let bits_per_sample = u16::from_le_bytes([body[14], body[15]]);

    // 1 = integer PCM. No conversion happens here, so the payload must
    // already be interleaved i16.
    if format_tag != 1 || bits_per_sample != 16 || channels < 1 || sample_rate == 0 {
        return None;
    }
    Some(FormatChunk {
        channels,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_wav(channels: u16, sample_rate: u32, payload: &[u8]) -> Vec<u8> {
        let mut fmt = Vec::new();
        fmt.extend_from_slice(&1u16.to_le_bytes()); // PCM
        fmt.extend_from_slice(&channels.to_le_bytes());
        fmt.extend_from_slice(&sample_rate.to_le_bytes());
        fmt.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
        fmt.extend_from_slice(&(channels * 2).to_le_bytes());
        fmt.extend_from_slice(&16u16.to_le_bytes());

        let mut wav = Vec::new();
        wav.extend_from_slice(b"RIFF");
        let riff_size = 4 + 8 + fmt.len() + 8 + payload.len();
        wav.extend_from_slice(&(riff_size as u32).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&(fmt.len() as u32).to_le_bytes());
        wav.extend_from_slice(&fmt);
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        wav.extend_from_slice(payload);
        wav
    }

    #[test]
    fn payload_passes_through_byte_exact() {
        let payload = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let wav = build_wav(2, 22050, &payload);
        let audio = decode(&wav).unwrap();
        assert_eq!(audio.channels(), 2);
        assert_eq!(audio.sample_rate(), 22050);
        assert_eq!(audio.pcm(), &payload);
    }

    #[test]
    fn unknown_chunks_are_skipped() {
        let payload = [0u8; 4];
        let mut wav = build_wav(1, 8000, &payload);
        // Splice a LIST chunk with an odd size (pad byte follows) after WAVE.
        let mut list = Vec::new();
        list.extend_from_slice(b"LIST");
        list.extend_from_slice(&3u32.to_le_bytes());
        list.extend_from_slice(b"abc\0");
        wav.splice(12..12, list);
        assert!(decode(&wav).is_some());
    }

    #[test]
    fn rejects_non_pcm16_and_truncated_chunks() {
        let payload = [0u8; 4];
        let mut float_wav = build_wav(1, 8000, &payload);
        float_wav[20] = 3; // format tag: IEEE float
        assert!(decode(&float_wav).is_none());

        let wav = build_wav(1, 8000, &payload);
        assert!(decode(&wav[..wav.len() - 1]).is_none());
        assert!(decode(b"RIFF\x04\x00\x00\x00WAVE").is_none());
        assert!(decode(b"not audio").is_none());
    }
}
