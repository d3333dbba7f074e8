//! Decoder for Vorbis in an Ogg container.
//!
//! Vorbis negotiates with three header packets (identification, comment and
//! setup) which must all be seen before any audio packet can be decoded.
//! They are collected from granule-0 pages by their 7-byte tag prefixes, then
//! handed to `lewton`'s packet-level API. `lewton` keeps the previous window
//! state between packets and converts floats to clamped i16 internally, which
//! covers libvorbis's block/pcmout accumulation model.

use lewton::audio::{read_audio_packet, PreviousWindowRight};
use lewton::header::{read_header_comment, read_header_ident, read_header_setup};

use crate::common::ChannelCount;
use crate::ogg::Pages;

use super::DecodedAudio;

/// The three mandatory header packets, borrowed from the source buffer, and
/// the serial of the logical stream that carried the identification header.
struct HeaderPackets<'a> {
    ident: &'a [u8],
    comment: &'a [u8],
    setup: &'a [u8],
    serial: u32,
}

pub(super) fn decode(data: &[u8]) -> Option<DecodedAudio> {
    let mut pages = Pages::new(data);
    let headers = collect_headers(&mut pages)?;

    let ident = read_header_ident(headers.ident).ok()?;
    read_header_comment(headers.comment).ok()?;
    let setup = read_header_setup(
        headers.setup,
        ident.audio_channels,
        (ident.blocksize_0, ident.blocksize_1),
    )
    .ok()?;

    let channels = ident.audio_channels;
    let sample_rate = ident.audio_sample_rate;
    if channels < 1 || sample_rate == 0 {
        return None;
    }

    let mut window = PreviousWindowRight::new();
    let mut pcm = Vec::new();
    for page in pages {
        if page.granule_position == 0 || page.serial != headers.serial || page.segments.is_empty()
        {
            continue;
        }
        for &packet in &page.segments {
            match read_audio_packet(&ident, &setup, packet, &mut window) {
                Ok(decoded) => interleave(&mut pcm, &decoded),
                // Drop the rest of this page, keep what already decoded.
                Err(_) => break,
            }
        }
    }

    Some(DecodedAudio::new(
        ChannelCount::from(channels),
        sample_rate,
        pcm,
    ))
}

/// Walks granule-0 pages until all three header packets are collected.
///
/// A later packet with the same tag replaces an earlier one. The serial is
/// pinned by the identification header's page; comment and setup packets are
/// taken from any header page, since real files interleave them freely.
fn collect_headers<'a>(pages: &mut Pages<'a>) -> Option<HeaderPackets<'a>> {
    let mut ident: Option<(&[u8], u32)> = None;
    let mut comment: Option<&[u8]> = None;
    let mut setup: Option<&[u8]> = None;

    while ident.is_none() || comment.is_none() || setup.is_none() {
        let page = pages.next()?;
        if page.granule_position != 0 {
            continue;
        }
        for &packet in &page.segments {
            if packet.len() < 7 {
                continue;
            }
            match &packet[0..7] {
                b"\x01vorbis" => ident = Some((packet, page.serial)),
                b"\x03vorbis" => comment = Some(packet),
                b"\x05vorbis" => setup = Some(packet),
                _ => {}
            }
        }
    }

    let (ident, serial) = ident?;
    Some(HeaderPackets {
        ident,
        comment: comment?,
        setup: setup?,
        serial,
    })
}

/// Interleaves lewton's per-channel sample vectors into LE bytes.
fn interleave(pcm: &mut Vec<u8>, decoded: &[Vec<i16>]) {
    let frames = decoded.first().map_or(0, Vec::len);
    pcm.reserve(frames * decoded.len() * 2);
    for frame in 0..frames {
        for channel in decoded {
            pcm.extend_from_slice(&channel[frame].to_le_bytes());
        }
    }
}
