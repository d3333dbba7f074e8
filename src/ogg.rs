//! Ogg physical page parsing.
//!
//! An Ogg file is a sequence of pages, each carrying fragments of one logical
//! bitstream identified by a serial number. A page starts with a 27-byte
//! header (`"OggS"` sync, version, flags, granule position, serial, sequence,
//! checksum, segment count) followed by a lacing table and the concatenated
//! packet payload. Packets are run-length coded in the lacing table: a lacing
//! byte of `0xFF` means the current packet continues into the next byte, any
//! smaller value (or the final table entry) terminates it.
//!
//! Parsing is pure and bounds-checked. A buffer that is too short, lacks the
//! sync pattern, or declares more payload than it holds is simply "not a
//! page"; the decoders treat that as end of stream. The page checksum is read
//! over but not validated, since this crate decodes pre-existing files rather
//! than authenticating them.

/// Fixed header bytes before the lacing table.
const HEADER_LEN: usize = 27;

/// One physical Ogg page, borrowing its packet payload from the source buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OggPage<'a> {
    /// Stream structure version, `0` for every known stream.
    pub version: u8,
    /// Continuation / beginning-of-stream / end-of-stream flag bits.
    pub flags: u8,
    /// Codec-defined position counter. Header pages carry `0`, pages with
    /// decodable audio carry a positive value.
    pub granule_position: u64,
    /// Serial number of the logical bitstream this page belongs to.
    pub serial: u32,
    /// Page counter within the logical bitstream.
    pub sequence: u32,
    /// Packets (or packet fragments) reconstructed from the lacing table, in
    /// order of appearance.
    pub segments: Vec<&'a [u8]>,
    /// Total byte length of the page: header, lacing table and payload. The
    /// caller advances its read offset by this much.
    pub page_size: usize,
}

/// Parses one page from the start of `data`.
///
/// Returns `None` when `data` does not begin with a complete, well-formed
/// page. Pure function: no state is kept between calls.
pub fn parse_page(data: &[u8]) -> Option<OggPage<'_>> {
    if data.len() < HEADER_LEN || &data[0..4] != b"OggS" {
        return None;
    }

    let lacing_len = data[26] as usize;
    if data.len() < HEADER_LEN + lacing_len {
        return None;
    }

    let mut segments = Vec::new();
    let mut offset = HEADER_LEN + lacing_len;
    let mut segment_len = 0;
    for (index, &lacing) in data[HEADER_LEN..HEADER_LEN + lacing_len].iter().enumerate() {
        segment_len += lacing as usize;
        if lacing < 0xFF || index == lacing_len - 1 {
            let segment = data.get(offset..offset + segment_len)?;
            segments.push(segment);
            offset += segment_len;
            segment_len = 0;
        }
    }

    Some(OggPage {
        version: data[4],
        flags: data[5],
        granule_position: read_u64_le(&data[6..14]),
        serial: read_u32_le(&data[14..18]),
        sequence: read_u32_le(&data[18..22]),
        segments,
        page_size: offset,
    })
}

/// Iterator over the consecutive pages of a buffer.
///
/// Advances by each page's [`page_size`](OggPage::page_size) and stops at the
/// first position that does not parse as a page, so a truncated or garbage
/// tail ends iteration rather than erroring.
pub struct Pages<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Pages<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Pages { data, offset: 0 }
    }
}

impl<'a> Iterator for Pages<'a> {
    type Item = OggPage<'a>;

    fn next(&mut self) -> Option<OggPage<'a>> {
        let page = parse_page(&self.data[self.offset.min(self.data.len())..])?;
        self.offset += page.page_size;
        Some(page)
    }
}

fn read_u32_le(data: &[u8]) -> u32 {
    u32::from_le_bytes([data[0], data[1], data[2], data[3]])
}

fn read_u64_le(data: &[u8]) -> u64 {
    u64::from_le_bytes([
        data[0], data[1], data[2], data[3], data[4], data[5], data[6], data[7],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::quickcheck;

    /// Serializes a page with the given packets, emitting `0xFF`-continued
    /// lacing entries for packets of 255 bytes or more.
    fn build_page(serial: u32, granule: u64, packets: &[&[u8]]) -> Vec<u8> {
        let mut lacing = Vec::new();
        for packet in packets {
            let mut remaining = packet.len();
            while remaining >= 255 {
                lacing.push(0xFF);
                remaining -= 255;
            }
            lacing.push(remaining as u8);
        }
        assert!(lacing.len() <= 255, "too many lacing entries for one page");

        let mut page = Vec::new();
        page.extend_from_slice(b"OggS");
        page.push(0); // version
        page.push(0); // flags
        page.extend_from_slice(&granule.to_le_bytes());
        page.extend_from_slice(&serial.to_le_bytes());
        page.extend_from_slice(&7u32.to_le_bytes()); // sequence
        page.extend_from_slice(&0u32.to_le_bytes()); // checksum, unvalidated
        page.push(lacing.len() as u8);
        page.extend_from_slice(&lacing);
        for packet in packets {
            page.extend_from_slice(packet);
        }
        page
    }

    #[test]
    fn round_trips_packets_and_page_size() {
        let long_packet = vec![0xABu8; 520]; // laces as 255 + 255 + 10
        let packets: [&[u8]; 3] = [b"first", &long_packet, b""];
        let data = build_page(0xDEAD_BEEF, 42, &packets);

        let page = parse_page(&data).unwrap();
        assert_eq!(page.serial, 0xDEAD_BEEF);
        assert_eq!(page.granule_position, 42);
        assert_eq!(page.sequence, 7);
        assert_eq!(page.page_size, data.len());
        assert_eq!(page.segments.len(), 3);
        assert_eq!(page.segments[0], b"first");
        assert_eq!(page.segments[1], &long_packet[..]);
        assert_eq!(page.segments[2], b"");

        // Re-serializing the recovered segments reproduces the payload.
        let payload: Vec<u8> = page.segments.concat();
        assert_eq!(&data[data.len() - payload.len()..], &payload[..]);
    }

    #[test]
    fn packet_of_exactly_255_bytes_needs_a_zero_terminator() {
        let packet = vec![1u8; 255];
        let data = build_page(1, 0, &[&packet]);
        let page = parse_page(&data).unwrap();
        assert_eq!(page.segments, vec![&packet[..]]);
    }

    #[test]
    fn rejects_missing_sync_and_short_buffers() {
        assert!(parse_page(b"").is_none());
        assert!(parse_page(b"OggS").is_none());
        let mut data = build_page(1, 0, &[b"payload"]);
        data[2] = b'x';
        assert!(parse_page(&data).is_none());
    }

    #[test]
    fn any_truncation_of_a_valid_page_fails() {
        let packets: [&[u8]; 2] = [&[9u8; 300], b"tail"];
        let data = build_page(3, 1, &packets);
        assert!(parse_page(&data).is_some());
        for len in 0..data.len() {
            assert!(
                parse_page(&data[..len]).is_none(),
                "parsed a page from {len} of {} bytes",
                data.len()
            );
        }
    }

    #[test]
    fn pages_iterator_stops_at_garbage() {
        let mut data = build_page(5, 0, &[b"one"]);
        data.extend_from_slice(&build_page(5, 1, &[b"two"]));
        data.extend_from_slice(b"not a page at all");

        let granules: Vec<u64> = Pages::new(&data).map(|p| p.granule_position).collect();
        assert_eq!(granules, vec![0, 1]);
    }

    quickcheck! {
        fn arbitrary_bytes_never_panic(data: Vec<u8>) -> bool {
            match parse_page(&data) {
                None => true,
                Some(page) => {
                    let payload: usize = page.segments.iter().map(|s| s.len()).sum();
                    page.page_size <= data.len()
                        && page.page_size >= HEADER_LEN + payload
                }
            }
        }
    }
}
