// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use crate::parser::Stream;

/// Parses the character to glyph index mapping.
///
/// Walks the encoding records, picks the best Unicode subtable
/// and parses it. Formats 0, 4 and 12 are supported.
pub(crate) fn parse(data: &[u8]) -> Option<BTreeMap<u32, u16>> {
    let mut s = Stream::new(data);
    s.skip(2)?; // version
    let num_tables = s.read_u16()?;

    let mut records = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let platform_id = s.read_u16()?;
        let encoding_id = s.read_u16()?;
        let offset = s.read_u32()? as usize;
        records.push((platform_id, encoding_id, offset));
    }

    // Prefer full Unicode, then BMP, then whatever is left.
    records.sort_by_key(|&(p, e, _)| {
        std::cmp::Reverse(match (p, e) {
            (3, 10) => 5,
            (0, 4..=6) => 4,
            (3, 1) => 3,
            (0, 0..=3) => 2,
            _ => 1,
        })
    });

    for (_, _, offset) in records {
        if let Some(map) = parse_subtable(data, offset) {
            if !map.is_empty() {
                return Some(map);
            }
        }
    }

    None
}

fn parse_subtable(data: &[u8], offset: usize) -> Option<BTreeMap<u32, u16>> {
    let mut s = Stream::new_at(data, offset)?;
    let format = s.read_u16()?;
    match format {
        0 => parse_format0(s),
        4 => parse_format4(data, s),
        12 => parse_format12(s),
        _ => None,
    }
}

fn parse_format0(mut s: Stream) -> Option<BTreeMap<u32, u16>> {
    s.skip(2)?; // length
    s.skip(2)?; // language

    let mut map = BTreeMap::new();
    for code in 0u32..256 {
        let glyph = s.read_u8()?;
        if glyph != 0 {
            map.insert(code, glyph as u16);
        }
    }

    Some(map)
}

fn parse_format4(data: &[u8], mut s: Stream) -> Option<BTreeMap<u32, u16>> {
    s.skip(2)?; // length
    s.skip(2)?; // language
    let seg_count_x2 = s.read_u16()? as usize;
    if seg_count_x2 < 2 || seg_count_x2 % 2 != 0 {
        return None;
    }
    let seg_count = seg_count_x2 / 2;
    s.skip(6)?; // searchRange, entrySelector, rangeShift

    let mut end_codes = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        end_codes.push(s.read_u16()?);
    }
    s.skip(2)?; // reservedPad
    let mut start_codes = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        start_codes.push(s.read_u16()?);
    }
    let mut id_deltas = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        id_deltas.push(s.read_i16()?);
    }

    // idRangeOffsets are relative to their own position in the table.
    let range_offsets_pos = s.offset();
    let mut id_range_offsets = Vec::with_capacity(seg_count);
    for _ in 0..seg_count {
        id_range_offsets.push(s.read_u16()?);
    }

    let mut map = BTreeMap::new();
    for i in 0..seg_count {
        let start = start_codes[i];
        let end = end_codes[i];
        if start > end {
            return None;
        }

        for code in start..=end {
            if code == 0xFFFF {
                continue;
            }

            let glyph = if id_range_offsets[i] == 0 {
                (code as i32 + id_deltas[i] as i32) as u16
            } else {
                let pos = range_offsets_pos
                    + i * 2
                    + id_range_offsets[i] as usize
                    + (code - start) as usize * 2;
                // Offsets come from file data, so they are not trusted.
                let glyph = Stream::new_at(data, pos)?.read_u16()?;
                if glyph == 0 {
                    continue;
                }
                (glyph as i32 + id_deltas[i] as i32) as u16
            };

            if glyph != 0 {
                map.insert(code as u32, glyph);
            }
        }
    }

    Some(map)
}

fn parse_format12(mut s: Stream) -> Option<BTreeMap<u32, u16>> {
    s.skip(2)?; // reserved
    s.skip(4)?; // length
    s.skip(4)?; // language
    let num_groups = s.read_u32()?;

    // A limit against malformed group counts.
    if num_groups > 100_000 {
        return None;
    }

    let mut map = BTreeMap::new();
    for _ in 0..num_groups {
        let start_char = s.read_u32()?;
        let end_char = s.read_u32()?;
        let start_glyph = s.read_u32()?;

        if start_char > end_char || end_char - start_char > 0x10FFFF {
            return None;
        }

        for (i, code) in (start_char..=end_char).enumerate() {
            let glyph = start_glyph.checked_add(i as u32)?;
            if glyph != 0 && glyph <= u16::MAX as u32 {
                map.insert(code, glyph as u16);
            }
        }
    }

    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Writer;

    fn format4_table(segments: &[(u16, u16, i16)]) -> Vec<u8> {
        let seg_count = segments.len() as u16;
        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // numTables
        w.write_u16(3); // platform
        w.write_u16(1); // encoding
        w.write_u32(12); // offset

        w.write_u16(4); // format
        w.write_u16(16 + seg_count * 8); // length
        w.write_u16(0); // language
        w.write_u16(seg_count * 2);
        w.write_u16(0); // searchRange, unused on read
        w.write_u16(0);
        w.write_u16(0);
        for seg in segments {
            w.write_u16(seg.1);
        }
        w.write_u16(0); // reservedPad
        for seg in segments {
            w.write_u16(seg.0);
        }
        for seg in segments {
            w.write_i16(seg.2);
        }
        for _ in segments {
            w.write_u16(0); // idRangeOffset
        }

        w.finish()
    }

    #[test]
    fn format4_delta_runs() {
        let data = format4_table(&[(0x41, 0x43, -0x40), (0x61, 0x61, -0x5D), (0xFFFF, 0xFFFF, 1)]);
        let map = parse(&data).unwrap();

        assert_eq!(map.get(&0x41), Some(&1));
        assert_eq!(map.get(&0x42), Some(&2));
        assert_eq!(map.get(&0x43), Some(&3));
        assert_eq!(map.get(&0x61), Some(&4));
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn format0_byte_mapping() {
        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // numTables
        w.write_u16(1); // platform
        w.write_u16(0); // encoding
        w.write_u32(12); // offset
        w.write_u16(0); // format
        w.write_u16(262); // length
        w.write_u16(0); // language
        let mut glyphs = [0u8; 256];
        glyphs[b'A' as usize] = 7;
        w.write_bytes(&glyphs);

        let map = parse(&w.finish()).unwrap();
        assert_eq!(map.get(&(b'A' as u32)), Some(&7));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn format12_groups() {
        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // numTables
        w.write_u16(3); // platform
        w.write_u16(10); // encoding
        w.write_u32(12); // offset
        w.write_u16(12); // format
        w.write_u16(0); // reserved
        w.write_u32(16 + 12); // length
        w.write_u32(0); // language
        w.write_u32(1); // numGroups
        w.write_u32(0x1F600);
        w.write_u32(0x1F602);
        w.write_u32(100);

        let map = parse(&w.finish()).unwrap();
        assert_eq!(map.get(&0x1F600), Some(&100));
        assert_eq!(map.get(&0x1F602), Some(&102));
    }
}
