// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Font serialization.
//!
//! Every table is regenerated from the parsed record; only glyph
//! outline bytes are emitted verbatim.

use std::collections::BTreeMap;

use crate::parser::{checksum, Tag, Writer};
use crate::Font;

/// Seconds between 1904-01-01 and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

const HEAD_MAGIC: u32 = 0x5F0F_3CF5;

/// Rounds a byte length up to the next 4-byte boundary.
fn aligned4(len: usize) -> usize {
    (len + 3) & !3
}

impl Font {
    /// Serializes the font into a valid font file.
    ///
    /// Tables are sorted by tag, 4-byte aligned and carry correct
    /// checksums. The `head` checksum adjustment is left at zero.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (glyf, loca, loc_format) = self.build_glyf_loca();

        let mut tables: Vec<(Tag, Vec<u8>)> = vec![
            (Tag::new(b"cmap"), self.build_cmap()),
            (Tag::new(b"glyf"), glyf),
            (Tag::new(b"head"), self.build_head(loc_format)),
            (Tag::new(b"hhea"), self.build_hhea()),
            (Tag::new(b"hmtx"), self.build_hmtx()),
            (Tag::new(b"loca"), loca),
            (Tag::new(b"maxp"), self.build_maxp()),
            (Tag::new(b"name"), self.build_name()),
            (Tag::new(b"OS/2"), self.build_os2()),
            (Tag::new(b"post"), self.build_post()),
        ];

        if !self.kerning.is_empty() {
            tables.push((Tag::new(b"kern"), self.build_kern()));
        }

        tables.sort_by_key(|(tag, _)| *tag);

        let num_tables = tables.len() as u16;
        let directory_size = 12 + 16 * tables.len();

        let mut w = Writer::new();
        let (search_range, entry_selector, range_shift) = binary_search_header(num_tables, 16);
        w.write_u32(crate::SFNT_VERSION_TRUE_TYPE);
        w.write_u16(num_tables);
        w.write_u16(search_range);
        w.write_u16(entry_selector);
        w.write_u16(range_shift);

        let mut offset = directory_size;
        for (tag, payload) in &tables {
            w.write_tag(*tag);
            w.write_u32(checksum(payload));
            w.write_u32(offset as u32);
            w.write_u32(payload.len() as u32);
            offset += aligned4(payload.len());
        }

        for (_, payload) in &tables {
            w.write_bytes(payload);
            w.align4();
        }

        w.finish()
    }

    fn build_glyf_loca(&self) -> (Vec<u8>, Vec<u8>, i16) {
        let mut glyf = Writer::new();
        let mut offsets = Vec::with_capacity(self.glyphs.len() + 1);
        for glyph in &self.glyphs {
            offsets.push(glyf.len() as u32);
            glyf.write_bytes(glyph);
            // Short loca offsets are halved, so glyph data must be
            // 2-byte aligned. Well-formed outlines already are.
            if glyf.len() % 2 != 0 {
                glyf.write_u8(0);
            }
        }
        offsets.push(glyf.len() as u32);

        // A short table cannot address past 128k of glyph data.
        let loc_format = if self.head.index_to_loc_format == 1 || glyf.len() > 0x1FFFE {
            1
        } else {
            0
        };

        let mut loca = Writer::new();
        for n in &offsets {
            if loc_format == 0 {
                loca.write_u16((n / 2) as u16);
            } else {
                loca.write_u32(*n);
            }
        }

        (glyf.finish(), loca.finish(), loc_format)
    }

    fn build_head(&self, loc_format: i16) -> Vec<u8> {
        let now = mac_epoch_now();

        let mut mac_style = 0u16;
        if self.os2.weight_class >= 700 {
            mac_style |= 1 << 0;
        }
        if self.post.italic_angle != 0 {
            mac_style |= 1 << 1;
        }

        let font_revision = if self.head.font_revision != 0 {
            self.head.font_revision
        } else {
            0x0001_0000
        };

        let mut w = Writer::new();
        w.write_u32(0x0001_0000); // version
        w.write_i32(font_revision);
        w.write_u32(0); // checkSumAdjustment placeholder
        w.write_u32(HEAD_MAGIC);
        w.write_u16(self.head.flags);
        w.write_u16(self.units_per_em);
        w.write_i64(now); // created
        w.write_i64(now); // modified
        w.write_i16(self.head.x_min);
        w.write_i16(self.head.y_min);
        w.write_i16(self.head.x_max);
        w.write_i16(self.head.y_max);
        w.write_u16(mac_style);
        w.write_u16(9); // lowestRecPPEM
        w.write_i16(2); // fontDirectionHint
        w.write_i16(loc_format);
        w.write_i16(0); // glyphDataFormat
        w.finish()
    }

    fn build_maxp(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u32(0x0001_0000); // version
        w.write_u16(self.number_of_glyphs());
        w.write_u16(100); // maxPoints, a conservative guess
        w.write_u16(50); // maxContours
        w.write_u16(0); // maxCompositePoints
        w.write_u16(0); // maxCompositeContours
        w.write_u16(2); // maxZones
        w.write_u16(0); // maxTwilightPoints
        w.write_u16(0); // maxStorage
        w.write_u16(0); // maxFunctionDefs
        w.write_u16(0); // maxInstructionDefs
        w.write_u16(0); // maxStackElements
        w.write_u16(0); // maxSizeOfInstructions
        w.write_u16(0); // maxComponentElements
        w.write_u16(0); // maxComponentDepth
        w.finish()
    }

    fn build_hhea(&self) -> Vec<u8> {
        let advance_width_max = self.advances.iter().copied().max().unwrap_or(0);
        let min_lsb = self.bearings.iter().copied().min().unwrap_or(0);

        let mut min_rsb = i16::MAX;
        let mut x_max_extent = i16::MIN;
        let mut any_extent = false;
        for glyph_id in 0..self.number_of_glyphs() {
            if let Some((x_min, x_max)) = self.glyph_x_extents(glyph_id) {
                let advance = self.advances[glyph_id as usize] as i32;
                let lsb = self.bearings[glyph_id as usize] as i32;
                let width = x_max as i32 - x_min as i32;
                let rsb = (advance - lsb - width).max(i16::MIN as i32).min(i16::MAX as i32);
                let extent = (lsb + width).max(i16::MIN as i32).min(i16::MAX as i32);
                min_rsb = min_rsb.min(rsb as i16);
                x_max_extent = x_max_extent.max(extent as i16);
                any_extent = true;
            }
        }
        if !any_extent {
            min_rsb = 0;
            x_max_extent = 0;
        }

        let mut w = Writer::new();
        w.write_u32(0x0001_0000); // version
        w.write_i16(self.ascender);
        w.write_i16(self.descender);
        w.write_i16(self.line_gap);
        w.write_u16(advance_width_max);
        w.write_i16(min_lsb);
        w.write_i16(min_rsb);
        w.write_i16(x_max_extent);
        w.write_i16(1); // caretSlopeRise
        w.write_i16(0); // caretSlopeRun
        w.write_i16(0); // caretOffset
        for _ in 0..4 {
            w.write_i16(0); // reserved
        }
        w.write_i16(0); // metricDataFormat
        w.write_u16(self.advances.len() as u16);
        w.finish()
    }

    fn build_hmtx(&self) -> Vec<u8> {
        let mut w = Writer::new();
        for (advance, bearing) in self.advances.iter().zip(self.bearings.iter()) {
            w.write_u16(*advance);
            w.write_i16(*bearing);
        }
        w.finish()
    }

    fn build_name(&self) -> Vec<u8> {
        let entries: Vec<(u16, &str)> = [
            (1u16, self.names.family.as_str()),
            (2, self.names.subfamily.as_str()),
            (4, self.names.full.as_str()),
            (6, self.names.postscript.as_str()),
        ]
        .iter()
        .copied()
        .filter(|(_, value)| !value.is_empty())
        .collect();

        let mut storage = Writer::new();
        let mut records = Vec::with_capacity(entries.len());
        for (name_id, value) in &entries {
            let offset = storage.len() as u16;
            for unit in value.encode_utf16() {
                storage.write_u16(unit);
            }
            records.push((*name_id, offset, storage.len() as u16 - offset));
        }

        let mut w = Writer::new();
        w.write_u16(0); // format
        w.write_u16(records.len() as u16);
        w.write_u16(6 + 12 * records.len() as u16); // storage offset
        for (name_id, offset, length) in records {
            w.write_u16(3); // platform
            w.write_u16(1); // encoding, Unicode BMP
            w.write_u16(0x0409); // language, US English
            w.write_u16(name_id);
            w.write_u16(length);
            w.write_u16(offset);
        }
        w.write_bytes(&storage.finish());
        w.finish()
    }

    fn build_cmap(&self) -> Vec<u8> {
        let segments = build_cmap_segments(&self.char_to_glyph);
        let seg_count = segments.len() as u16;
        let (search_range, entry_selector, range_shift) = binary_search_header(seg_count, 2);

        let mut sub = Writer::new();
        sub.write_u16(4); // format
        sub.write_u16(16 + seg_count * 8); // length
        sub.write_u16(0); // language
        sub.write_u16(seg_count * 2);
        sub.write_u16(search_range);
        sub.write_u16(entry_selector);
        sub.write_u16(range_shift);
        for seg in &segments {
            sub.write_u16(seg.1); // endCode
        }
        sub.write_u16(0); // reservedPad
        for seg in &segments {
            sub.write_u16(seg.0); // startCode
        }
        for seg in &segments {
            sub.write_i16(seg.2); // idDelta
        }
        for _ in &segments {
            sub.write_u16(0); // idRangeOffset
        }

        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // numTables
        w.write_u16(3); // platform
        w.write_u16(1); // encoding
        w.write_u32(12); // subtable offset
        w.write_bytes(&sub.finish());
        w.finish()
    }

    fn build_post(&self) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u32(0x0003_0000); // version
        w.write_i32(self.post.italic_angle);
        w.write_i16(self.post.underline_position);
        w.write_i16(self.post.underline_thickness);
        w.write_u32(self.post.is_fixed_pitch);
        for _ in 0..4 {
            w.write_u32(0); // memory usage hints
        }
        w.finish()
    }

    fn build_os2(&self) -> Vec<u8> {
        let version = self.os2.version.max(4);

        let x_avg_char_width = if self.os2.x_avg_char_width != 0 {
            self.os2.x_avg_char_width
        } else {
            average_advance(&self.advances)
        };

        let first_char = self.char_to_glyph.keys().next().copied().unwrap_or(0);
        let last_char = self.char_to_glyph.keys().next_back().copied().unwrap_or(0);

        let mut w = Writer::new();
        w.write_u16(version);
        w.write_i16(x_avg_char_width);
        w.write_u16(self.os2.weight_class);
        w.write_u16(self.os2.width_class);
        w.write_u16(self.os2.fs_type);
        for _ in 0..10 {
            w.write_i16(0); // subscript/superscript/strikeout metrics
        }
        w.write_i16(0); // sFamilyClass
        w.write_bytes(&[0; 10]); // panose
        for _ in 0..4 {
            w.write_u32(0xFFFF_FFFF); // ulUnicodeRange
        }
        w.write_bytes(b"    "); // achVendID
        w.write_u16(self.os2.fs_selection);
        w.write_u16(first_char.min(0xFFFF) as u16);
        w.write_u16(last_char.min(0xFFFF) as u16);
        w.write_i16(self.os2.typo_ascender);
        w.write_i16(self.os2.typo_descender);
        w.write_i16(self.os2.typo_line_gap);
        w.write_u16(self.os2.win_ascent);
        w.write_u16(self.os2.win_descent);
        if version >= 1 {
            w.write_u32(0); // ulCodePageRange1
            w.write_u32(0); // ulCodePageRange2
        }
        if version >= 2 {
            w.write_i16(0); // sxHeight
            w.write_i16(0); // sCapHeight
            w.write_u16(0); // usDefaultChar
            w.write_u16(0x20); // usBreakChar
            w.write_u16(2); // usMaxContext
        }
        w.finish()
    }

    fn build_kern(&self) -> Vec<u8> {
        let num_pairs = self.kerning.len() as u16;
        let (search_range, entry_selector, range_shift) = binary_search_header(num_pairs, 6);

        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // nTables
        w.write_u16(0); // subtable version
        w.write_u16(14 + 6 * num_pairs); // length
        w.write_u16(0x0001); // horizontal, format 0
        w.write_u16(num_pairs);
        w.write_u16(search_range);
        w.write_u16(entry_selector);
        w.write_u16(range_shift);
        for ((left, right), value) in &self.kerning {
            w.write_u16(*left);
            w.write_u16(*right);
            w.write_i16(*value);
        }
        w.finish()
    }
}

/// Coalesces a character map into format 4 segments.
///
/// A segment covers consecutive characters mapping onto consecutive
/// glyph ids, so a single `idDelta` describes the whole run. The
/// mandatory `0xFFFF` terminator segment is always appended.
pub(crate) fn build_cmap_segments(map: &BTreeMap<u32, u16>) -> Vec<(u16, u16, i16)> {
    let mut segments: Vec<(u16, u16, i16)> = Vec::new();

    let mut run: Option<(u16, u16, u16)> = None; // start, end, start glyph
    for (code, glyph) in map {
        // Format 4 covers the BMP only; 0xFFFF is the terminator.
        if *code >= 0xFFFF {
            continue;
        }
        let code = *code as u16;

        match run {
            Some((start, end, start_glyph))
                if code == end + 1 && *glyph == start_glyph.wrapping_add(code - start) =>
            {
                run = Some((start, code, start_glyph));
            }
            Some(seg) => {
                segments.push(close_segment(seg));
                run = Some((code, code, *glyph));
            }
            None => {
                run = Some((code, code, *glyph));
            }
        }
    }
    if let Some(seg) = run {
        segments.push(close_segment(seg));
    }

    segments.push((0xFFFF, 0xFFFF, 1));
    segments
}

fn close_segment((start, end, start_glyph): (u16, u16, u16)) -> (u16, u16, i16) {
    let delta = (start_glyph as i32 - start as i32) as i16;
    (start, end, delta)
}

/// sfnt binary-search fields for `count` entries of `unit` bytes.
fn binary_search_header(count: u16, unit: u16) -> (u16, u16, u16) {
    if count == 0 {
        return (0, 0, 0);
    }

    let entry_selector = 15 - (count.leading_zeros() as u16);
    let search_range = unit * (1 << entry_selector);
    let range_shift = unit * count - search_range;
    (search_range, entry_selector, range_shift)
}

fn average_advance(advances: &[u16]) -> i16 {
    let non_zero: Vec<u16> = advances.iter().copied().filter(|a| *a > 0).collect();
    if non_zero.is_empty() {
        return 0;
    }

    let sum: u64 = non_zero.iter().map(|a| *a as u64).sum();
    (sum / non_zero.len() as u64).min(i16::MAX as u64) as i16
}

fn mac_epoch_now() -> i64 {
    let unix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);
    unix + MAC_EPOCH_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_coalescing() {
        let mut map = BTreeMap::new();
        map.insert(0x41, 1);
        map.insert(0x42, 2);
        map.insert(0x43, 3);
        map.insert(0x61, 4);

        let segments = build_cmap_segments(&map);
        assert_eq!(
            segments,
            vec![(0x41, 0x43, -0x40), (0x61, 0x61, -0x5D), (0xFFFF, 0xFFFF, 1)]
        );
    }

    #[test]
    fn non_contiguous_glyphs_split_segments() {
        let mut map = BTreeMap::new();
        map.insert(0x41, 1);
        map.insert(0x42, 7);

        let segments = build_cmap_segments(&map);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], (0x41, 0x41, 1 - 0x41));
        assert_eq!(segments[1], (0x42, 0x42, 7 - 0x42));
    }

    #[test]
    fn binary_search_fields() {
        // 10 tables: 2^3 = 8, searchRange 128, selector 3, shift 32.
        assert_eq!(binary_search_header(10, 16), (128, 3, 32));
        assert_eq!(binary_search_header(1, 16), (16, 0, 0));
        // 3 cmap segments.
        assert_eq!(binary_search_header(3, 2), (4, 1, 2));
    }
}
