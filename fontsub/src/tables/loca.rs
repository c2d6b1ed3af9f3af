// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// Parses glyph data offsets.
///
/// Returns `number_of_glyphs + 1` offsets into the glyph data table.
/// Short offsets are stored divided by two.
pub(crate) fn parse(
    data: &[u8],
    number_of_glyphs: u16,
    index_to_loc_format: i16,
) -> Option<Vec<u32>> {
    let count = number_of_glyphs as usize + 1;
    let mut offsets = Vec::with_capacity(count);

    let mut s = Stream::new(data);
    if index_to_loc_format == 0 {
        for _ in 0..count {
            offsets.push(s.read_u16()? as u32 * 2);
        }
    } else {
        for _ in 0..count {
            offsets.push(s.read_u32()?);
        }
    }

    // Offsets must not decrease.
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return None;
    }

    Some(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Writer;

    #[test]
    fn short_offsets_are_doubled() {
        let mut w = Writer::new();
        for n in [0u16, 4, 10] {
            w.write_u16(n);
        }

        let offsets = parse(&w.finish(), 2, 0).unwrap();
        assert_eq!(offsets, vec![0, 8, 20]);
    }

    #[test]
    fn decreasing_offsets_are_rejected() {
        let mut w = Writer::new();
        for n in [0u32, 20, 10] {
            w.write_u32(n);
        }

        assert!(parse(&w.finish(), 2, 1).is_none());
    }
}
