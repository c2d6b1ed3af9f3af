// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// Parses horizontal metrics into per-glyph advances and bearings.
///
/// The table holds `number_of_h_metrics` advance/bearing pairs followed
/// by bare bearings; glyphs past the pairs replicate the last advance.
pub(crate) fn parse(
    data: &[u8],
    number_of_h_metrics: u16,
    number_of_glyphs: u16,
) -> Option<(Vec<u16>, Vec<i16>)> {
    let number_of_h_metrics = number_of_h_metrics.min(number_of_glyphs);

    let mut advances = Vec::with_capacity(number_of_glyphs as usize);
    let mut bearings = Vec::with_capacity(number_of_glyphs as usize);

    let mut s = Stream::new(data);
    for _ in 0..number_of_h_metrics {
        advances.push(s.read_u16()?);
        bearings.push(s.read_i16()?);
    }

    let last_advance = *advances.last()?;
    for _ in number_of_h_metrics..number_of_glyphs {
        advances.push(last_advance);
        bearings.push(s.read_i16()?);
    }

    Some((advances, bearings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Writer;

    #[test]
    fn last_advance_is_replicated() {
        let mut w = Writer::new();
        // Two full metrics.
        w.write_u16(500);
        w.write_i16(10);
        w.write_u16(600);
        w.write_i16(20);
        // Two bare bearings.
        w.write_i16(30);
        w.write_i16(40);

        let (advances, bearings) = parse(&w.finish(), 2, 4).unwrap();
        assert_eq!(advances, vec![500, 600, 600, 600]);
        assert_eq!(bearings, vec![10, 20, 30, 40]);
    }

    #[test]
    fn truncated_table() {
        assert!(parse(&[0x01, 0xF4], 1, 1).is_none());
    }
}
