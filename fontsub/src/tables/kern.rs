// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;

use crate::parser::Stream;

const HORIZONTAL: u16 = 0x0001;

/// Parses format 0 horizontal kerning pairs.
///
/// Vertical and stateful subtables are skipped.
pub(crate) fn parse(data: &[u8]) -> Option<BTreeMap<(u16, u16), i16>> {
    let mut s = Stream::new(data);
    let version = s.read_u16()?;
    if version != 0 {
        // The Apple `kern` flavor.
        return None;
    }
    let num_tables = s.read_u16()?;

    let mut pairs = BTreeMap::new();
    for _ in 0..num_tables {
        let subtable_start = s.offset();
        s.skip(2)?; // subtable version
        let length = s.read_u16()? as usize;
        let coverage = s.read_u16()?;

        let format = coverage >> 8;
        if format == 0 && coverage & HORIZONTAL != 0 {
            let num_pairs = s.read_u16()?;
            s.skip(6)?; // searchRange, entrySelector, rangeShift
            for _ in 0..num_pairs {
                let left = s.read_u16()?;
                let right = s.read_u16()?;
                let value = s.read_i16()?;
                pairs.insert((left, right), value);
            }
        }

        // Jump to the next subtable no matter what was read.
        let next = subtable_start.checked_add(length)?;
        s = Stream::new_at(data, next)?;
    }

    Some(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Writer;

    #[test]
    fn format0_pairs() {
        let mut w = Writer::new();
        w.write_u16(0); // version
        w.write_u16(1); // nTables
        w.write_u16(0); // subtable version
        w.write_u16(14 + 6); // length
        w.write_u16(0x0001); // horizontal, format 0
        w.write_u16(1); // nPairs
        w.write_u16(0);
        w.write_u16(0);
        w.write_u16(0);
        w.write_u16(36); // left
        w.write_u16(37); // right
        w.write_i16(-30);

        let pairs = parse(&w.finish()).unwrap();
        assert_eq!(pairs.get(&(36, 37)), Some(&-30));
    }
}
