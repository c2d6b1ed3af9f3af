// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// A horizontal header table.
#[derive(Clone, Copy, Debug)]
pub struct Hhea {
    /// Typographic ascender.
    pub ascender: i16,
    /// Typographic descender, negative below the baseline.
    pub descender: i16,
    /// Typographic line gap.
    pub line_gap: i16,
    /// Number of advance-width entries in `hmtx`.
    pub number_of_h_metrics: u16,
}

pub(crate) fn parse(data: &[u8]) -> Option<Hhea> {
    let mut s = Stream::new(data);
    s.skip(4)?; // version
    let ascender = s.read_i16()?;
    let descender = s.read_i16()?;
    let line_gap = s.read_i16()?;
    s.skip(2)?; // advanceWidthMax
    s.skip(2)?; // minLeftSideBearing
    s.skip(2)?; // minRightSideBearing
    s.skip(2)?; // xMaxExtent
    s.skip(6)?; // caret slope rise/run/offset
    s.skip(8)?; // reserved
    s.skip(2)?; // metricDataFormat
    let number_of_h_metrics = s.read_u16()?;

    if number_of_h_metrics == 0 {
        return None;
    }

    Some(Hhea {
        ascender,
        descender,
        line_gap,
        number_of_h_metrics,
    })
}
