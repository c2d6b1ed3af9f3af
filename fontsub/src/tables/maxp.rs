// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// Parses the glyph count out of the maximum profile table.
pub(crate) fn parse(data: &[u8]) -> Option<u16> {
    let mut s = Stream::new(data);
    s.skip(4)?; // version
    let number_of_glyphs = s.read_u16()?;

    if number_of_glyphs == 0 {
        return None;
    }

    Some(number_of_glyphs)
}
