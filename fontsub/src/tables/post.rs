// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// A PostScript table.
///
/// Only the header is kept; glyph names are not needed to
/// reconstruct a version 3.0 table.
#[derive(Clone, Copy, Debug)]
pub struct Post {
    /// Raw 16.16 italic angle, counter-clockwise degrees.
    pub italic_angle: i32,
    /// Underline position.
    pub underline_position: i16,
    /// Underline thickness.
    pub underline_thickness: i16,
    /// Non-zero for monospaced fonts.
    pub is_fixed_pitch: u32,
}

pub(crate) fn parse(data: &[u8]) -> Option<Post> {
    let mut s = Stream::new(data);
    s.skip(4)?; // version
    let italic_angle = s.read_fixed_raw()?;
    let underline_position = s.read_i16()?;
    let underline_thickness = s.read_i16()?;
    let is_fixed_pitch = s.read_u32()?;

    Some(Post {
        italic_angle,
        underline_position,
        underline_thickness,
        is_fixed_pitch,
    })
}
