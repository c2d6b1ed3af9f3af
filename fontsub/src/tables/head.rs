// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// A font header table.
///
/// Timestamps and the checksum adjustment are regenerated on write,
/// the rest is kept for faithful output.
#[derive(Clone, Copy, Debug)]
pub struct Head {
    /// Raw 16.16 font revision.
    pub font_revision: i32,
    /// Header flags.
    pub flags: u16,
    /// Units per em, typically 1000 or 2048.
    pub units_per_em: u16,
    /// Union of all glyph bounding boxes.
    pub x_min: i16,
    #[allow(missing_docs)]
    pub y_min: i16,
    #[allow(missing_docs)]
    pub x_max: i16,
    #[allow(missing_docs)]
    pub y_max: i16,
    /// Bold/italic bits.
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    /// 0 for short `loca` offsets, 1 for long.
    pub index_to_loc_format: i16,
}

pub(crate) fn parse(data: &[u8]) -> Option<Head> {
    let mut s = Stream::new(data);
    s.skip(4)?; // version
    let font_revision = s.read_fixed_raw()?;
    s.skip(4)?; // checkSumAdjustment
    s.skip(4)?; // magicNumber
    let flags = s.read_u16()?;
    let units_per_em = s.read_u16()?;
    s.skip(8)?; // created
    s.skip(8)?; // modified
    let x_min = s.read_i16()?;
    let y_min = s.read_i16()?;
    let x_max = s.read_i16()?;
    let y_max = s.read_i16()?;
    let mac_style = s.read_u16()?;
    let lowest_rec_ppem = s.read_u16()?;
    s.skip(2)?; // fontDirectionHint
    let index_to_loc_format = s.read_i16()?;

    if units_per_em == 0 {
        return None;
    }

    if !(index_to_loc_format == 0 || index_to_loc_format == 1) {
        return None;
    }

    Some(Head {
        font_revision,
        flags,
        units_per_em,
        x_min,
        y_min,
        x_max,
        y_max,
        mac_style,
        lowest_rec_ppem,
        index_to_loc_format,
    })
}
