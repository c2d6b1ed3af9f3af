// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

/// An OS/2 and Windows metrics table.
///
/// Fields that the writer regenerates from defaults are not kept.
#[derive(Clone, Copy, Debug)]
pub struct Os2 {
    /// Table version.
    pub version: u16,
    /// Average character advance.
    pub x_avg_char_width: i16,
    /// Weight class, 100..900.
    pub weight_class: u16,
    /// Width class, 1..9.
    pub width_class: u16,
    /// Embedding licensing bits.
    pub fs_type: u16,
    /// Italic/bold/regular selection bits.
    pub fs_selection: u16,
    /// Typographic ascender.
    pub typo_ascender: i16,
    /// Typographic descender.
    pub typo_descender: i16,
    /// Typographic line gap.
    pub typo_line_gap: i16,
    /// Windows clipping ascent.
    pub win_ascent: u16,
    /// Windows clipping descent.
    pub win_descent: u16,
}

impl Default for Os2 {
    fn default() -> Self {
        Os2 {
            version: 4,
            x_avg_char_width: 0,
            weight_class: 400,
            width_class: 5,
            fs_type: 0,
            fs_selection: 0x40, // REGULAR
            typo_ascender: 0,
            typo_descender: 0,
            typo_line_gap: 0,
            win_ascent: 0,
            win_descent: 0,
        }
    }
}

pub(crate) fn parse(data: &[u8]) -> Option<Os2> {
    let mut s = Stream::new(data);
    let version = s.read_u16()?;
    let x_avg_char_width = s.read_i16()?;
    let weight_class = s.read_u16()?;
    let width_class = s.read_u16()?;
    let fs_type = s.read_u16()?;
    s.skip(20)?; // subscript/superscript/strikeout metrics
    s.skip(2)?; // sFamilyClass
    s.skip(10)?; // panose
    s.skip(16)?; // ulUnicodeRange1..4
    s.skip(4)?; // achVendID
    let fs_selection = s.read_u16()?;
    s.skip(2)?; // usFirstCharIndex
    s.skip(2)?; // usLastCharIndex
    let typo_ascender = s.read_i16()?;
    let typo_descender = s.read_i16()?;
    let typo_line_gap = s.read_i16()?;
    let win_ascent = s.read_u16()?;
    let win_descent = s.read_u16()?;

    Some(Os2 {
        version,
        x_avg_char_width,
        weight_class,
        width_class,
        fs_type,
        fs_selection,
        typo_ascender,
        typo_descender,
        typo_line_gap,
        win_ascent,
        win_descent,
    })
}
