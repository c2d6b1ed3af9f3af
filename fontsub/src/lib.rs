// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`fontsub` parses TrueType fonts, subsets them to a character set
and writes valid font files back out.

Glyph outlines are carried through verbatim, which is what makes
subsetting cheap: only the tables around them are rebuilt. Fonts with
PostScript (`CFF `) outlines can be parsed but not subset, because
their outline data cannot be passed through untouched.

```no_run
# fn main() -> Result<(), Box<dyn std::error::Error>> {
let data = std::fs::read("font.ttf")?;
let font = fontsub::Font::parse(&data)?;

let chars: std::collections::BTreeSet<char> = "Hello".chars().collect();
let subset = font.subset(&chars)?;
std::fs::write("subset.ttf", subset.to_bytes())?;
# Ok(()) }
```
*/

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::manual_range_contains)]

mod parser;
mod subset;
mod tables;
mod writer;

use std::collections::{BTreeMap, HashMap};

pub use crate::parser::{checksum, Stream, Tag, Writer};
pub use crate::tables::head::Head;
pub use crate::tables::hhea::Hhea;
pub use crate::tables::name::Names;
pub use crate::tables::os2::Os2;
pub use crate::tables::post::Post;

/// TrueType outlines.
const SFNT_VERSION_TRUE_TYPE: u32 = 0x0001_0000;
/// PostScript outlines in an sfnt wrapper.
const SFNT_VERSION_CFF: u32 = 0x4F54_544F; // 'OTTO'
/// The Apple `true` and `typ1` variants.
const SFNT_VERSION_APPLE_TRUE: u32 = 0x7472_7565;
const SFNT_VERSION_APPLE_TYP1: u32 = 0x7479_7031;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The sfnt version is not a known font flavor.
    UnknownFontType(u32),

    /// A required table is missing.
    MissingTable(Tag),

    /// A table is truncated or malformed.
    MalformedTable(Tag),

    /// Only fonts with TrueType outlines can be subset.
    UnsupportedOutlines,

    /// The subset character set is empty.
    NoCharacters,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::UnknownFontType(magic) => {
                write!(f, "unknown font magic 0x{:08X}", magic)
            }
            Error::MissingTable(tag) => {
                write!(f, "font has no required '{}' table", tag)
            }
            Error::MalformedTable(tag) => {
                write!(f, "the '{}' table is malformed", tag)
            }
            Error::UnsupportedOutlines => {
                write!(f, "fonts with PostScript outlines cannot be subset")
            }
            Error::NoCharacters => {
                write!(f, "the character set is empty")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A font outline flavor.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Flavor {
    TrueType,
    PostScript,
}

/// A parsed font.
///
/// All tables are decomposed into plain data. Glyph outlines are
/// stored as raw bytes, indexed by glyph id.
#[derive(Clone, Debug)]
pub struct Font {
    /// Outline flavor.
    pub flavor: Flavor,

    /// Units per em.
    pub units_per_em: u16,

    /// Typographic ascender from `hhea`.
    pub ascender: i16,

    /// Typographic descender from `hhea`.
    pub descender: i16,

    /// Typographic line gap from `hhea`.
    pub line_gap: i16,

    /// Character to glyph id mapping.
    pub char_to_glyph: BTreeMap<u32, u16>,

    /// Per-glyph advance widths.
    pub advances: Vec<u16>,

    /// Per-glyph left side bearings.
    pub bearings: Vec<i16>,

    /// Per-glyph raw outline data. Empty for outline-less glyphs.
    pub glyphs: Vec<Vec<u8>>,

    /// Kerning pairs, `(left, right) -> adjustment`.
    pub kerning: BTreeMap<(u16, u16), i16>,

    /// Font naming strings.
    pub names: Names,

    /// The parsed header table.
    pub head: Head,

    /// The parsed OS/2 table.
    pub os2: Os2,

    /// The parsed PostScript table.
    pub post: Post,
}

fn required<'a>(
    tables: &HashMap<Tag, &'a [u8]>,
    tag: &[u8; 4],
) -> Result<&'a [u8], Error> {
    tables
        .get(&Tag::new(tag))
        .copied()
        .ok_or(Error::MissingTable(Tag::new(tag)))
}

impl Font {
    /// Parses a font from raw data.
    pub fn parse(data: &[u8]) -> Result<Font, Error> {
        let mut s = Stream::new(data);

        let version = s
            .read_u32()
            .ok_or(Error::UnknownFontType(0))?;
        let flavor = match version {
            SFNT_VERSION_TRUE_TYPE | SFNT_VERSION_APPLE_TRUE | SFNT_VERSION_APPLE_TYP1 => {
                Flavor::TrueType
            }
            SFNT_VERSION_CFF => Flavor::PostScript,
            _ => return Err(Error::UnknownFontType(version)),
        };

        let num_tables = s
            .read_u16()
            .ok_or(Error::MalformedTable(Tag::new(b"    ")))?;
        // searchRange, entrySelector, rangeShift.
        s.skip(6).ok_or(Error::MalformedTable(Tag::new(b"    ")))?;

        let mut tables = HashMap::new();
        for _ in 0..num_tables {
            let tag = s.read_tag();
            let _checksum = s.read_u32();
            let offset = s.read_u32();
            let length = s.read_u32();
            match (tag, offset, length) {
                (Some(tag), Some(offset), Some(length)) => {
                    let start = offset as usize;
                    let end = start
                        .checked_add(length as usize)
                        .ok_or(Error::MalformedTable(tag))?;
                    let range = data.get(start..end).ok_or(Error::MalformedTable(tag))?;
                    tables.insert(tag, range);
                }
                _ => return Err(Error::UnknownFontType(version)),
            }
        }

        for tag in [b"head", b"hhea", b"hmtx", b"maxp", b"name", b"cmap"] {
            required(&tables, tag)?;
        }

        let has_glyf = tables.contains_key(&Tag::new(b"glyf")) && tables.contains_key(&Tag::new(b"loca"));
        let has_cff = tables.contains_key(&Tag::new(b"CFF "));
        if !has_glyf && !has_cff {
            return Err(Error::MissingTable(Tag::new(b"glyf")));
        }

        let head = tables::head::parse(required(&tables, b"head")?)
            .ok_or(Error::MalformedTable(Tag::new(b"head")))?;
        let number_of_glyphs = tables::maxp::parse(required(&tables, b"maxp")?)
            .ok_or(Error::MalformedTable(Tag::new(b"maxp")))?;
        let hhea = tables::hhea::parse(required(&tables, b"hhea")?)
            .ok_or(Error::MalformedTable(Tag::new(b"hhea")))?;
        let (advances, bearings) = tables::hmtx::parse(
            required(&tables, b"hmtx")?,
            hhea.number_of_h_metrics,
            number_of_glyphs,
        )
        .ok_or(Error::MalformedTable(Tag::new(b"hmtx")))?;
        let names = tables::name::parse(required(&tables, b"name")?)
            .ok_or(Error::MalformedTable(Tag::new(b"name")))?;
        let char_to_glyph = tables::cmap::parse(required(&tables, b"cmap")?)
            .ok_or(Error::MalformedTable(Tag::new(b"cmap")))?;

        let glyphs = if has_glyf && flavor == Flavor::TrueType {
            let loca = tables::loca::parse(
                required(&tables, b"loca")?,
                number_of_glyphs,
                head.index_to_loc_format,
            )
            .ok_or(Error::MalformedTable(Tag::new(b"loca")))?;

            let glyf = required(&tables, b"glyf")?;
            let mut glyphs = Vec::with_capacity(number_of_glyphs as usize);
            for w in loca.windows(2) {
                let range = glyf
                    .get(w[0] as usize..w[1] as usize)
                    .ok_or(Error::MalformedTable(Tag::new(b"loca")))?;
                glyphs.push(range.to_vec());
            }
            glyphs
        } else {
            // PostScript outlines are opaque to us.
            vec![Vec::new(); number_of_glyphs as usize]
        };

        let post = tables
            .get(&Tag::new(b"post"))
            .and_then(|data| tables::post::parse(data))
            .unwrap_or(Post {
                italic_angle: 0,
                underline_position: 0,
                underline_thickness: 0,
                is_fixed_pitch: 0,
            });

        let os2 = tables
            .get(&Tag::new(b"OS/2"))
            .and_then(|data| tables::os2::parse(data))
            .unwrap_or_default();

        let kerning = tables
            .get(&Tag::new(b"kern"))
            .and_then(|data| tables::kern::parse(data))
            .unwrap_or_default();

        Ok(Font {
            flavor,
            units_per_em: head.units_per_em,
            ascender: hhea.ascender,
            descender: hhea.descender,
            line_gap: hhea.line_gap,
            char_to_glyph,
            advances,
            bearings,
            glyphs,
            kerning,
            names,
            head,
            os2,
            post,
        })
    }

    /// Returns the number of glyphs.
    #[inline]
    pub fn number_of_glyphs(&self) -> u16 {
        self.glyphs.len() as u16
    }

    /// Returns the glyph id for a character.
    #[inline]
    pub fn glyph_index(&self, c: char) -> Option<u16> {
        self.char_to_glyph.get(&(c as u32)).copied()
    }

    /// Returns a glyph advance width.
    #[inline]
    pub fn advance(&self, glyph_id: u16) -> Option<u16> {
        self.advances.get(glyph_id as usize).copied()
    }

    /// Returns a glyph raw outline data.
    #[inline]
    pub fn outline(&self, glyph_id: u16) -> Option<&[u8]> {
        self.glyphs.get(glyph_id as usize).map(|v| v.as_slice())
    }

    /// Reads the bounding box stored in a glyph outline header.
    pub(crate) fn glyph_x_extents(&self, glyph_id: u16) -> Option<(i16, i16)> {
        let data = self.glyphs.get(glyph_id as usize)?;
        let mut s = Stream::new(data);
        s.skip(2)?; // numberOfContours
        let x_min = s.read_i16()?;
        s.skip(2)?; // yMin
        let x_max = s.read_i16()?;
        Some((x_min, x_max))
    }
}
