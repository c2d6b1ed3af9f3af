// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{BTreeMap, BTreeSet};

use crate::{Error, Flavor, Font};

impl Font {
    /// Produces a new font reduced to `chars`.
    ///
    /// Glyph ids are renumbered densely; glyph 0 always survives as
    /// the fallback glyph. Outline bytes, advances and kerning of the
    /// retained glyphs are carried over unchanged.
    pub fn subset(&self, chars: &BTreeSet<char>) -> Result<Font, Error> {
        if chars.is_empty() {
            return Err(Error::NoCharacters);
        }

        if self.flavor == Flavor::PostScript {
            return Err(Error::UnsupportedOutlines);
        }

        // Old id -> new id. Iterating a sorted set keeps the remap
        // deterministic.
        let mut remap = BTreeMap::new();
        remap.insert(0u16, 0u16);
        for c in chars {
            if let Some(old_id) = self.glyph_index(*c) {
                let next = remap.len() as u16;
                remap.entry(old_id).or_insert(next);
            } else {
                log::warn!("Font has no glyph for {:?}.", c);
            }
        }

        let glyph_count = remap.len();
        let mut advances = vec![0u16; glyph_count];
        let mut bearings = vec![0i16; glyph_count];
        let mut glyphs = vec![Vec::new(); glyph_count];
        for (old_id, new_id) in &remap {
            let old = *old_id as usize;
            let new = *new_id as usize;
            advances[new] = self.advances.get(old).copied().unwrap_or(0);
            bearings[new] = self.bearings.get(old).copied().unwrap_or(0);
            glyphs[new] = self.glyphs.get(old).cloned().unwrap_or_default();
        }

        let char_to_glyph = self
            .char_to_glyph
            .iter()
            .filter(|(code, _)| char::from_u32(**code).map_or(false, |c| chars.contains(&c)))
            .filter_map(|(code, old_id)| remap.get(old_id).map(|new_id| (*code, *new_id)))
            .collect();

        let kerning = self
            .kerning
            .iter()
            .filter_map(|((left, right), value)| {
                let left = remap.get(left)?;
                let right = remap.get(right)?;
                Some(((*left, *right), *value))
            })
            .collect();

        let mut names = self.names.clone();
        names.postscript = subset_name(&self.names.postscript);

        Ok(Font {
            flavor: self.flavor,
            units_per_em: self.units_per_em,
            ascender: self.ascender,
            descender: self.descender,
            line_gap: self.line_gap,
            char_to_glyph,
            advances,
            bearings,
            glyphs,
            kerning,
            names,
            head: self.head,
            os2: self.os2,
            post: self.post,
        })
    }
}

/// Prefixes a PostScript name with a deterministic subset tag,
/// `ABCDEF+Name` style.
fn subset_name(name: &str) -> String {
    let name = if name.is_empty() { "Subset" } else { name };

    // FNV-1a; any stable hash works, the tag only has to be
    // reproducible for the same input.
    let mut hash = 0xcbf2_9ce4_8422_2325u64;
    for b in name.bytes() {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }

    let mut tag = String::with_capacity(name.len() + 7);
    for _ in 0..6 {
        tag.push((b'A' + (hash % 26) as u8) as char);
        hash /= 26;
    }
    tag.push('+');
    tag.push_str(name);
    tag
}
