// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::parser::Stream;

const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_FULL: u16 = 4;
const NAME_ID_POSTSCRIPT: u16 = 6;

/// Font naming strings.
#[derive(Clone, Default, Debug)]
pub struct Names {
    /// Family name, nameID 1.
    pub family: String,
    /// Subfamily name, nameID 2.
    pub subfamily: String,
    /// Full font name, nameID 4.
    pub full: String,
    /// PostScript name, nameID 6.
    pub postscript: String,
}

struct Record {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: usize,
    offset: usize,
}

impl Record {
    /// Windows, Unicode BMP, US English. The preferred source.
    fn is_windows_english(&self) -> bool {
        self.platform_id == 3 && self.encoding_id == 1 && self.language_id == 0x0409
    }

    fn is_unicode(&self) -> bool {
        self.platform_id == 0 || (self.platform_id == 3 && self.encoding_id == 1)
    }
}

pub(crate) fn parse(data: &[u8]) -> Option<Names> {
    let mut s = Stream::new(data);
    s.skip(2)?; // format
    let count = s.read_u16()?;
    let storage_offset = s.read_u16()? as usize;

    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        records.push(Record {
            platform_id: s.read_u16()?,
            encoding_id: s.read_u16()?,
            language_id: s.read_u16()?,
            name_id: s.read_u16()?,
            length: s.read_u16()? as usize,
            offset: s.read_u16()? as usize,
        });
    }

    let mut names = Names::default();
    for (field, name_id) in [
        (&mut names.family as &mut String, NAME_ID_FAMILY),
        (&mut names.subfamily, NAME_ID_SUBFAMILY),
        (&mut names.full, NAME_ID_FULL),
        (&mut names.postscript, NAME_ID_POSTSCRIPT),
    ] {
        if let Some(value) = select_name(data, storage_offset, &records, name_id) {
            *field = value;
        }
    }

    Some(names)
}

fn select_name(
    data: &[u8],
    storage_offset: usize,
    records: &[Record],
    name_id: u16,
) -> Option<String> {
    let record = records
        .iter()
        .filter(|r| r.name_id == name_id)
        .max_by_key(|r| {
            if r.is_windows_english() {
                2
            } else if r.is_unicode() {
                1
            } else {
                0
            }
        })?;

    let start = storage_offset.checked_add(record.offset)?;
    let mut s = Stream::new_at(data, start)?;
    let bytes = s.read_bytes(record.length)?;

    let value = if record.is_unicode() {
        decode_utf16_be(bytes)
    } else {
        // Mac Roman and friends; ASCII is the common subset.
        bytes.iter().map(|&b| b as char).collect()
    };

    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn decode_utf16_be(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Writer;

    #[test]
    fn windows_record_is_preferred() {
        let mac_name = b"MacName";
        let win_name: Vec<u8> = "WinName".encode_utf16().flat_map(|u| u.to_be_bytes()).collect();

        let mut w = Writer::new();
        w.write_u16(0); // format
        w.write_u16(2); // count
        w.write_u16(6 + 2 * 12); // storage offset

        // Mac record.
        w.write_u16(1);
        w.write_u16(0);
        w.write_u16(0);
        w.write_u16(1); // family
        w.write_u16(mac_name.len() as u16);
        w.write_u16(0);
        // Windows record.
        w.write_u16(3);
        w.write_u16(1);
        w.write_u16(0x0409);
        w.write_u16(1); // family
        w.write_u16(win_name.len() as u16);
        w.write_u16(mac_name.len() as u16);

        w.write_bytes(mac_name);
        w.write_bytes(&win_name);

        let names = parse(&w.finish()).unwrap();
        assert_eq!(names.family, "WinName");
    }
}
