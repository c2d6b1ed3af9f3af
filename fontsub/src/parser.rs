// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Big-endian reading and writing of sfnt scalar types.

/// A 4-byte table tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Creates a tag from bytes.
    ///
    /// Trailing spaces are significant: `cvt ` and `OS/2` are
    /// distinct, valid tags.
    #[inline]
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }

    /// Returns the tag bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for b in &self.0 {
            if b.is_ascii_graphic() || *b == b' ' {
                write!(f, "{}", *b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

/// A bounds-checked big-endian stream reader.
///
/// All methods return `None` past the end of data,
/// there is no panicking access.
#[derive(Clone, Copy)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Creates a new stream over the whole slice.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    /// Creates a new stream starting at an offset.
    #[inline]
    pub fn new_at(data: &'a [u8], offset: usize) -> Option<Self> {
        if offset <= data.len() {
            Some(Stream { data, offset })
        } else {
            None
        }
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns `true` when the stream is fully consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Advances by `len` bytes.
    #[inline]
    pub fn skip(&mut self, len: usize) -> Option<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Reads a byte slice.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let bytes = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(bytes)
    }

    /// Reads a `u8`.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Reads an `i8`.
    #[inline]
    pub fn read_i8(&mut self) -> Option<i8> {
        self.read_u8().map(|n| n as i8)
    }

    /// Reads a `u16`.
    #[inline]
    pub fn read_u16(&mut self) -> Option<u16> {
        self.read_bytes(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]))
    }

    /// Reads an `i16`.
    #[inline]
    pub fn read_i16(&mut self) -> Option<i16> {
        self.read_u16().map(|n| n as i16)
    }

    /// Reads a 24-bit unsigned integer, MSB first.
    #[inline]
    pub fn read_u24(&mut self) -> Option<u32> {
        self.read_bytes(3)
            .map(|b| u32::from_be_bytes([0, b[0], b[1], b[2]]))
    }

    /// Reads a `u32`.
    #[inline]
    pub fn read_u32(&mut self) -> Option<u32> {
        self.read_bytes(4)
            .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads an `i32`.
    #[inline]
    pub fn read_i32(&mut self) -> Option<i32> {
        self.read_u32().map(|n| n as i32)
    }

    /// Reads a `u64`.
    #[inline]
    pub fn read_u64(&mut self) -> Option<u64> {
        let b = self.read_bytes(8)?;
        Some(u64::from_be_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Reads an `i64`, aka LONGDATETIME.
    #[inline]
    pub fn read_i64(&mut self) -> Option<i64> {
        self.read_u64().map(|n| n as i64)
    }

    /// Reads a table tag.
    #[inline]
    pub fn read_tag(&mut self) -> Option<Tag> {
        self.read_bytes(4)
            .map(|b| Tag::new(&[b[0], b[1], b[2], b[3]]))
    }

    /// Reads a 16.16 fixed point number as its raw `i32` value.
    #[inline]
    pub fn read_fixed_raw(&mut self) -> Option<i32> {
        self.read_i32()
    }

    /// Reads a 16.16 fixed point number.
    #[inline]
    pub fn read_fixed(&mut self) -> Option<f32> {
        self.read_i32().map(|n| n as f32 / 65536.0)
    }

    /// Reads a 2.14 fixed point number.
    #[inline]
    pub fn read_f2dot14(&mut self) -> Option<f32> {
        self.read_i16().map(|n| n as f32 / 16384.0)
    }
}

/// A big-endian byte sink.
#[derive(Clone, Default, Debug)]
pub struct Writer {
    data: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    #[inline]
    pub fn new() -> Self {
        Writer::default()
    }

    /// Returns the written bytes.
    #[inline]
    pub fn finish(self) -> Vec<u8> {
        self.data
    }

    /// Returns the number of written bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` when nothing was written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Writes raw bytes.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Writes a `u8`.
    #[inline]
    pub fn write_u8(&mut self, n: u8) {
        self.data.push(n);
    }

    /// Writes a `u16`.
    #[inline]
    pub fn write_u16(&mut self, n: u16) {
        self.data.extend_from_slice(&n.to_be_bytes());
    }

    /// Writes an `i16`.
    #[inline]
    pub fn write_i16(&mut self, n: i16) {
        self.data.extend_from_slice(&n.to_be_bytes());
    }

    /// Writes a `u32`.
    #[inline]
    pub fn write_u32(&mut self, n: u32) {
        self.data.extend_from_slice(&n.to_be_bytes());
    }

    /// Writes an `i32`.
    #[inline]
    pub fn write_i32(&mut self, n: i32) {
        self.data.extend_from_slice(&n.to_be_bytes());
    }

    /// Writes an `i64`, aka LONGDATETIME.
    #[inline]
    pub fn write_i64(&mut self, n: i64) {
        self.data.extend_from_slice(&n.to_be_bytes());
    }

    /// Writes a table tag.
    #[inline]
    pub fn write_tag(&mut self, tag: Tag) {
        self.data.extend_from_slice(tag.as_bytes());
    }

    /// Pads with zero bytes up to a 4-byte boundary.
    #[inline]
    pub fn align4(&mut self) {
        while self.data.len() % 4 != 0 {
            self.data.push(0);
        }
    }
}

/// Computes the sfnt table checksum.
///
/// The big-endian `u32` sum over the table bytes, with the final
/// partial chunk zero-padded on the right.
pub fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut tail = [0u8; 4];
        tail[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(tail));
    }

    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_reads() {
        let data = [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut s = Stream::new(&data);
        assert_eq!(s.read_u16(), Some(1));
        assert_eq!(s.read_u24(), Some(0x020304));
        assert_eq!(s.read_u16(), Some(0x0506));
        assert_eq!(s.read_u8(), None);
        assert!(s.at_end());
    }

    #[test]
    fn fixed_point() {
        let mut s = Stream::new(&[0x00, 0x01, 0x80, 0x00]);
        assert_eq!(s.read_fixed(), Some(1.5));

        let mut s = Stream::new(&[0x70, 0x00]);
        assert_eq!(s.read_f2dot14(), Some(1.75));
    }

    #[test]
    fn checksum_pads_the_tail() {
        assert_eq!(checksum(&[0, 0, 0, 1]), 1);
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        // `0x01` alone is the chunk 0x01000000.
        assert_eq!(checksum(&[1]), 0x0100_0000);
    }

    #[test]
    fn writer_round_trip() {
        let mut w = Writer::new();
        w.write_u16(0xBEEF);
        w.write_tag(Tag::new(b"glyf"));
        w.align4();
        w.write_i64(-1);

        let data = w.finish();
        assert_eq!(data.len(), 16);

        let mut s = Stream::new(&data);
        assert_eq!(s.read_u16(), Some(0xBEEF));
        assert_eq!(s.read_tag(), Some(Tag::new(b"glyf")));
        s.skip(2).unwrap();
        assert_eq!(s.read_i64(), Some(-1));
    }
}
