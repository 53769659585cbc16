use crate::error::{Error, Result};

/// Read cursor over a byte slice. All reads are little-endian.
#[derive(Clone)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of underlying data.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether we've reached the end.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Remaining bytes from current position.
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Seek to an absolute position.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Read a slice of `n` bytes without copying.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a 4-byte magic/tag.
    pub fn read_magic(&mut self) -> Result<[u8; 4]> {
        let bytes = self.read_bytes(4)?;
        let mut magic = [0u8; 4];
        magic.copy_from_slice(bytes);
        Ok(magic)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let bytes = self.read_bytes(2)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let bytes = self.read_bytes(8)?;
        Ok(i64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let bytes = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let bytes = self.read_bytes(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        let bytes = self.read_bytes(8)?;
        Ok(f64::from_le_bytes([
            bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
        ]))
    }

    /// Read a fixed-width name field: exactly `width` bytes, with trailing
    /// NUL padding stripped from the decoded value.
    pub fn read_fixed_string(&mut self, width: usize) -> Result<String> {
        let offset = self.pos;
        let bytes = self.read_bytes(width)?;
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(width);
        String::from_utf8(bytes[..end].to_vec()).map_err(|e| Error::InvalidString {
            offset,
            source: e,
        })
    }

    fn ensure(&self, n: usize) -> Result<()> {
        if self.pos + n > self.data.len() {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                need: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}

/// Writer that builds a byte buffer. All writes are little-endian.
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: Vec::with_capacity(cap),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_magic(&mut self, magic: &[u8; 4]) {
        self.buf.extend_from_slice(magic);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Write a fixed-width name field: the UTF-8 bytes of `s` padded with
    /// trailing NULs to exactly `width` bytes.
    ///
    /// Fails with [`Error::FieldTooLong`] if `s` does not fit. Over-long
    /// values are rejected rather than truncated so that a user-visible edit
    /// is never silently destroyed on save.
    pub fn write_fixed_string(&mut self, s: &str, width: usize) -> Result<()> {
        let bytes = s.as_bytes();
        if bytes.len() > width {
            return Err(Error::FieldTooLong {
                value: s.to_string(),
                len: bytes.len(),
                width,
            });
        }
        self.buf.extend_from_slice(bytes);
        for _ in bytes.len()..width {
            self.buf.push(0);
        }
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_string_pads_and_strips() {
        let mut w = Writer::new();
        w.write_fixed_string("ab", 16).unwrap();
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..2], b"ab");
        assert!(bytes[2..].iter().all(|&b| b == 0));

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.read_fixed_string(16).unwrap(), "ab");
        assert!(c.is_empty());
    }

    #[test]
    fn fixed_string_exact_width_has_no_padding() {
        let mut w = Writer::new();
        w.write_fixed_string("abcdefgh", 8).unwrap();
        let bytes = w.into_bytes();
        let mut c = Cursor::new(&bytes);
        assert_eq!(c.read_fixed_string(8).unwrap(), "abcdefgh");
    }

    #[test]
    fn fixed_string_too_long_is_rejected() {
        let mut w = Writer::new();
        let err = w.write_fixed_string("this name is far too long", 8).unwrap_err();
        assert!(matches!(err, Error::FieldTooLong { width: 8, .. }));
        // Nothing was written.
        assert_eq!(w.position(), 0);
    }

    #[test]
    fn numeric_round_trip_every_width() {
        let mut w = Writer::new();
        w.write_u8(0xa5);
        w.write_i8(-5);
        w.write_u16(0xbeef);
        w.write_i16(-2);
        w.write_u32(0xdead_beef);
        w.write_i32(-3);
        w.write_u64(u64::MAX - 1);
        w.write_i64(i64::MIN + 1);
        w.write_f32(1.5);
        w.write_f64(-2.25);
        let bytes = w.into_bytes();
        assert_eq!(bytes.len(), 1 + 1 + 2 + 2 + 4 + 4 + 8 + 8 + 4 + 8);

        let mut c = Cursor::new(&bytes);
        assert_eq!(c.len(), bytes.len());
        assert_eq!(c.read_u8().unwrap(), 0xa5);
        assert_eq!(c.read_i8().unwrap(), -5);
        assert_eq!(c.read_u16().unwrap(), 0xbeef);
        assert_eq!(c.read_i16().unwrap(), -2);
        assert_eq!(c.read_u32().unwrap(), 0xdead_beef);
        assert_eq!(c.read_i32().unwrap(), -3);
        assert_eq!(c.read_u64().unwrap(), u64::MAX - 1);
        assert_eq!(c.read_i64().unwrap(), i64::MIN + 1);
        assert_eq!(c.read_f32().unwrap(), 1.5);
        assert_eq!(c.read_f64().unwrap(), -2.25);
        assert!(c.is_empty());
    }

    #[test]
    fn read_past_end_reports_eof() {
        let bytes = [1u8, 2, 3];
        let mut c = Cursor::new(&bytes);
        c.read_u16().unwrap();
        let err = c.read_u32().unwrap_err();
        match err {
            Error::UnexpectedEof { offset, need, have } => {
                assert_eq!(offset, 2);
                assert_eq!(need, 4);
                assert_eq!(have, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
