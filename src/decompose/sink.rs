//! Byte sink written by decomposers.

use crate::decompose::charset::TextEncoding;

/// Growable byte buffer that decomposers write canonical bytes into.
///
/// Multi-byte numbers are written big-endian. Strings are encoded with the
/// sink's [`TextEncoding`], which the owning filter sets.
///
/// # Examples
///
/// ```
/// use bloomkit::decompose::{ByteSink, TextEncoding};
///
/// let mut sink = ByteSink::new(TextEncoding::Utf16Be);
/// sink.put_u16(0x0102).put_str("A");
/// assert_eq!(sink.as_bytes(), &[0x01, 0x02, 0x00, 0x41]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ByteSink {
    buf: Vec<u8>,
    encoding: TextEncoding,
}

macro_rules! put_be {
    ($($name:ident: $ty:ty),* $(,)?) => {
        $(
            #[doc = concat!("Write a `", stringify!($ty), "` big-endian.")]
            #[inline]
            pub fn $name(&mut self, value: $ty) -> &mut Self {
                self.buf.extend_from_slice(&value.to_be_bytes());
                self
            }
        )*
    };
}

impl ByteSink {
    /// Empty sink using `encoding` for strings.
    #[must_use]
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            buf: Vec::new(),
            encoding,
        }
    }

    /// Text encoding applied by [`Self::put_str`].
    #[must_use]
    pub const fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Write one byte.
    #[inline]
    pub fn put_byte(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    /// Write raw bytes.
    #[inline]
    pub fn put_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Write `1` for true and `0` for false.
    #[inline]
    pub fn put_bool(&mut self, value: bool) -> &mut Self {
        self.put_byte(u8::from(value))
    }

    /// Write a character as its scalar value.
    #[inline]
    pub fn put_char(&mut self, value: char) -> &mut Self {
        self.put_u32(u32::from(value))
    }

    /// Write `text` in the sink's encoding.
    #[inline]
    pub fn put_str(&mut self, text: &str) -> &mut Self {
        self.encoding.encode_into(text, &mut self.buf);
        self
    }

    put_be! {
        put_u16: u16,
        put_u32: u32,
        put_u64: u64,
        put_u128: u128,
        put_i16: i16,
        put_i32: i32,
        put_i64: i64,
        put_i128: i128,
    }

    /// Write the IEEE-754 bits of an `f32`.
    #[inline]
    pub fn put_f32(&mut self, value: f32) -> &mut Self {
        self.put_u32(value.to_bits())
    }

    /// Write the IEEE-754 bits of an `f64`.
    #[inline]
    pub fn put_f64(&mut self, value: f64) -> &mut Self {
        self.put_u64(value.to_bits())
    }

    /// Bytes written so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consume the sink, returning its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drop the written bytes but keep the allocation and encoding.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_big_endian() {
        let mut sink = ByteSink::default();
        sink.put_i32(-2).put_u64(1);
        assert_eq!(
            sink.as_bytes(),
            &[0xFF, 0xFF, 0xFF, 0xFE, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_str_uses_encoding() {
        let mut utf8 = ByteSink::new(TextEncoding::Utf8);
        let mut latin1 = ByteSink::new(TextEncoding::Latin1);
        utf8.put_str("ü");
        latin1.put_str("ü");
        assert_eq!(utf8.len(), 2);
        assert_eq!(latin1.as_bytes(), &[0xFC]);
    }

    #[test]
    fn test_clear_keeps_encoding() {
        let mut sink = ByteSink::new(TextEncoding::Ascii);
        sink.put_bool(true).put_char('x');
        assert_eq!(sink.len(), 5);
        sink.clear();
        assert!(sink.is_empty());
        assert_eq!(sink.encoding(), TextEncoding::Ascii);
    }
}
