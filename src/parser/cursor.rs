//! A sequential big-endian reader over an immutable byte buffer.

use nom::bytes::complete::take;
use nom::number::complete::{be_u16, be_u32, be_u8};
use nom::IResult;

use crate::error::{Error, Result};
use crate::model::class_file::{u1, u2, u4};

/// Reads unsigned big-endian quantities from a byte slice, advancing a position that never moves
/// backwards. A read that would run past the end fails with `Error::UnexpectedEof` and leaves the
/// position where it was.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, position: 0 }
    }

    /// Runs a complete nom parser over the unread input and advances past whatever it consumed.
    fn parse<O, F>(&mut self, needed: usize, mut parser: F) -> Result<O>
    where
        F: FnMut(&'a [u8]) -> IResult<&'a [u8], O>,
    {
        let bytes = self.bytes;
        let input = &bytes[self.position..];
        match parser(input) {
            Ok((rest, output)) => {
                self.position += input.len() - rest.len();
                Ok(output)
            }
            Err(_) => Err(Error::UnexpectedEof {
                position: self.position,
                needed,
                remaining: input.len(),
            }),
        }
    }

    pub fn read_u1(&mut self) -> Result<u1> {
        self.parse(1, be_u8)
    }

    pub fn read_u2(&mut self) -> Result<u2> {
        self.parse(2, be_u16)
    }

    pub fn read_u4(&mut self) -> Result<u4> {
        self.parse(4, be_u32)
    }

    /// Borrows the next `count` bytes of the buffer.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.parse(count, take(count))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.bytes.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn reads_big_endian_and_advances() {
        let data = [0xCA, 0xFE, 0xBA, 0xBE, 0x00, 0x34, 0x07, b'h', b'i'];
        let mut cursor = Cursor::new(&data);
        assert_eq!(cursor.read_u4().unwrap(), 0xCAFEBABE);
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read_u2().unwrap(), 0x34);
        assert_eq!(cursor.read_u1().unwrap(), 7);
        assert_eq!(cursor.read_bytes(2).unwrap(), b"hi");
        assert!(cursor.is_at_end());
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn overrun_is_an_error_and_keeps_position() {
        let data = [0x00, 0x01, 0x02];
        let mut cursor = Cursor::new(&data);
        cursor.read_u1().unwrap();
        match cursor.read_u4() {
            Err(Error::UnexpectedEof { position, needed, remaining }) => {
                assert_eq!((position, needed, remaining), (1, 4, 2));
            }
            other => panic!("expected UnexpectedEof, got {:?}", other),
        }
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u2().unwrap(), 0x0102);
        assert!(cursor.read_u1().is_err());
    }

    #[test]
    fn zero_length_read_at_end_succeeds() {
        let mut cursor = Cursor::new(&[]);
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
        assert!(matches!(cursor.read_bytes(1), Err(Error::UnexpectedEof { .. })));
    }
}
