use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::types::{RdbError, RdbResult};

/// Read-only view over a fully materialized encoding blob.
///
/// Every advance is bounds-checked against the blob length; walking off the
/// end reports corruption of the surrounding structure instead of panicking.
pub struct Blob<'a> {
    data: &'a [u8],
    pos: usize,
    context: &'static str,
}

impl<'a> Blob<'a> {
    pub fn new(data: &'a [u8], context: &'static str) -> Blob<'a> {
        Blob {
            data,
            pos: 0,
            context,
        }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, len: usize) -> RdbResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(RdbError::Corruption {
                context: self.context,
                message: format!(
                    "need {} bytes at offset {}, {} left",
                    len,
                    self.pos,
                    self.remaining()
                ),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub fn bytes(&mut self, len: usize) -> RdbResult<&'a [u8]> {
        self.take(len)
    }

    pub fn skip(&mut self, len: usize) -> RdbResult<()> {
        self.take(len).map(|_| ())
    }

    pub fn peek_u8(&self) -> RdbResult<u8> {
        if self.remaining() == 0 {
            return Err(RdbError::Corruption {
                context: self.context,
                message: format!("missing terminator at offset {}", self.pos),
            });
        }
        Ok(self.data[self.pos])
    }

    pub fn u8(&mut self) -> RdbResult<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn i8(&mut self) -> RdbResult<i8> {
        self.take(1).map(|b| b[0] as i8)
    }

    pub fn u16_le(&mut self) -> RdbResult<u16> {
        self.take(2).map(LittleEndian::read_u16)
    }

    pub fn i16_le(&mut self) -> RdbResult<i16> {
        self.take(2).map(LittleEndian::read_i16)
    }

    pub fn u32_le(&mut self) -> RdbResult<u32> {
        self.take(4).map(LittleEndian::read_u32)
    }

    pub fn i32_le(&mut self) -> RdbResult<i32> {
        self.take(4).map(LittleEndian::read_i32)
    }

    pub fn i64_le(&mut self) -> RdbResult<i64> {
        self.take(8).map(LittleEndian::read_i64)
    }

    pub fn u32_be(&mut self) -> RdbResult<u32> {
        self.take(4).map(BigEndian::read_u32)
    }
}
