//! Primitive field reading in network byte order.

use byteorder::{NetworkEndian, ReadBytesExt};
use bytes::BufMut;
use serde::Serialize;
use std::fmt;
use std::io::{self, Read};

use crate::addr::Address;
use crate::error::{Error, Result};
use crate::layout::FieldKind;

/// A fixed-width value that can appear as a field in a wire layout.
pub trait WireField: Copy + Sized {
    /// Wire kind, which also fixes the width.
    const KIND: FieldKind;

    /// Read exactly `KIND.width()` bytes from `src`.
    fn read_from<R: Read>(src: &mut R) -> io::Result<Self>;

    /// Append the big-endian encoding to `dst`.
    fn put<B: BufMut>(self, dst: &mut B);

    fn into_value(self) -> FieldValue;
}

impl WireField for u8 {
    const KIND: FieldKind = FieldKind::U8;

    fn read_from<R: Read>(src: &mut R) -> io::Result<Self> {
        src.read_u8()
    }

    fn put<B: BufMut>(self, dst: &mut B) {
        dst.put_u8(self);
    }

    fn into_value(self) -> FieldValue {
        FieldValue::U8(self)
    }
}

impl WireField for u16 {
    const KIND: FieldKind = FieldKind::U16;

    fn read_from<R: Read>(src: &mut R) -> io::Result<Self> {
        src.read_u16::<NetworkEndian>()
    }

    fn put<B: BufMut>(self, dst: &mut B) {
        dst.put_u16(self);
    }

    fn into_value(self) -> FieldValue {
        FieldValue::U16(self)
    }
}

impl WireField for u32 {
    const KIND: FieldKind = FieldKind::U32;

    fn read_from<R: Read>(src: &mut R) -> io::Result<Self> {
        src.read_u32::<NetworkEndian>()
    }

    fn put<B: BufMut>(self, dst: &mut B) {
        dst.put_u32(self);
    }

    fn into_value(self) -> FieldValue {
        FieldValue::U32(self)
    }
}

impl WireField for Address {
    const KIND: FieldKind = FieldKind::Addr;

    fn read_from<R: Read>(src: &mut R) -> io::Result<Self> {
        let mut octets = [0u8; Address::WIDTH];
        src.read_exact(&mut octets)?;
        Ok(Address::from(octets))
    }

    fn put<B: BufMut>(self, dst: &mut B) {
        dst.put_slice(&self.octets());
    }

    fn into_value(self) -> FieldValue {
        FieldValue::Addr(self)
    }
}

/// A decoded field value of any supported kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    U8(u8),
    U16(u16),
    U32(u32),
    Addr(Address),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::U8(_) => FieldKind::U8,
            FieldValue::U16(_) => FieldKind::U16,
            FieldValue::U32(_) => FieldKind::U32,
            FieldValue::Addr(_) => FieldKind::Addr,
        }
    }

    /// Integer value, or `None` for addresses.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::U8(v) => Some(u64::from(*v)),
            FieldValue::U16(v) => Some(u64::from(*v)),
            FieldValue::U32(v) => Some(u64::from(*v)),
            FieldValue::Addr(_) => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            FieldValue::Addr(addr) => Some(*addr),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::U8(v) => write!(f, "{}", v),
            FieldValue::U16(v) => write!(f, "{}", v),
            FieldValue::U32(v) => write!(f, "{}", v),
            FieldValue::Addr(addr) => write!(f, "{}", addr),
        }
    }
}

/// Reads typed fields from a byte source, tracking the consumed offset.
///
/// After a failed read the reader has consumed an unspecified number of bytes
/// (at most the field width) and should be dropped.
#[derive(Debug)]
pub struct FieldReader<R> {
    inner: R,
    offset: usize,
}

impl<R: Read> FieldReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, offset: 0 }
    }

    /// Bytes consumed by successful reads so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read one field of type `T`, named `field` for error reporting.
    pub fn read<T: WireField>(&mut self, field: &'static str) -> Result<T> {
        let width = T::KIND.width();
        match T::read_from(&mut self.inner) {
            Ok(value) => {
                self.offset += width;
                Ok(value)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::ShortRead {
                field,
                offset: self.offset,
                width,
                source: e,
            }),
            Err(e) => Err(Error::Io {
                field,
                offset: self.offset,
                source: e,
            }),
        }
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8> {
        self.read(field)
    }

    pub fn read_u16(&mut self, field: &'static str) -> Result<u16> {
        self.read(field)
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32> {
        self.read(field)
    }

    pub fn read_address(&mut self, field: &'static str) -> Result<Address> {
        self.read(field)
    }
}
