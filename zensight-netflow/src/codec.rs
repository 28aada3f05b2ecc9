//! Generic struct codec driven by a [`Layout`].
//!
//! Record types are declared once with [`wire_record!`](crate::wire_record),
//! which derives the layout constant, the reader and the writer from the same
//! field list. Decoding, encoding and sizing are then provided by [`Record`]
//! for every declared type.

use bytes::{BufMut, Bytes, BytesMut};
use std::io::Read;

use crate::error::Result;
use crate::layout::Layout;
use crate::reader::{FieldReader, FieldValue};

/// A fixed-layout wire record.
pub trait Record: Sized {
    /// Wire shape of this record.
    const LAYOUT: Layout;

    /// Read every field in layout order.
    fn read_fields<R: Read>(reader: &mut FieldReader<R>) -> Result<Self>;

    /// Write every field in layout order.
    fn write_fields<B: BufMut>(&self, dst: &mut B);

    /// Call `visit` with each field name and value in layout order.
    fn visit_fields(&self, visit: &mut dyn FnMut(&'static str, FieldValue));

    /// Decode one record from `src`.
    ///
    /// Either every field is read or an error is returned; a partially
    /// populated record is never handed out.
    fn decode<R: Read>(src: R) -> Result<Self> {
        let mut reader = FieldReader::new(src);
        Self::read_fields(&mut reader)
    }

    /// Encode into a freshly allocated buffer of exactly [`Self::encoded_len`] bytes.
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(Self::LAYOUT.len());
        self.write_fields(&mut buf);
        debug_assert_eq!(buf.len(), Self::LAYOUT.len());
        buf.freeze()
    }

    /// Append the encoding to an existing buffer.
    fn encode_into<B: BufMut>(&self, dst: &mut B) {
        self.write_fields(dst);
    }

    /// Encoded length. Depends only on the layout, never on field values.
    fn encoded_len(&self) -> usize {
        Self::LAYOUT.len()
    }

    /// Field names and values in layout order.
    fn field_values(&self) -> Vec<(&'static str, FieldValue)> {
        let mut out = Vec::new();
        self.visit_fields(&mut |name, value| out.push((name, value)));
        out
    }
}

/// Declare a fixed-layout record.
///
/// Every field type must implement [`WireField`](crate::reader::WireField).
/// A record can extend another record by naming a base field after the layout
/// label; the base is read and written before the record's own fields, and a
/// `read_after_base` constructor is generated for callers that need to inspect
/// the base first.
///
/// ```ignore
/// wire_record! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub struct Example("example") : base: HeaderBase {
///         pub sequence: u32,
///         pub reserved: u32,
///     }
/// }
/// ```
#[macro_export]
macro_rules! wire_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident ($label:literal) : $base_field:ident : $base_ty:ty {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            /// Shared base fields, first on the wire.
            pub $base_field: $base_ty,
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $name {
            /// Read this record's own fields after its base has been read.
            pub fn read_after_base<R: ::std::io::Read>(
                $base_field: $base_ty,
                reader: &mut $crate::reader::FieldReader<R>,
            ) -> $crate::error::Result<Self> {
                Ok(Self {
                    $base_field,
                    $(
                        $field: reader.read::<$field_ty>(stringify!($field))?,
                    )*
                })
            }
        }

        impl $crate::codec::Record for $name {
            const LAYOUT: $crate::layout::Layout = $crate::layout::Layout::new(
                $label,
                Some(&<$base_ty as $crate::codec::Record>::LAYOUT),
                &[
                    $(
                        $crate::layout::FieldSpec {
                            name: stringify!($field),
                            kind: <$field_ty as $crate::reader::WireField>::KIND,
                        },
                    )*
                ],
            );

            fn read_fields<R: ::std::io::Read>(
                reader: &mut $crate::reader::FieldReader<R>,
            ) -> $crate::error::Result<Self> {
                let base = <$base_ty as $crate::codec::Record>::read_fields(reader)?;
                Self::read_after_base(base, reader)
            }

            fn write_fields<B: $crate::bytes::BufMut>(&self, dst: &mut B) {
                $crate::codec::Record::write_fields(&self.$base_field, dst);
                $(
                    $crate::reader::WireField::put(self.$field, dst);
                )*
            }

            fn visit_fields(
                &self,
                visit: &mut dyn FnMut(&'static str, $crate::reader::FieldValue),
            ) {
                $crate::codec::Record::visit_fields(&self.$base_field, visit);
                $(
                    visit(
                        stringify!($field),
                        $crate::reader::WireField::into_value(self.$field),
                    );
                )*
            }
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident ($label:literal) {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::codec::Record for $name {
            const LAYOUT: $crate::layout::Layout = $crate::layout::Layout::new(
                $label,
                None,
                &[
                    $(
                        $crate::layout::FieldSpec {
                            name: stringify!($field),
                            kind: <$field_ty as $crate::reader::WireField>::KIND,
                        },
                    )*
                ],
            );

            fn read_fields<R: ::std::io::Read>(
                reader: &mut $crate::reader::FieldReader<R>,
            ) -> $crate::error::Result<Self> {
                // Struct literal fields evaluate in source order, which is wire order.
                Ok(Self {
                    $(
                        $field: reader.read::<$field_ty>(stringify!($field))?,
                    )*
                })
            }

            fn write_fields<B: $crate::bytes::BufMut>(&self, dst: &mut B) {
                $(
                    $crate::reader::WireField::put(self.$field, dst);
                )*
            }

            fn visit_fields(
                &self,
                visit: &mut dyn FnMut(&'static str, $crate::reader::FieldValue),
            ) {
                $(
                    visit(
                        stringify!($field),
                        $crate::reader::WireField::into_value(self.$field),
                    );
                )*
            }
        }
    };
}
