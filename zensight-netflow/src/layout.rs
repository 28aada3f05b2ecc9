//! Declarative wire layouts.
//!
//! A [`Layout`] lists a record's fields in wire order. Widths come from the
//! field kind, so only 8/16/32-bit unsigned integers and 4-byte addresses can
//! be described at all. The total length is computed when the layout constant
//! is evaluated, never per call.

/// Wire representation of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer, big-endian.
    U16,
    /// 32-bit unsigned integer, big-endian.
    U32,
    /// IPv4 address, 4 raw bytes.
    Addr,
}

impl FieldKind {
    /// Number of bytes this kind occupies on the wire.
    pub const fn width(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::Addr => 4,
        }
    }
}

/// One named entry in a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn width(&self) -> usize {
        self.kind.width()
    }
}

/// Ordered description of a record's wire shape.
///
/// A layout may extend a base layout; the base's fields come first.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    name: &'static str,
    base: Option<&'static Layout>,
    fields: &'static [FieldSpec],
    len: usize,
}

impl Layout {
    pub const fn new(
        name: &'static str,
        base: Option<&'static Layout>,
        fields: &'static [FieldSpec],
    ) -> Self {
        let mut len = match base {
            Some(base) => base.len,
            None => 0,
        };
        let mut i = 0;
        while i < fields.len() {
            len += fields[i].kind.width();
            i += 1;
        }

        Self {
            name,
            base,
            fields,
            len,
        }
    }

    /// Human-readable layout name (e.g., "NetFlow v7 flow record").
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Total encoded length in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The layout this one extends, if any.
    pub const fn base(&self) -> Option<&'static Layout> {
        self.base
    }

    /// All fields in wire order, base fields first.
    pub fn fields(&self) -> Vec<&'static FieldSpec> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<&'static FieldSpec>) {
        if let Some(base) = self.base {
            base.collect_fields(out);
        }
        out.extend(self.fields.iter());
    }

    /// Byte offset of each field, paired with its spec.
    pub fn offsets(&self) -> Vec<(usize, &'static FieldSpec)> {
        let mut offset = 0;
        self.fields()
            .into_iter()
            .map(|spec| {
                let at = offset;
                offset += spec.width();
                (at, spec)
            })
            .collect()
    }

    /// Byte offset of the named field.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.offsets()
            .into_iter()
            .find(|(_, spec)| spec.name == name)
            .map(|(offset, _)| offset)
    }
}
