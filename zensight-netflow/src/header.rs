//! Export packet headers.
//!
//! Every fixed-format NetFlow header starts with the same 16-byte preamble,
//! [`HeaderBase`], which is also the complete v1 header. Later versions append
//! their own fields after it.

use serde::{Deserialize, Serialize};

use crate::wire_record;

wire_record! {
    /// Preamble shared by all fixed-format NetFlow headers.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct HeaderBase("NetFlow base header") {
        /// NetFlow export format version.
        pub version: u16,
        /// Number of flow records in this packet.
        pub count: u16,
        /// Milliseconds since the exporting device booted.
        pub sys_uptime: u32,
        /// Seconds since 0000 UTC 1970.
        pub unix_secs: u32,
        /// Residual nanoseconds since 0000 UTC 1970.
        pub unix_nsecs: u32,
    }
}

wire_record! {
    /// NetFlow v5 header.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct V5Header("NetFlow v5 header") : base: HeaderBase {
        /// Sequence counter of total flows seen.
        pub flow_sequence: u32,
        /// Type of flow-switching engine.
        pub engine_type: u8,
        /// Slot number of the flow-switching engine.
        pub engine_id: u8,
        /// Sampling mode (2 bits) and interval (14 bits).
        pub sampling_interval: u16,
    }
}

wire_record! {
    /// NetFlow v7 (Catalyst 5000) header.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct V7Header("NetFlow v7 header") : base: HeaderBase {
        /// Sequence counter of total flows seen.
        pub flow_sequence: u32,
        /// Unused, zero on export.
        pub reserved: u32,
    }
}

const _: () = assert!(<HeaderBase as crate::codec::Record>::LAYOUT.len() == 16);
const _: () = assert!(<V5Header as crate::codec::Record>::LAYOUT.len() == 24);
const _: () = assert!(<V7Header as crate::codec::Record>::LAYOUT.len() == 24);

/// Access to the shared header fields.
///
/// The version tag is mutable so that a dispatcher can rewrite it when
/// re-exporting; it carries no other state.
pub trait ExportHeader {
    fn base(&self) -> &HeaderBase;

    fn base_mut(&mut self) -> &mut HeaderBase;

    fn version(&self) -> u16 {
        self.base().version
    }

    fn set_version(&mut self, version: u16) {
        self.base_mut().version = version;
    }

    /// Number of records announced by this header.
    fn count(&self) -> u16 {
        self.base().count
    }
}

impl ExportHeader for HeaderBase {
    fn base(&self) -> &HeaderBase {
        self
    }

    fn base_mut(&mut self) -> &mut HeaderBase {
        self
    }
}

impl ExportHeader for V5Header {
    fn base(&self) -> &HeaderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HeaderBase {
        &mut self.base
    }
}

impl ExportHeader for V7Header {
    fn base(&self) -> &HeaderBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut HeaderBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Record;

    fn sample_v7() -> V7Header {
        V7Header {
            base: HeaderBase {
                version: 7,
                count: 2,
                sys_uptime: 1_000,
                unix_secs: 1_700_000_000,
                unix_nsecs: 500,
            },
            flow_sequence: 42,
            reserved: 0,
        }
    }

    #[test]
    fn test_header_lengths() {
        assert_eq!(HeaderBase::LAYOUT.len(), 16);
        assert_eq!(V5Header::LAYOUT.len(), 24);
        assert_eq!(V7Header::LAYOUT.len(), 24);
        assert_eq!(V7Header::LAYOUT.offset_of("flow_sequence"), Some(16));
        assert_eq!(V7Header::LAYOUT.offset_of("reserved"), Some(20));
    }

    #[test]
    fn test_v7_header_wire_bytes() {
        let bytes = sample_v7().to_bytes();
        assert_eq!(&bytes[0..2], &[0x00, 0x07]);
        assert_eq!(&bytes[2..4], &[0x00, 0x02]);
        assert_eq!(&bytes[16..20], &[0x00, 0x00, 0x00, 0x2A]);
        assert_eq!(&bytes[20..24], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_v7_header_roundtrip() {
        let header = sample_v7();
        let decoded = V7Header::decode(&header.to_bytes()[..]).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_v5_header_roundtrip() {
        let header = V5Header {
            base: HeaderBase {
                version: 5,
                count: 30,
                ..Default::default()
            },
            flow_sequence: 1,
            engine_type: 1,
            engine_id: 3,
            sampling_interval: 0x4064,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes[20..24], &[0x01, 0x03, 0x40, 0x64]);
        assert_eq!(V5Header::decode(&bytes[..]).unwrap(), header);
    }

    #[test]
    fn test_version_accessor() {
        let mut header = sample_v7();
        assert_eq!(header.version(), 7);
        assert_eq!(header.count(), 2);

        header.set_version(5);
        assert_eq!(header.version(), 5);
        assert_eq!(header.base.version, 5);
    }

    #[test]
    fn test_truncated_extension_is_short_read() {
        let bytes = sample_v7().to_bytes();
        let err = V7Header::decode(&bytes[..20]).unwrap_err();
        assert!(err.is_short_read());
        assert_eq!(err.field(), Some("reserved"));
    }
}
