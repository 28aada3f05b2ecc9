//! NetFlow v7 (Catalyst 5000) flow records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::addr::Address;
use crate::codec::Record;
use crate::wire_record;

wire_record! {
    /// NetFlow v7 flow record, 53 bytes on the wire.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct V7FlowRecord("NetFlow v7 flow record") {
        /// Source IP address.
        pub src_addr: Address,
        /// Destination IP address.
        pub dst_addr: Address,
        /// Next hop router; zero for switched flows.
        pub next_hop: Address,
        /// SNMP index of the input interface.
        pub input: u16,
        /// SNMP index of the output interface.
        pub output: u16,
        /// Packets in the flow.
        pub packets: u32,
        /// Layer 3 bytes in the flow.
        pub octets: u32,
        /// SysUptime at start of flow.
        pub first: u32,
        /// SysUptime when the last packet of the flow was seen.
        pub last: u32,
        pub src_port: u16,
        pub dst_port: u16,
        /// Unused.
        pub pad: u16,
        /// Cumulative OR of TCP flags.
        pub tcp_flags: u8,
        /// IP protocol number.
        pub protocol: u8,
        /// IP type of service.
        pub tos: u8,
        /// Source autonomous system, origin or peer.
        pub src_as: u16,
        /// Destination autonomous system, origin or peer.
        pub dst_as: u16,
        /// Source address prefix mask bits.
        pub src_mask: u8,
        /// Destination address prefix mask bits.
        pub dst_mask: u8,
        /// Flags marking, among other things, invalid flows.
        pub flags: u16,
        /// Router bypassed by the Catalyst 5000 (shortcut router).
        pub router_sc: Address,
    }
}

/// Encoded size of a [`V7FlowRecord`].
pub const V7_RECORD_LEN: usize = V7FlowRecord::LAYOUT.len();

const _: () = assert!(V7_RECORD_LEN == 53);

impl fmt::Display for V7FlowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{} -> {}/{}:{}",
            self.src_addr, self.src_mask, self.src_port, self.dst_addr, self.dst_mask, self.dst_port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_flow() -> V7FlowRecord {
        V7FlowRecord {
            src_addr: Address::new(192, 168, 1, 1),
            dst_addr: Address::new(10, 0, 0, 1),
            src_port: 80,
            dst_port: 443,
            src_mask: 24,
            dst_mask: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_matches_wire_table() {
        let expected = [
            ("src_addr", 0),
            ("dst_addr", 4),
            ("next_hop", 8),
            ("input", 12),
            ("output", 14),
            ("packets", 16),
            ("octets", 20),
            ("first", 24),
            ("last", 28),
            ("src_port", 32),
            ("dst_port", 34),
            ("pad", 36),
            ("tcp_flags", 38),
            ("protocol", 39),
            ("tos", 40),
            ("src_as", 41),
            ("dst_as", 43),
            ("src_mask", 45),
            ("dst_mask", 46),
            ("flags", 47),
            ("router_sc", 49),
        ];

        let offsets: Vec<_> = V7FlowRecord::LAYOUT
            .offsets()
            .into_iter()
            .map(|(offset, spec)| (spec.name, offset))
            .collect();
        assert_eq!(offsets, expected);
        assert_eq!(V7FlowRecord::LAYOUT.len(), 53);
    }

    #[test]
    fn test_display() {
        assert_eq!(web_flow().to_string(), "192.168.1.1/24:80 -> 10.0.0.1/16:443");
    }

    #[test]
    fn test_length_is_value_independent() {
        let zero = V7FlowRecord::default();
        let full = V7FlowRecord {
            packets: u32::MAX,
            octets: u32::MAX,
            flags: u16::MAX,
            ..web_flow()
        };

        assert_eq!(zero.encoded_len(), 53);
        assert_eq!(full.encoded_len(), 53);
        assert_eq!(full.encoded_len(), full.encoded_len());
        assert_eq!(full.to_bytes().len(), full.encoded_len());
    }

    #[test]
    fn test_decode_known_stream() {
        let mut data = vec![0u8; 53];
        data[0..4].copy_from_slice(&[192, 168, 1, 1]);
        data[4..8].copy_from_slice(&[10, 0, 0, 1]);
        data[32..34].copy_from_slice(&80u16.to_be_bytes());
        data[34..36].copy_from_slice(&443u16.to_be_bytes());

        let record = V7FlowRecord::decode(&data[..]).unwrap();
        assert_eq!(record.src_addr, Address::new(192, 168, 1, 1));
        assert_eq!(record.dst_addr, Address::new(10, 0, 0, 1));
        assert_eq!(record.src_port, 80);
        assert_eq!(record.dst_port, 443);
        assert_eq!(record.packets, 0);
        assert_eq!(record.router_sc, Address::default());
    }

    #[test]
    fn test_tail_fields_position() {
        let record = V7FlowRecord {
            tcp_flags: 0x12,
            protocol: 6,
            tos: 0x20,
            src_as: 65001,
            dst_as: 65002,
            flags: 0x0102,
            router_sc: Address::new(172, 16, 0, 254),
            ..web_flow()
        };

        let bytes = record.to_bytes();
        assert_eq!(&bytes[38..41], &[0x12, 6, 0x20]);
        assert_eq!(&bytes[41..43], &65001u16.to_be_bytes());
        assert_eq!(&bytes[43..45], &65002u16.to_be_bytes());
        assert_eq!(&bytes[45..47], &[24, 16]);
        assert_eq!(&bytes[47..49], &[0x01, 0x02]);
        assert_eq!(&bytes[49..53], &[172, 16, 0, 254]);
    }

    #[test]
    fn test_every_truncation_fails() {
        let bytes = web_flow().to_bytes();
        for len in 0..V7_RECORD_LEN {
            let err = V7FlowRecord::decode(&bytes[..len]).unwrap_err();
            assert!(err.is_short_read(), "length {} should be a short read", len);
        }
    }
}
