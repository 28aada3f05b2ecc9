//! NetFlow v1 flow records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::addr::Address;
use crate::codec::Record;
use crate::wire_record;

wire_record! {
    /// NetFlow v1 flow record, 48 bytes on the wire.
    ///
    /// v1 carries no AS numbers or prefix masks.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct V1FlowRecord("NetFlow v1 flow record") {
        pub src_addr: Address,
        pub dst_addr: Address,
        pub next_hop: Address,
        pub input: u16,
        pub output: u16,
        pub packets: u32,
        pub octets: u32,
        pub first: u32,
        pub last: u32,
        pub src_port: u16,
        pub dst_port: u16,
        pub pad1: u16,
        pub protocol: u8,
        pub tos: u8,
        pub tcp_flags: u8,
        pub pad2: u8,
        pub pad3: u16,
        pub reserved: u32,
    }
}

/// Encoded size of a [`V1FlowRecord`].
pub const V1_RECORD_LEN: usize = V1FlowRecord::LAYOUT.len();

const _: () = assert!(V1_RECORD_LEN == 48);

impl fmt::Display for V1FlowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.src_addr, self.src_port, self.dst_addr, self.dst_port
        )
    }
}
