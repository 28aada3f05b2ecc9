//! NetFlow v5 flow records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::addr::Address;
use crate::codec::Record;
use crate::wire_record;

wire_record! {
    /// NetFlow v5 flow record, 48 bytes on the wire.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct V5FlowRecord("NetFlow v5 flow record") {
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
        pub pad1: u8,
        pub tcp_flags: u8,
        pub protocol: u8,
        pub tos: u8,
        pub src_as: u16,
        pub dst_as: u16,
        pub src_mask: u8,
        pub dst_mask: u8,
        pub pad2: u16,
    }
}

/// Encoded size of a [`V5FlowRecord`].
pub const V5_RECORD_LEN: usize = V5FlowRecord::LAYOUT.len();

const _: () = assert!(V5_RECORD_LEN == 48);

impl fmt::Display for V5FlowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}:{} -> {}/{}:{}",
            self.src_addr, self.src_mask, self.src_port, self.dst_addr, self.dst_mask, self.dst_port
        )
    }
}
