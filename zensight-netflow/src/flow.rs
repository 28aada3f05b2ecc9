//! Version-tagged flow records.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

use crate::addr::Address;
use crate::codec::Record;
use crate::packet::Version;
use crate::reader::FieldValue;
use crate::v1::V1FlowRecord;
use crate::v5::V5FlowRecord;
use crate::v7::V7FlowRecord;

/// A flow record of any supported fixed-format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowRecord {
    V1(V1FlowRecord),
    V5(V5FlowRecord),
    V7(V7FlowRecord),
}

impl FlowRecord {
    pub fn version(&self) -> Version {
        match self {
            FlowRecord::V1(_) => Version::V1,
            FlowRecord::V5(_) => Version::V5,
            FlowRecord::V7(_) => Version::V7,
        }
    }

    pub fn src_addr(&self) -> Address {
        match self {
            FlowRecord::V1(r) => r.src_addr,
            FlowRecord::V5(r) => r.src_addr,
            FlowRecord::V7(r) => r.src_addr,
        }
    }

    pub fn dst_addr(&self) -> Address {
        match self {
            FlowRecord::V1(r) => r.dst_addr,
            FlowRecord::V5(r) => r.dst_addr,
            FlowRecord::V7(r) => r.dst_addr,
        }
    }

    pub fn src_port(&self) -> u16 {
        match self {
            FlowRecord::V1(r) => r.src_port,
            FlowRecord::V5(r) => r.src_port,
            FlowRecord::V7(r) => r.src_port,
        }
    }

    pub fn dst_port(&self) -> u16 {
        match self {
            FlowRecord::V1(r) => r.dst_port,
            FlowRecord::V5(r) => r.dst_port,
            FlowRecord::V7(r) => r.dst_port,
        }
    }

    /// IP protocol number.
    pub fn protocol(&self) -> u8 {
        match self {
            FlowRecord::V1(r) => r.protocol,
            FlowRecord::V5(r) => r.protocol,
            FlowRecord::V7(r) => r.protocol,
        }
    }

    pub fn packets(&self) -> u32 {
        match self {
            FlowRecord::V1(r) => r.packets,
            FlowRecord::V5(r) => r.packets,
            FlowRecord::V7(r) => r.packets,
        }
    }

    pub fn octets(&self) -> u32 {
        match self {
            FlowRecord::V1(r) => r.octets,
            FlowRecord::V5(r) => r.octets,
            FlowRecord::V7(r) => r.octets,
        }
    }

    /// Protocol name for well-known protocol numbers (e.g., "tcp").
    pub fn protocol_name(&self) -> Cow<'static, str> {
        ip_protocol_name(self.protocol())
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            FlowRecord::V1(r) => r.encoded_len(),
            FlowRecord::V5(r) => r.encoded_len(),
            FlowRecord::V7(r) => r.encoded_len(),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            FlowRecord::V1(r) => r.to_bytes(),
            FlowRecord::V5(r) => r.to_bytes(),
            FlowRecord::V7(r) => r.to_bytes(),
        }
    }

    pub fn encode_into<B: bytes::BufMut>(&self, dst: &mut B) {
        match self {
            FlowRecord::V1(r) => r.encode_into(dst),
            FlowRecord::V5(r) => r.encode_into(dst),
            FlowRecord::V7(r) => r.encode_into(dst),
        }
    }

    pub fn field_values(&self) -> Vec<(&'static str, FieldValue)> {
        match self {
            FlowRecord::V1(r) => r.field_values(),
            FlowRecord::V5(r) => r.field_values(),
            FlowRecord::V7(r) => r.field_values(),
        }
    }
}

impl fmt::Display for FlowRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowRecord::V1(r) => fmt::Display::fmt(r, f),
            FlowRecord::V5(r) => fmt::Display::fmt(r, f),
            FlowRecord::V7(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl From<V1FlowRecord> for FlowRecord {
    fn from(record: V1FlowRecord) -> Self {
        FlowRecord::V1(record)
    }
}

impl From<V5FlowRecord> for FlowRecord {
    fn from(record: V5FlowRecord) -> Self {
        FlowRecord::V5(record)
    }
}

impl From<V7FlowRecord> for FlowRecord {
    fn from(record: V7FlowRecord) -> Self {
        FlowRecord::V7(record)
    }
}

/// IANA protocol name for the `protocol` byte of a flow record.
///
/// Unassigned or uncommon numbers render as `proto_<n>`.
pub fn ip_protocol_name(proto: u8) -> Cow<'static, str> {
    let name = match proto {
        1 => "icmp",
        2 => "igmp",
        6 => "tcp",
        17 => "udp",
        41 => "ipv6",
        47 => "gre",
        50 => "esp",
        51 => "ah",
        58 => "icmpv6",
        89 => "ospf",
        103 => "pim",
        112 => "vrrp",
        132 => "sctp",
        _ => return Cow::Owned(format!("proto_{}", proto)),
    };
    Cow::Borrowed(name)
}
