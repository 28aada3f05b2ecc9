//! IPv4 address as carried in fixed-layout flow records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{AddrParseError, Ipv4Addr};
use std::str::FromStr;

/// Four raw address bytes in network order.
///
/// No semantic checks are made: multicast, broadcast and unspecified
/// addresses are carried as-is.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "Ipv4Addr", from = "Ipv4Addr")]
pub struct Address([u8; 4]);

impl Address {
    /// Width of an address on the wire.
    pub const WIDTH: usize = 4;

    /// Create an address from its four octets.
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self([a, b, c, d])
    }

    /// The raw octets in wire order.
    pub const fn octets(&self) -> [u8; 4] {
        self.0
    }
}

impl From<[u8; 4]> for Address {
    fn from(octets: [u8; 4]) -> Self {
        Self(octets)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

impl FromStr for Address {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>().map(Self::from)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{}.{}.{}.{}", a, b, c, d)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}
