//! Export packet decoding and version dispatch.
//!
//! A packet is one header followed by `count` flow records of the header's
//! version. [`PacketDecoder`] reads the shared [`HeaderBase`] first, uses its
//! version tag to pick the header extension and record layout, then reads the
//! records.

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

use crate::codec::Record;
use crate::config::DecoderConfig;
use crate::error::{Error, Result};
use crate::flow::FlowRecord;
use crate::header::{ExportHeader, HeaderBase, V5Header, V7Header};
use crate::reader::FieldReader;
use crate::v1::V1FlowRecord;
use crate::v5::V5FlowRecord;
use crate::v7::V7FlowRecord;

/// Supported fixed-format NetFlow versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Version {
    V1,
    V5,
    V7,
}

impl Version {
    pub const ALL: [Version; 3] = [Version::V1, Version::V5, Version::V7];

    /// Version number as carried in the header.
    pub const fn as_u16(self) -> u16 {
        match self {
            Version::V1 => 1,
            Version::V5 => 5,
            Version::V7 => 7,
        }
    }

    pub const fn header_len(self) -> usize {
        match self {
            Version::V1 => HeaderBase::LAYOUT.len(),
            Version::V5 => V5Header::LAYOUT.len(),
            Version::V7 => V7Header::LAYOUT.len(),
        }
    }

    pub const fn record_len(self) -> usize {
        match self {
            Version::V1 => V1FlowRecord::LAYOUT.len(),
            Version::V5 => V5FlowRecord::LAYOUT.len(),
            Version::V7 => V7FlowRecord::LAYOUT.len(),
        }
    }

    /// Maximum records per packet allowed by the protocol.
    pub const fn max_records(self) -> u16 {
        match self {
            Version::V1 => 24,
            Version::V5 => 30,
            Version::V7 => 27,
        }
    }
}

impl TryFrom<u16> for Version {
    type Error = Error;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Version::V1),
            5 => Ok(Version::V5),
            7 => Ok(Version::V7),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }
}

impl From<Version> for u16 {
    fn from(version: Version) -> Self {
        version.as_u16()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u16())
    }
}

/// A packet header of any supported version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Header {
    V1(HeaderBase),
    V5(V5Header),
    V7(V7Header),
}

impl Header {
    /// Version selected by this header's variant.
    ///
    /// This is the variant, not the wire tag; see [`ExportHeader::version`].
    pub fn kind(&self) -> Version {
        match self {
            Header::V1(_) => Version::V1,
            Header::V5(_) => Version::V5,
            Header::V7(_) => Version::V7,
        }
    }

    pub fn encoded_len(&self) -> usize {
        match self {
            Header::V1(h) => h.encoded_len(),
            Header::V5(h) => h.encoded_len(),
            Header::V7(h) => h.encoded_len(),
        }
    }

    pub fn to_bytes(&self) -> Bytes {
        match self {
            Header::V1(h) => h.to_bytes(),
            Header::V5(h) => h.to_bytes(),
            Header::V7(h) => h.to_bytes(),
        }
    }

    fn encode_into(&self, dst: &mut BytesMut) {
        match self {
            Header::V1(h) => h.encode_into(dst),
            Header::V5(h) => h.encode_into(dst),
            Header::V7(h) => h.encode_into(dst),
        }
    }
}

impl ExportHeader for Header {
    fn base(&self) -> &HeaderBase {
        match self {
            Header::V1(h) => h,
            Header::V5(h) => h.base(),
            Header::V7(h) => h.base(),
        }
    }

    fn base_mut(&mut self) -> &mut HeaderBase {
        match self {
            Header::V1(h) => h,
            Header::V5(h) => h.base_mut(),
            Header::V7(h) => h.base_mut(),
        }
    }
}

/// A decoded export packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Packet {
    pub header: Header,
    pub records: Vec<FlowRecord>,
}

impl Packet {
    /// Build a packet, setting the header's version tag and count.
    ///
    /// Every record must match the header's variant, and there may be at most
    /// [`Version::max_records`] of them.
    pub fn new(mut header: Header, records: Vec<FlowRecord>) -> Result<Self> {
        let version = header.kind();
        if let Some(record) = records.iter().find(|r| r.version() != version) {
            return Err(Error::VersionMismatch {
                header: version.as_u16(),
                record: record.version().as_u16(),
            });
        }

        let max = version.max_records();
        if records.len() > usize::from(max) {
            return Err(Error::TooManyRecords {
                version: version.as_u16(),
                count: u16::try_from(records.len()).unwrap_or(u16::MAX),
                max,
            });
        }

        let base = header.base_mut();
        base.version = version.as_u16();
        base.count = records.len() as u16;

        Ok(Self { header, records })
    }

    pub fn version(&self) -> Version {
        self.header.kind()
    }

    pub fn encoded_len(&self) -> usize {
        self.header.encoded_len() + self.records.iter().map(FlowRecord::encoded_len).sum::<usize>()
    }

    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.header.encode_into(&mut buf);
        for record in &self.records {
            record.encode_into(&mut buf);
        }
        buf.freeze()
    }
}

/// Decodes whole export packets according to a [`DecoderConfig`].
#[derive(Debug, Clone, Default)]
pub struct PacketDecoder {
    config: DecoderConfig,
}

impl PacketDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a packet from a complete datagram.
    pub fn decode(&self, data: &[u8]) -> Result<Packet> {
        let mut reader = FieldReader::new(data);
        let packet = self.read_packet(&mut reader)?;

        let trailing = data.len() - reader.offset();
        if trailing > 0 {
            if !self.config.allow_trailing_bytes {
                tracing::debug!(
                    "Rejecting NetFlow {} packet with {} trailing bytes",
                    packet.version(),
                    trailing
                );
                return Err(Error::TrailingBytes(trailing));
            }
            tracing::debug!(
                "Ignoring {} trailing bytes after NetFlow {} packet",
                trailing,
                packet.version()
            );
        }

        Ok(packet)
    }

    /// Decode a packet from a stream, consuming exactly the announced records.
    pub fn decode_from<R: Read>(&self, src: R) -> Result<Packet> {
        let mut reader = FieldReader::new(src);
        self.read_packet(&mut reader)
    }

    fn read_packet<R: Read>(&self, reader: &mut FieldReader<R>) -> Result<Packet> {
        let base = HeaderBase::read_fields(reader)?;
        let version = Version::try_from(base.version)?;

        if !self.config.accepts(version) {
            tracing::debug!("Dropping NetFlow {} packet: version disabled", version);
            return Err(Error::VersionDisabled(version.as_u16()));
        }

        let max = self.config.max_records_for(version);
        if base.count > max {
            return Err(Error::TooManyRecords {
                version: version.as_u16(),
                count: base.count,
                max,
            });
        }

        let header = match version {
            Version::V1 => Header::V1(base),
            Version::V5 => Header::V5(V5Header::read_after_base(base, reader)?),
            Version::V7 => Header::V7(V7Header::read_after_base(base, reader)?),
        };

        let mut records = Vec::with_capacity(usize::from(base.count));
        for _ in 0..base.count {
            let record = match version {
                Version::V1 => FlowRecord::V1(V1FlowRecord::read_fields(reader)?),
                Version::V5 => FlowRecord::V5(V5FlowRecord::read_fields(reader)?),
                Version::V7 => FlowRecord::V7(V7FlowRecord::read_fields(reader)?),
            };
            records.push(record);
        }

        tracing::trace!(
            "Decoded NetFlow {} packet with {} records ({} bytes)",
            version,
            records.len(),
            reader.offset()
        );

        Ok(Packet { header, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addr::Address;

    fn v7_packet(count: usize) -> Packet {
        let header = Header::V7(V7Header {
            base: HeaderBase {
                version: 7,
                sys_uptime: 12_345,
                unix_secs: 1_700_000_000,
                ..Default::default()
            },
            flow_sequence: 100,
            reserved: 0,
        });
        let records = (0..count)
            .map(|i| {
                FlowRecord::V7(V7FlowRecord {
                    src_addr: Address::new(192, 168, 1, i as u8),
                    dst_addr: Address::new(10, 0, 0, 1),
                    src_port: 1024 + i as u16,
                    dst_port: 443,
                    protocol: 6,
                    ..Default::default()
                })
            })
            .collect();
        Packet::new(header, records).unwrap()
    }

    #[test]
    fn test_version_conversions() {
        assert_eq!(Version::try_from(5).unwrap(), Version::V5);
        assert!(matches!(
            Version::try_from(9),
            Err(Error::UnsupportedVersion(9))
        ));
        assert_eq!(u16::from(Version::V7), 7);
        assert_eq!(Version::V7.to_string(), "v7");
        assert_eq!(Version::V7.header_len(), 24);
        assert_eq!(Version::V7.record_len(), 53);
        assert_eq!(Version::V1.header_len(), 16);
    }

    #[test]
    fn test_packet_new_sets_count() {
        let packet = v7_packet(3);
        assert_eq!(packet.header.count(), 3);
        assert_eq!(packet.encoded_len(), 24 + 3 * 53);
        assert_eq!(packet.to_bytes().len(), packet.encoded_len());
    }

    #[test]
    fn test_packet_new_sets_version_tag() {
        let packet = Packet::new(
            Header::V7(V7Header::default()),
            vec![FlowRecord::V7(V7FlowRecord::default())],
        )
        .unwrap();
        assert_eq!(packet.header.version(), 7);

        let decoded = PacketDecoder::default().decode(&packet.to_bytes()).unwrap();
        assert_eq!(decoded, packet);

        let v1 = Packet::new(Header::V1(HeaderBase::default()), vec![]).unwrap();
        assert_eq!(&v1.to_bytes()[..2], &[0, 1]);
    }

    #[test]
    fn test_packet_new_record_limit() {
        assert_eq!(v7_packet(27).header.count(), 27);

        let records = vec![FlowRecord::V7(V7FlowRecord::default()); 28];
        let err = Packet::new(Header::V7(V7Header::default()), records).unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyRecords {
                version: 7,
                count: 28,
                max: 27
            }
        ));

        let decoded = PacketDecoder::default()
            .decode(&v7_packet(27).to_bytes())
            .unwrap();
        assert_eq!(decoded.records.len(), 27);
    }

    #[test]
    fn test_packet_new_rejects_mixed_versions() {
        let header = Header::V5(V5Header::default());
        let err = Packet::new(header, vec![FlowRecord::V7(V7FlowRecord::default())]).unwrap_err();
        assert!(matches!(
            err,
            Error::VersionMismatch {
                header: 5,
                record: 7
            }
        ));
    }

    #[test]
    fn test_decode_roundtrip() {
        let packet = v7_packet(2);
        let decoded = PacketDecoder::default().decode(&packet.to_bytes()).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.version(), Version::V7);
        assert_eq!(decoded.header.version(), 7);
    }

    #[test]
    fn test_decode_empty_packet() {
        let packet = v7_packet(0);
        let decoded = PacketDecoder::default().decode(&packet.to_bytes()).unwrap();
        assert!(decoded.records.is_empty());
    }

    #[test]
    fn test_decode_truncated_record() {
        let bytes = v7_packet(2).to_bytes();
        let err = PacketDecoder::default()
            .decode(&bytes[..bytes.len() - 1])
            .unwrap_err();
        assert!(err.is_short_read());
        assert_eq!(err.field(), Some("router_sc"));
    }

    #[test]
    fn test_decode_unsupported_version() {
        let mut header = HeaderBase {
            version: 9,
            ..Default::default()
        };
        let err = PacketDecoder::default()
            .decode(&header.to_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(9)));

        header.set_version(10);
        let err = PacketDecoder::default()
            .decode(&header.to_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedVersion(10)));
    }

    #[test]
    fn test_decode_disabled_version() {
        let config = DecoderConfig {
            versions: vec![Version::V5],
            ..Default::default()
        };
        let err = PacketDecoder::new(config)
            .decode(&v7_packet(1).to_bytes())
            .unwrap_err();
        assert!(matches!(err, Error::VersionDisabled(7)));
    }

    #[test]
    fn test_decode_too_many_records() {
        let mut packet = v7_packet(1);
        packet.header.base_mut().count = 28;
        let err = PacketDecoder::default()
            .decode(&packet.to_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TooManyRecords {
                version: 7,
                count: 28,
                max: 27
            }
        ));
    }

    #[test]
    fn test_decode_max_records_override() {
        let config = DecoderConfig {
            max_records: Some(1),
            ..Default::default()
        };
        let decoder = PacketDecoder::new(config);
        assert!(decoder.decode(&v7_packet(1).to_bytes()).is_ok());
        assert!(matches!(
            decoder.decode(&v7_packet(2).to_bytes()),
            Err(Error::TooManyRecords { max: 1, .. })
        ));
    }

    #[test]
    fn test_decode_trailing_bytes() {
        let mut bytes = v7_packet(1).to_bytes().to_vec();
        bytes.extend_from_slice(&[0, 0, 0]);

        let lenient = PacketDecoder::default();
        assert_eq!(lenient.decode(&bytes).unwrap().records.len(), 1);

        let strict = PacketDecoder::new(DecoderConfig {
            allow_trailing_bytes: false,
            ..Default::default()
        });
        assert!(matches!(strict.decode(&bytes), Err(Error::TrailingBytes(3))));
    }

    #[test]
    fn test_decode_from_stream_stops_after_packet() {
        let mut bytes = v7_packet(1).to_bytes().to_vec();
        bytes.extend_from_slice(&[0xEE, 0xFF]);

        let mut src = &bytes[..];
        let packet = PacketDecoder::default().decode_from(&mut src).unwrap();
        assert_eq!(packet.records.len(), 1);
        assert_eq!(src, &[0xEE, 0xFF]);
    }

    #[test]
    fn test_header_dispatch_accessors() {
        let mut header = Header::V1(HeaderBase {
            version: 1,
            count: 4,
            ..Default::default()
        });
        assert_eq!(header.kind(), Version::V1);
        assert_eq!(header.count(), 4);
        assert_eq!(header.encoded_len(), 16);

        header.set_version(5);
        assert_eq!(header.version(), 5);
        assert_eq!(header.kind(), Version::V1);
    }
}
