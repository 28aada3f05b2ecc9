//! Fixed-layout NetFlow record codec.
//!
//! This crate decodes and encodes the fixed-format NetFlow export versions:
//!
//! - NetFlow v1 (16-byte header, 48-byte records)
//! - NetFlow v5 (24-byte header, 48-byte records)
//! - NetFlow v7 (24-byte header, 53-byte records)
//!
//! Record layouts are declared once with [`wire_record!`], which yields the
//! struct, its [`Layout`] and its [`Record`] implementation. Decoding reads
//! fields in layout order from any [`std::io::Read`] and fails with
//! [`Error::ShortRead`] on truncated input; encoding writes the same fields
//! back to their exact wire bytes.
//!
//! - [`reader`] - Primitive field reader (`FieldReader`, `WireField`)
//! - [`addr`] - IPv4 address type
//! - [`layout`] - Layout descriptors
//! - [`codec`] - Generic record codec (`Record`, `wire_record!`)
//! - [`header`], [`v1`], [`v5`], [`v7`] - Versioned headers and flow records
//! - [`flow`], [`packet`] - Version dispatch and packet decoding
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```ignore
//! use zensight_netflow::{Record, V7FlowRecord};
//!
//! let record = V7FlowRecord::decode(&bytes[..])?;
//! println!("{}", record); // 192.168.1.1/24:80 -> 10.0.0.1/16:443
//! assert_eq!(record.to_bytes().len(), record.encoded_len());
//! ```

pub mod addr;
pub mod codec;
pub mod config;
pub mod error;
pub mod flow;
pub mod header;
pub mod layout;
pub mod packet;
pub mod reader;
pub mod v1;
pub mod v5;
pub mod v7;

// `wire_record!` expands to `$crate::bytes::BufMut`; not part of the public API.
#[doc(hidden)]
pub use bytes;

// Re-export commonly used types at the crate root
pub use addr::Address;
pub use codec::Record;
pub use config::{DecoderConfig, LogFormat, LoggingConfig, NetFlowConfig};
pub use error::{Error, Result};
pub use flow::{FlowRecord, ip_protocol_name};
pub use header::{ExportHeader, HeaderBase, V5Header, V7Header};
pub use layout::{FieldKind, FieldSpec, Layout};
pub use packet::{Header, Packet, PacketDecoder, Version};
pub use reader::{FieldReader, FieldValue, WireField};
pub use v1::{V1_RECORD_LEN, V1FlowRecord};
pub use v5::{V5_RECORD_LEN, V5FlowRecord};
pub use v7::{V7_RECORD_LEN, V7FlowRecord};

/// Initialize tracing with the given configuration.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a global
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
