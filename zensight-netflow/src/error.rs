//! Error types for NetFlow decoding and configuration.

use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding NetFlow data or loading configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// The source ran out of bytes before a field was complete.
    #[error("Short read on field '{field}' at offset {offset}: needed {width} bytes")]
    ShortRead {
        field: &'static str,
        offset: usize,
        width: usize,
        #[source]
        source: std::io::Error,
    },

    /// The byte source itself reported a fault.
    #[error("I/O error on field '{field}' at offset {offset}: {source}")]
    Io {
        field: &'static str,
        offset: usize,
        #[source]
        source: std::io::Error,
    },

    /// The header carries a version this crate has no layout for.
    #[error("Unsupported NetFlow version: {0}")]
    UnsupportedVersion(u16),

    /// The version is known but turned off in the decoder configuration.
    #[error("NetFlow v{0} is disabled by configuration")]
    VersionDisabled(u16),

    /// The header announces more records than allowed.
    #[error("NetFlow v{version} packet announces {count} records (max: {max})")]
    TooManyRecords { version: u16, count: u16, max: u16 },

    /// Bytes left over after the last announced record.
    #[error("{0} trailing bytes after last flow record")]
    TrailingBytes(usize),

    /// A record does not belong to the packet's version.
    #[error("Record version v{record} does not match header version v{header}")]
    VersionMismatch { header: u16, record: u16 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    Json5(#[from] json5::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns true if this error was caused by truncated input.
    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::ShortRead { .. })
    }

    /// Name of the field being read when the error occurred, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::ShortRead { field, .. } | Error::Io { field, .. } => Some(field),
            _ => None,
        }
    }
}
