use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

/// Length in bytes of a single record.
pub const RECORD_LEN: usize = 100;
/// Length in bytes of the sort key at the start of each record.
pub const KEY_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record must be {record_len} bytes, got {0}", record_len = RECORD_LEN)]
    InvalidLength(usize),

    #[error("input of {len} bytes is not a whole number of {record_len}-byte records", record_len = RECORD_LEN)]
    TrailingBytes { len: usize },

    #[error("unknown frame control byte {0:#04x}")]
    UnknownControl(u8),
}

/// A single fixed-length record: `key (10 bytes) || payload (90 bytes)`.
///
/// Records compare by key only. Two records with the same key but different
/// payloads are `Equal` under `cmp_key`, which is what the sorter uses.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Record([u8; RECORD_LEN]);

impl Record {
    pub fn new(bytes: [u8; RECORD_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, RecordError> {
        let array: [u8; RECORD_LEN] = bytes
            .try_into()
            .map_err(|_| RecordError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    pub fn key(&self) -> &[u8] {
        &self.0[..KEY_LEN]
    }

    pub fn payload(&self) -> &[u8] {
        &self.0[KEY_LEN..]
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_LEN] {
        &self.0
    }

    pub fn cmp_key(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record(key=")?;
        for byte in self.key() {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

/// Splits a flat buffer into records.
///
/// The buffer must be an exact multiple of [`RECORD_LEN`]; an empty buffer yields no records.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<Record>, RecordError> {
    if bytes.len() % RECORD_LEN != 0 {
        return Err(RecordError::TrailingBytes { len: bytes.len() });
    }

    bytes
        .chunks_exact(RECORD_LEN)
        .map(Record::from_slice)
        .collect()
}

/// Concatenates records with no delimiters.
pub fn encode_records(records: &[Record]) -> Vec<u8> {
    let mut out = Vec::with_capacity(records.len() * RECORD_LEN);
    for record in records {
        out.extend_from_slice(record.as_bytes());
    }
    out
}
