//! Exchange Wire Protocol
//!
//! Every peer connection carries a sequence of fixed 101-byte frames and ends with
//! exactly one sentinel frame followed by connection close.
//!
//! The sentinel is written as 101 bytes of `1` for compatibility with existing peers,
//! but a receiver only inspects the control byte.

use super::types::{RECORD_LEN, Record, RecordError};

/// Length of a frame on the wire: control byte + record body.
pub const FRAME_LEN: usize = RECORD_LEN + 1;

/// Control byte of a data frame.
pub const CONTROL_DATA: u8 = 0;
/// Control byte of the sentinel frame.
pub const CONTROL_SENTINEL: u8 = 1;

/// The literal sentinel frame: every byte set to `1`.
pub const SENTINEL_FRAME: [u8; FRAME_LEN] = [CONTROL_SENTINEL; FRAME_LEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Record),
    Sentinel,
}

impl Frame {
    pub fn encode(&self) -> [u8; FRAME_LEN] {
        match self {
            Frame::Data(record) => encode_data(record),
            Frame::Sentinel => SENTINEL_FRAME,
        }
    }

    /// Decodes a complete frame. Only the control byte decides the frame kind.
    pub fn decode(bytes: &[u8; FRAME_LEN]) -> Result<Self, RecordError> {
        match bytes[0] {
            CONTROL_DATA => Ok(Frame::Data(Record::from_slice(&bytes[1..])?)),
            CONTROL_SENTINEL => Ok(Frame::Sentinel),
            other => Err(RecordError::UnknownControl(other)),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Frame::Sentinel)
    }
}

pub fn encode_data(record: &Record) -> [u8; FRAME_LEN] {
    let mut frame = [0u8; FRAME_LEN];
    frame[0] = CONTROL_DATA;
    frame[1..].copy_from_slice(record.as_bytes());
    frame
}
