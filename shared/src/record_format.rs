use thiserror::Error;

use crate::DrawingRecord;

pub const RECORD_FILE_MAGIC: [u8; 4] = *b"DBDR";
pub const RECORD_FILE_VERSION: u32 = 1;
const RECORD_HEADER_LEN: usize = RECORD_FILE_MAGIC.len() + std::mem::size_of::<u32>();

#[derive(Debug, Error)]
pub enum RecordCodecError {
    #[error("unsupported record file version {0}")]
    UnsupportedVersion(u32),
    #[error("invalid record file")]
    InvalidData,
    #[error("failed to encode record: {0}")]
    Encode(String),
}

pub fn encode_record_file(record: &DrawingRecord) -> Result<Vec<u8>, RecordCodecError> {
    let body = bincode::encode_to_vec(record, bincode::config::standard())
        .map_err(|error| RecordCodecError::Encode(error.to_string()))?;
    let mut payload = Vec::with_capacity(RECORD_HEADER_LEN + body.len());
    payload.extend_from_slice(&RECORD_FILE_MAGIC);
    payload.extend_from_slice(&RECORD_FILE_VERSION.to_le_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

pub fn decode_record_file(payload: &[u8]) -> Result<DrawingRecord, RecordCodecError> {
    if !(payload.len() >= RECORD_HEADER_LEN && payload.starts_with(&RECORD_FILE_MAGIC)) {
        return Err(RecordCodecError::InvalidData);
    }
    let version = u32::from_le_bytes(
        payload[RECORD_FILE_MAGIC.len()..RECORD_HEADER_LEN]
            .try_into()
            .map_err(|_| RecordCodecError::InvalidData)?,
    );
    let body = &payload[RECORD_HEADER_LEN..];
    match version {
        1 => bincode::decode_from_slice(body, bincode::config::standard())
            .map(|(record, _)| record)
            .map_err(|_| RecordCodecError::InvalidData),
        _ => Err(RecordCodecError::UnsupportedVersion(version)),
    }
}
