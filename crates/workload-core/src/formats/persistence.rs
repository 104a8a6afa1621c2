//! # Persistence Format
//!
//! Binary framing for submission records.
//!
//! Format: Header (5 bytes) + JSON-serialized record.
//! - 4 bytes: Magic ("WKLD")
//! - 1 byte: Version
//!
//! The payload is self-describing so decimals keep their exact textual form
//! and internally tagged sections decode without a schema.
//!
//! Size and header are validated before the payload is parsed.

use crate::primitives::{self, MAX_RECORD_SIZE};
use crate::{SubmissionRecord, WorkloadError};

const HEADER_SIZE: usize = 5;

// =============================================================================
// RECORD HEADER
// =============================================================================

/// The header preceding every stored record.
#[derive(Debug, Clone, Copy)]
pub struct RecordHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl RecordHeader {
    /// Create a new header with the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *primitives::MAGIC_BYTES,
            version: primitives::FORMAT_VERSION,
        }
    }

    /// Validate magic and version.
    pub fn validate(&self) -> Result<(), WorkloadError> {
        if &self.magic != primitives::MAGIC_BYTES {
            return Err(WorkloadError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != primitives::FORMAT_VERSION {
            return Err(WorkloadError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version,
                primitives::FORMAT_VERSION
            )));
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WorkloadError> {
        if bytes.len() < HEADER_SIZE {
            return Err(WorkloadError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for RecordHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Encode a record (header + payload).
pub fn record_to_bytes(record: &SubmissionRecord) -> Result<Vec<u8>, WorkloadError> {
    let payload = serde_json::to_vec(record)
        .map_err(|e| WorkloadError::SerializationError(e.to_string()))?;

    if payload.len() + HEADER_SIZE > MAX_RECORD_SIZE {
        return Err(WorkloadError::SerializationError(format!(
            "Record size {} bytes exceeds maximum allowed {} bytes",
            payload.len() + HEADER_SIZE,
            MAX_RECORD_SIZE
        )));
    }

    let mut result = Vec::with_capacity(HEADER_SIZE + payload.len());
    result.extend_from_slice(&RecordHeader::new().to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Decode a record, validating size and header before the payload.
pub fn record_from_bytes(bytes: &[u8]) -> Result<SubmissionRecord, WorkloadError> {
    if bytes.len() > MAX_RECORD_SIZE {
        return Err(WorkloadError::DeserializationError(format!(
            "Record size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_RECORD_SIZE
        )));
    }

    let header = RecordHeader::from_bytes(bytes)?;
    header.validate()?;

    serde_json::from_slice(&bytes[HEADER_SIZE..]).map_err(|e| {
        WorkloadError::DeserializationError(format!("Failed to decode record: {}", e))
    })
}

// =============================================================================
// TESTS
// =============================================================================
