//! Legacy feedback records.

use chrono::{DateTime, Utc};

use crate::{ApnsError, Result};

const HEADER_LEN: usize = 6;

/// A device token reported as no longer valid, with the time it was reported.
///
/// Wire layout, network byte order:
/// `u32 timestamp | u16 token length | token bytes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    token: String,
    time: i64,
}

impl FeedbackRecord {
    /// Build a record from its parts.
    pub fn new(token: impl Into<String>, time: i64) -> Self {
        Self {
            token: token.into(),
            time,
        }
    }

    /// Parse one record. Bytes past the token are ignored.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Self::parse_prefix(raw).map(|(record, _)| record)
    }

    /// Parse a stream of concatenated records.
    pub fn parse_all(raw: &[u8]) -> Result<Vec<Self>> {
        let mut records = Vec::new();
        let mut rest = raw;
        while !rest.is_empty() {
            let (record, used) = Self::parse_prefix(rest)?;
            records.push(record);
            rest = &rest[used..];
        }
        Ok(records)
    }

    fn parse_prefix(raw: &[u8]) -> Result<(Self, usize)> {
        let [t0, t1, t2, t3, l0, l1, ..] = *raw else {
            return Err(ApnsError::invalid(format!(
                "Feedback record must be at least {HEADER_LEN} bytes, got {}",
                raw.len()
            )));
        };

        let time = u32::from_be_bytes([t0, t1, t2, t3]);
        let length = usize::from(u16::from_be_bytes([l0, l1]));
        let end = HEADER_LEN + length;

        let token = raw.get(HEADER_LEN..end).ok_or_else(|| {
            ApnsError::invalid(format!(
                "Feedback token is truncated: expected {length} bytes, got {}",
                raw.len() - HEADER_LEN
            ))
        })?;

        Ok((Self::new(hex::encode(token), time.into()), end))
    }

    /// Hex-encoded device token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Unix seconds at which the token was reported.
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Report time as a UTC instant.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let raw = [0x00, 0x00, 0x00, 0x0A, 0x00, 0x04, 0xab, 0xcd, 0x12, 0x34];
        let record = FeedbackRecord::parse(&raw).unwrap();
        assert_eq!(record.token(), "abcd1234");
        assert_eq!(record.time(), 10);
        assert_eq!(
            record.timestamp().map(|t| t.timestamp()),
            Some(10)
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let raw = [0, 0, 0, 1, 0, 2, 0xff, 0x01, 0x99, 0x98];
        let record = FeedbackRecord::parse(&raw).unwrap();
        assert_eq!(record, FeedbackRecord::new("ff01", 1));
    }

    #[test]
    fn test_full_size_token() {
        let mut raw = vec![0x65, 0x5c, 0x2b, 0x00, 0x00, 0x20];
        raw.extend(std::iter::repeat(0xa6).take(32));
        let record = FeedbackRecord::parse(&raw).unwrap();
        assert_eq!(record.token().len(), 64);
        assert_eq!(record.time(), 0x655c_2b00);
    }

    #[test]
    fn test_parse_all() {
        let raw = [
            0, 0, 0, 5, 0, 1, 0x0f, //
            0, 0, 0, 6, 0, 2, 0xde, 0xad,
        ];
        let records = FeedbackRecord::parse_all(&raw).unwrap();
        assert_eq!(
            records,
            vec![FeedbackRecord::new("0f", 5), FeedbackRecord::new("dead", 6)]
        );
        assert!(FeedbackRecord::parse_all(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_short_header_rejected() {
        let err = FeedbackRecord::parse(&[0, 0, 0, 1, 0]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_truncated_token_rejected() {
        let err = FeedbackRecord::parse(&[0, 0, 0, 1, 0, 4, 0xab]).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(err.to_string().contains("truncated"));
    }
}
