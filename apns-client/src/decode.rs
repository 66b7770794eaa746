//! Single entry point for decoding gateway responses.
//!
//! The caller states which format it is holding; nothing is sniffed from
//! the bytes themselves.

use crate::{ApnsError, DeliveryResponse, FeedbackRecord, Result};

/// Format of a raw gateway response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// Header-included HTTP response text that ended with `status`.
    Http {
        /// Final HTTP status.
        status: u16,
    },
    /// Binary-protocol error record.
    Legacy,
    /// Stream of binary feedback records.
    Feedback,
}

/// A decoded gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Outcome of one notification.
    Delivery(DeliveryResponse),
    /// Feedback records.
    Feedback(Vec<FeedbackRecord>),
}

impl Response {
    /// The delivery outcome, if this is one.
    pub fn into_delivery(self) -> Option<DeliveryResponse> {
        match self {
            Self::Delivery(d) => Some(d),
            Self::Feedback(_) => None,
        }
    }

    /// The feedback records, if this is a feedback response.
    pub fn into_feedback(self) -> Option<Vec<FeedbackRecord>> {
        match self {
            Self::Feedback(f) => Some(f),
            Self::Delivery(_) => None,
        }
    }
}

/// Decode `raw` as `kind`.
pub fn decode(kind: ResponseKind, raw: &[u8]) -> Result<Response> {
    match kind {
        ResponseKind::Http { status } => {
            let text = std::str::from_utf8(raw)
                .map_err(|e| ApnsError::invalid(format!("Response is not valid UTF-8: {e}")))?;
            Ok(Response::Delivery(DeliveryResponse::from_http(status, text)))
        }
        ResponseKind::Legacy => DeliveryResponse::from_legacy(raw).map(Response::Delivery),
        ResponseKind::Feedback => FeedbackRecord::parse_all(raw).map(Response::Feedback),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_http() {
        let raw = b"HTTP/2 200\r\napns-id: 7\r\n\r\n";
        let delivery = decode(ResponseKind::Http { status: 200 }, raw)
            .unwrap()
            .into_delivery()
            .unwrap();
        assert_eq!(delivery.id(), Some("7"));
        assert!(delivery.is_success());
    }

    #[test]
    fn test_same_bytes_different_kinds() {
        let raw = [8, 8, 0, 0, 0, 0];
        let legacy = decode(ResponseKind::Legacy, &raw).unwrap();
        assert_eq!(
            legacy,
            Response::Delivery(DeliveryResponse::new(Some("0".into()), 410, None))
        );

        let feedback = decode(ResponseKind::Feedback, &raw).unwrap();
        assert_eq!(
            feedback.into_feedback().unwrap(),
            vec![FeedbackRecord::new("", 0x0808_0000)]
        );
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode(ResponseKind::Http { status: 200 }, &[0xff, 0xfe]).is_err());
        assert!(decode(ResponseKind::Legacy, &[1]).is_err());
        assert!(decode(ResponseKind::Feedback, &[1, 2]).is_err());
    }
}
