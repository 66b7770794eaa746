//! Delivery outcome of a single notification.

use serde::Deserialize;
use std::fmt;

use crate::http;
use crate::{ApnsError, Result};

/// Gateway result codes.
///
/// The HTTP/2 gateway answers with status codes; the binary protocol used
/// single-byte error numbers, some of which have no HTTP counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ResultCode {
    /// Success.
    Ok = 200,
    /// Bad request; the body holds the reason.
    BadRequest = 400,
    /// Certificate or provider token problem.
    BadAuth = 403,
    /// Invalid `:path` value.
    InvalidPath = 404,
    /// Invalid `:method` value; only POST is supported.
    InvalidMethod = 405,
    /// The device token is no longer active for the topic.
    InvalidToken = 410,
    /// Payload too large.
    InvalidPayloadSize = 413,
    /// Too many requests for the same device token.
    TooManyRequests = 429,
    /// Internal server error.
    InternalServerError = 500,
    /// Server shutting down or unavailable.
    ServerUnavailable = 503,
    /// Legacy: missing device token.
    MissingToken = 2,
    /// Legacy: missing topic.
    MissingTopic = 3,
    /// Legacy: missing payload.
    MissingPayload = 4,
    /// Legacy: invalid token size.
    InvalidTokenSize = 5,
    /// Legacy: invalid topic size.
    InvalidTopicSize = 6,
    /// Legacy: unknown error.
    UnknownError = 255,
}

impl ResultCode {
    const ALL: [ResultCode; 16] = [
        Self::Ok,
        Self::BadRequest,
        Self::BadAuth,
        Self::InvalidPath,
        Self::InvalidMethod,
        Self::InvalidToken,
        Self::InvalidPayloadSize,
        Self::TooManyRequests,
        Self::InternalServerError,
        Self::ServerUnavailable,
        Self::MissingToken,
        Self::MissingTopic,
        Self::MissingPayload,
        Self::InvalidTokenSize,
        Self::InvalidTopicSize,
        Self::UnknownError,
    ];

    /// Numeric value.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Look up a numeric code.
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Translate a binary-protocol error number.
    ///
    /// Numbers with an HTTP equivalent map onto it; numbers that are
    /// themselves known codes are kept.
    pub fn from_legacy(errno: u8) -> Option<Self> {
        match errno {
            0 => Some(Self::Ok),
            1 => Some(Self::InternalServerError),
            7 => Some(Self::InvalidPayloadSize),
            8 => Some(Self::InvalidToken),
            10 => Some(Self::ServerUnavailable),
            n => Self::from_code(n.into()),
        }
    }

    /// Human readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::BadRequest => "Bad request",
            Self::BadAuth => "There was an error with the certificate or with the provider authentication token",
            Self::InvalidPath => "The request contained an invalid :path value",
            Self::InvalidMethod => "The request used an invalid :method value",
            Self::InvalidToken => "The device token is no longer active for the topic",
            Self::InvalidPayloadSize => "The notification payload was too large",
            Self::TooManyRequests => "The server received too many requests for the same device token",
            Self::InternalServerError => "Internal server error",
            Self::ServerUnavailable => "The server is shutting down and unavailable",
            Self::MissingToken => "Missing device token",
            Self::MissingTopic => "Missing topic",
            Self::MissingPayload => "Missing payload",
            Self::InvalidTokenSize => "Invalid token size",
            Self::InvalidTopicSize => "Invalid topic size",
            Self::UnknownError => "Unknown error",
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.description())
    }
}

/// JSON error body returned with non-success statuses.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    /// Error reason, e.g. `BadDeviceToken`.
    pub reason: String,
    /// Milliseconds since the epoch at which the token became invalid (410 only).
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Outcome of one notification request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResponse {
    id: Option<String>,
    code: u16,
    body: Option<String>,
}

impl DeliveryResponse {
    /// Build a response from its parts.
    pub fn new(id: Option<String>, code: u16, body: Option<String>) -> Self {
        Self { id, code, body }
    }

    /// Parse header-included response text for a request that ended with `status`.
    ///
    /// The `apns-id` header of the last response segment becomes the
    /// identifier; an empty body is reported as absent.
    pub fn from_http(status: u16, raw: &str) -> Self {
        let (head, body) = http::split_last_segment(raw);
        let id = http::header_value(head, "apns-id").map(str::to_string);
        let body = (!body.is_empty()).then(|| body.to_string());
        Self::new(id, status, body)
    }

    /// Parse a binary-protocol error response.
    ///
    /// Empty input means success. Otherwise the record is a 1-byte command,
    /// a 1-byte error number and a 4-byte big-endian identifier.
    pub fn from_legacy(raw: &[u8]) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::new(None, ResultCode::Ok.code(), None));
        }

        let [_command, errno, a, b, c, d, ..] = *raw else {
            return Err(ApnsError::invalid(format!(
                "Error response must be 6 bytes, got {}",
                raw.len()
            )));
        };

        let code = ResultCode::from_legacy(errno)
            .map(ResultCode::code)
            .unwrap_or(u16::from(errno));
        let id = u32::from_be_bytes([a, b, c, d]);

        Ok(Self::new(Some(id.to_string()), check_code(code)?, None))
    }

    /// Correlation identifier.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Numeric result code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Result code, when it is one of the known values.
    pub fn result_code(&self) -> Option<ResultCode> {
        ResultCode::from_code(self.code)
    }

    /// Raw JSON error body.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Decode the JSON error body.
    pub fn error_body(&self) -> Option<ErrorBody> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_str(b).ok())
    }

    /// Error reason from the JSON body.
    pub fn error_reason(&self) -> Option<String> {
        self.error_body().map(|b| b.reason)
    }

    /// Check if the notification was accepted.
    pub fn is_success(&self) -> bool {
        self.code == ResultCode::Ok.code()
    }

    /// Check if the device token should be discarded.
    pub fn should_remove_device(&self) -> bool {
        self.code == ResultCode::InvalidToken.code()
    }
}

fn check_code(code: u16) -> Result<u16> {
    if !(200..=503).contains(&code) {
        return Err(ApnsError::invalid(format!(
            "Code must be between 200 and 503, got {code}"
        )));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_legacy_response_is_success() {
        let response = DeliveryResponse::from_legacy(&[]).unwrap();
        assert_eq!(response.code(), 200);
        assert_eq!(response.id(), None);
        assert_eq!(response.body(), None);
        assert!(response.is_success());
    }

    #[test]
    fn test_legacy_invalid_token() {
        let response = DeliveryResponse::from_legacy(&[8, 8, 0, 0, 0, 1]).unwrap();
        assert_eq!(response.id(), Some("1"));
        assert_eq!(response.code(), 410);
        assert_eq!(response.result_code(), Some(ResultCode::InvalidToken));
        assert!(response.should_remove_device());
    }

    #[test]
    fn test_legacy_identifier_is_big_endian() {
        let response = DeliveryResponse::from_legacy(&[8, 10, 0x01, 0x02, 0x03, 0x04]).unwrap();
        assert_eq!(response.id(), Some("16909060"));
        assert_eq!(response.result_code(), Some(ResultCode::ServerUnavailable));
    }

    #[test]
    fn test_legacy_out_of_range_code() {
        for errno in [2, 3, 9, 128] {
            let err = DeliveryResponse::from_legacy(&[8, errno, 0, 0, 0, 1]).unwrap_err();
            assert!(err.is_invalid_argument(), "errno {errno}");
        }
    }

    #[test]
    fn test_legacy_unknown_error_is_kept() {
        let response = DeliveryResponse::from_legacy(&[8, 255, 0, 0, 0, 7]).unwrap();
        assert_eq!(response.result_code(), Some(ResultCode::UnknownError));
        assert_eq!(response.id(), Some("7"));
    }

    #[test]
    fn test_legacy_truncated_record() {
        let err = DeliveryResponse::from_legacy(&[8, 8, 0]).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_http_success() {
        let raw = "HTTP/2 200\r\napns-id: eabeae54-14a8-11e5-b60b-1697f925ec7b\r\n\r\n";
        let response = DeliveryResponse::from_http(200, raw);
        assert!(response.is_success());
        assert_eq!(response.id(), Some("eabeae54-14a8-11e5-b60b-1697f925ec7b"));
        assert_eq!(response.body(), None);
        assert_eq!(response.error_body(), None);
    }

    #[test]
    fn test_http_error_body() {
        let raw = "HTTP/2 410\r\napns-id: 42\r\n\r\n{\"reason\":\"Unregistered\",\"timestamp\":1700000000000}";
        let response = DeliveryResponse::from_http(410, raw);
        assert_eq!(response.code(), 410);
        assert_eq!(response.id(), Some("42"));
        assert_eq!(response.error_reason().as_deref(), Some("Unregistered"));
        assert_eq!(
            response.error_body().and_then(|b| b.timestamp),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_http_without_id_header() {
        let response = DeliveryResponse::from_http(500, "HTTP/2 500\r\n\r\n");
        assert_eq!(response.id(), None);
        assert_eq!(response.result_code(), Some(ResultCode::InternalServerError));
    }

    #[test]
    fn test_result_code_lookup() {
        assert_eq!(ResultCode::from_code(429), Some(ResultCode::TooManyRequests));
        assert_eq!(ResultCode::from_code(2), Some(ResultCode::MissingToken));
        assert_eq!(ResultCode::from_code(401), None);
        assert_eq!(ResultCode::from_legacy(0), Some(ResultCode::Ok));
        assert_eq!(ResultCode::from_legacy(255), Some(ResultCode::UnknownError));
        assert_eq!(ResultCode::from_legacy(9), None);
        assert_eq!(ResultCode::BadAuth.code(), 403);
        assert!(ResultCode::InvalidToken.to_string().starts_with("410"));
    }
}
