//! Header-included HTTP response text.
//!
//! A transfer that keeps headers in its output may carry several response
//! segments (`100 Continue` before the final one). Only the last segment
//! belongs to the request outcome.

const SEGMENT_BREAK: &str = "\r\n\r\nHTTP/";
const HEAD_BODY_BREAK: &str = "\r\n\r\n";

/// Split raw response text into the last segment's header block and body.
///
/// A segment without a blank line is treated as all headers.
pub fn split_last_segment(raw: &str) -> (&str, &str) {
    let segment = match raw.rfind(SEGMENT_BREAK) {
        // Keep the "HTTP/" prefix of the last status line.
        Some(pos) => &raw[pos + HEAD_BODY_BREAK.len()..],
        None => raw,
    };

    match segment.split_once(HEAD_BODY_BREAK) {
        Some((head, body)) => (head, body),
        None => (segment, ""),
    }
}

/// Find a header value in a header block. The status line is skipped and
/// names compare case-insensitively.
pub fn header_value<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.split("\r\n")
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_segment() {
        let raw = "HTTP/2 200\r\napns-id: abc\r\n\r\n";
        let (head, body) = split_last_segment(raw);
        assert_eq!(head, "HTTP/2 200\r\napns-id: abc");
        assert_eq!(body, "");
    }

    #[test]
    fn test_interim_segment_is_skipped() {
        let raw = "HTTP/1.1 100 Continue\r\n\r\nHTTP/2 400\r\napns-id: xyz\r\n\r\n{\"reason\":\"BadDeviceToken\"}";
        let (head, body) = split_last_segment(raw);
        assert!(head.starts_with("HTTP/2 400"));
        assert_eq!(header_value(head, "apns-id"), Some("xyz"));
        assert_eq!(body, "{\"reason\":\"BadDeviceToken\"}");
    }

    #[test]
    fn test_body_may_contain_blank_lines() {
        let raw = "HTTP/2 500\r\n\r\nline one\r\n\r\nline two";
        let (_, body) = split_last_segment(raw);
        assert_eq!(body, "line one\r\n\r\nline two");
    }

    #[test]
    fn test_header_lookup() {
        let head = "HTTP/2 200\r\nContent-Length: 0\r\nAPNS-ID: 1234\r\nmalformed";
        assert_eq!(header_value(head, "apns-id"), Some("1234"));
        assert_eq!(header_value(head, "content-length"), Some("0"));
        assert_eq!(header_value(head, "missing"), None);
    }

    #[test]
    fn test_status_line_is_not_a_header() {
        let head = "apns-id: not-a-header-line";
        assert_eq!(header_value(head, "apns-id"), None);
    }

    #[test]
    fn test_head_without_body() {
        let (head, body) = split_last_segment("HTTP/2 204\r\napns-id: q");
        assert_eq!(head, "HTTP/2 204\r\napns-id: q");
        assert_eq!(body, "");
    }
}
