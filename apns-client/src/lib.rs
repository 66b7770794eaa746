//! # APNs Client
//!
//! Certificate-authenticated client for the Apple Push Notification service.
//!
//! ## Features
//!
//! - **Message model**: validated alert and delivery fields, encoded into the
//!   gateway's JSON payload
//! - **HTTP/2 transport**: one persistent session per client, one request at a time
//! - **Response decoding**: HTTP delivery outcomes plus the legacy binary
//!   error and feedback records
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apns_client::{ApnsClient, Environment, Message, ResultCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ApnsClient::new();
//!     client.open(Environment::Sandbox, "certificate.pem", None)?;
//!
//!     let mut message = Message::new();
//!     message
//!         .set_bundle_id("com.example.app")?
//!         .set_token("a65222627d25e8afe14a6f03f673f6594b36f69db736bc9768c30498edbda1f4")?
//!         .set_sound(Some("default"))?
//!         .set_alert(Some("Hello!"));
//!
//!     let response = client.send(&message).await?;
//!     if response.result_code() == Some(ResultCode::InvalidToken) {
//!         // forget the device
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding legacy records
//!
//! ```rust
//! use apns_client::{decode, Response, ResponseKind};
//!
//! let raw = [0x00, 0x00, 0x00, 0x0A, 0x00, 0x04, 0xab, 0xcd, 0x12, 0x34];
//! let Response::Feedback(records) = decode(ResponseKind::Feedback, &raw).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(records[0].token(), "abcd1234");
//! assert_eq!(records[0].time(), 10);
//! ```

mod alert;
mod client;
mod config;
mod decode;
mod error;
mod feedback;
mod message;
mod payload;
mod response;

pub mod http;
pub mod transport;

pub use alert::Alert;
pub use client::ApnsClient;
pub use config::{ClientConfig, ClientConfigBuilder, Environment};
pub use decode::{decode, Response, ResponseKind};
pub use error::{ApnsError, ErrorKind, Result};
pub use feedback::FeedbackRecord;
pub use message::{is_valid_token, IntoExpiration, Message, TOKEN_LENGTH};
pub use payload::APS_KEY;
pub use response::{DeliveryResponse, ErrorBody, ResultCode};

/// Prelude for common imports.
///
/// ```
/// use apns_client::prelude::*;
/// ```
pub mod prelude {
    pub use crate::alert::Alert;
    pub use crate::client::ApnsClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::error::{ApnsError, Result};
    pub use crate::message::Message;
    pub use crate::response::{DeliveryResponse, ResultCode};
}
