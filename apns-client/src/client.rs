//! APNs client: one certificate-authenticated session, one request at a time.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::transport::{Connect, Credentials, GatewayRequest, HttpConnector, Transport};
use crate::{ApnsError, ClientConfig, DeliveryResponse, Environment, Message, Result};

struct Session {
    environment: Environment,
    transport: Box<dyn Transport>,
}

/// Client for the notification gateway.
///
/// The session is opened with [`open`](Self::open) and released by
/// [`close`](Self::close) or when the client is dropped. [`send`](Self::send)
/// borrows the client mutably, so a session never has two requests in flight;
/// open a second client for parallel delivery.
pub struct ApnsClient {
    config: ClientConfig,
    connector: Arc<dyn Connect>,
    session: Option<Session>,
}

impl ApnsClient {
    /// Create a closed client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a closed client.
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_connector(config, HttpConnector)
    }

    /// Create a closed client that opens sessions through `connector`.
    pub fn with_connector(config: ClientConfig, connector: impl Connect + 'static) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
            session: None,
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Environment of the open session.
    pub fn environment(&self) -> Option<Environment> {
        self.session.as_ref().map(|s| s.environment)
    }

    /// Check if a session is open.
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session.
    ///
    /// `environment` accepts an [`Environment`] or anything convertible into
    /// one (`0`/`1`, `"sandbox"`/`"production"`).
    pub fn open<E>(
        &mut self,
        environment: E,
        certificate: impl AsRef<Path>,
        passphrase: Option<&str>,
    ) -> Result<&mut Self>
    where
        E: TryInto<Environment>,
        E::Error: Into<ApnsError>,
    {
        if self.session.is_some() {
            return Err(ApnsError::AlreadyOpen);
        }

        let environment = environment.try_into().map_err(Into::into)?;

        let certificate = certificate.as_ref();
        if !certificate.exists() {
            return Err(ApnsError::invalid(format!(
                "Certificate must be a valid path to a APNS certificate: {}",
                certificate.display()
            )));
        }

        let credentials = Credentials {
            certificate: certificate.to_path_buf(),
            passphrase: passphrase.map(str::to_string),
        };
        let transport = self.connector.connect(&credentials, &self.config)?;

        info!(
            environment = %environment,
            certificate = %certificate.display(),
            "APNS session opened"
        );

        self.session = Some(Session {
            environment,
            transport,
        });
        Ok(self)
    }

    /// Close the session. Closing a closed client does nothing.
    pub fn close(&mut self) -> &mut Self {
        if let Some(session) = self.session.take() {
            debug!(environment = %session.environment, "APNS session closed");
        }
        self
    }

    /// Send one notification and report the gateway's answer.
    pub async fn send(&mut self, message: &Message) -> Result<DeliveryResponse> {
        let session = self.session.as_ref().ok_or(ApnsError::NotOpen)?;
        let request = build_request(&self.config, session.environment, message)?;
        let token = message.token().unwrap_or_default();

        debug!(token = %token, topic = ?message.bundle_id(), "Sending APNS notification");

        let exchange = session.transport.execute(request);
        let raw = match tokio::time::timeout(self.config.timeout, exchange).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                warn!(token = %token, error = %e, "APNS request failed");
                return Err(e);
            }
            Err(_) => {
                warn!(token = %token, timeout = ?self.config.timeout, "APNS request timed out");
                return Err(ApnsError::Timeout(self.config.timeout));
            }
        };

        let response = DeliveryResponse::from_http(raw.status, &raw.text);
        debug!(
            status = response.code(),
            apns_id = ?response.id(),
            "APNS response received"
        );
        Ok(response)
    }
}

impl Default for ApnsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ApnsClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn build_request(
    config: &ClientConfig,
    environment: Environment,
    message: &Message,
) -> Result<GatewayRequest> {
    let token = message
        .token()
        .ok_or_else(|| ApnsError::invalid("Message has no device token"))?;
    let topic = message
        .bundle_id()
        .ok_or_else(|| ApnsError::invalid("Message has no app bundle id"))?;

    let mut url = Url::parse(environment.base_url())
        .map_err(|e| ApnsError::invalid(format!("Invalid gateway URL: {e}")))?;
    url.set_port(Some(config.port))
        .map_err(|_| ApnsError::invalid("Gateway URL cannot carry a port"))?;
    url.set_path(&format!("/3/device/{token}"));

    let mut headers = vec![
        ("apns-topic".to_string(), topic.to_string()),
        ("user-agent".to_string(), config.user_agent.clone()),
    ];
    if let Some(id) = message.id().and_then(|id| Uuid::parse_str(id).ok()) {
        headers.push(("apns-id".to_string(), id.hyphenated().to_string()));
    }
    if let Some(expire) = message.expire() {
        headers.push(("apns-expiration".to_string(), expire.to_string()));
    }

    Ok(GatewayRequest {
        url,
        headers,
        body: message.payload_json()?,
    })
}
