//! Tonic-backed reflection session.
//!
//! Dials a fresh channel per session to keep attempts independent: a session
//! that failed mid-conversation leaves nothing behind for the next attempt to
//! trip over. Each operation is a single v1alpha `ServerReflectionRequest`
//! sent over a one-shot stream.

use async_trait::async_trait;
use tonic::transport::{Channel, ClientTlsConfig};
use tonic_reflection::pb::v1alpha::server_reflection_client::ServerReflectionClient;
use tonic_reflection::pb::v1alpha::server_reflection_request::MessageRequest;
use tonic_reflection::pb::v1alpha::server_reflection_response::MessageResponse;
use tonic_reflection::pb::v1alpha::ServerReflectionRequest;
use tracing::debug;

use protoscout_common::descriptor::DescriptorSet;
use protoscout_common::{ProtoscoutError, Result};

use crate::decode::decode_file_descriptors;
use crate::session::{ReflectionConnector, ReflectionSession};

/// Connects [`GrpcReflectionSession`]s. Endpoints on port 443 are dialed with
/// TLS over native roots; everything else is dialed in the clear.
#[derive(Debug, Clone, Default)]
pub struct GrpcReflectionConnector;

impl GrpcReflectionConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReflectionConnector for GrpcReflectionConnector {
    type Session = GrpcReflectionSession;

    async fn connect(&self, endpoint: &str) -> Result<Self::Session> {
        let tls = endpoint.ends_with(":443");
        let scheme = if tls { "https" } else { "http" };
        let uri = format!("{}://{}", scheme, endpoint);

        let mut channel = Channel::from_shared(uri)
            .map_err(|e| unavailable(endpoint, &format!("invalid endpoint: {}", e)))?;
        if tls {
            channel = channel
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| unavailable(endpoint, &format!("TLS setup failed: {}", e)))?;
        }
        let channel = channel
            .connect()
            .await
            .map_err(|e| unavailable(endpoint, &e.to_string()))?;

        debug!("Connected reflection session to {}", endpoint);

        Ok(GrpcReflectionSession {
            endpoint: endpoint.to_string(),
            client: ServerReflectionClient::new(channel),
        })
    }
}

/// One reflection conversation over one channel.
pub struct GrpcReflectionSession {
    endpoint: String,
    client: ServerReflectionClient<Channel>,
}

impl GrpcReflectionSession {
    /// Sends one request and reads exactly one reply from the stream.
    async fn round_trip(&mut self, message_request: MessageRequest) -> Result<MessageResponse> {
        let request = ServerReflectionRequest {
            host: String::new(),
            message_request: Some(message_request),
        };

        let mut inbound = self
            .client
            .server_reflection_info(tokio_stream::once(request))
            .await
            .map_err(|status| unavailable(&self.endpoint, status.message()))?
            .into_inner();

        let reply = inbound
            .message()
            .await
            .map_err(|status| unavailable(&self.endpoint, status.message()))?
            .ok_or_else(|| unavailable(&self.endpoint, "reflection stream closed without a reply"))?;

        match reply.message_response {
            Some(MessageResponse::ErrorResponse(error)) => Err(unavailable(
                &self.endpoint,
                &format!("reflection error {}: {}", error.error_code, error.error_message),
            )),
            Some(response) => Ok(response),
            None => Err(unavailable(&self.endpoint, "empty reflection reply")),
        }
    }
}

#[async_trait]
impl ReflectionSession for GrpcReflectionSession {
    async fn list_services(&mut self) -> Result<Vec<String>> {
        match self
            .round_trip(MessageRequest::ListServices(String::new()))
            .await?
        {
            MessageResponse::ListServicesResponse(response) => {
                Ok(response.service.into_iter().map(|s| s.name).collect())
            }
            _ => Err(unavailable(
                &self.endpoint,
                "unexpected reply to list_services",
            )),
        }
    }

    async fn file_containing_symbol(&mut self, symbol: &str) -> Result<DescriptorSet> {
        match self
            .round_trip(MessageRequest::FileContainingSymbol(symbol.to_string()))
            .await?
        {
            MessageResponse::FileDescriptorResponse(response) => {
                decode_file_descriptors(&self.endpoint, &response.file_descriptor_proto)
            }
            _ => Err(unavailable(
                &self.endpoint,
                "unexpected reply to file_containing_symbol",
            )),
        }
    }
}

fn unavailable(endpoint: &str, message: &str) -> ProtoscoutError {
    ProtoscoutError::EndpointUnavailable(format!("{}: {}", endpoint, message))
}
