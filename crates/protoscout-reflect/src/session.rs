use async_trait::async_trait;

use protoscout_common::descriptor::DescriptorSet;
use protoscout_common::Result;

/// A reflection conversation bound to exactly one endpoint.
///
/// Stateless beyond its connection; never reused across endpoints or
/// attempts.
#[async_trait]
pub trait ReflectionSession: Send {
    /// Fully-qualified names of every service the server exposes. One call
    /// per attempt; the sequence is finite.
    async fn list_services(&mut self) -> Result<Vec<String>>;

    /// File descriptors containing the given fully-qualified symbol, with
    /// services and messages resolvable by name.
    async fn file_containing_symbol(&mut self, symbol: &str) -> Result<DescriptorSet>;
}

/// Factory for per-endpoint sessions. The pipeline is generic over this
/// trait, so tests substitute a scripted double.
#[async_trait]
pub trait ReflectionConnector: Send + Sync {
    type Session: ReflectionSession;

    async fn connect(&self, endpoint: &str) -> Result<Self::Session>;
}
