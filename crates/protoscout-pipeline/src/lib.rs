//! Protoscout Discovery Pipeline
//!
//! Turns a list of configured networks into a per-chain tree of proto
//! snippets plus a manifest, via the reflection session boundary.
//!
//! # Architecture
//!
//! One pipeline per network, all pipelines running as independent tasks:
//!
//! 1. **Identity**: a chain id is resolved heuristically from the network's
//!    endpoints; it partitions the output tree so concurrent pipelines never
//!    share a path.
//! 2. **Failover**: every reflection operation runs through the
//!    [`failover::FailoverInvoker`] — bounded retries per endpoint, ordered
//!    fallback across endpoints.
//! 3. **Rendering**: service and message descriptors become deterministic
//!    text snippets, written incrementally as each service is processed.
//! 4. **Orchestration**: the [`orchestrator::Orchestrator`] joins all
//!    pipelines unconditionally and reports one result per network; a failed
//!    network never affects a sibling.

pub mod failover;
pub mod identity;
pub mod orchestrator;
pub mod pipeline;
pub mod render;

pub use failover::{FailoverConfig, FailoverInvoker};
pub use identity::{resolve_chain_identity, ChainIdentity};
pub use orchestrator::{Orchestrator, RunSummary};
pub use pipeline::{NetworkPipeline, PipelineConfig};
pub use render::MissingTypePolicy;
