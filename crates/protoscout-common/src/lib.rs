//! Protoscout Common Types
//!
//! Shared types for the Protoscout discovery pipeline:
//!
//! - **Error type**: [`ProtoscoutError`] and the crate-wide [`Result`] alias
//! - **Configuration**: [`config::NetworkSpec`] and the environment-shaped
//!   network resolver
//! - **Descriptor model**: the value types the reflection collaborator must
//!   produce ([`descriptor::ServiceDescriptor`] and friends)
//! - **Manifest**: per-network output manifest and run result types
//!
//! Every other crate in the workspace depends on this one; it depends on
//! nothing but serde, chrono and thiserror.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod manifest;

pub use config::{EndpointAddress, NetworkSpec};
pub use error::{ProtoscoutError, Result};
