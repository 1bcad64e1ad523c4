//! Reflection Session Boundary
//!
//! The discovery pipeline consumes server reflection through exactly two
//! operations: listing the service names a server exposes, and fetching the
//! file descriptors containing a named symbol. This crate defines that
//! contract as a pair of injectable traits and provides the production
//! implementation on top of tonic and the v1alpha reflection protocol.
//!
//! Sessions are cheap and single-use: the pipeline creates a fresh session
//! for every endpoint attempt and discards it afterwards, whether the attempt
//! succeeded or failed. Every transport-level failure is collapsed into
//! [`protoscout_common::ProtoscoutError::EndpointUnavailable`]; callers see a
//! displayable message and nothing else.

pub mod decode;
pub mod grpc;
pub mod session;

pub use grpc::{GrpcReflectionConnector, GrpcReflectionSession};
pub use session::{ReflectionConnector, ReflectionSession};
