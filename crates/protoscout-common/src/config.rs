//! Network configuration resolver.
//!
//! Networks are configured through the process environment and resolved once
//! at startup into an ordered list of [`NetworkSpec`]. Two shapes are
//! supported:
//!
//! - `PROTOSCOUT_ENDPOINTS=<ep>,<ep>,...` — legacy single-network form,
//!   mapped to a network literally named `"default"`.
//! - `PROTOSCOUT_NETWORK_<NAME>=<ep>,<ep>,...` — one named network per key;
//!   the name is the key with the prefix stripped, lowercased.
//!
//! Keyed entries win when both shapes are present. An explicit override
//! endpoint (the CLI's positional argument) short-circuits both and yields a
//! single `"default"` network with that one endpoint.

use std::collections::BTreeMap;

use crate::error::{ProtoscoutError, Result};

/// Opaque `host:port` address. List order encodes failover priority.
pub type EndpointAddress = String;

/// Legacy single-network endpoint list.
pub const ENV_ENDPOINTS: &str = "PROTOSCOUT_ENDPOINTS";

/// Prefix for keyed per-network endpoint lists.
pub const ENV_NETWORK_PREFIX: &str = "PROTOSCOUT_NETWORK_";

/// One logical network: a name plus its ordered endpoint list.
///
/// Immutable once constructed; the endpoint list is non-empty for every spec
/// the resolver returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkSpec {
    pub name: String,
    pub endpoints: Vec<EndpointAddress>,
}

impl NetworkSpec {
    pub fn new(name: impl Into<String>, endpoints: Vec<EndpointAddress>) -> Self {
        Self {
            name: name.into(),
            endpoints,
        }
    }
}

/// Resolves the configured networks from an iterator of key/value pairs.
///
/// Entries whose endpoint list parses empty are dropped. Networks are
/// returned sorted by name so a run is deterministic regardless of
/// environment iteration order.
///
/// # Errors
///
/// Returns [`ProtoscoutError::Configuration`] when zero networks resolve.
pub fn resolve_networks<I>(vars: I, override_endpoint: Option<&str>) -> Result<Vec<NetworkSpec>>
where
    I: IntoIterator<Item = (String, String)>,
{
    if let Some(endpoint) = override_endpoint {
        let endpoint = endpoint.trim();
        if endpoint.is_empty() {
            return Err(ProtoscoutError::Configuration(
                "override endpoint is empty".to_string(),
            ));
        }
        return Ok(vec![NetworkSpec::new("default", vec![endpoint.to_string()])]);
    }

    let mut keyed: BTreeMap<String, Vec<EndpointAddress>> = BTreeMap::new();
    let mut legacy: Option<Vec<EndpointAddress>> = None;

    for (key, value) in vars {
        if key == ENV_ENDPOINTS {
            legacy = Some(split_endpoints(&value));
        } else if let Some(name) = key.strip_prefix(ENV_NETWORK_PREFIX) {
            let endpoints = split_endpoints(&value);
            if !name.is_empty() && !endpoints.is_empty() {
                keyed.insert(name.to_ascii_lowercase(), endpoints);
            }
        }
    }

    let networks: Vec<NetworkSpec> = if !keyed.is_empty() {
        keyed
            .into_iter()
            .map(|(name, endpoints)| NetworkSpec::new(name, endpoints))
            .collect()
    } else {
        legacy
            .filter(|endpoints| !endpoints.is_empty())
            .map(|endpoints| vec![NetworkSpec::new("default", endpoints)])
            .unwrap_or_default()
    };

    if networks.is_empty() {
        return Err(ProtoscoutError::Configuration(format!(
            "no networks configured; set {} or {}<NAME>",
            ENV_ENDPOINTS, ENV_NETWORK_PREFIX
        )));
    }

    Ok(networks)
}

/// Resolves networks from the live process environment.
pub fn networks_from_env(override_endpoint: Option<&str>) -> Result<Vec<NetworkSpec>> {
    resolve_networks(std::env::vars(), override_endpoint)
}

fn split_endpoints(value: &str) -> Vec<EndpointAddress> {
    value
        .split(',')
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_string)
        .collect()
}
