//! Heuristic chain identity resolution.
//!
//! The chain id is a best-effort label, not a verified property. It names the
//! per-network output directory, so it must always resolve to something
//! filesystem-safe; the layered fallbacks below guarantee that for any
//! non-empty endpoint list.

use protoscout_common::EndpointAddress;

/// Known host substrings mapped to chain ids, checked in order; first match
/// wins.
const CHAIN_HINTS: &[(&str, &str)] = &[
    ("cosmoshub", "cosmoshub-4"),
    ("osmosis", "osmosis-1"),
    ("neutron", "neutron-1"),
    ("juno", "juno-1"),
    ("akash", "akashnet-2"),
];

/// A resolved chain id plus the endpoint it was derived from. That endpoint
/// becomes the first entry the failover invoker tries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIdentity {
    pub chain_id: String,
    pub endpoint: EndpointAddress,
}

/// Tries each endpoint in order until one yields an identity. Only an empty
/// endpoint list resolves to `None`.
pub fn resolve_chain_identity(endpoints: &[EndpointAddress]) -> Option<ChainIdentity> {
    // identity_for_endpoint is total, so the first endpoint always resolves.
    endpoints.first().map(|endpoint| ChainIdentity {
        chain_id: identity_for_endpoint(endpoint),
        endpoint: endpoint.clone(),
    })
}

fn identity_for_endpoint(endpoint: &str) -> String {
    let host = endpoint.split(':').next().unwrap_or("");

    for (needle, chain_id) in CHAIN_HINTS {
        if host.contains(needle) {
            return (*chain_id).to_string();
        }
    }

    match sanitized_host(host) {
        Some(chain_id) => chain_id,
        // No host portion to work with; flatten the raw endpoint instead.
        None => endpoint.replace([':', '.'], "_"),
    }
}

fn sanitized_host(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    Some(
        host.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '-' })
            .collect(),
    )
}
