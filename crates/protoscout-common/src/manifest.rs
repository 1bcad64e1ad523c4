// Copyright 2026 Protoscout Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EndpointAddress;

/// One generated service as recorded in a network's manifest.
///
/// `methods` always equals the method count of the rendered service
/// descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ManifestEntry {
    pub service: String,
    pub path: String,
    pub methods: usize,
}

/// Per-network manifest, written as `manifest.json` next to the generated
/// snippets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkManifest {
    pub chain_id: String,
    pub network_name: String,
    /// Endpoint the service listing was fetched from.
    pub endpoint: EndpointAddress,
    pub generated_at: DateTime<Utc>,
    pub services: Vec<ManifestEntry>,
}

impl NetworkManifest {
    pub fn new(
        chain_id: impl Into<String>,
        network_name: impl Into<String>,
        endpoint: impl Into<EndpointAddress>,
    ) -> Self {
        Self {
            chain_id: chain_id.into(),
            network_name: network_name.into(),
            endpoint: endpoint.into(),
            generated_at: Utc::now(),
            services: Vec::new(),
        }
    }
}

/// Terminal status of one network's pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Success,
    Failed,
}

/// Settled outcome of one network's pipeline. Created once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkResult {
    pub network: String,
    pub chain_id: Option<String>,
    pub status: NetworkStatus,
    pub service_count: usize,
    pub output_dir: Option<PathBuf>,
    pub error: Option<String>,
}

impl NetworkResult {
    pub fn success(
        network: impl Into<String>,
        chain_id: impl Into<String>,
        service_count: usize,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            network: network.into(),
            chain_id: Some(chain_id.into()),
            status: NetworkStatus::Success,
            service_count,
            output_dir: Some(output_dir),
            error: None,
        }
    }

    pub fn failed(
        network: impl Into<String>,
        chain_id: Option<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            network: network.into(),
            chain_id,
            status: NetworkStatus::Failed,
            service_count: 0,
            output_dir: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == NetworkStatus::Success
    }
}

impl fmt::Display for NetworkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chain_id = self.chain_id.as_deref().unwrap_or("-");
        match self.status {
            NetworkStatus::Success => write!(
                f,
                "{}: chain_id={} status=success services={}",
                self.network, chain_id, self.service_count
            ),
            NetworkStatus::Failed => write!(
                f,
                "{}: chain_id={} status=failed error={}",
                self.network,
                chain_id,
                self.error.as_deref().unwrap_or("unknown")
            ),
        }
    }
}
