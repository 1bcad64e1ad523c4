//! Per-network discovery pipeline.
//!
//! Strictly sequential within one network: resolve identity, list services,
//! then fetch + render + write each service before moving to the next, and
//! finally write the manifest. Files land incrementally, so an interrupted
//! run leaves a partially populated but internally consistent tree; nothing
//! is rolled back on failure.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use protoscout_common::descriptor::REFLECTION_SERVICE_PREFIX;
use protoscout_common::manifest::{ManifestEntry, NetworkManifest, NetworkResult};
use protoscout_common::{EndpointAddress, NetworkSpec, ProtoscoutError, Result};
use protoscout_reflect::{ReflectionConnector, ReflectionSession};

use crate::failover::{FailoverConfig, FailoverInvoker};
use crate::identity::{resolve_chain_identity, ChainIdentity};
use crate::render::{render_messages, render_service, MissingTypePolicy};

/// Knobs shared by every pipeline of a run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root of the generated tree; each pipeline writes only below
    /// `<out_dir>/<chain_id>`.
    pub out_dir: PathBuf,
    pub failover: FailoverConfig,
    pub missing_types: MissingTypePolicy,
}

impl PipelineConfig {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            failover: FailoverConfig::default(),
            missing_types: MissingTypePolicy::default(),
        }
    }
}

/// Drives discovery and generation for exactly one network.
pub struct NetworkPipeline<C> {
    spec: NetworkSpec,
    connector: C,
    invoker: FailoverInvoker,
    config: PipelineConfig,
}

impl<C: ReflectionConnector> NetworkPipeline<C> {
    pub fn new(spec: NetworkSpec, connector: C, config: PipelineConfig) -> Self {
        let invoker = FailoverInvoker::new(config.failover.clone());
        Self {
            spec,
            connector,
            invoker,
            config,
        }
    }

    /// Runs the network to a settled [`NetworkResult`]. Never panics, never
    /// returns an error: every failure is folded into a `failed` result so
    /// sibling networks are unaffected.
    pub async fn run(&self) -> NetworkResult {
        let identity = match resolve_chain_identity(&self.spec.endpoints) {
            Some(identity) => identity,
            None => {
                return NetworkResult::failed(
                    &self.spec.name,
                    None,
                    "no endpoint yielded a chain identity",
                )
            }
        };

        info!(
            "{}: resolved chain identity {} via {}",
            self.spec.name, identity.chain_id, identity.endpoint
        );

        match self.generate(&identity).await {
            Ok(result) => result,
            Err(e) => {
                warn!("{}: pipeline failed: {}", self.spec.name, e);
                NetworkResult::failed(&self.spec.name, Some(identity.chain_id), e.to_string())
            }
        }
    }

    async fn generate(&self, identity: &ChainIdentity) -> Result<NetworkResult> {
        let endpoints = self.failover_order(&identity.endpoint);

        let (names, listing_endpoint) = self
            .invoker
            .invoke(&endpoints, "list_services", |endpoint| {
                let connector = &self.connector;
                async move {
                    let mut session = connector.connect(&endpoint).await?;
                    session.list_services().await
                }
            })
            .await?;

        let names: Vec<String> = names
            .into_iter()
            .filter(|name| !name.starts_with(REFLECTION_SERVICE_PREFIX))
            .collect();

        info!(
            "{}: {} services reported by {}",
            self.spec.name,
            names.len(),
            listing_endpoint
        );

        let chain_dir = self.config.out_dir.join(&identity.chain_id);
        fs::create_dir_all(&chain_dir).await?;

        let mut manifest =
            NetworkManifest::new(&identity.chain_id, &self.spec.name, &listing_endpoint);

        for name in &names {
            match self.generate_service(&endpoints, &chain_dir, name).await {
                Ok(entry) => manifest.services.push(entry),
                Err(e) if e.is_exhaustion() => return Err(e),
                Err(e @ ProtoscoutError::MissingDescriptor(_))
                    if self.config.missing_types == MissingTypePolicy::Fail =>
                {
                    return Err(e)
                }
                Err(e) => warn!("{}: skipping service {}: {}", self.spec.name, name, e),
            }
        }

        let manifest_path = chain_dir.join("manifest.json");
        fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?).await?;

        info!(
            "{}: wrote {} with {} service(s)",
            self.spec.name,
            manifest_path.display(),
            manifest.services.len()
        );

        Ok(NetworkResult::success(
            &self.spec.name,
            &identity.chain_id,
            manifest.services.len(),
            chain_dir,
        ))
    }

    /// Fetches, renders and writes one service, returning its manifest entry.
    async fn generate_service(
        &self,
        endpoints: &[EndpointAddress],
        chain_dir: &Path,
        service_name: &str,
    ) -> Result<ManifestEntry> {
        let (set, _) = self
            .invoker
            .invoke(endpoints, "file_containing_symbol", |endpoint| {
                let connector = &self.connector;
                let symbol = service_name.to_string();
                async move {
                    let mut session = connector.connect(&endpoint).await?;
                    session.file_containing_symbol(&symbol).await
                }
            })
            .await?;

        let service = set
            .service(service_name)
            .ok_or_else(|| ProtoscoutError::MissingDescriptor(service_name.to_string()))?;

        let service_text = render_service(service);
        let message_text = render_messages(service, &set, self.config.missing_types)?;

        let mut service_dir = chain_dir.to_path_buf();
        for segment in service_name.split('.') {
            service_dir.push(segment);
        }
        fs::create_dir_all(&service_dir).await?;

        let simple = service.simple_name();
        fs::write(service_dir.join(format!("{}.svc.proto", simple)), &service_text).await?;
        if !message_text.is_empty() {
            fs::write(service_dir.join(format!("{}.msg.proto", simple)), &message_text).await?;
        }

        Ok(ManifestEntry {
            service: service_name.to_string(),
            path: service_name.replace('.', "/"),
            methods: service.methods.len(),
        })
    }

    /// Full configured endpoint list, rotated so the identity's active
    /// endpoint is tried first. Relative order is otherwise preserved.
    fn failover_order(&self, active: &EndpointAddress) -> Vec<EndpointAddress> {
        let mut order = self.spec.endpoints.clone();
        if let Some(pos) = order.iter().position(|endpoint| endpoint == active) {
            order.rotate_left(pos);
        }
        order
    }
}
