//! Parallel orchestrator.
//!
//! Fans out one pipeline task per configured network and waits for every one
//! of them to settle, whatever the individual outcomes. Pipelines share no
//! mutable state and write to disjoint chain-id subtrees, so no coordination
//! happens beyond the final join.

use tokio::task::JoinHandle;
use tracing::{error, info};

use protoscout_common::manifest::NetworkResult;
use protoscout_common::{NetworkSpec, ProtoscoutError, Result};
use protoscout_reflect::ReflectionConnector;

use crate::pipeline::{NetworkPipeline, PipelineConfig};

/// Aggregated outcome of one run, one entry per configured network, in
/// configuration order.
#[derive(Debug)]
pub struct RunSummary {
    pub results: Vec<NetworkResult>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }
}

pub struct Orchestrator<C> {
    connector: C,
    config: PipelineConfig,
}

impl<C> Orchestrator<C>
where
    C: ReflectionConnector + Clone + Send + Sync + 'static,
{
    pub fn new(connector: C, config: PipelineConfig) -> Self {
        Self { connector, config }
    }

    /// Runs every network to completion and aggregates the outcomes.
    ///
    /// A pipeline failure never propagates: it settles as a `failed`
    /// [`NetworkResult`], as does a panicked task. The only error here is
    /// zero configured networks.
    pub async fn run(&self, networks: Vec<NetworkSpec>) -> Result<RunSummary> {
        if networks.is_empty() {
            return Err(ProtoscoutError::Configuration(
                "no networks configured".to_string(),
            ));
        }

        info!("Starting discovery for {} network(s)", networks.len());

        let mut handles: Vec<(String, JoinHandle<NetworkResult>)> =
            Vec::with_capacity(networks.len());
        for spec in networks {
            let name = spec.name.clone();
            let pipeline = NetworkPipeline::new(spec, self.connector.clone(), self.config.clone());
            handles.push((name, tokio::spawn(async move { pipeline.run().await })));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    error!("{}: pipeline task aborted: {}", name, e);
                    NetworkResult::failed(name, None, format!("pipeline task aborted: {}", e))
                }
            };
            info!("{}", result);
            results.push(result);
        }

        Ok(RunSummary { results })
    }
}
