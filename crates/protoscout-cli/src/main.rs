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

//! # Protoscout CLI Entry Point
//!
//! Discovers the gRPC surface of configured chain networks via server
//! reflection and writes per-chain proto snippets plus a manifest.
//!
//! ## Usage
//!
//! ```bash
//! # Networks from the environment
//! PROTOSCOUT_NETWORK_OSMOSIS=grpc.osmosis.zone:9090 protoscout
//!
//! # Legacy single-network form
//! PROTOSCOUT_ENDPOINTS=grpc.osmosis.zone:9090,backup.osmosis.zone:9090 protoscout
//!
//! # Ad hoc single endpoint, custom output directory
//! protoscout -o ./generated grpc.cosmoshub.example.com:443
//! ```
//!
//! The exit code is nonzero only when zero networks are configured.
//! Individual network failures are reported in the printed summary.

use std::path::PathBuf;

use anyhow::Result;
use argh::FromArgs;

use protoscout_common::config;
use protoscout_pipeline::{MissingTypePolicy, Orchestrator, PipelineConfig};
use protoscout_reflect::GrpcReflectionConnector;

/// Discover gRPC service surfaces via server reflection and render proto
/// snippets per chain.
#[derive(FromArgs)]
struct Cli {
    /// single endpoint that replaces all configured networks
    ///
    /// When given, the run consists of exactly one network named "default"
    /// with this one endpoint. Otherwise networks come from
    /// PROTOSCOUT_NETWORK_<NAME> / PROTOSCOUT_ENDPOINTS.
    #[argh(positional)]
    endpoint: Option<String>,

    /// directory the generated tree is written to
    ///
    /// One subdirectory per resolved chain id. Defaults to "proto".
    #[argh(option, short = 'o', long = "out", default = "\"proto\".into()")]
    out: String,

    /// fail a network instead of skipping message types without a resolvable
    /// descriptor
    #[argh(switch, long = "strict-types")]
    strict_types: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // Default log level INFO, overridable through RUST_LOG.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let networks = config::networks_from_env(cli.endpoint.as_deref())?;
    tracing::info!(
        "Resolved {} network(s), writing to {}",
        networks.len(),
        cli.out
    );

    let mut pipeline_config = PipelineConfig::new(PathBuf::from(&cli.out));
    if cli.strict_types {
        pipeline_config.missing_types = MissingTypePolicy::Fail;
    }

    let orchestrator = Orchestrator::new(GrpcReflectionConnector::new(), pipeline_config);
    let summary = orchestrator.run(networks).await?;

    for result in &summary.results {
        println!("{}", result);
    }
    println!(
        "{} of {} network(s) generated",
        summary.succeeded(),
        summary.attempted()
    );

    Ok(())
}
