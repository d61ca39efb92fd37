//! Collector service
//!
//! The three request-level operations: `init` (capability descriptor),
//! `verify` (connectivity) and `collect` (the record stream). Each builds
//! its own client from the request's secret data.

use crate::collector::{CollectOptions, Collector, InstanceQuery, Record};
use crate::config::Config;
use crate::gcp::auth::{get_default_project, validate_project_id, GcpCredentials, SecretData};
use crate::gcp::client::GcpClient;
use crate::gcp::projects::{self, ConnectivityStatus};
use crate::resource::{get_capability, Capability};
use anyhow::{Context, Result};
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// A request as handed to the collector
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CollectRequest {
    /// Per-request overrides (`concurrency`)
    pub options: Map<String, Value>,
    pub secret_data: SecretData,
    pub filter: Map<String, Value>,
}

impl CollectRequest {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid collect request")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitResponse {
    pub metadata: &'static Capability,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct VerifyResponse {
    pub status: ConnectivityStatus,
}

/// Capability descriptor of this collector
pub fn init() -> Result<InitResponse> {
    Ok(InitResponse {
        metadata: get_capability()?,
    })
}

/// Project to collect: CLI flag, then secret data, then config, then gcloud defaults
pub fn resolve_project(
    cli_project: Option<&str>,
    secret: &SecretData,
    config: &Config,
) -> Result<String> {
    let project = cli_project
        .map(str::to_string)
        .or_else(|| secret.project_id.clone())
        .or_else(|| config.project_id.clone())
        .or_else(get_default_project)
        .context("No GCP project configured. Set GOOGLE_CLOUD_PROJECT or use --project")?;

    if !validate_project_id(&project) {
        anyhow::bail!("Invalid project ID: {}", project);
    }
    Ok(project)
}

/// Build the REST client for a request
pub async fn connect(
    request: &CollectRequest,
    config: &Config,
    cli_project: Option<&str>,
) -> Result<GcpClient> {
    let project = resolve_project(cli_project, &request.secret_data, config)?;
    let credentials = GcpCredentials::from_secret(&request.secret_data).await?;
    tracing::info!("Using project: {}", project);
    Ok(GcpClient::new(credentials, &project)?.with_compute_base_url(&config.api_base_url))
}

/// Connectivity check; any failure, including a bad request, is `Unknown`
pub async fn verify(
    request: &CollectRequest,
    config: &Config,
    cli_project: Option<&str>,
) -> VerifyResponse {
    let status = match connect(request, config, cli_project).await {
        Ok(client) => projects::verify(&client).await,
        Err(e) => {
            tracing::warn!("Verification could not connect: {:#}", e);
            ConnectivityStatus::Unknown
        },
    };
    VerifyResponse { status }
}

/// Batch options: config values overridden by request options
pub fn collect_options(request: &CollectRequest, config: &Config) -> CollectOptions {
    let mut options = config.collect_options();
    if let Some(concurrency) = request.options.get("concurrency").and_then(Value::as_u64) {
        options.concurrency = (concurrency as usize).max(1);
    }
    options
}

/// Start a batch for the request
pub async fn collect(
    request: &CollectRequest,
    config: &Config,
    cli_project: Option<&str>,
) -> Result<impl Stream<Item = Record> + Send + 'static> {
    let client = connect(request, config, cli_project).await?;
    let collector = Collector::new(Arc::new(client), collect_options(request, config));
    Ok(collector.collect(InstanceQuery::from_filter(&request.filter)))
}
