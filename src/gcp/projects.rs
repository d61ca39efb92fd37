//! GCP Projects
//!
//! Project lookup used to verify that the collector can reach the
//! Compute Engine API with the supplied credentials.

use super::client::GcpClient;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Project information as reported by the Compute Engine API
#[derive(Debug, Clone)]
pub struct Project {
    pub project_id: String,
    pub id: String,
    pub default_service_account: String,
}

impl From<&Value> for Project {
    fn from(value: &Value) -> Self {
        Self {
            project_id: value
                .get("name")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            id: value
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
            default_service_account: value
                .get("defaultServiceAccount")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string(),
        }
    }
}

/// Binary connectivity result of a verification call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectivityStatus {
    Active,
    Unknown,
}

/// Fetch the Compute Engine project resource of the client's project
pub async fn get_project(client: &GcpClient) -> Result<Project> {
    let url = client.compute_url("");
    let response = client.get(&url).await?;
    Ok(Project::from(&response))
}

/// Check that the project answers. Failures become `Unknown`, never an error.
pub async fn verify(client: &GcpClient) -> ConnectivityStatus {
    match get_project(client).await {
        Ok(project) => {
            tracing::info!(
                "Verified access to project {} ({})",
                project.project_id,
                project.id
            );
            ConnectivityStatus::Active
        },
        Err(e) => {
            tracing::warn!(
                "Verification failed: {}",
                super::client::format_gcp_error(&e)
            );
            ConnectivityStatus::Unknown
        },
    }
}
