//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication
//! and HTTP functionality. Built once per batch and shared read-only.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::Result;
use serde_json::Value;

/// Production endpoint of the Compute Engine API
pub const DEFAULT_COMPUTE_BASE_URL: &str = "https://compute.googleapis.com";

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub project_id: String,
    compute_base_url: String,
}

impl GcpClient {
    /// Create a new GCP client talking to the production endpoints
    pub fn new(credentials: GcpCredentials, project_id: &str) -> Result<Self> {
        Ok(Self {
            credentials,
            http: GcpHttpClient::new()?,
            project_id: project_id.to_string(),
            compute_base_url: DEFAULT_COMPUTE_BASE_URL.to_string(),
        })
    }

    /// Point the Compute Engine helpers at another endpoint
    pub fn with_compute_base_url(mut self, base_url: &str) -> Self {
        self.compute_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Make a POST request to a GCP API (read-only list calls such as `listInstances`)
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.post(url, &token, body).await
    }

    // =========================================================================
    // Compute Engine API helpers
    // =========================================================================

    /// Build Compute Engine API URL for an arbitrary project
    pub fn compute_project_url(&self, project_id: &str, path: &str) -> String {
        if path.is_empty() {
            format!("{}/compute/v1/projects/{}", self.compute_base_url, project_id)
        } else {
            format!(
                "{}/compute/v1/projects/{}/{}",
                self.compute_base_url, project_id, path
            )
        }
    }

    /// Build Compute Engine API URL for the client's project
    pub fn compute_url(&self, path: &str) -> String {
        self.compute_project_url(&self.project_id, path)
    }

    /// Build global Compute Engine API URL
    pub fn compute_global_url(&self, resource: &str) -> String {
        self.compute_url(&format!("global/{}", resource))
    }

    /// Build aggregated Compute Engine API URL (all zones / regions)
    pub fn compute_aggregated_url(&self, resource: &str) -> String {
        self.compute_url(&format!("aggregated/{}", resource))
    }
}

/// Format a GCP API error for display
pub fn format_gcp_error(error: &anyhow::Error) -> String {
    super::http::format_gcp_error(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GcpClient {
        GcpClient::new(GcpCredentials::from_static_token("t"), "inventory-test").unwrap()
    }

    #[test]
    fn test_compute_urls() {
        let client = client();
        assert_eq!(
            client.compute_url("zones/us-central1-a/instanceGroups/web/listInstances"),
            "https://compute.googleapis.com/compute/v1/projects/inventory-test/zones/us-central1-a/instanceGroups/web/listInstances"
        );
        assert_eq!(
            client.compute_aggregated_url("disks"),
            "https://compute.googleapis.com/compute/v1/projects/inventory-test/aggregated/disks"
        );
        assert_eq!(
            client.compute_project_url("debian-cloud", "global/images"),
            "https://compute.googleapis.com/compute/v1/projects/debian-cloud/global/images"
        );
        assert_eq!(
            client.compute_project_url("inventory-test", ""),
            "https://compute.googleapis.com/compute/v1/projects/inventory-test"
        );
    }

    #[test]
    fn test_base_url_override_trims_trailing_slash() {
        let client = client().with_compute_base_url("http://127.0.0.1:8080/");
        assert_eq!(
            client.compute_global_url("firewalls"),
            "http://127.0.0.1:8080/compute/v1/projects/inventory-test/global/firewalls"
        );
    }
}
