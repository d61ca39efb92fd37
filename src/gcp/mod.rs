//! GCP API interaction module
//!
//! This module provides the plumbing for talking to Google Cloud Platform
//! APIs: authentication, the HTTP client, and project verification.
//!
//! # Module Structure
//!
//! - [`auth`] - Credentials from secret data or Application Default Credentials
//! - [`client`] - Main GCP client and Compute Engine URL builders
//! - [`http`] - HTTP utilities for REST API calls
//! - [`projects`] - Project lookup and connectivity verification
//!
//! # Example
//!
//! ```ignore
//! use gce_inventory::gcp::{auth::GcpCredentials, client::GcpClient};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let credentials = GcpCredentials::application_default().await?;
//!     let client = GcpClient::new(credentials, "my-project")?;
//!     let disks = client.get(&client.compute_aggregated_url("disks")).await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod projects;
