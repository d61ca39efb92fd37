//! Resource abstraction layer
//!
//! Typed Compute Engine resources and the calls that list them.
//!
//! # Architecture
//!
//! - [`model`] - Typed resource records deserialized from REST responses
//! - [`fetcher`] - Paginated list calls, including aggregated lists
//! - [`api`] - The [`ComputeApi`] trait and its REST implementation
//! - [`registry`] - Static lookup tables embedded from JSON
//! - [`selflink`] - Self-link parsing and comparison
//!
//! # Example
//!
//! ```ignore
//! use gce_inventory::resource::ComputeApi;
//!
//! async fn count_disks(api: &dyn ComputeApi) -> anyhow::Result<usize> {
//!     Ok(api.list_disks().await?.len())
//! }
//! ```

pub mod api;
pub mod fetcher;
pub mod model;
pub mod registry;
pub mod selflink;

pub use api::ComputeApi;
pub use registry::*;
