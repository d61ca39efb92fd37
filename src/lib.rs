//! gce-inventory
//!
//! Inventory collector for Google Compute Engine. Lists a project's VM
//! instances together with the disks, networks, firewalls, instance
//! groups, autoscalers and load balancers around them, and assembles each
//! instance into one Server record.

pub mod collector;
pub mod config;
pub mod gcp;
pub mod resource;
pub mod service;

/// Version injected at compile time via GCE_INVENTORY_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("GCE_INVENTORY_VERSION") {
    Some(v) => v,
    None => "dev",
};
