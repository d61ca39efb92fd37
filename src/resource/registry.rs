//! Resource Registry - Load static collector tables from JSON
//!
//! The region table, the advertised cloud service types, the server view
//! metadata and the capability descriptor are embedded JSON files. They are
//! parsed once on first access and shared for the life of the process.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Embedded registry JSON files (compiled into the binary)
const REGISTRY_FILES: &[&str] = &[
    include_str!("../resources/regions.json"),
    include_str!("../resources/collector.json"),
];

/// Geographic metadata for one region
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionDef {
    pub name: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// A cloud service type advertised once per batch
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudServiceTypeDef {
    pub name: String,
    pub group: String,
    pub provider: String,
    pub resource_type: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// How a collector filter key maps onto inventory fields
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChangeRule {
    pub resource_key: String,
    pub change_key: String,
}

/// One supported filter key
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FilterFormat {
    pub key: String,
    pub name: String,
    /// Expected value type (`str` or `list`)
    #[serde(rename = "type")]
    pub value_type: String,
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_rules: Vec<ChangeRule>,
}

/// Capability descriptor returned by `init`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Capability {
    pub filter_format: Vec<FilterFormat>,
    pub supported_resource_type: Vec<String>,
    pub supported_features: Vec<String>,
    pub supported_schedules: Vec<String>,
}

/// Root structure of resources/*.json; every file fills a subset
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub regions: BTreeMap<String, RegionDef>,
    #[serde(default)]
    pub cloud_service_types: Vec<CloudServiceTypeDef>,
    #[serde(default)]
    pub server_metadata: Option<Value>,
    #[serde(default)]
    pub capability: Option<Capability>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<std::result::Result<Registry, String>> = OnceLock::new();

fn load_registry() -> std::result::Result<Registry, String> {
    let mut final_registry = Registry::default();

    for content in REGISTRY_FILES {
        let partial: Registry = serde_json::from_str(content)
            .map_err(|e| format!("Failed to parse embedded registry JSON: {}", e))?;
        final_registry.regions.extend(partial.regions);
        final_registry
            .cloud_service_types
            .extend(partial.cloud_service_types);
        if partial.server_metadata.is_some() {
            final_registry.server_metadata = partial.server_metadata;
        }
        if partial.capability.is_some() {
            final_registry.capability = partial.capability;
        }
    }

    Ok(final_registry)
}

/// Get the registry (parses the embedded JSON on first access)
pub fn get_registry() -> Result<&'static Registry> {
    REGISTRY
        .get_or_init(load_registry)
        .as_ref()
        .map_err(|e| anyhow!(e.clone()))
}

/// Look up a region by code
pub fn get_region(region_code: &str) -> Option<&'static RegionDef> {
    get_registry().ok()?.regions.get(region_code)
}

/// Cloud service types advertised at the start of every batch
pub fn get_cloud_service_types() -> Result<&'static [CloudServiceTypeDef]> {
    Ok(get_registry()?.cloud_service_types.as_slice())
}

/// Fixed view descriptor stamped on every server record
pub fn get_server_metadata() -> Value {
    get_registry()
        .ok()
        .and_then(|r| r.server_metadata.clone())
        .unwrap_or(Value::Null)
}

/// Capability descriptor of the collector
pub fn get_capability() -> Result<&'static Capability> {
    get_registry()?
        .capability
        .as_ref()
        .ok_or_else(|| anyhow!("Registry has no capability descriptor"))
}
