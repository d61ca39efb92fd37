//! Compute Engine resource records
//!
//! Typed views of the REST resources the collector reads. Every field the
//! API may omit is optional or defaults to empty, so a sparse response
//! deserializes instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Instances
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instance {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub zone: Option<String>,
    pub machine_type: Option<String>,
    pub status: Option<String>,
    pub creation_timestamp: Option<String>,
    pub description: Option<String>,
    pub fingerprint: Option<String>,
    pub cpu_platform: Option<String>,
    pub deletion_protection: Option<bool>,
    pub can_ip_forward: Option<bool>,
    pub tags: Option<Tags>,
    pub labels: BTreeMap<String, String>,
    pub metadata: Option<Metadata>,
    pub disks: Vec<AttachedDisk>,
    pub network_interfaces: Vec<NetworkInterface>,
    pub service_accounts: Vec<ServiceAccount>,
    pub scheduling: Option<Scheduling>,
}

impl Instance {
    /// Look up a metadata entry by key
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.key == key)
            .and_then(|item| item.value.as_deref())
    }

    /// Network tags (not labels) attached to the instance
    pub fn network_tags(&self) -> &[String] {
        self.tags.as_ref().map(|t| t.items.as_slice()).unwrap_or(&[])
    }

    /// The attached boot disk, if any
    pub fn boot_disk(&self) -> Option<&AttachedDisk> {
        self.disks.iter().find(|d| d.boot.unwrap_or(false))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tags {
    pub items: Vec<String>,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Metadata {
    pub fingerprint: Option<String>,
    pub items: Vec<MetadataItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetadataItem {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AttachedDisk {
    pub source: Option<String>,
    pub device_name: Option<String>,
    pub index: Option<u32>,
    pub boot: Option<bool>,
    pub auto_delete: Option<bool>,
    pub mode: Option<String>,
    pub interface: Option<String>,
    /// PERSISTENT or SCRATCH
    #[serde(rename = "type")]
    pub disk_type: Option<String>,
    pub disk_size_gb: Option<String>,
    pub licenses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkInterface {
    pub name: Option<String>,
    pub network: Option<String>,
    pub subnetwork: Option<String>,
    #[serde(rename = "networkIP")]
    pub network_ip: Option<String>,
    /// VIRTIO_NET or GVNIC
    pub nic_type: Option<String>,
    pub access_configs: Vec<AccessConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessConfig {
    pub name: Option<String>,
    #[serde(rename = "natIP")]
    pub nat_ip: Option<String>,
    pub network_tier: Option<String>,
    #[serde(rename = "type")]
    pub access_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceAccount {
    pub email: String,
    pub scopes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scheduling {
    pub on_host_maintenance: Option<String>,
    pub automatic_restart: Option<bool>,
    pub preemptible: Option<bool>,
    pub provisioning_model: Option<String>,
}

// =============================================================================
// Compute catalog
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Disk {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub zone: Option<String>,
    pub size_gb: Option<String>,
    /// Disk type URL, e.g. `.../diskTypes/pd-balanced`
    #[serde(rename = "type")]
    pub disk_type: Option<String>,
    pub source_image: Option<String>,
    pub status: Option<String>,
    pub users: Vec<String>,
    pub provisioned_iops: Option<String>,
    pub provisioned_throughput: Option<String>,
    pub disk_encryption_key: Option<DiskEncryptionKey>,
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiskEncryptionKey {
    pub kms_key_name: Option<String>,
    pub sha256: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MachineType {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub zone: Option<String>,
    pub guest_cpus: Option<u32>,
    pub memory_mb: Option<u64>,
    pub is_shared_cpu: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub family: Option<String>,
    pub architecture: Option<String>,
    pub description: Option<String>,
    pub licenses: Vec<String>,
}

// =============================================================================
// Networking
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Network {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub description: Option<String>,
    pub auto_create_subnetworks: Option<bool>,
    pub subnetworks: Vec<String>,
    pub mtu: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subnetwork {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub network: Option<String>,
    pub region: Option<String>,
    pub ip_cidr_range: Option<String>,
    pub gateway_address: Option<String>,
    pub private_ip_google_access: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Firewall {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub network: Option<String>,
    pub description: Option<String>,
    pub priority: Option<u32>,
    /// INGRESS or EGRESS
    pub direction: Option<String>,
    pub disabled: Option<bool>,
    pub source_ranges: Vec<String>,
    pub destination_ranges: Vec<String>,
    pub source_tags: Vec<String>,
    pub source_service_accounts: Vec<String>,
    pub target_tags: Vec<String>,
    pub target_service_accounts: Vec<String>,
    pub allowed: Vec<FirewallEntry>,
    pub denied: Vec<FirewallEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewallEntry {
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: String,
    pub ports: Vec<String>,
}

// =============================================================================
// Instance groups and autoscaling
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceGroupManager {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    /// URL of the instance group this manager maintains
    pub instance_group: Option<String>,
    pub instance_template: Option<String>,
    pub base_instance_name: Option<String>,
    pub target_size: Option<u32>,
    pub status: Option<InstanceGroupManagerStatus>,
}

impl InstanceGroupManager {
    /// True only when the API explicitly reports no stateful configuration
    pub fn is_stateless(&self) -> bool {
        self.status
            .as_ref()
            .and_then(|s| s.stateful.as_ref())
            .and_then(|s| s.has_stateful_config)
            == Some(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstanceGroupManagerStatus {
    pub is_stable: Option<bool>,
    pub autoscaler: Option<String>,
    pub stateful: Option<StatefulStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatefulStatus {
    pub has_stateful_config: Option<bool>,
}

/// One entry of an instance group's `listInstances` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GroupMember {
    pub instance: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Autoscaler {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    /// URL of the instance group manager being scaled
    pub target: Option<String>,
    pub zone: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    pub autoscaling_policy: Option<AutoscalingPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoscalingPolicy {
    pub min_num_replicas: Option<u32>,
    pub max_num_replicas: Option<u32>,
    pub cool_down_period_sec: Option<u32>,
    pub mode: Option<String>,
}

// =============================================================================
// Load balancing
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackendService {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub region: Option<String>,
    pub protocol: Option<String>,
    pub port: Option<u16>,
    pub port_name: Option<String>,
    pub load_balancing_scheme: Option<String>,
    pub backends: Vec<Backend>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Backend {
    /// URL of an instance group or network endpoint group
    pub group: Option<String>,
    pub balancing_mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UrlMap {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub default_service: Option<String>,
    pub path_matchers: Vec<PathMatcher>,
}

impl UrlMap {
    /// Every backend service URL this map can route to
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.default_service
            .as_deref()
            .into_iter()
            .chain(self.path_matchers.iter().flat_map(|m| {
                m.default_service
                    .as_deref()
                    .into_iter()
                    .chain(m.path_rules.iter().filter_map(|r| r.service.as_deref()))
            }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathMatcher {
    pub name: Option<String>,
    pub default_service: Option<String>,
    pub path_rules: Vec<PathRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PathRule {
    pub paths: Vec<String>,
    pub service: Option<String>,
}

/// HTTP or HTTPS target proxy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetProxy {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub kind: Option<String>,
    pub url_map: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TargetPool {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub region: Option<String>,
    pub instances: Vec<String>,
    pub session_affinity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ForwardingRule {
    pub id: Option<String>,
    pub name: Option<String>,
    pub self_link: Option<String>,
    pub region: Option<String>,
    #[serde(rename = "IPAddress")]
    pub ip_address: Option<String>,
    #[serde(rename = "IPProtocol")]
    pub ip_protocol: Option<String>,
    pub port_range: Option<String>,
    pub ports: Vec<String>,
    /// Target proxy or target pool URL
    pub target: Option<String>,
    pub backend_service: Option<String>,
    pub load_balancing_scheme: Option<String>,
    pub network_tier: Option<String>,
}
