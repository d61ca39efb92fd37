//! Output records
//!
//! Everything the collector streams back to the caller. Each record is
//! wrapped in an envelope tagged with its resource type so consumers can
//! branch on the kind before reading the payload.

use super::error::CollectError;
use crate::resource::registry::CloudServiceTypeDef;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

pub const PROVIDER: &str = "google_cloud";

// =============================================================================
// Server
// =============================================================================

/// One assembled VM instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Server {
    pub name: String,
    pub provider: &'static str,
    pub cloud_service_group: &'static str,
    pub cloud_service_type: &'static str,
    pub server_type: &'static str,
    pub os_type: String,
    pub region_code: String,
    pub primary_ip_address: String,
    pub ip_addresses: Vec<String>,
    pub data: ServerData,
    pub nics: Vec<Nic>,
    pub disks: Vec<DiskInfo>,
    pub tags: Vec<Label>,
    pub reference: Reference,
    #[serde(rename = "_metadata")]
    pub metadata: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerData {
    pub os: Os,
    pub hardware: Hardware,
    pub compute: Compute,
    pub google_cloud: GoogleCloud,
    pub load_balancers: Vec<LoadBalancer>,
    pub security_group: Vec<SecurityGroupRule>,
    pub auto_scaler: Option<AutoScaler>,
    pub vpc: Option<Vpc>,
    pub subnet: Option<Subnet>,
    pub stackdriver: StackDriver,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Os {
    pub os_distro: String,
    pub os_arch: String,
    pub os_type: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Hardware {
    pub core: u32,
    /// GiB
    pub memory: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Compute {
    pub keypair: String,
    pub az: String,
    pub region: String,
    pub instance_state: String,
    pub instance_type: String,
    pub launched_at: String,
    pub instance_id: String,
    pub instance_name: String,
    pub security_groups: Vec<String>,
    pub image: String,
    pub account: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoogleCloud {
    pub self_link: String,
    pub fingerprint: String,
    pub cpu_platform: String,
    pub deletion_protection: bool,
    pub can_ip_forward: bool,
    pub scheduling: SchedulingInfo,
    /// Network tags
    pub tags: Vec<String>,
    pub labels: Vec<Label>,
    pub ssh_keys: SshKeys,
    pub service_accounts: Vec<String>,
    pub is_managed_instance: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchedulingInfo {
    pub on_host_maintenance: String,
    pub automatic_restart: bool,
    pub preemptible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SshKeys {
    pub has_instance_ssh_keys: bool,
    /// "ON" or "OFF"
    pub block_project_ssh_keys: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Nic {
    pub device_index: u32,
    pub device: String,
    pub nic_type: String,
    pub ip_addresses: Vec<String>,
    pub cidr: String,
    pub public_ip_address: String,
    pub network_tier: String,
    pub subnet_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskInfo {
    pub device_index: u32,
    pub device: String,
    /// `persistent_disk` or `local_ssd`
    pub disk_type: &'static str,
    /// GiB
    pub size: f64,
    pub tags: DiskTags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiskTags {
    pub disk_id: String,
    pub disk_name: String,
    pub disk_type: String,
    pub encryption: &'static str,
    pub iops: Option<u64>,
    pub throughput: Option<u64>,
    pub auto_delete: bool,
    pub boot: bool,
    pub mode: String,
    pub interface: String,
    pub source_image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancer {
    /// `application` (HTTP(S) proxy) or `network`
    #[serde(rename = "type")]
    pub lb_type: &'static str,
    pub name: String,
    pub endpoint: String,
    pub port: Vec<String>,
    pub protocol: Vec<String>,
    pub scheme: String,
    pub tags: LoadBalancerTags,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadBalancerTags {
    pub forwarding_rule: String,
    pub forwarding_rule_self_link: String,
    pub backend_service: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SecurityGroupRule {
    pub priority: u32,
    /// `allow` or `deny`
    pub action: &'static str,
    /// `inbound` or `outbound`
    pub direction: &'static str,
    pub protocol: String,
    pub port_range_min: u16,
    pub port_range_max: u16,
    pub port: String,
    pub remote: String,
    pub remote_cidr: String,
    pub security_group_name: String,
    pub security_group_id: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AutoScaler {
    pub name: String,
    pub id: String,
    pub self_link: String,
    pub min_replicas: Option<u32>,
    pub max_replicas: Option<u32>,
    pub instance_group: InstanceGroupRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstanceGroupRef {
    pub name: String,
    pub self_link: String,
    pub instance_template_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vpc {
    pub vpc_id: String,
    pub vpc_name: String,
    pub description: String,
    pub self_link: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Subnet {
    pub subnet_id: String,
    pub subnet_name: String,
    pub self_link: String,
    pub gateway_address: String,
    pub cidr: String,
    pub region: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StackDriver {
    #[serde(rename = "type")]
    pub monitoring_type: &'static str,
    pub identifier: &'static str,
    pub filters: Vec<MonitoringFilter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringFilter {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reference {
    pub resource_id: String,
    pub external_link: String,
}

// =============================================================================
// Region / error
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionResource {
    pub region_code: String,
    pub name: String,
    pub provider: &'static str,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorResource {
    pub message: String,
    pub resource: ErrorTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorTarget {
    pub resource_type: &'static str,
    pub resource_id: String,
}

impl ErrorResource {
    pub fn new(error: &CollectError, resource_type: &'static str, resource_id: &str) -> Self {
        Self {
            message: error.message(),
            resource: ErrorTarget {
                resource_type,
                resource_id: resource_id.to_string(),
            },
        }
    }
}

// =============================================================================
// Envelope
// =============================================================================

pub const CLOUD_SERVICE_TYPE: &str = "inventory.CloudServiceType";
pub const SERVER: &str = "inventory.Server";
pub const REGION: &str = "inventory.Region";
pub const ERROR_RESOURCE: &str = "inventory.ErrorResource";

/// One element of the output sequence
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    CloudServiceType(CloudServiceTypeDef),
    Server(Box<Server>),
    Region(RegionResource),
    Error(ErrorResource),
}

impl Record {
    /// Resource type tag of the envelope
    pub fn resource_type(&self) -> &'static str {
        match self {
            Record::CloudServiceType(_) => CLOUD_SERVICE_TYPE,
            Record::Server(_) => SERVER,
            Record::Region(_) => REGION,
            Record::Error(_) => ERROR_RESOURCE,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Record::Error(_))
    }

    /// Fields the inventory uses to match this record against stored resources
    fn match_rules(&self) -> BTreeMap<&'static str, Vec<&'static str>> {
        let keys: Vec<&'static str> = match self {
            Record::CloudServiceType(_) => vec!["name", "group", "provider"],
            Record::Server(_) => vec!["reference.resource_id"],
            Record::Region(_) => vec!["region_code", "provider"],
            Record::Error(_) => return BTreeMap::new(),
        };
        BTreeMap::from([("1", keys)])
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("Record", 4)?;
        let state = if self.is_error() { "FAILURE" } else { "SUCCESS" };
        envelope.serialize_field("state", state)?;
        envelope.serialize_field("resource_type", self.resource_type())?;
        envelope.serialize_field("match_rules", &self.match_rules())?;
        match self {
            Record::CloudServiceType(r) => envelope.serialize_field("resource", r)?,
            Record::Server(r) => envelope.serialize_field("resource", r)?,
            Record::Region(r) => envelope.serialize_field("resource", r)?,
            Record::Error(r) => envelope.serialize_field("resource", r)?,
        }
        envelope.end()
    }
}
