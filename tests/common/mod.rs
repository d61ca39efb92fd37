//! In-memory `ComputeApi` used by the pipeline tests

#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use gce_inventory::resource::model::*;
use gce_inventory::resource::selflink::GroupLink;
use gce_inventory::resource::ComputeApi;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;

pub const PROJECT: &str = "test-project";
pub const BASE: &str = "https://www.googleapis.com/compute/v1/projects/test-project";

pub fn network_link() -> String {
    format!("{}/global/networks/default", BASE)
}

pub fn subnet_link(region: &str) -> String {
    format!("{}/regions/{}/subnetworks/default", BASE, region)
}

pub fn instance_link(zone: &str, name: &str) -> String {
    format!("{}/zones/{}/instances/{}", BASE, zone, name)
}

pub fn igm_link(zone: &str, name: &str) -> String {
    format!("{}/zones/{}/instanceGroupManagers/{}", BASE, zone, name)
}

/// A running instance with one interface on the default network
pub fn instance(id: &str, name: &str, zone: &str) -> Instance {
    let region = &zone[..zone.len() - 2];
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "selfLink": instance_link(zone, name),
        "zone": format!("{}/zones/{}", BASE, zone),
        "machineType": format!("{}/zones/{}/machineTypes/e2-medium", BASE, zone),
        "status": "RUNNING",
        "networkInterfaces": [{
            "name": "nic0",
            "network": network_link(),
            "subnetwork": subnet_link(region),
            "networkIP": "10.0.0.2"
        }]
    }))
    .unwrap()
}

pub fn stateless_group(zone: &str, name: &str) -> InstanceGroupManager {
    serde_json::from_value(json!({
        "name": name,
        "selfLink": igm_link(zone, name),
        "instanceGroup": format!("{}/zones/{}/instanceGroups/{}", BASE, zone, name),
        "status": {"stateful": {"hasStatefulConfig": false}}
    }))
    .unwrap()
}

pub fn member(instance_link: &str) -> GroupMember {
    GroupMember {
        instance: Some(instance_link.to_string()),
        status: Some("RUNNING".to_string()),
    }
}

#[derive(Default)]
pub struct FakeApi {
    pub instances: Vec<Instance>,
    pub disks: Vec<Disk>,
    pub autoscalers: Vec<Autoscaler>,
    pub machine_types: Vec<MachineType>,
    pub groups: Vec<InstanceGroupManager>,
    pub networks: Vec<Network>,
    pub subnetworks: Vec<Subnetwork>,
    pub firewalls: Vec<Firewall>,
    /// Members by group name
    pub members: HashMap<String, Vec<GroupMember>>,
    /// Groups whose member listing fails
    pub failing_groups: Vec<String>,
    /// List call that fails (`"disks"`, `"instances"`, ...)
    pub failing_list: Option<&'static str>,
    /// Filter passed to every `list_instances` call
    pub instance_filters: Mutex<Vec<Option<String>>>,
    /// Group names whose members were requested
    pub member_calls: Mutex<Vec<String>>,
}

impl FakeApi {
    /// Default network with subnets in the regions the tests use
    pub fn with_network() -> Self {
        let subnetworks = ["us-central1", "us-east1", "europe-west1", "mars-north1"]
            .iter()
            .map(|region| Subnetwork {
                name: Some("default".to_string()),
                self_link: Some(subnet_link(region)),
                network: Some(network_link()),
                ip_cidr_range: Some("10.0.0.0/20".to_string()),
                ..Default::default()
            })
            .collect();

        Self {
            networks: vec![Network {
                id: Some("1".to_string()),
                name: Some("default".to_string()),
                self_link: Some(network_link()),
                ..Default::default()
            }],
            subnetworks,
            ..Default::default()
        }
    }

    fn check(&self, list: &str) -> Result<()> {
        if self.failing_list == Some(list) {
            bail!("API request failed: 403 Forbidden - listing {} denied", list);
        }
        Ok(())
    }
}

#[async_trait]
impl ComputeApi for FakeApi {
    fn project_id(&self) -> &str {
        PROJECT
    }

    async fn list_instances(&self, filter: Option<&str>) -> Result<Vec<Instance>> {
        self.instance_filters
            .lock()
            .unwrap()
            .push(filter.map(str::to_string));
        self.check("instances")?;
        Ok(self.instances.clone())
    }

    async fn list_disks(&self) -> Result<Vec<Disk>> {
        self.check("disks")?;
        Ok(self.disks.clone())
    }

    async fn list_autoscalers(&self) -> Result<Vec<Autoscaler>> {
        self.check("autoscalers")?;
        Ok(self.autoscalers.clone())
    }

    async fn list_machine_types(&self) -> Result<Vec<MachineType>> {
        Ok(self.machine_types.clone())
    }

    async fn list_instance_group_managers(&self) -> Result<Vec<InstanceGroupManager>> {
        self.check("instanceGroupManagers")?;
        Ok(self.groups.clone())
    }

    async fn list_images(&self, _project_id: &str) -> Result<Vec<Image>> {
        self.check("images")?;
        Ok(Vec::new())
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        Ok(self.networks.clone())
    }

    async fn list_subnetworks(&self) -> Result<Vec<Subnetwork>> {
        Ok(self.subnetworks.clone())
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        Ok(self.firewalls.clone())
    }

    async fn list_forwarding_rules(&self) -> Result<Vec<ForwardingRule>> {
        Ok(Vec::new())
    }

    async fn list_target_pools(&self) -> Result<Vec<TargetPool>> {
        Ok(Vec::new())
    }

    async fn list_target_proxies(&self) -> Result<Vec<TargetProxy>> {
        Ok(Vec::new())
    }

    async fn list_url_maps(&self) -> Result<Vec<UrlMap>> {
        Ok(Vec::new())
    }

    async fn list_backend_services(&self) -> Result<Vec<BackendService>> {
        Ok(Vec::new())
    }

    async fn list_group_members(&self, group: &GroupLink) -> Result<Vec<GroupMember>> {
        self.member_calls.lock().unwrap().push(group.name.clone());
        if self.failing_groups.contains(&group.name) {
            bail!("API request failed: 500 Internal Server Error");
        }
        Ok(self.members.get(&group.name).cloned().unwrap_or_default())
    }
}
