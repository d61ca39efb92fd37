//! Join Engine
//!
//! Assembles one instance and the slice of the Global Resource Set that
//! relates to it into a Server record. Every sub-join is pure and
//! synchronous; a related resource that cannot be found leaves its part of
//! the record empty instead of failing the instance.

pub mod autoscaler;
pub mod compute;
pub mod disk;
pub mod load_balancer;
pub mod monitoring;
pub mod network;
pub mod security_group;

#[cfg(test)]
pub(crate) mod fixtures;

use super::error::JoinError;
use super::record::{Label, Reference, Server, ServerData, PROVIDER};
use super::resources::GlobalResources;
use super::zone::ZoneInfo;
use crate::resource::model::{Instance, InstanceGroupManager};
use crate::resource::registry::get_server_metadata;
use crate::resource::selflink::{project_relative_path, same_resource};
use std::collections::BTreeMap;

/// Console endpoint used for external links
pub const DEFAULT_CONSOLE_BASE_URL: &str = "https://console.cloud.google.com";

/// Build the Server record for one instance.
///
/// Fails only when the instance lacks the identity fields (`name`,
/// `selfLink`) the record is keyed on.
pub fn assemble_server(
    instance: &Instance,
    zone: &ZoneInfo,
    resources: &GlobalResources,
    console_base_url: &str,
) -> Result<Server, JoinError> {
    let name = instance
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(JoinError::MissingField("name"))?;
    let self_link = instance
        .self_link
        .as_deref()
        .filter(|l| !l.is_empty())
        .ok_or(JoinError::MissingField("selfLink"))?;

    let groups = owning_groups(instance, self_link, resources);

    let mut base = compute::base_info(instance, zone, resources);
    let network = network::network_info(instance, resources);
    let security_group = security_group::firewall_rules(instance, resources);
    base.compute.security_groups = security_group::group_names(&security_group);

    let (primary_ip_address, ip_addresses) = ip_addresses(instance);

    Ok(Server {
        name: name.to_string(),
        provider: PROVIDER,
        cloud_service_group: "ComputeEngine",
        cloud_service_type: "Instance",
        server_type: "VM",
        os_type: base.os.os_type.clone(),
        region_code: zone.region.clone(),
        primary_ip_address,
        ip_addresses,
        data: ServerData {
            auto_scaler: autoscaler::autoscaler_info(&groups, resources),
            load_balancers: load_balancer::load_balancers(self_link, &groups, resources),
            security_group,
            vpc: network.vpc,
            subnet: network.subnet,
            stackdriver: monitoring::stackdriver_info(
                name,
                instance.id.as_deref().unwrap_or_default(),
                &zone.project_id,
            ),
            os: base.os,
            hardware: base.hardware,
            compute: base.compute,
            google_cloud: base.google_cloud,
        },
        nics: network.nics,
        disks: disk::disk_info(instance, resources),
        tags: labels(&instance.labels),
        reference: Reference {
            resource_id: self_link.to_string(),
            external_link: external_link(console_base_url, zone, name),
        },
        metadata: get_server_metadata(),
    })
}

/// Console page of an instance
pub fn external_link(console_base_url: &str, zone: &ZoneInfo, name: &str) -> String {
    format!(
        "{}/compute/instancesDetail/zones/{}/instances/{}?project={}",
        console_base_url.trim_end_matches('/'),
        zone.zone,
        name,
        zone.project_id
    )
}

/// Managed groups the instance belongs to.
///
/// A group owns the instance when the membership index lists it, or when
/// the instance's `created-by` metadata names the group's manager.
pub fn owning_groups<'a>(
    instance: &Instance,
    self_link: &str,
    resources: &'a GlobalResources,
) -> Vec<&'a InstanceGroupManager> {
    let created_by = instance.metadata_value("created-by").map(project_relative_path);
    let member_of: Vec<&str> = resources.membership.groups_of(self_link).collect();

    resources
        .instance_group_managers
        .iter()
        .filter(|igm| {
            let Some(igm_link) = igm.self_link.as_deref() else {
                return false;
            };
            member_of.iter().any(|g| same_resource(g, igm_link))
                || created_by == Some(project_relative_path(igm_link))
        })
        .collect()
}

/// Provider labels as key/value pairs, ordered by key
pub fn labels(labels: &BTreeMap<String, String>) -> Vec<Label> {
    labels
        .iter()
        .map(|(key, value)| Label {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// Primary internal address and every internal and external address
fn ip_addresses(instance: &Instance) -> (String, Vec<String>) {
    let mut all = Vec::new();
    for iface in &instance.network_interfaces {
        all.extend(iface.network_ip.iter().cloned());
        all.extend(iface.access_configs.iter().filter_map(|ac| ac.nat_ip.clone()));
    }
    let primary = instance
        .network_interfaces
        .first()
        .and_then(|iface| iface.network_ip.clone())
        .unwrap_or_default();
    (primary, all)
}
