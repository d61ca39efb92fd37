//! Global Resource Set
//!
//! Everything a join needs that does not depend on a particular instance,
//! fetched once per batch and then shared read-only.

use super::membership::{resolve_membership, GroupMembership};
use crate::resource::model::*;
use crate::resource::ComputeApi;
use anyhow::Result;
use futures::future::try_join_all;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalResources {
    pub disks: Vec<Disk>,
    pub autoscalers: Vec<Autoscaler>,
    pub machine_types: Vec<MachineType>,
    pub instance_group_managers: Vec<InstanceGroupManager>,
    pub images: Vec<Image>,
    pub networks: Vec<Network>,
    pub subnetworks: Vec<Subnetwork>,
    pub firewalls: Vec<Firewall>,
    pub forwarding_rules: Vec<ForwardingRule>,
    pub target_pools: Vec<TargetPool>,
    pub target_proxies: Vec<TargetProxy>,
    pub url_maps: Vec<UrlMap>,
    pub backend_services: Vec<BackendService>,
    pub membership: GroupMembership,
}

/// Fetch every instance-independent list.
///
/// The lists are requested concurrently and any failure fails the whole
/// set. Images come from the client's project plus `image_projects`.
pub async fn fetch_global_resources(
    api: &dyn ComputeApi,
    image_projects: &[String],
    concurrency: usize,
) -> Result<GlobalResources> {
    let project_id = api.project_id().to_string();
    let image_sources: Vec<&str> = std::iter::once(project_id.as_str())
        .chain(
            image_projects
                .iter()
                .map(String::as_str)
                .filter(|p| *p != project_id),
        )
        .collect();

    let (
        disks,
        autoscalers,
        machine_types,
        instance_group_managers,
        images,
        networks,
        subnetworks,
        firewalls,
        forwarding_rules,
        target_pools,
        target_proxies,
        url_maps,
        backend_services,
    ) = tokio::try_join!(
        api.list_disks(),
        api.list_autoscalers(),
        api.list_machine_types(),
        api.list_instance_group_managers(),
        try_join_all(image_sources.iter().map(|p| api.list_images(p))),
        api.list_networks(),
        api.list_subnetworks(),
        api.list_firewalls(),
        api.list_forwarding_rules(),
        api.list_target_pools(),
        api.list_target_proxies(),
        api.list_url_maps(),
        api.list_backend_services(),
    )?;

    let membership = resolve_membership(api, &instance_group_managers, concurrency).await;

    let resources = GlobalResources {
        disks,
        autoscalers,
        machine_types,
        instance_group_managers,
        images: images.into_iter().flatten().collect(),
        networks,
        subnetworks,
        firewalls,
        forwarding_rules,
        target_pools,
        target_proxies,
        url_maps,
        backend_services,
        membership,
    };

    info!(
        disks = resources.disks.len(),
        images = resources.images.len(),
        groups = resources.instance_group_managers.len(),
        group_members = resources.membership.len(),
        firewalls = resources.firewalls.len(),
        forwarding_rules = resources.forwarding_rules.len(),
        "Fetched global resources"
    );

    Ok(resources)
}
