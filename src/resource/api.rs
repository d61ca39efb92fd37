//! Compute API
//!
//! The list operations the collector needs, behind a trait so the batch
//! logic can run against the REST client or an in-memory fake.

use super::fetcher::{fetch_resources, ListMethod};
use super::model::*;
use super::selflink::{GroupLink, Scope};
use crate::gcp::client::GcpClient;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Read-only Compute Engine operations used by the collector
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Project the client is bound to
    fn project_id(&self) -> &str;

    /// All instances in every zone, optionally narrowed by a Compute filter expression
    async fn list_instances(&self, filter: Option<&str>) -> Result<Vec<Instance>>;
    async fn list_disks(&self) -> Result<Vec<Disk>>;
    async fn list_autoscalers(&self) -> Result<Vec<Autoscaler>>;
    async fn list_machine_types(&self) -> Result<Vec<MachineType>>;
    async fn list_instance_group_managers(&self) -> Result<Vec<InstanceGroupManager>>;
    /// Images owned by `project_id`
    async fn list_images(&self, project_id: &str) -> Result<Vec<Image>>;
    async fn list_networks(&self) -> Result<Vec<Network>>;
    async fn list_subnetworks(&self) -> Result<Vec<Subnetwork>>;
    async fn list_firewalls(&self) -> Result<Vec<Firewall>>;
    /// Regional and global forwarding rules
    async fn list_forwarding_rules(&self) -> Result<Vec<ForwardingRule>>;
    async fn list_target_pools(&self) -> Result<Vec<TargetPool>>;
    /// HTTP and HTTPS target proxies
    async fn list_target_proxies(&self) -> Result<Vec<TargetProxy>>;
    async fn list_url_maps(&self) -> Result<Vec<UrlMap>>;
    async fn list_backend_services(&self) -> Result<Vec<BackendService>>;
    /// Members of the instance group behind a managed group
    async fn list_group_members(&self, group: &GroupLink) -> Result<Vec<GroupMember>>;
}

impl GcpClient {
    async fn list_aggregated<T>(&self, resource: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let url = self.compute_aggregated_url(resource);
        fetch_resources(self, ListMethod::Get, &url, &[])
            .await
            .with_context(|| format!("Failed to list {}", resource))
    }

    async fn list_global<T>(&self, resource: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        let url = self.compute_global_url(resource);
        fetch_resources(self, ListMethod::Get, &url, &[])
            .await
            .with_context(|| format!("Failed to list {}", resource))
    }
}

#[async_trait]
impl ComputeApi for GcpClient {
    fn project_id(&self) -> &str {
        &self.project_id
    }

    async fn list_instances(&self, filter: Option<&str>) -> Result<Vec<Instance>> {
        let url = self.compute_aggregated_url("instances");
        let query: Vec<(&str, &str)> = filter.map(|f| ("filter", f)).into_iter().collect();
        fetch_resources(self, ListMethod::Get, &url, &query)
            .await
            .context("Failed to list instances")
    }

    async fn list_disks(&self) -> Result<Vec<Disk>> {
        self.list_aggregated("disks").await
    }

    async fn list_autoscalers(&self) -> Result<Vec<Autoscaler>> {
        self.list_aggregated("autoscalers").await
    }

    async fn list_machine_types(&self) -> Result<Vec<MachineType>> {
        self.list_aggregated("machineTypes").await
    }

    async fn list_instance_group_managers(&self) -> Result<Vec<InstanceGroupManager>> {
        self.list_aggregated("instanceGroupManagers").await
    }

    async fn list_images(&self, project_id: &str) -> Result<Vec<Image>> {
        let url = self.compute_project_url(project_id, "global/images");
        fetch_resources(self, ListMethod::Get, &url, &[])
            .await
            .with_context(|| format!("Failed to list images of {}", project_id))
    }

    async fn list_networks(&self) -> Result<Vec<Network>> {
        self.list_global("networks").await
    }

    async fn list_subnetworks(&self) -> Result<Vec<Subnetwork>> {
        self.list_aggregated("subnetworks").await
    }

    async fn list_firewalls(&self) -> Result<Vec<Firewall>> {
        self.list_global("firewalls").await
    }

    async fn list_forwarding_rules(&self) -> Result<Vec<ForwardingRule>> {
        let (mut regional, global) = tokio::try_join!(
            self.list_aggregated::<ForwardingRule>("forwardingRules"),
            self.list_global::<ForwardingRule>("forwardingRules"),
        )?;
        regional.extend(global);
        Ok(regional)
    }

    async fn list_target_pools(&self) -> Result<Vec<TargetPool>> {
        self.list_aggregated("targetPools").await
    }

    async fn list_target_proxies(&self) -> Result<Vec<TargetProxy>> {
        let (mut http, https) = tokio::try_join!(
            self.list_aggregated::<TargetProxy>("targetHttpProxies"),
            self.list_aggregated::<TargetProxy>("targetHttpsProxies"),
        )?;
        http.extend(https);
        Ok(http)
    }

    async fn list_url_maps(&self) -> Result<Vec<UrlMap>> {
        self.list_aggregated("urlMaps").await
    }

    async fn list_backend_services(&self) -> Result<Vec<BackendService>> {
        self.list_aggregated("backendServices").await
    }

    async fn list_group_members(&self, group: &GroupLink) -> Result<Vec<GroupMember>> {
        let path = match &group.scope {
            Scope::Zone(zone) => format!("zones/{}/instanceGroups/{}/listInstances", zone, group.name),
            Scope::Region(region) => {
                format!("regions/{}/instanceGroups/{}/listInstances", region, group.name)
            },
        };
        let url = self.compute_project_url(&group.project, &path);
        fetch_resources(self, ListMethod::Post, &url, &[])
            .await
            .with_context(|| format!("Failed to list members of instance group {}", group.name))
    }
}
