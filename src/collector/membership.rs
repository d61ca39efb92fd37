//! Instance-group membership
//!
//! Resolves which instances belong to stateless managed instance groups.
//! A group that cannot be listed is skipped so the rest still resolve.

use crate::resource::model::InstanceGroupManager;
use crate::resource::selflink::{parse_group_link, same_resource};
use crate::resource::ComputeApi;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// One instance of a managed group, remembering the owning manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Instance self-link
    pub instance: String,
    /// Self-link of the owning instance group manager
    pub group: String,
}

/// Flattened membership of every resolved group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupMembership {
    members: Vec<MemberRef>,
}

impl GroupMembership {
    pub fn new(members: Vec<MemberRef>) -> Self {
        Self { members }
    }

    pub fn members(&self) -> &[MemberRef] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when the instance is a member of any resolved group
    pub fn contains(&self, instance_link: &str) -> bool {
        self.members
            .iter()
            .any(|m| same_resource(&m.instance, instance_link))
    }

    /// Manager self-links of the groups the instance belongs to
    pub fn groups_of<'a>(&'a self, instance_link: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.members
            .iter()
            .filter(move |m| same_resource(&m.instance, instance_link))
            .map(|m| m.group.as_str())
    }
}

/// List the members of every stateless group, `concurrency` groups at a time.
///
/// Results keep the order of `managers`.
pub async fn resolve_membership(
    api: &dyn ComputeApi,
    managers: &[InstanceGroupManager],
    concurrency: usize,
) -> GroupMembership {
    let targets: Vec<_> = managers
        .iter()
        .filter(|m| m.is_stateless())
        .filter_map(|m| {
            let link = m.self_link.as_deref()?;
            match parse_group_link(link) {
                Ok(group) => Some((link.to_string(), group)),
                Err(e) => {
                    warn!("Skipping instance group manager: {:#}", e);
                    None
                },
            }
        })
        .collect();

    debug!("Resolving members of {} stateless groups", targets.len());

    let per_group: Vec<Vec<MemberRef>> = stream::iter(targets)
        .map(|(link, group)| async move {
            match api.list_group_members(&group).await {
                Ok(members) => members
                    .into_iter()
                    .filter_map(|m| m.instance)
                    .map(|instance| MemberRef {
                        instance,
                        group: link.clone(),
                    })
                    .collect(),
                Err(e) => {
                    warn!(group = %group.name, "Skipping instance group: {:#}", e);
                    Vec::new()
                },
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    GroupMembership::new(per_group.into_iter().flatten().collect())
}
