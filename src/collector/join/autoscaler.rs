//! Autoscaler attached to the instance's managed group

use crate::collector::record::{AutoScaler, InstanceGroupRef};
use crate::collector::resources::GlobalResources;
use crate::resource::model::{Autoscaler, InstanceGroupManager};
use crate::resource::selflink::{links_match, short_name};

/// First autoscaler that scales one of the owning groups
pub fn autoscaler_info(
    groups: &[&InstanceGroupManager],
    resources: &GlobalResources,
) -> Option<AutoScaler> {
    groups.iter().find_map(|igm| {
        let autoscaler = resources
            .autoscalers
            .iter()
            .find(|a| scales(a, igm))?;
        Some(to_record(autoscaler, igm))
    })
}

fn scales(autoscaler: &Autoscaler, igm: &InstanceGroupManager) -> bool {
    let by_target = links_match(autoscaler.target.as_deref(), igm.self_link.as_deref());
    let by_status = links_match(
        igm.status.as_ref().and_then(|s| s.autoscaler.as_deref()),
        autoscaler.self_link.as_deref(),
    );
    by_target || by_status
}

fn to_record(autoscaler: &Autoscaler, igm: &InstanceGroupManager) -> AutoScaler {
    let policy = autoscaler.autoscaling_policy.as_ref();
    AutoScaler {
        name: autoscaler.name.clone().unwrap_or_default(),
        id: autoscaler.id.clone().unwrap_or_default(),
        self_link: autoscaler.self_link.clone().unwrap_or_default(),
        min_replicas: policy.and_then(|p| p.min_num_replicas),
        max_replicas: policy.and_then(|p| p.max_num_replicas),
        instance_group: InstanceGroupRef {
            name: igm.name.clone().unwrap_or_default(),
            self_link: igm.self_link.clone().unwrap_or_default(),
            instance_template_name: short_name(igm.instance_template.as_deref().unwrap_or_default())
                .to_string(),
        },
    }
}
