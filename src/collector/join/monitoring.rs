//! Cloud Monitoring reference of an instance

use crate::collector::record::{MonitoringFilter, StackDriver};

pub fn stackdriver_info(instance_name: &str, instance_id: &str, project_id: &str) -> StackDriver {
    StackDriver {
        monitoring_type: "gce_instance",
        identifier: "instance_name",
        filters: vec![
            MonitoringFilter {
                key: "metric.labels.instance_name",
                value: instance_name.to_string(),
            },
            MonitoringFilter {
                key: "resource.labels.instance_id",
                value: instance_id.to_string(),
            },
            MonitoringFilter {
                key: "resource.labels.project_id",
                value: project_id.to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_by_instance_name() {
        let info = stackdriver_info("web-1", "1001", "my-project");
        assert_eq!(info.monitoring_type, "gce_instance");
        assert_eq!(info.filters[0].value, "web-1");
        assert_eq!(info.filters[2].value, "my-project");
    }
}
