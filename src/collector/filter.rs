//! Request filters
//!
//! `instance_id` and `region_name` narrow the batch on our side. Keys naming
//! an Instance field are handed to the instance list call as a Compute
//! Engine filter expression. Anything else (`project_id`, `server_id`, ...)
//! is dropped, since the API rejects filters on unknown fields.

use super::zone::region_of_zone;
use crate::resource::model::Instance;
use crate::resource::selflink::short_name;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level Instance fields the instance list filter accepts
const INSTANCE_FIELDS: &[&str] = &[
    "canIpForward",
    "cpuPlatform",
    "creationTimestamp",
    "deletionProtection",
    "description",
    "disks",
    "guestAccelerators",
    "hostname",
    "id",
    "labels",
    "lastStartTimestamp",
    "lastStopTimestamp",
    "machineType",
    "metadata",
    "minCpuPlatform",
    "name",
    "networkInterfaces",
    "scheduling",
    "selfLink",
    "serviceAccounts",
    "shieldedInstanceConfig",
    "status",
    "statusMessage",
    "tags",
    "zone",
];

/// True when `key` (or its first dotted segment) is an Instance field
pub fn is_instance_field(key: &str) -> bool {
    let root = key.split('.').next().unwrap_or_default();
    INSTANCE_FIELDS.contains(&root)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceQuery {
    /// Instance ids or names to keep
    pub instance_ids: Vec<String>,
    /// Region codes to keep
    pub region_names: Vec<String>,
    /// Provider-side filters as (field, accepted values)
    pub passthrough: Vec<(String, Vec<String>)>,
}

impl InstanceQuery {
    pub fn from_filter(filter: &Map<String, Value>) -> Self {
        let mut query = Self::default();

        for (key, value) in filter {
            match (key.as_str(), value) {
                (_, Value::Null) => {},
                ("instance_id", Value::Array(ids)) => {
                    query.instance_ids = ids.iter().map(value_text).collect();
                },
                ("instance_id", id) => query.instance_ids = vec![value_text(id)],
                ("region_name", Value::Array(regions)) => {
                    query.region_names.extend(regions.iter().map(value_text));
                },
                ("region_name", region) => query.region_names.push(value_text(region)),
                (_, _) if !is_instance_field(key) => {
                    debug!("Ignoring filter key {} (not an instance field)", key);
                },
                (_, Value::Array(values)) => {
                    if !values.is_empty() {
                        query
                            .passthrough
                            .push((key.clone(), values.iter().map(value_text).collect()));
                    }
                },
                (_, other) => query.passthrough.push((key.clone(), vec![value_text(other)])),
            }
        }

        query
    }

    pub fn is_empty(&self) -> bool {
        self.instance_ids.is_empty() && self.region_names.is_empty() && self.passthrough.is_empty()
    }

    /// Filter expression for the instance list call.
    ///
    /// Values of one key are OR-ed, keys are AND-ed:
    /// `((status = "RUNNING") OR (status = "STOPPING")) AND (cpuPlatform = "x")`
    pub fn provider_filter(&self) -> Option<String> {
        if self.passthrough.is_empty() {
            return None;
        }

        let clauses: Vec<String> = self
            .passthrough
            .iter()
            .map(|(key, values)| {
                let terms: Vec<String> = values
                    .iter()
                    .map(|v| format!("({} = \"{}\")", key, v.replace('\\', "\\\\").replace('"', "\\\"")))
                    .collect();
                if terms.len() == 1 {
                    terms.concat()
                } else {
                    format!("({})", terms.join(" OR "))
                }
            })
            .collect();

        Some(clauses.join(" AND "))
    }

    /// True when the instance passes the id and region filters
    pub fn matches(&self, instance: &Instance) -> bool {
        let id_ok = self.instance_ids.is_empty()
            || self.instance_ids.iter().any(|wanted| {
                instance.id.as_deref() == Some(wanted.as_str())
                    || instance.name.as_deref() == Some(wanted.as_str())
            });

        let region_ok = self.region_names.is_empty() || {
            let zone = short_name(instance.zone.as_deref().unwrap_or_default());
            let region = region_of_zone(zone);
            self.region_names.iter().any(|r| *r == region)
        };

        id_ok && region_ok
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
