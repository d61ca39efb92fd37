//! Zone and region derivation for a single instance

use crate::resource::selflink::short_name;

/// Location of one instance, computed once per instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneInfo {
    pub zone: String,
    pub region: String,
    pub project_id: String,
}

impl ZoneInfo {
    /// Build from the instance's zone URL (or bare zone name)
    pub fn new(zone_link: &str, project_id: &str) -> Self {
        let zone = short_name(zone_link).to_string();
        let region = region_of_zone(&zone);
        Self {
            zone,
            region,
            project_id: project_id.to_string(),
        }
    }
}

/// Strip the two-character zone suffix: `us-east1-a` -> `us-east1`
pub fn region_of_zone(zone: &str) -> String {
    let keep = zone.chars().count().saturating_sub(2);
    zone.chars().take(keep).collect()
}
