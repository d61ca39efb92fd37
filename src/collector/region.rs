//! Region derivation and batch-wide dedup

use super::record::{RegionResource, PROVIDER};
use crate::resource::registry::get_region;
use std::collections::HashSet;

/// Region record for a code, or `None` when the code is not in the table
pub fn region_resource(region_code: &str) -> Option<RegionResource> {
    let def = get_region(region_code)?;
    Some(RegionResource {
        region_code: region_code.to_string(),
        name: def.name.clone(),
        provider: PROVIDER,
        tags: def.tags.clone(),
    })
}

/// Accumulates one region record per distinct code, first seen first
#[derive(Debug, Default)]
pub struct RegionCollector {
    seen: HashSet<String>,
    regions: Vec<RegionResource>,
}

impl RegionCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a region code; returns true when it staged a new record
    pub fn observe(&mut self, region_code: &str) -> bool {
        if !self.seen.insert(region_code.to_string()) {
            return false;
        }
        match region_resource(region_code) {
            Some(region) => {
                self.regions.push(region);
                true
            },
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn into_regions(self) -> Vec<RegionResource> {
        self.regions
    }
}
