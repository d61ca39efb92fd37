//! Attached disks, enriched from the disk list

use crate::collector::record::{DiskInfo, DiskTags};
use crate::collector::resources::GlobalResources;
use crate::resource::model::{AttachedDisk, Disk, Instance};
use crate::resource::selflink::{links_match, short_name};

/// One entry per attached disk, in the instance's order
pub fn disk_info(instance: &Instance, resources: &GlobalResources) -> Vec<DiskInfo> {
    instance
        .disks
        .iter()
        .enumerate()
        .map(|(position, attached)| {
            let disk = resources
                .disks
                .iter()
                .find(|d| links_match(d.self_link.as_deref(), attached.source.as_deref()));
            to_record(position, attached, disk)
        })
        .collect()
}

fn to_record(position: usize, attached: &AttachedDisk, disk: Option<&Disk>) -> DiskInfo {
    let scratch = attached.disk_type.as_deref() == Some("SCRATCH");
    let size = disk
        .and_then(|d| d.size_gb.as_deref())
        .or(attached.disk_size_gb.as_deref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    DiskInfo {
        device_index: attached.index.unwrap_or(position as u32),
        device: attached.device_name.clone().unwrap_or_default(),
        disk_type: if scratch { "local_ssd" } else { "persistent_disk" },
        size,
        tags: DiskTags {
            disk_id: disk.and_then(|d| d.id.clone()).unwrap_or_default(),
            disk_name: disk
                .and_then(|d| d.name.clone())
                .or_else(|| attached.source.as_deref().map(|s| short_name(s).to_string()))
                .or_else(|| attached.device_name.clone())
                .unwrap_or_default(),
            disk_type: disk
                .and_then(|d| d.disk_type.as_deref())
                .map(|t| short_name(t).to_string())
                .unwrap_or_else(|| if scratch { "local-ssd" } else { "" }.to_string()),
            encryption: encryption(disk),
            iops: disk
                .and_then(|d| d.provisioned_iops.as_deref())
                .and_then(|v| v.parse().ok()),
            throughput: disk
                .and_then(|d| d.provisioned_throughput.as_deref())
                .and_then(|v| v.parse().ok()),
            auto_delete: attached.auto_delete.unwrap_or(false),
            boot: attached.boot.unwrap_or(false),
            mode: attached.mode.clone().unwrap_or_default(),
            interface: attached.interface.clone().unwrap_or_default(),
            source_image: disk
                .and_then(|d| d.source_image.as_deref())
                .map(|s| short_name(s).to_string())
                .unwrap_or_default(),
        },
    }
}

fn encryption(disk: Option<&Disk>) -> &'static str {
    match disk.and_then(|d| d.disk_encryption_key.as_ref()) {
        Some(key) if key.kms_key_name.is_some() => "customer_managed",
        Some(key) if key.sha256.is_some() => "customer_supplied",
        _ => "google_managed",
    }
}
