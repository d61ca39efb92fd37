//! Base instance attributes: OS, hardware, compute and provider details

use crate::collector::record::{
    Compute, GoogleCloud, Hardware, Os, SchedulingInfo, SshKeys,
};
use crate::collector::resources::GlobalResources;
use crate::collector::zone::ZoneInfo;
use crate::resource::model::{Image, Instance, MachineType};
use crate::resource::selflink::{links_match, short_name};
use chrono::{DateTime, SecondsFormat, Utc};

/// The parts of a Server record that come from the instance itself
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseInfo {
    pub os: Os,
    pub hardware: Hardware,
    pub compute: Compute,
    pub google_cloud: GoogleCloud,
}

pub fn base_info(instance: &Instance, zone: &ZoneInfo, resources: &GlobalResources) -> BaseInfo {
    let machine_type = short_name(instance.machine_type.as_deref().unwrap_or_default());
    let image = boot_image(instance, resources);
    let self_link = instance.self_link.clone().unwrap_or_default();

    BaseInfo {
        os: os_info(instance, image),
        hardware: hardware_info(machine_type, &zone.zone, &resources.machine_types),
        compute: Compute {
            keypair: ssh_key_users(instance.metadata_value("ssh-keys")).join(","),
            az: zone.zone.clone(),
            region: zone.region.clone(),
            instance_state: instance.status.clone().unwrap_or_default(),
            instance_type: machine_type.to_string(),
            launched_at: instance
                .creation_timestamp
                .as_deref()
                .map(normalize_timestamp)
                .unwrap_or_default(),
            instance_id: instance.id.clone().unwrap_or_default(),
            instance_name: instance.name.clone().unwrap_or_default(),
            security_groups: Vec::new(),
            image: image_name(instance, resources, image),
            account: zone.project_id.clone(),
        },
        google_cloud: GoogleCloud {
            is_managed_instance: resources.membership.contains(&self_link),
            self_link,
            fingerprint: instance.fingerprint.clone().unwrap_or_default(),
            cpu_platform: instance.cpu_platform.clone().unwrap_or_default(),
            deletion_protection: instance.deletion_protection.unwrap_or(false),
            can_ip_forward: instance.can_ip_forward.unwrap_or(false),
            scheduling: instance
                .scheduling
                .as_ref()
                .map(|s| SchedulingInfo {
                    on_host_maintenance: s.on_host_maintenance.clone().unwrap_or_default(),
                    automatic_restart: s.automatic_restart.unwrap_or(false),
                    preemptible: s.preemptible.unwrap_or(false),
                })
                .unwrap_or_default(),
            tags: instance.network_tags().to_vec(),
            labels: super::labels(&instance.labels),
            ssh_keys: ssh_keys(instance),
            service_accounts: instance
                .service_accounts
                .iter()
                .map(|sa| sa.email.clone())
                .collect(),
        },
    }
}

/// Core count and memory (GiB) of a machine type.
///
/// The catalog entry for the instance's zone wins; custom shapes such as
/// `n2-custom-4-16384` are decoded from the name when no entry exists.
pub fn hardware_info(machine_type: &str, zone: &str, catalog: &[MachineType]) -> Hardware {
    let entry = catalog
        .iter()
        .filter(|mt| mt.name.as_deref() == Some(machine_type))
        .find(|mt| short_name(mt.zone.as_deref().unwrap_or_default()) == zone);

    if let Some(mt) = entry {
        return Hardware {
            core: mt.guest_cpus.unwrap_or(0),
            memory: mib_to_gib(mt.memory_mb.unwrap_or(0)),
        };
    }

    parse_custom_machine_type(machine_type)
        .map(|(core, mib)| Hardware {
            core,
            memory: mib_to_gib(mib),
        })
        .unwrap_or_default()
}

/// `custom-<cpus>-<mib>` with an optional family prefix and `-ext` suffix
pub fn parse_custom_machine_type(machine_type: &str) -> Option<(u32, u64)> {
    let parts: Vec<&str> = machine_type.split('-').collect();
    let idx = parts.iter().position(|p| *p == "custom")?;
    let cpus = parts.get(idx + 1)?.parse().ok()?;
    let mib = parts.get(idx + 2)?.parse().ok()?;
    Some((cpus, mib))
}

fn mib_to_gib(mib: u64) -> f64 {
    (mib as f64 / 1024.0 * 100.0).round() / 100.0
}

/// RFC 3339 in UTC; unparseable input is kept as-is
pub fn normalize_timestamp(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Source image of the boot disk, if it is one of the fetched images
fn boot_image<'a>(instance: &Instance, resources: &'a GlobalResources) -> Option<&'a Image> {
    let source_image = boot_source_image(instance, resources)?;
    resources
        .images
        .iter()
        .find(|img| links_match(img.self_link.as_deref(), Some(source_image)))
}

fn boot_source_image<'a>(instance: &Instance, resources: &'a GlobalResources) -> Option<&'a str> {
    let boot = instance.boot_disk()?;
    resources
        .disks
        .iter()
        .find(|d| links_match(d.self_link.as_deref(), boot.source.as_deref()))
        .and_then(|d| d.source_image.as_deref())
}

fn image_name(instance: &Instance, resources: &GlobalResources, image: Option<&Image>) -> String {
    image
        .and_then(|img| img.name.clone())
        .or_else(|| boot_source_image(instance, resources).map(|s| short_name(s).to_string()))
        .unwrap_or_default()
}

fn os_info(instance: &Instance, image: Option<&Image>) -> Os {
    let boot_licenses = instance
        .boot_disk()
        .map(|d| d.licenses.as_slice())
        .unwrap_or(&[]);
    let image_licenses = image.map(|img| img.licenses.as_slice()).unwrap_or(&[]);

    let is_windows = boot_licenses
        .iter()
        .chain(image_licenses)
        .any(|l| short_name(l).to_lowercase().contains("windows"));

    let distro = image
        .and_then(|img| img.family.clone().or_else(|| img.name.clone()))
        .or_else(|| boot_licenses.first().map(|l| short_name(l).to_string()))
        .unwrap_or_default();

    Os {
        os_distro: distro,
        os_arch: image
            .and_then(|img| img.architecture.as_deref())
            .map(|a| a.to_lowercase())
            .unwrap_or_else(|| "x86_64".to_string()),
        os_type: if is_windows { "WINDOWS" } else { "LINUX" }.to_string(),
        details: image
            .and_then(|img| img.description.clone())
            .unwrap_or_default(),
    }
}

fn ssh_keys(instance: &Instance) -> SshKeys {
    let blocked = instance
        .metadata_value("block-project-ssh-keys")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    SshKeys {
        has_instance_ssh_keys: instance
            .metadata_value("ssh-keys")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false),
        block_project_ssh_keys: if blocked { "ON" } else { "OFF" },
    }
}

/// Users named in an `ssh-keys` metadata value (`user:key` per line)
fn ssh_key_users(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(user, _)| user.trim().to_string())
        .filter(|user| !user.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;

    #[test]
    fn test_base_info_from_fixture() {
        let resources = global_resources();
        let vm = instance();
        let zone = ZoneInfo::new(vm.zone.as_deref().unwrap(), PROJECT);

        let base = base_info(&vm, &zone, &resources);

        assert_eq!(base.hardware, Hardware { core: 2, memory: 7.5 });
        assert_eq!(base.os.os_distro, "debian-12");
        assert_eq!(base.os.os_arch, "x86_64");
        assert_eq!(base.os.os_type, "LINUX");
        assert_eq!(base.compute.instance_type, "n1-standard-2");
        assert_eq!(base.compute.image, "debian-12-bookworm-v20240312");
        assert_eq!(base.compute.launched_at, "2024-03-01T18:20:30Z");
        assert_eq!(base.compute.account, "my-project");
        assert_eq!(base.compute.keypair, "alice,bob");
        assert_eq!(base.google_cloud.tags, vec!["http-server"]);
        assert!(base.google_cloud.ssh_keys.has_instance_ssh_keys);
        assert_eq!(base.google_cloud.ssh_keys.block_project_ssh_keys, "ON");
        assert!(base.google_cloud.is_managed_instance);
        assert!(base.google_cloud.scheduling.automatic_restart);
    }

    #[test]
    fn test_custom_machine_type_fallback() {
        assert_eq!(parse_custom_machine_type("custom-4-16384"), Some((4, 16384)));
        assert_eq!(parse_custom_machine_type("n2-custom-8-32768-ext"), Some((8, 32768)));
        assert_eq!(parse_custom_machine_type("n1-standard-2"), None);

        let hw = hardware_info("e2-custom-6-12800", "us-central1-a", &[]);
        assert_eq!(hw, Hardware { core: 6, memory: 12.5 });
        assert_eq!(hardware_info("unknown", "us-central1-a", &[]), Hardware::default());
    }

    #[test]
    fn test_windows_detected_from_licenses() {
        let resources = GlobalResources::default();
        let mut vm = instance();
        vm.disks[0].licenses =
            vec!["https://www.googleapis.com/compute/v1/projects/windows-cloud/global/licenses/windows-server-2022-dc".into()];
        let zone = ZoneInfo::new("us-central1-a", PROJECT);

        let base = base_info(&vm, &zone, &resources);
        assert_eq!(base.os.os_type, "WINDOWS");
        assert_eq!(base.os.os_distro, "windows-server-2022-dc");
        assert!(!base.google_cloud.is_managed_instance);
    }

    #[test]
    fn test_unparseable_timestamp_is_kept() {
        assert_eq!(normalize_timestamp("yesterday"), "yesterday");
    }
}
