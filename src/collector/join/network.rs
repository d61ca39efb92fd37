//! VPC, subnet and NICs of an instance

use crate::collector::record::{Nic, Subnet, Vpc};
use crate::collector::resources::GlobalResources;
use crate::resource::model::{Instance, NetworkInterface, Subnetwork};
use crate::resource::selflink::{links_match, short_name};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkInfo {
    pub vpc: Option<Vpc>,
    pub subnet: Option<Subnet>,
    pub nics: Vec<Nic>,
}

/// VPC and subnet of the first interface, plus one NIC per interface whose
/// subnet is known. Interfaces with an unknown subnet are left out.
pub fn network_info(instance: &Instance, resources: &GlobalResources) -> NetworkInfo {
    let first = instance.network_interfaces.first();

    let vpc = first
        .and_then(|iface| {
            resources
                .networks
                .iter()
                .find(|n| links_match(n.self_link.as_deref(), iface.network.as_deref()))
        })
        .map(|n| Vpc {
            vpc_id: n.id.clone().unwrap_or_default(),
            vpc_name: n.name.clone().unwrap_or_default(),
            description: n.description.clone().unwrap_or_default(),
            self_link: n.self_link.clone().unwrap_or_default(),
        });

    let subnet = first
        .and_then(|iface| find_subnet(iface, resources))
        .map(to_subnet);

    let mut nics = Vec::new();
    for (index, iface) in instance.network_interfaces.iter().enumerate() {
        match find_subnet(iface, resources) {
            Some(subnetwork) => nics.push(to_nic(index, iface, subnetwork)),
            None => warn!(
                instance = instance.name.as_deref().unwrap_or_default(),
                interface = iface.name.as_deref().unwrap_or_default(),
                "Subnet not found, NIC omitted"
            ),
        }
    }

    NetworkInfo { vpc, subnet, nics }
}

fn find_subnet<'a>(iface: &NetworkInterface, resources: &'a GlobalResources) -> Option<&'a Subnetwork> {
    resources
        .subnetworks
        .iter()
        .find(|s| links_match(s.self_link.as_deref(), iface.subnetwork.as_deref()))
}

fn to_subnet(subnetwork: &Subnetwork) -> Subnet {
    Subnet {
        subnet_id: subnetwork.id.clone().unwrap_or_default(),
        subnet_name: subnetwork.name.clone().unwrap_or_default(),
        self_link: subnetwork.self_link.clone().unwrap_or_default(),
        gateway_address: subnetwork.gateway_address.clone().unwrap_or_default(),
        cidr: subnetwork.ip_cidr_range.clone().unwrap_or_default(),
        region: short_name(subnetwork.region.as_deref().unwrap_or_default()).to_string(),
    }
}

fn to_nic(index: usize, iface: &NetworkInterface, subnetwork: &Subnetwork) -> Nic {
    let access = iface.access_configs.first();
    Nic {
        device_index: index as u32,
        device: iface.name.clone().unwrap_or_default(),
        nic_type: iface
            .nic_type
            .clone()
            .unwrap_or_else(|| "VIRTIO_NET".to_string()),
        ip_addresses: iface.network_ip.iter().cloned().collect(),
        cidr: subnetwork.ip_cidr_range.clone().unwrap_or_default(),
        public_ip_address: access.and_then(|a| a.nat_ip.clone()).unwrap_or_default(),
        network_tier: access
            .and_then(|a| a.network_tier.clone())
            .unwrap_or_default(),
        subnet_name: subnetwork.name.clone().unwrap_or_default(),
    }
}
