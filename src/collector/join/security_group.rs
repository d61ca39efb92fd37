//! Firewall rules that apply to the instance

use crate::collector::record::SecurityGroupRule;
use crate::collector::resources::GlobalResources;
use crate::resource::model::{Firewall, FirewallEntry, Instance};
use crate::resource::selflink::links_match;

const ANY_CIDR: &str = "0.0.0.0/0";
const DEFAULT_PRIORITY: u32 = 1000;

/// Rules of every enabled firewall on the instance's networks that targets it
pub fn firewall_rules(instance: &Instance, resources: &GlobalResources) -> Vec<SecurityGroupRule> {
    resources
        .firewalls
        .iter()
        .filter(|fw| applies_to(fw, instance))
        .flat_map(expand)
        .collect()
}

/// Distinct firewall names, in rule order
pub fn group_names(rules: &[SecurityGroupRule]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for rule in rules {
        if !rule.security_group_name.is_empty() && !names.contains(&rule.security_group_name) {
            names.push(rule.security_group_name.clone());
        }
    }
    names
}

fn applies_to(firewall: &Firewall, instance: &Instance) -> bool {
    if firewall.disabled.unwrap_or(false) {
        return false;
    }

    let on_network = instance
        .network_interfaces
        .iter()
        .any(|iface| links_match(iface.network.as_deref(), firewall.network.as_deref()));
    if !on_network {
        return false;
    }

    if firewall.target_tags.is_empty() && firewall.target_service_accounts.is_empty() {
        return true;
    }

    let tags = instance.network_tags();
    let by_tag = firewall.target_tags.iter().any(|t| tags.contains(t));
    let by_account = firewall
        .target_service_accounts
        .iter()
        .any(|sa| instance.service_accounts.iter().any(|s| s.email == *sa));
    by_tag || by_account
}

/// One rule per protocol entry x port range x remote
fn expand(firewall: &Firewall) -> Vec<SecurityGroupRule> {
    let ingress = firewall.direction.as_deref() != Some("EGRESS");
    let remotes = remotes(firewall, ingress);

    let entries = firewall
        .allowed
        .iter()
        .map(|e| (e, "allow"))
        .chain(firewall.denied.iter().map(|e| (e, "deny")));

    let mut rules = Vec::new();
    for (entry, action) in entries {
        for (port, (min, max)) in port_ranges(entry) {
            for (remote, remote_cidr) in &remotes {
                rules.push(SecurityGroupRule {
                    priority: firewall.priority.unwrap_or(DEFAULT_PRIORITY),
                    action,
                    direction: if ingress { "inbound" } else { "outbound" },
                    protocol: entry.ip_protocol.to_uppercase(),
                    port_range_min: min,
                    port_range_max: max,
                    port: port.clone(),
                    remote: remote.clone(),
                    remote_cidr: remote_cidr.clone(),
                    security_group_name: firewall.name.clone().unwrap_or_default(),
                    security_group_id: firewall.id.clone().unwrap_or_default(),
                    description: firewall.description.clone().unwrap_or_default(),
                });
            }
        }
    }
    rules
}

/// (remote, remote_cidr) pairs; source tags and service accounts have no CIDR
fn remotes(firewall: &Firewall, ingress: bool) -> Vec<(String, String)> {
    let ranges = if ingress {
        &firewall.source_ranges
    } else {
        &firewall.destination_ranges
    };

    let mut remotes: Vec<(String, String)> = ranges.iter().map(|r| (r.clone(), r.clone())).collect();
    if ingress {
        remotes.extend(firewall.source_tags.iter().map(|t| (t.clone(), String::new())));
        remotes.extend(
            firewall
                .source_service_accounts
                .iter()
                .map(|sa| (sa.clone(), String::new())),
        );
    }
    if remotes.is_empty() {
        remotes.push((ANY_CIDR.to_string(), ANY_CIDR.to_string()));
    }
    remotes
}

/// Port strings with their numeric bounds; no ports means all ports
fn port_ranges(entry: &FirewallEntry) -> Vec<(String, (u16, u16))> {
    if entry.ports.is_empty() {
        return vec![("ALL".to_string(), (0, u16::MAX))];
    }
    entry
        .ports
        .iter()
        .filter_map(|p| parse_port_range(p).map(|range| (p.clone(), range)))
        .collect()
}

/// `"80"` or `"8000-9000"`
pub fn parse_port_range(port: &str) -> Option<(u16, u16)> {
    match port.split_once('-') {
        Some((min, max)) => {
            let min = min.trim().parse().ok()?;
            let max = max.trim().parse().ok()?;
            (min <= max).then_some((min, max))
        },
        None => {
            let port = port.trim().parse().ok()?;
            Some((port, port))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_applicable_firewalls_only() {
        let rules = firewall_rules(&instance(), &global_resources());

        assert_eq!(group_names(&rules), vec!["allow-http", "allow-ssh"]);
        assert_eq!(rules.len(), 3);

        assert_eq!(rules[0].port, "80");
        assert_eq!((rules[0].port_range_min, rules[0].port_range_max), (80, 80));
        assert_eq!(rules[0].protocol, "TCP");
        assert_eq!(rules[0].direction, "inbound");
        assert_eq!(rules[0].action, "allow");
        assert_eq!(rules[0].remote_cidr, "0.0.0.0/0");
        assert_eq!(rules[1].port, "443");
        assert_eq!(rules[2].remote_cidr, "35.235.240.0/20");
        assert_eq!(rules[2].priority, 65534);
    }

    #[test]
    fn test_target_service_account_match() {
        let mut resources = global_resources();
        resources.firewalls = vec![serde_json::from_value(json!({
            "name": "sa-only",
            "network": NETWORK_LINK,
            "direction": "EGRESS",
            "destinationRanges": ["10.0.0.0/8"],
            "targetServiceAccounts": ["123-compute@developer.gserviceaccount.com"],
            "denied": [{"IPProtocol": "udp", "ports": ["1000-2000", "bogus"]}]
        }))
        .unwrap()];

        let rules = firewall_rules(&instance(), &resources);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].action, "deny");
        assert_eq!(rules[0].direction, "outbound");
        assert_eq!((rules[0].port_range_min, rules[0].port_range_max), (1000, 2000));
        assert_eq!(rules[0].remote, "10.0.0.0/8");
        assert_eq!(rules[0].priority, 1000);
    }

    #[test]
    fn test_source_tags_and_all_ports() {
        let mut resources = global_resources();
        resources.firewalls = vec![serde_json::from_value(json!({
            "name": "from-web",
            "network": NETWORK_LINK,
            "sourceTags": ["web"],
            "allowed": [{"IPProtocol": "icmp"}]
        }))
        .unwrap()];

        let rules = firewall_rules(&instance(), &resources);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].port, "ALL");
        assert_eq!((rules[0].port_range_min, rules[0].port_range_max), (0, 65535));
        assert_eq!(rules[0].remote, "web");
        assert_eq!(rules[0].remote_cidr, "");
    }

    #[test]
    fn test_source_service_account_is_not_open_to_all() {
        let mut resources = global_resources();
        resources.firewalls = vec![serde_json::from_value(json!({
            "name": "from-batch",
            "network": NETWORK_LINK,
            "sourceRanges": ["10.8.0.0/16"],
            "sourceServiceAccounts": ["batch@my-project.iam.gserviceaccount.com"],
            "allowed": [{"IPProtocol": "tcp", "ports": ["5432"]}]
        }))
        .unwrap()];

        let rules = firewall_rules(&instance(), &resources);
        let remotes: Vec<(&str, &str)> = rules
            .iter()
            .map(|r| (r.remote.as_str(), r.remote_cidr.as_str()))
            .collect();
        assert_eq!(
            remotes,
            vec![
                ("10.8.0.0/16", "10.8.0.0/16"),
                ("batch@my-project.iam.gserviceaccount.com", ""),
            ]
        );
        assert!(rules.iter().all(|r| r.remote_cidr != "0.0.0.0/0"));
        assert!(rules.iter().all(|r| r.port == "5432"));
    }

    #[test]
    fn test_service_account_only_source() {
        let mut resources = global_resources();
        resources.firewalls = vec![serde_json::from_value(json!({
            "name": "from-batch",
            "network": NETWORK_LINK,
            "sourceServiceAccounts": ["batch@my-project.iam.gserviceaccount.com"],
            "allowed": [{"IPProtocol": "tcp", "ports": ["5432"]}]
        }))
        .unwrap()];

        let rules = firewall_rules(&instance(), &resources);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].remote, "batch@my-project.iam.gserviceaccount.com");
        assert_eq!(rules[0].remote_cidr, "");
    }

    #[test]
    fn test_parse_port_range() {
        assert_eq!(parse_port_range("22"), Some((22, 22)));
        assert_eq!(parse_port_range("8000-9000"), Some((8000, 9000)));
        assert_eq!(parse_port_range("9000-8000"), None);
        assert_eq!(parse_port_range("http"), None);
        assert_eq!(parse_port_range("70000"), None);
    }
}
