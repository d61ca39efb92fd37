//! Load balancers that can reach the instance
//!
//! Two paths lead from an instance to a forwarding rule:
//! instance group -> backend service -> (URL map -> target proxy ->) forwarding rule,
//! and target pool -> forwarding rule.

use crate::collector::record::{LoadBalancer, LoadBalancerTags};
use crate::collector::resources::GlobalResources;
use crate::resource::model::{BackendService, ForwardingRule, InstanceGroupManager};
use crate::resource::selflink::{links_match, same_resource, short_name};
use std::collections::HashSet;

#[derive(PartialEq, Eq, Hash)]
enum RuleKey<'a> {
    Link(&'a str),
    Unnamed(*const ForwardingRule),
}

/// Every forwarding rule reaching the instance, each listed once
pub fn load_balancers(
    instance_link: &str,
    groups: &[&InstanceGroupManager],
    resources: &GlobalResources,
) -> Vec<LoadBalancer> {
    let mut found: Vec<(&ForwardingRule, Option<&BackendService>, &'static str)> = Vec::new();

    let group_urls: Vec<&str> = groups
        .iter()
        .filter_map(|igm| igm.instance_group.as_deref())
        .collect();

    for service in resources.backend_services.iter().filter(|bs| {
        bs.backends.iter().any(|b| {
            let group = b.group.as_deref().unwrap_or_default();
            group_urls.iter().any(|url| same_resource(group, url))
        })
    }) {
        let service_link = service.self_link.as_deref();

        for rule in &resources.forwarding_rules {
            if links_match(rule.backend_service.as_deref(), service_link) {
                found.push((rule, Some(service), "network"));
            }
        }

        let proxies = resources
            .url_maps
            .iter()
            .filter(|map| map.services().any(|s| links_match(Some(s), service_link)))
            .flat_map(|map| {
                resources
                    .target_proxies
                    .iter()
                    .filter(move |p| links_match(p.url_map.as_deref(), map.self_link.as_deref()))
            });
        for proxy in proxies {
            for rule in &resources.forwarding_rules {
                if links_match(rule.target.as_deref(), proxy.self_link.as_deref()) {
                    found.push((rule, Some(service), "application"));
                }
            }
        }
    }

    for pool in resources
        .target_pools
        .iter()
        .filter(|tp| tp.instances.iter().any(|i| same_resource(i, instance_link)))
    {
        for rule in &resources.forwarding_rules {
            if links_match(rule.target.as_deref(), pool.self_link.as_deref()) {
                found.push((rule, None, "network"));
            }
        }
    }

    let mut seen = HashSet::new();
    found
        .into_iter()
        .filter(|(rule, _, _)| {
            let key = match rule.self_link.as_deref().or(rule.name.as_deref()) {
                Some(link) => RuleKey::Link(link),
                // Rules without a link or name are told apart by identity
                None => RuleKey::Unnamed(*rule as *const ForwardingRule),
            };
            seen.insert(key)
        })
        .map(|(rule, service, lb_type)| to_record(rule, service, lb_type))
        .collect()
}

fn to_record(
    rule: &ForwardingRule,
    service: Option<&BackendService>,
    lb_type: &'static str,
) -> LoadBalancer {
    let port = if rule.ports.is_empty() {
        rule.port_range.iter().cloned().collect()
    } else {
        rule.ports.clone()
    };

    LoadBalancer {
        lb_type,
        name: rule.name.clone().unwrap_or_default(),
        endpoint: rule.ip_address.clone().unwrap_or_default(),
        port,
        protocol: service
            .and_then(|s| s.protocol.clone())
            .or_else(|| rule.ip_protocol.clone())
            .into_iter()
            .collect(),
        scheme: rule.load_balancing_scheme.clone().unwrap_or_default(),
        tags: LoadBalancerTags {
            forwarding_rule: rule.name.clone().unwrap_or_default(),
            forwarding_rule_self_link: rule.self_link.clone().unwrap_or_default(),
            backend_service: service
                .and_then(|s| s.self_link.as_deref())
                .map(|l| short_name(l).to_string())
                .unwrap_or_default(),
        },
    }
}
