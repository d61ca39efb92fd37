//! Property-based tests using proptest
//!
//! These check the pure helpers of the collector (zone parsing, region
//! dedup, port ranges, custom machine types and instance filters) over
//! randomized inputs, and the one-record-per-instance contract of a batch.

mod common;

use common::FakeApi;
use futures::StreamExt;
use gce_inventory::collector::join::compute::parse_custom_machine_type;
use gce_inventory::collector::join::security_group::parse_port_range;
use gce_inventory::collector::record::Record;
use gce_inventory::collector::region::RegionCollector;
use gce_inventory::collector::zone::region_of_zone;
use gce_inventory::collector::{CollectOptions, Collector, InstanceQuery};
use gce_inventory::resource::model::Instance;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn arb_region() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("us-central1".to_string()),
        Just("us-east1".to_string()),
        Just("europe-west1".to_string()),
        Just("asia-east1".to_string()),
        Just("australia-southeast1".to_string()),
    ]
}

fn arb_instance() -> impl Strategy<Value = (String, String, Instance)> {
    ("[0-9]{1,6}", "[a-z][a-z0-9-]{0,20}", arb_region(), "[a-f]").prop_map(
        |(id, name, region, suffix)| {
            let zone = format!("{}-{}", region, suffix);
            let instance: Instance = serde_json::from_value(json!({
                "id": id,
                "name": name,
                "zone": format!("https://www.googleapis.com/compute/v1/projects/p/zones/{}", zone),
            }))
            .unwrap();
            (id, region, instance)
        },
    )
}

proptest! {
    #[test]
    fn region_of_zone_strips_suffix(region in arb_region(), suffix in "[a-z]") {
        let zone = format!("{}-{}", region, suffix);
        prop_assert_eq!(region_of_zone(&zone), region);
    }

    #[test]
    fn region_of_zone_never_panics(zone in "\\PC{0,12}") {
        let region = region_of_zone(&zone);
        prop_assert!(region.chars().count() <= zone.chars().count());
    }

    #[test]
    fn region_collector_keeps_first_seen_order(codes in prop::collection::vec(arb_region(), 0..40)) {
        let mut collector = RegionCollector::new();
        for code in &codes {
            collector.observe(code);
        }

        let mut expected: Vec<String> = Vec::new();
        for code in codes {
            if !expected.contains(&code) {
                expected.push(code);
            }
        }

        let regions: Vec<String> = collector
            .into_regions()
            .into_iter()
            .map(|r| r.region_code)
            .collect();
        prop_assert_eq!(regions, expected);
    }

    #[test]
    fn single_port_parses(port in any::<u16>()) {
        prop_assert_eq!(parse_port_range(&port.to_string()), Some((port, port)));
    }

    #[test]
    fn port_range_parses_ordered(a in any::<u16>(), b in any::<u16>()) {
        let parsed = parse_port_range(&format!("{}-{}", a, b));
        if a <= b {
            prop_assert_eq!(parsed, Some((a, b)));
        } else {
            prop_assert_eq!(parsed, None);
        }
    }

    #[test]
    fn custom_machine_type_parses(cpus in 1u32..=96, mib in 1024u64..=624_640, ext in any::<bool>()) {
        let name = if ext {
            format!("n2-custom-{}-{}-ext", cpus, mib)
        } else {
            format!("custom-{}-{}", cpus, mib)
        };
        prop_assert_eq!(parse_custom_machine_type(&name), Some((cpus, mib)));
    }

    #[test]
    fn predefined_machine_types_are_not_custom(name in "(n1|n2|e2|c2)-(standard|highmem|highcpu)-[0-9]{1,2}") {
        prop_assert_eq!(parse_custom_machine_type(&name), None);
    }

    #[test]
    fn empty_query_matches_everything((_, _, instance) in arb_instance()) {
        prop_assert!(InstanceQuery::default().matches(&instance));
    }

    #[test]
    fn region_filter_matches_own_region((id, region, instance) in arb_instance()) {
        let own = InstanceQuery::from_filter(
            json!({"instance_id": [id], "region_name": [region]}).as_object().unwrap(),
        );
        prop_assert!(own.matches(&instance));

        let elsewhere = InstanceQuery::from_filter(
            json!({"region_name": ["mars-north1"]}).as_object().unwrap(),
        );
        prop_assert!(!elsewhere.matches(&instance));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_instance_yields_exactly_one_record(
        broken in prop::collection::vec(any::<bool>(), 0..24),
        concurrency in 1usize..8,
    ) {
        let mut api = FakeApi::with_network();
        api.instances = broken
            .iter()
            .enumerate()
            .map(|(i, &is_broken)| {
                let mut vm = common::instance(&i.to_string(), &format!("vm-{i}"), "us-east1-b");
                if is_broken {
                    vm.self_link = None;
                }
                vm
            })
            .collect();

        let options = CollectOptions {
            concurrency,
            image_projects: Vec::new(),
            ..Default::default()
        };
        let collector = Collector::new(Arc::new(api), options);
        let records: Vec<Record> = tokio_test::block_on(async {
            collector.collect(InstanceQuery::default()).collect().await
        });

        let per_instance: Vec<bool> = records
            .iter()
            .filter(|r| matches!(r, Record::Server(_) | Record::Error(_)))
            .map(Record::is_error)
            .collect();
        prop_assert_eq!(&per_instance, &broken);

        let regions = records.iter().filter(|r| matches!(r, Record::Region(_))).count();
        prop_assert_eq!(regions, usize::from(broken.contains(&false)));
    }
}

#[test]
fn filter_value_escaping() {
    let query = InstanceQuery::from_filter(
        json!({"labels.team": "a\"b\\c"}).as_object().unwrap(),
    );
    assert_eq!(
        query.provider_filter().as_deref(),
        Some("(labels.team = \"a\\\"b\\\\c\")")
    );
}
