//! Shared test data: one managed web instance and the resources around it

use crate::collector::membership::{GroupMembership, MemberRef};
use crate::collector::resources::GlobalResources;
use crate::resource::model::Instance;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

pub const PROJECT: &str = "my-project";
const BASE: &str = "https://www.googleapis.com/compute/v1/projects/my-project";

pub const VM_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a/instances/web-1";
pub const DISK_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a/disks/web-1";
pub const IMAGE_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/debian-cloud/global/images/debian-12-bookworm-v20240312";
pub const NETWORK_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/global/networks/default";
pub const SUBNET_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/regions/us-central1/subnetworks/default";
pub const IGM_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a/instanceGroupManagers/web";
pub const IG_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/zones/us-central1-a/instanceGroups/web";
pub const BACKEND_LINK: &str =
    "https://www.googleapis.com/compute/v1/projects/my-project/global/backendServices/web-backend";

fn parse<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).unwrap()
}

pub fn instance() -> Instance {
    parse(json!({
        "id": "1001",
        "name": "web-1",
        "selfLink": VM_LINK,
        "zone": format!("{BASE}/zones/us-central1-a"),
        "machineType": format!("{BASE}/zones/us-central1-a/machineTypes/n1-standard-2"),
        "status": "RUNNING",
        "creationTimestamp": "2024-03-01T10:20:30.123-08:00",
        "fingerprint": "abc=",
        "cpuPlatform": "Intel Broadwell",
        "deletionProtection": false,
        "canIpForward": false,
        "tags": {"items": ["http-server"]},
        "labels": {"env": "prod"},
        "metadata": {"items": [
            {"key": "created-by", "value": "projects/123456789/zones/us-central1-a/instanceGroupManagers/web"},
            {"key": "ssh-keys", "value": "alice:ssh-rsa AAAA alice\nbob:ssh-ed25519 BBBB bob"},
            {"key": "block-project-ssh-keys", "value": "TRUE"}
        ]},
        "disks": [
            {
                "source": DISK_LINK,
                "deviceName": "persistent-disk-0",
                "index": 0,
                "boot": true,
                "autoDelete": true,
                "mode": "READ_WRITE",
                "interface": "SCSI",
                "type": "PERSISTENT",
                "diskSizeGb": "20",
                "licenses": ["https://www.googleapis.com/compute/v1/projects/debian-cloud/global/licenses/debian-12-bookworm"]
            },
            {
                "deviceName": "local-ssd-0",
                "index": 1,
                "boot": false,
                "autoDelete": true,
                "mode": "READ_WRITE",
                "interface": "NVME",
                "type": "SCRATCH",
                "diskSizeGb": "375"
            }
        ],
        "networkInterfaces": [{
            "name": "nic0",
            "network": NETWORK_LINK,
            "subnetwork": SUBNET_LINK,
            "networkIP": "10.128.0.2",
            "accessConfigs": [{"name": "External NAT", "natIP": "34.1.2.3", "networkTier": "PREMIUM", "type": "ONE_TO_ONE_NAT"}]
        }],
        "serviceAccounts": [{"email": "123-compute@developer.gserviceaccount.com", "scopes": []}],
        "scheduling": {"onHostMaintenance": "MIGRATE", "automaticRestart": true, "preemptible": false}
    }))
}

pub fn global_resources() -> GlobalResources {
    GlobalResources {
        disks: vec![parse(json!({
            "id": "7001",
            "name": "web-1",
            "selfLink": DISK_LINK,
            "sizeGb": "20",
            "type": format!("{BASE}/zones/us-central1-a/diskTypes/pd-balanced"),
            "sourceImage": IMAGE_LINK,
            "provisionedIops": "3000",
            "users": [VM_LINK]
        }))],
        machine_types: vec![
            parse(json!({
                "name": "n1-standard-2",
                "zone": "us-east1-b",
                "guestCpus": 4,
                "memoryMb": 15360
            })),
            parse(json!({
                "name": "n1-standard-2",
                "zone": "us-central1-a",
                "guestCpus": 2,
                "memoryMb": 7680
            })),
        ],
        images: vec![parse(json!({
            "id": "8001",
            "name": "debian-12-bookworm-v20240312",
            "selfLink": IMAGE_LINK,
            "family": "debian-12",
            "architecture": "X86_64",
            "description": "Debian, Debian GNU/Linux, 12 (bookworm), amd64 built on 20240312",
            "licenses": ["https://www.googleapis.com/compute/v1/projects/debian-cloud/global/licenses/debian-12-bookworm"]
        }))],
        networks: vec![parse(json!({
            "id": "5001",
            "name": "default",
            "selfLink": NETWORK_LINK,
            "description": "Default network for the project"
        }))],
        subnetworks: vec![parse(json!({
            "id": "6001",
            "name": "default",
            "selfLink": SUBNET_LINK,
            "network": NETWORK_LINK,
            "region": format!("{BASE}/regions/us-central1"),
            "ipCidrRange": "10.128.0.0/20",
            "gatewayAddress": "10.128.0.1"
        }))],
        firewalls: vec![
            parse(json!({
                "id": "9001",
                "name": "allow-http",
                "network": NETWORK_LINK,
                "priority": 1000,
                "direction": "INGRESS",
                "sourceRanges": ["0.0.0.0/0"],
                "targetTags": ["http-server"],
                "allowed": [{"IPProtocol": "tcp", "ports": ["80", "443"]}]
            })),
            parse(json!({
                "id": "9002",
                "name": "allow-ssh",
                "network": NETWORK_LINK,
                "priority": 65534,
                "direction": "INGRESS",
                "sourceRanges": ["35.235.240.0/20"],
                "allowed": [{"IPProtocol": "tcp", "ports": ["22"]}]
            })),
            parse(json!({
                "id": "9003",
                "name": "allow-db",
                "network": NETWORK_LINK,
                "direction": "INGRESS",
                "sourceTags": ["web"],
                "targetTags": ["db"],
                "allowed": [{"IPProtocol": "tcp", "ports": ["5432"]}]
            })),
            parse(json!({
                "id": "9004",
                "name": "disabled-rule",
                "network": NETWORK_LINK,
                "direction": "INGRESS",
                "disabled": true,
                "allowed": [{"IPProtocol": "all"}]
            })),
            parse(json!({
                "id": "9005",
                "name": "other-network",
                "network": format!("{BASE}/global/networks/other"),
                "direction": "INGRESS",
                "allowed": [{"IPProtocol": "all"}]
            })),
        ],
        instance_group_managers: vec![parse(json!({
            "id": "3001",
            "name": "web",
            "selfLink": IGM_LINK,
            "instanceGroup": IG_LINK,
            "instanceTemplate": format!("{BASE}/global/instanceTemplates/web-template"),
            "status": {"isStable": true, "stateful": {"hasStatefulConfig": false}}
        }))],
        autoscalers: vec![parse(json!({
            "id": "4001",
            "name": "web-autoscaler",
            "selfLink": format!("{BASE}/zones/us-central1-a/autoscalers/web-autoscaler"),
            "target": IGM_LINK,
            "autoscalingPolicy": {"minNumReplicas": 1, "maxNumReplicas": 5}
        }))],
        backend_services: vec![parse(json!({
            "id": "2001",
            "name": "web-backend",
            "selfLink": BACKEND_LINK,
            "protocol": "HTTP",
            "loadBalancingScheme": "EXTERNAL",
            "backends": [{"group": IG_LINK, "balancingMode": "UTILIZATION"}]
        }))],
        url_maps: vec![parse(json!({
            "name": "web-map",
            "selfLink": format!("{BASE}/global/urlMaps/web-map"),
            "defaultService": BACKEND_LINK
        }))],
        target_proxies: vec![parse(json!({
            "name": "web-proxy",
            "selfLink": format!("{BASE}/global/targetHttpProxies/web-proxy"),
            "urlMap": format!("{BASE}/global/urlMaps/web-map")
        }))],
        target_pools: vec![parse(json!({
            "name": "legacy-pool",
            "selfLink": format!("{BASE}/regions/us-central1/targetPools/legacy-pool"),
            "instances": [VM_LINK]
        }))],
        forwarding_rules: vec![
            parse(json!({
                "name": "web-http",
                "selfLink": format!("{BASE}/global/forwardingRules/web-http"),
                "IPAddress": "35.1.1.1",
                "IPProtocol": "TCP",
                "portRange": "80-80",
                "target": format!("{BASE}/global/targetHttpProxies/web-proxy"),
                "loadBalancingScheme": "EXTERNAL"
            })),
            parse(json!({
                "name": "legacy-fr",
                "selfLink": format!("{BASE}/regions/us-central1/forwardingRules/legacy-fr"),
                "IPAddress": "35.2.2.2",
                "IPProtocol": "TCP",
                "ports": ["8080", "8443"],
                "target": format!("{BASE}/regions/us-central1/targetPools/legacy-pool"),
                "loadBalancingScheme": "EXTERNAL"
            })),
            parse(json!({
                "name": "unrelated",
                "selfLink": format!("{BASE}/regions/us-central1/forwardingRules/unrelated"),
                "IPAddress": "35.3.3.3",
                "target": format!("{BASE}/regions/us-central1/targetPools/other-pool")
            })),
        ],
        membership: GroupMembership::new(vec![MemberRef {
            instance: VM_LINK.to_string(),
            group: IGM_LINK.to_string(),
        }]),
    }
}
