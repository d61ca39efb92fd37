//! Batch Orchestrator
//!
//! Runs one collection batch as three phases (advertise, collect, region)
//! and streams the resulting records. A failing phase yields one error
//! record and the next phase still runs; a failing instance yields one
//! error record and the loop moves on.

use super::error::{CollectError, ErrorKind, JoinError};
use super::filter::InstanceQuery;
use super::join::{assemble_server, DEFAULT_CONSOLE_BASE_URL};
use super::record::{ErrorResource, Record, CLOUD_SERVICE_TYPE, SERVER};
use super::region::RegionCollector;
use super::resources::{fetch_global_resources, GlobalResources};
use super::zone::ZoneInfo;
use crate::resource::model::Instance;
use crate::resource::registry::get_cloud_service_types;
use crate::resource::ComputeApi;
use futures::channel::mpsc::{self, SendError, Sender};
use futures::stream::{self, Stream, StreamExt};
use futures::SinkExt;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Default number of instances joined at once
pub const DEFAULT_CONCURRENCY: usize = 20;

/// Public image projects searched for boot images
pub const DEFAULT_IMAGE_PROJECTS: &[&str] = &[
    "centos-cloud",
    "cos-cloud",
    "debian-cloud",
    "fedora-coreos-cloud",
    "rhel-cloud",
    "rocky-linux-cloud",
    "suse-cloud",
    "ubuntu-os-cloud",
    "windows-cloud",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CollectOptions {
    /// Upper bound on parallel joins and group fetches
    pub concurrency: usize,
    pub image_projects: Vec<String>,
    pub console_base_url: String,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            image_projects: DEFAULT_IMAGE_PROJECTS.iter().map(|p| p.to_string()).collect(),
            console_base_url: DEFAULT_CONSOLE_BASE_URL.to_string(),
        }
    }
}

/// Collects one project's instances through a `ComputeApi`
#[derive(Clone)]
pub struct Collector {
    api: Arc<dyn ComputeApi>,
    options: CollectOptions,
}

impl Collector {
    pub fn new(api: Arc<dyn ComputeApi>, options: CollectOptions) -> Self {
        Self { api, options }
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// Start a batch and return its records as they are produced.
    ///
    /// Order: cloud service types, then one server or error record per
    /// instance in list order, then the regions seen. Dropping the stream
    /// stops the batch at its next record.
    pub fn collect(&self, query: InstanceQuery) -> impl Stream<Item = Record> + Send + 'static {
        let concurrency = self.options.concurrency.max(1);
        let (tx, rx) = mpsc::channel(concurrency);
        let batch = Batch {
            api: self.api.clone(),
            options: self.options.clone(),
            query,
        };

        let batch_id = Uuid::new_v4();
        let span = info_span!("batch", %batch_id, project = %self.api.project_id());
        tokio::spawn(
            async move {
                if batch.run(tx).await.is_err() {
                    debug!("Output stream dropped, batch stopped");
                }
            }
            .instrument(span),
        );

        rx
    }
}

struct Batch {
    api: Arc<dyn ComputeApi>,
    options: CollectOptions,
    query: InstanceQuery,
}

impl Batch {
    async fn run(self, mut tx: Sender<Record>) -> Result<(), SendError> {
        info!("Collection started");

        self.advertise(&mut tx).await?;

        let mut regions = RegionCollector::new();
        self.collect_servers(&mut tx, &mut regions).await?;

        info!("Emitting {} regions", regions.len());
        for region in regions.into_regions() {
            tx.send(Record::Region(region)).await?;
        }

        info!("Collection finished");
        Ok(())
    }

    async fn advertise(&self, tx: &mut Sender<Record>) -> Result<(), SendError> {
        match get_cloud_service_types() {
            Ok(types) => {
                for cst in types {
                    tx.send(Record::CloudServiceType(cst.clone())).await?;
                }
                Ok(())
            },
            Err(e) => {
                error!("Failed to load cloud service types: {:#}", e);
                let err = CollectError::from_anyhow(ErrorKind::Advertise, &e);
                tx.send(error_record(&err, CLOUD_SERVICE_TYPE, "")).await
            },
        }
    }

    async fn collect_servers(
        &self,
        tx: &mut Sender<Record>,
        regions: &mut RegionCollector,
    ) -> Result<(), SendError> {
        let (resources, instances) = match self.fetch().await {
            Ok(fetched) => fetched,
            Err(err) => {
                error!("{}", err);
                return tx.send(error_record(&err, SERVER, "")).await;
            },
        };

        info!("Joining {} instances", instances.len());
        let project_id: Arc<str> = Arc::from(self.api.project_id());
        let console_base_url: Arc<str> = Arc::from(self.options.console_base_url.as_str());

        let mut records = stream::iter(instances)
            .map(|instance| {
                join_instance(
                    instance,
                    project_id.clone(),
                    resources.clone(),
                    console_base_url.clone(),
                )
            })
            .buffered(self.options.concurrency.max(1));

        let (mut servers, mut failures) = (0usize, 0usize);
        while let Some(record) = records.next().await {
            match &record {
                Record::Server(server) => {
                    servers += 1;
                    regions.observe(&server.region_code);
                },
                _ => failures += 1,
            }
            tx.send(record).await?;
        }

        info!(servers, failures, "Instances collected");
        Ok(())
    }

    /// Global resources and the filtered instance list
    async fn fetch(&self) -> Result<(Arc<GlobalResources>, Vec<Instance>), CollectError> {
        let resources = fetch_global_resources(
            self.api.as_ref(),
            &self.options.image_projects,
            self.options.concurrency,
        )
        .await
        .map_err(|e| CollectError::from_anyhow(ErrorKind::Fetch, &e))?;

        let filter = self.query.provider_filter();
        let instances = self
            .api
            .list_instances(filter.as_deref())
            .await
            .map_err(|e| CollectError::from_anyhow(ErrorKind::Fetch, &e))?;

        let total = instances.len();
        let instances: Vec<Instance> = instances
            .into_iter()
            .filter(|i| self.query.matches(i))
            .collect();
        debug!("{} of {} instances match the query", instances.len(), total);

        Ok((Arc::new(resources), instances))
    }
}

/// Join one instance on the blocking pool; a panic there becomes an error record
async fn join_instance(
    instance: Instance,
    project_id: Arc<str>,
    resources: Arc<GlobalResources>,
    console_base_url: Arc<str>,
) -> Record {
    let instance_id = instance.id.clone().unwrap_or_default();
    let instance_name = instance.name.clone();

    let joined = tokio::task::spawn_blocking(move || {
        let zone = ZoneInfo::new(instance.zone.as_deref().unwrap_or_default(), &project_id);
        assemble_server(&instance, &zone, &resources, &console_base_url)
    })
    .await
    .unwrap_or_else(|e| Err(JoinError::Worker(e.to_string())));

    match joined {
        Ok(server) => Record::Server(Box::new(server)),
        Err(e) => {
            warn!(instance_id = %instance_id, "Failed to assemble instance: {}", e);
            let err = CollectError::from_join(&e, instance_name.as_deref());
            error_record(&err, SERVER, &instance_id)
        },
    }
}

fn error_record(err: &CollectError, resource_type: &'static str, resource_id: &str) -> Record {
    Record::Error(ErrorResource::new(err, resource_type, resource_id))
}
