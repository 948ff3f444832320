use crate::state::ContainerImage;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};
use kube::api::ListParams;
use kube::{Api, Client};
use thiserror::Error;
use tracing::{debug, info};

/// Label the Job controller sets on every pod it creates.
static JOB_NAME_LABEL: &str = "job-name";

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to list pods in all namespaces")]
    ListPods(#[source] anyhow::Error),
    #[error("failed to list jobs in all namespaces")]
    ListJobs(#[source] anyhow::Error),
    #[error("failed to list pods of job {namespace}/{job}")]
    ListJobPods {
        namespace: String,
        job: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Read access to the cluster objects images are collected from.
pub trait ClusterSource {
    async fn list_pods(&self) -> anyhow::Result<Vec<Pod>>;
    async fn list_jobs(&self) -> anyhow::Result<Vec<Job>>;
    async fn list_job_pods(&self, namespace: &str, job_name: &str) -> anyhow::Result<Vec<Pod>>;
}

impl ClusterSource for Client {
    async fn list_pods(&self) -> anyhow::Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::all(self.clone());
        Ok(pods.list(&ListParams::default()).await?.items)
    }

    async fn list_jobs(&self) -> anyhow::Result<Vec<Job>> {
        let jobs: Api<Job> = Api::all(self.clone());
        Ok(jobs.list(&ListParams::default()).await?.items)
    }

    async fn list_job_pods(&self, namespace: &str, job_name: &str) -> anyhow::Result<Vec<Pod>> {
        let pods: Api<Pod> = Api::namespaced(self.clone(), namespace);
        let lp = ListParams::default().labels(&format!("{}={}", JOB_NAME_LABEL, job_name));
        Ok(pods.list(&lp).await?.items)
    }
}

pub async fn create_client() -> anyhow::Result<Client> {
    info!("Initializing K8s client");
    let client = Client::try_default().await?;
    let api_server_info = client.apiserver_version().await?;
    info!(
        "Connected to Kubernetes API server with version {}.{}, default namespace {}",
        api_server_info.major,
        api_server_info.minor,
        client.default_namespace()
    );
    Ok(client)
}

/// Images of every container of every pod in the cluster, in listing order.
pub async fn list_running_container_images<S: ClusterSource>(
    source: &S,
) -> Result<Vec<ContainerImage>, CollectError> {
    info!("Listing pods in all namespaces");
    let pods = source.list_pods().await.map_err(CollectError::ListPods)?;

    let mut images = Vec::new();
    for pod in &pods {
        debug!(
            "Namespace: {}, Pod name: {}",
            pod.metadata.namespace.as_deref().unwrap_or_default(),
            pod.metadata.name.as_deref().unwrap_or_default()
        );
        for container_status in container_statuses(pod) {
            debug!(
                "Container name: {}, Container image: {}, Image ID: {}",
                container_status.name, container_status.image, container_status.image_id
            );
            images.push(container_image(container_status));
        }
    }

    info!("Found {} container images in {} pods", images.len(), pods.len());
    Ok(images)
}

/// Images of the containers started by Jobs, including those created from CronJobs.
///
/// A Job's pod template only names the image; the resolved image ID comes from the
/// container statuses of the pods the Job spawned, matched by container name.
pub async fn list_job_container_images<S: ClusterSource>(
    source: &S,
) -> Result<Vec<ContainerImage>, CollectError> {
    info!("Listing jobs in all namespaces");
    let jobs = source.list_jobs().await.map_err(CollectError::ListJobs)?;

    let mut images = Vec::new();
    for job in &jobs {
        let (Some(namespace), Some(job_name)) =
            (job.metadata.namespace.as_deref(), job.metadata.name.as_deref())
        else {
            debug!("Skipping job without name or namespace");
            continue;
        };
        debug!("Namespace: {}, Job name: {}", namespace, job_name);

        let Some(template_spec) = job.spec.as_ref().and_then(|s| s.template.spec.as_ref()) else {
            continue;
        };

        let pods = source
            .list_job_pods(namespace, job_name)
            .await
            .map_err(|err| CollectError::ListJobPods {
                namespace: namespace.to_string(),
                job: job_name.to_string(),
                source: err,
            })?;

        for container in &template_spec.containers {
            debug!(
                "  Container name: {}, Container image: {}",
                container.name,
                container.image.as_deref().unwrap_or_default()
            );
            for pod in &pods {
                for container_status in container_statuses(pod)
                    .iter()
                    .filter(|cs| cs.name == container.name)
                {
                    debug!(
                        "    Pod name: {}, Image ID: {}",
                        pod.metadata.name.as_deref().unwrap_or_default(),
                        container_status.image_id
                    );
                    images.push(container_image(container_status));
                }
            }
        }
    }

    info!("Found {} container images in {} jobs", images.len(), jobs.len());
    Ok(images)
}

fn container_statuses(pod: &Pod) -> &[ContainerStatus] {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default()
}

fn container_image(container_status: &ContainerStatus) -> ContainerImage {
    ContainerImage {
        image: container_status.image.clone(),
        image_id: container_status.image_id.clone(),
    }
}
