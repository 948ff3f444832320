use crate::collector::{ClusterSource, list_job_container_images, list_running_container_images};
use crate::dedup::unique_by_keys;
use crate::envelope::EnvelopeBuilder;
use crate::sink::{DeliveryError, Sink};
use crate::state::{ContainerImage, ContainerImageRecord};
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::Write;
use tracing::{debug, error, info};

const RECORD_KEYS: [&str; 3] = ["image", "digest", "tag"];

pub struct RunSummary {
    pub collected: usize,
    pub unique: usize,
    pub payload: String,
    pub delivery: Result<Value, DeliveryError>,
}

/// Collects pod and job images, deduplicates them and delivers the result.
///
/// The payload is written to `out` before it is posted. Without a cluster source both
/// listings count as failed and an empty inventory is sent.
pub async fn run<S: ClusterSource, W: Write>(
    source: Option<&S>,
    builder: &EnvelopeBuilder,
    sink: &Sink,
    out: &mut W,
) -> Result<RunSummary> {
    let mut container_images: Vec<ContainerImage> = Vec::new();
    match source {
        Some(source) => {
            match list_running_container_images(source).await {
                Ok(images) => container_images.extend(images),
                Err(e) => error!("Error listing running container images: {:?}", e),
            }
            match list_job_container_images(source).await {
                Ok(images) => container_images.extend(images),
                Err(e) => error!("Error listing job container images: {:?}", e),
            }
        }
        None => error!("No Kubernetes client available, skipping pod and job listing"),
    }

    let records: Vec<ContainerImageRecord> = container_images
        .iter()
        .map(ContainerImageRecord::from)
        .collect();
    let collected = records.len();

    let unique_records = unique_by_keys(records, &RECORD_KEYS);
    info!(
        "Found {} unique container images out of {}",
        unique_records.len(),
        collected
    );

    let payload = builder.build(&unique_records)?;
    debug!("JSON data: {}", payload);
    writeln!(out, "{}", payload).context("Failed to write image inventory")?;
    out.flush().context("Failed to write image inventory")?;

    let delivery = sink.deliver(payload.clone()).await;

    Ok(RunSummary {
        collected,
        unique: unique_records.len(),
        payload,
        delivery,
    })
}
