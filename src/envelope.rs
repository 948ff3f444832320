use crate::config::Account;
use crate::state::ContainerImageRecord;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Serialize)]
struct ImageEntry<'a> {
    name: &'a str,
    #[serde(rename = "digestSha256")]
    digest_sha256: Option<&'a str>,
    tag: Option<&'a str>,
    account: &'a Account,
}

/// Turns image records into the JSON array accepted by the inventory endpoint.
pub struct EnvelopeBuilder {
    account: Account,
}

impl EnvelopeBuilder {
    pub fn new(account: Account) -> Self {
        Self { account }
    }

    /// Serializes the records in order, two-space indented, with absent digests and tags as `null`.
    pub fn build(&self, records: &[ContainerImageRecord]) -> Result<String> {
        let entries: Vec<ImageEntry> = records
            .iter()
            .map(|record| ImageEntry {
                name: &record.image,
                digest_sha256: record.digest.as_deref(),
                tag: record.tag.as_deref(),
                account: &self.account,
            })
            .collect();

        serde_json::to_string_pretty(&entries).context("Failed to serialize image records to JSON")
    }
}
