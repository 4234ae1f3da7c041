//! Static corpus files on disk.
//!
//! Nothing is cached: every call reads the file again, so edits are picked
//! up by the next request.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{BusinessDirectory, CorpusEntry, Document};

async fn read_json<T: DeserializeOwned>(path: &Path) -> AdvisorResult<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AdvisorError::load(path, e))?;

    serde_json::from_str(&raw).map_err(|e| AdvisorError::load(path, e))
}

/// Read a `[{title, content}, ...]` corpus, keeping file order and
/// numbering documents `doc_0`, `doc_1`, ...
pub async fn load_documents(path: impl AsRef<Path>) -> AdvisorResult<Vec<Document>> {
    let path = path.as_ref();
    let entries: Vec<CorpusEntry> = read_json(path).await?;

    debug!(path = %path.display(), count = entries.len(), "Loaded corpus");

    Ok(entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| Document::from_entry(index, entry))
        .collect())
}

/// Read the `{business_id: record}` mapping used for keyed retrieval.
pub async fn load_business_records(path: impl AsRef<Path>) -> AdvisorResult<BusinessDirectory> {
    let path = path.as_ref();
    let directory: BusinessDirectory = read_json(path).await?;

    debug!(path = %path.display(), count = directory.len(), "Loaded business records");

    Ok(directory)
}
