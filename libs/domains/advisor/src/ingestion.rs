//! Embedding ingestion: corpus documents into the vector collection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::embedding::EmbeddingProvider;
use crate::error::{AdvisorError, AdvisorResult};
use crate::models::{Document, VectorPoint};
use crate::repository::VectorRepository;

/// What happens to an existing collection before documents are loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestionMode {
    /// Drop and recreate, so the collection mirrors the corpus exactly
    #[default]
    Recreate,
    /// Keep existing points and overwrite by document id. Points for
    /// documents no longer in the corpus are left behind.
    Upsert,
}

impl IngestionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestionMode::Recreate => "recreate",
            IngestionMode::Upsert => "upsert",
        }
    }
}

impl fmt::Display for IngestionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IngestionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recreate" => Ok(IngestionMode::Recreate),
            "upsert" => Ok(IngestionMode::Upsert),
            other => Err(format!(
                "unknown ingestion mode '{}', expected 'recreate' or 'upsert'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionReport {
    pub collection: String,
    /// Documents embedded and stored by this run
    pub ingested: usize,
    /// Points in the collection afterwards
    pub total_points: u64,
    pub mode: IngestionMode,
}

pub struct IngestionJob<R: VectorRepository> {
    repository: R,
    embedder: Arc<dyn EmbeddingProvider>,
    collection: String,
    mode: IngestionMode,
}

impl<R: VectorRepository> IngestionJob<R> {
    pub fn new(
        repository: R,
        embedder: Arc<dyn EmbeddingProvider>,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            embedder,
            collection: collection.into(),
            mode: IngestionMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: IngestionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Embed and store every document in order. Stops at the first failure.
    #[instrument(skip(self, documents), fields(collection = %self.collection, mode = %self.mode, documents = documents.len()))]
    pub async fn run(&self, documents: &[Document]) -> AdvisorResult<IngestionReport> {
        self.prepare_collection()
            .await
            .map_err(|e| self.collection_failure(e))?;

        for document in documents {
            self.ingest_one(document)
                .await
                .map_err(|e| AdvisorError::Ingestion {
                    at: document.id.clone(),
                    reason: e.to_string(),
                })?;
            debug!(doc_id = %document.id, "Stored document");
        }

        let total_points = self
            .repository
            .count(&self.collection)
            .await
            .map_err(|e| self.collection_failure(e))?;

        info!(
            ingested = documents.len(),
            total_points, "Ingestion complete"
        );

        Ok(IngestionReport {
            collection: self.collection.clone(),
            ingested: documents.len(),
            total_points,
            mode: self.mode,
        })
    }

    async fn prepare_collection(&self) -> AdvisorResult<()> {
        let exists = self.repository.collection_exists(&self.collection).await?;

        if exists && self.mode == IngestionMode::Recreate {
            info!("Dropping existing collection");
            self.repository.delete_collection(&self.collection).await?;
        } else if exists {
            return Ok(());
        }

        let dimension = self.embedder.dimension();
        info!(dimension, "Creating collection");
        self.repository
            .create_collection(&self.collection, dimension)
            .await
    }

    fn collection_failure(&self, err: AdvisorError) -> AdvisorError {
        AdvisorError::Ingestion {
            at: format!("collection {}", self.collection),
            reason: err.to_string(),
        }
    }

    async fn ingest_one(&self, document: &Document) -> AdvisorResult<()> {
        let values = self.embedder.embed_document(document).await?;
        self.repository
            .upsert(&self.collection, VectorPoint::from_document(document, values))
            .await
    }
}
