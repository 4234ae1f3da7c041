//! BizBoost Ingest
//!
//! Loads the document corpus, embeds each entry with Vertex AI and stores it
//! in the Qdrant collection used by similarity retrieval.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_advisor::{
    AdvisorConfig, IngestionJob, IngestionMode, QdrantRepository, VertexAIProvider, load_documents,
};
use eyre::Result;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bizboost-ingest")]
#[command(about = "Embed the document corpus into the vector collection")]
struct Cli {
    /// Corpus file (JSON array of {title, content}). Defaults to DOCUMENTS_PATH.
    #[arg(short, long)]
    documents: Option<PathBuf>,

    /// Target collection. Defaults to COLLECTION_NAME.
    #[arg(short, long)]
    collection: Option<String>,

    /// recreate drops the collection first; upsert keeps existing points
    #[arg(short, long, env = "INGESTION_MODE", default_value = "recreate")]
    mode: IngestionMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let environment = Environment::from_env();
    init_tracing(&environment);

    let config = AdvisorConfig::from_env()?;
    let documents_path = cli.documents.unwrap_or(config.documents_path);
    let collection = cli.collection.unwrap_or(config.collection_name);

    info!(path = %documents_path.display(), "Loading corpus");
    let documents = load_documents(&documents_path).await?;

    let repository = QdrantRepository::new(config.qdrant)?;
    let embedder = Arc::new(
        VertexAIProvider::new(config.vertex)
            .with_model(config.embedding_model)
            .with_dimension(config.embedding_dimension),
    );

    let report = IngestionJob::new(repository, embedder, collection)
        .with_mode(cli.mode)
        .run(&documents)
        .await?;

    info!(
        collection = %report.collection,
        mode = %report.mode,
        ingested = report.ingested,
        total_points = report.total_points,
        "Ingestion finished"
    );

    Ok(())
}
