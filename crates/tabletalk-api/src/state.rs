//! Application state wiring all services together.
//!
//! `AppState` holds what every command needs: config, database pools, the
//! history ring, and the API key (if present). The pipeline services are
//! generic over provider/embedder/index/executor traits; the aliases here
//! pin them to the concrete infra implementations. Services that talk to
//! Gemini are built on demand so commands like `schema` and `status` work
//! without an API key.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use tabletalk_core::index::indexer::SchemaIndexer;
use tabletalk_core::index::retriever::Retriever;
use tabletalk_core::pipeline::history::HistoryRing;
use tabletalk_core::pipeline::service::AskService;
use tabletalk_infra::config::{data_dir, database_path, index_path, load_app_config};
use tabletalk_infra::hash::Sha256ContentHasher;
use tabletalk_infra::llm::gemini::client::GeminiProvider;
use tabletalk_infra::llm::gemini::embedder::GeminiEmbedder;
use tabletalk_infra::secret::env::{google_api_key, API_KEY_VAR};
use tabletalk_infra::sqlite::catalog::SqliteCatalog;
use tabletalk_infra::sqlite::executor::SqliteQueryExecutor;
use tabletalk_infra::sqlite::pool::DatabasePool;
use tabletalk_infra::vector::store::SqliteVectorIndex;
use tabletalk_types::config::AppConfig;
use tabletalk_types::error::IndexError;

/// Concrete type aliases for the service generics pinned to infra
/// implementations.
pub type ConcreteAskService =
    AskService<GeminiProvider, GeminiEmbedder, SqliteVectorIndex, SqliteQueryExecutor>;

pub type ConcreteIndexer =
    SchemaIndexer<SqliteCatalog, GeminiEmbedder, SqliteVectorIndex, Sha256ContentHasher>;

/// Shared application state used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub config: AppConfig,
    /// The database generated SQL runs against.
    pub db_pool: DatabasePool,
    /// Separate file holding the schema vector index.
    pub index_pool: DatabasePool,
    pub history: Arc<HistoryRing>,
    api_key: Option<SecretString>,
}

impl AppState {
    /// Initialize the application state: data dir, config, database pools.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_app_config(&data_dir).await;

        let db_pool = DatabasePool::open(&database_path(&config, &data_dir)).await?;
        let index_pool = DatabasePool::open(&index_path(&config, &data_dir)).await?;

        let history = Arc::new(HistoryRing::new(config.history.capacity));
        let api_key = google_api_key();

        Ok(Self {
            data_dir,
            config,
            db_pool,
            index_pool,
            history,
            api_key,
        })
    }

    pub fn catalog(&self) -> SqliteCatalog {
        SqliteCatalog::new(self.db_pool.clone())
    }

    pub async fn vector_index(&self) -> Result<SqliteVectorIndex, IndexError> {
        SqliteVectorIndex::open(self.index_pool.clone()).await
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn require_api_key(&self) -> anyhow::Result<SecretString> {
        self.api_key.clone().ok_or_else(|| {
            anyhow::anyhow!(
                "{API_KEY_VAR} is not set. Export it before asking questions or refreshing the index."
            )
        })
    }

    /// Build the full question-to-results pipeline.
    ///
    /// Requires the API key: the pipeline embeds the question and calls
    /// the generation model.
    pub async fn ask_service(&self) -> anyhow::Result<ConcreteAskService> {
        let api_key = self.require_api_key()?;

        let provider = GeminiProvider::new(api_key.clone(), self.config.llm.model.clone());
        let embedder = GeminiEmbedder::new(api_key, self.config.llm.embedding_model.clone());
        let retriever = Retriever::new(embedder, self.vector_index().await?, self.config.index.top_k);
        let executor = SqliteQueryExecutor::new(self.db_pool.clone());

        Ok(AskService::new(
            provider,
            retriever,
            executor,
            self.config.llm.max_context_tokens,
            Arc::clone(&self.history),
        ))
    }

    /// Build the index refresh sweep service.
    pub async fn indexer(&self) -> anyhow::Result<ConcreteIndexer> {
        let api_key = self.require_api_key()?;

        let embedder = GeminiEmbedder::new(api_key, self.config.llm.embedding_model.clone());

        Ok(SchemaIndexer::new(
            self.catalog(),
            embedder,
            self.vector_index().await?,
            Sha256ContentHasher::new(),
        ))
    }
}

/// State for the HTTP server: the app state plus the pipeline services,
/// built once at startup instead of per request.
#[derive(Clone)]
pub struct ServerState {
    pub app: AppState,
    pub ask_service: Arc<ConcreteAskService>,
    pub indexer: Arc<ConcreteIndexer>,
}

impl ServerState {
    pub async fn from_app(app: AppState) -> anyhow::Result<Self> {
        let ask_service = Arc::new(app.ask_service().await?);
        let indexer = Arc::new(app.indexer().await?);
        Ok(Self {
            app,
            ask_service,
            indexer,
        })
    }
}
