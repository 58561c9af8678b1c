//! Index refresh sweep: keep the vector index in sync with the catalog.
//!
//! A sweep extracts every table, regenerates its description, and
//! re-embeds only the tables whose description fingerprint (or embedding
//! model) changed. Entries for dropped tables are removed. Per-table
//! embedding failures are collected into the report instead of aborting
//! the sweep.

use std::collections::HashMap;
use std::time::Instant;

use tabletalk_types::error::{CatalogError, IndexError};
use tabletalk_types::retrieval::{IndexUpsert, RefreshFailure, RefreshReport};

use crate::index::embedder::Embedder;
use crate::index::store::VectorIndex;
use crate::schema::catalog::SchemaCatalog;
use crate::schema::describe::describe_table;
use crate::schema::hash::ContentHasher;

/// Errors that can occur during an index refresh sweep.
///
/// Only whole-sweep failures land here (unreachable catalog, unreadable
/// index). Per-table embedding failures go into the [`RefreshReport`].
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Service that synchronizes the vector index with the live schema.
///
/// Generic over the catalog, embedder, index, and hasher traits so
/// tabletalk-core never depends on tabletalk-infra.
pub struct SchemaIndexer<C: SchemaCatalog, E: Embedder, V: VectorIndex, H: ContentHasher> {
    catalog: C,
    embedder: E,
    index: V,
    hasher: H,
}

impl<C: SchemaCatalog, E: Embedder, V: VectorIndex, H: ContentHasher> SchemaIndexer<C, E, V, H> {
    pub fn new(catalog: C, embedder: E, index: V, hasher: H) -> Self {
        Self {
            catalog,
            embedder,
            index,
            hasher,
        }
    }

    /// Run one refresh sweep and report what changed.
    ///
    /// Idempotent: a second sweep over unchanged metadata makes no
    /// embedding calls and leaves every stored vector untouched, so
    /// retrieval ranking cannot drift across refreshes.
    pub async fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let started = Instant::now();
        let schemas = self.catalog.extract_all().await?;

        // Fingerprint + model per existing entry, so unchanged tables skip
        // the embedding call entirely.
        let existing: HashMap<String, (String, String)> = self
            .index
            .list()
            .await?
            .into_iter()
            .map(|entry| (entry.table, (entry.fingerprint, entry.model)))
            .collect();

        let mut report = RefreshReport::default();
        let model = self.embedder.model_name().to_string();

        for schema in &schemas {
            let description = describe_table(schema);
            let fingerprint = self.hasher.compute_hash(&description);

            let unchanged = existing
                .get(&schema.name)
                .is_some_and(|(fp, m)| *fp == fingerprint && *m == model);
            if unchanged {
                report.skipped.push(schema.name.clone());
                continue;
            }

            match self.embedder.embed(std::slice::from_ref(&description)).await {
                Ok(vectors) => {
                    let Some(embedding) = vectors.into_iter().next() else {
                        tracing::warn!(table = %schema.name, "embedder returned no vector");
                        report.failed.push(RefreshFailure {
                            table: schema.name.clone(),
                            reason: "embedder returned no vector".to_string(),
                        });
                        continue;
                    };
                    let record = IndexUpsert {
                        schema: schema.clone(),
                        description,
                        fingerprint,
                        model: model.clone(),
                    };
                    match self.index.upsert(&record, &embedding).await {
                        Ok(()) => report.indexed.push(schema.name.clone()),
                        Err(err) => {
                            tracing::warn!(table = %schema.name, error = %err, "index upsert failed");
                            report.failed.push(RefreshFailure {
                                table: schema.name.clone(),
                                reason: err.to_string(),
                            });
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(table = %schema.name, error = %err, "embedding failed");
                    report.failed.push(RefreshFailure {
                        table: schema.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        // Entries whose table disappeared from the catalog are stale by
        // definition; remove them rather than let them haunt retrieval.
        let live: std::collections::HashSet<&str> =
            schemas.iter().map(|s| s.name.as_str()).collect();
        for table in existing.keys() {
            if !live.contains(table.as_str()) {
                self.index.remove(table).await?;
                report.removed.push(table.clone());
            }
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            indexed = report.indexed.len(),
            skipped = report.skipped.len(),
            removed = report.removed.len(),
            failed = report.failed.len(),
            elapsed_ms = report.elapsed_ms,
            "index refresh complete"
        );
        Ok(report)
    }

    /// Whether any table would be re-embedded by a sweep right now.
    ///
    /// Used at server startup to decide if a background refresh is worth
    /// scheduling; makes no embedding calls.
    pub async fn is_stale(&self) -> Result<bool, RefreshError> {
        let schemas = self.catalog.extract_all().await?;
        let existing: HashMap<String, (String, String)> = self
            .index
            .list()
            .await?
            .into_iter()
            .map(|entry| (entry.table, (entry.fingerprint, entry.model)))
            .collect();

        if existing.len() != schemas.len() {
            return Ok(true);
        }
        let model = self.embedder.model_name();
        for schema in &schemas {
            let fingerprint = self.hasher.compute_hash(&describe_table(schema));
            match existing.get(&schema.name) {
                Some((stored_fp, stored_model))
                    if *stored_fp == fingerprint && stored_model == model => {}
                _ => return Ok(true),
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Utc;
    use tabletalk_types::error::LlmError;
    use tabletalk_types::retrieval::{IndexedTable, SchemaHit};
    use tabletalk_types::schema::{ColumnInfo, TableSchema};

    fn schema(name: &str) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            columns: vec![ColumnInfo {
                name: "id".to_string(),
                declared_type: "INTEGER".to_string(),
                not_null: true,
                primary_key: true,
            }],
            foreign_keys: vec![],
            row_count: 1,
            sample_rows: vec![],
        }
    }

    struct FixedCatalog {
        schemas: Vec<TableSchema>,
    }

    impl SchemaCatalog for FixedCatalog {
        async fn extract_all(&self) -> Result<Vec<TableSchema>, CatalogError> {
            Ok(self.schemas.clone())
        }

        async fn extract_table(&self, table: &str) -> Result<TableSchema, CatalogError> {
            self.schemas
                .iter()
                .find(|s| s.name == table)
                .cloned()
                .ok_or_else(|| CatalogError::TableNotFound(table.to_string()))
        }
    }

    /// Counts embed calls; optionally fails for one named description.
    struct CountingEmbedder {
        calls: AtomicUsize,
        fail_for: Option<String>,
    }

    impl CountingEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_for: None,
            }
        }
    }

    impl Embedder for CountingEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(needle) = &self.fail_for {
                if texts.iter().any(|t| t.contains(needle.as_str())) {
                    return Err(LlmError::RateLimited {
                        retry_after_ms: None,
                    });
                }
            }
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn model_name(&self) -> &str {
            "stub-embed"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    /// Map-backed index with just enough behavior for sweep tests.
    #[derive(Default)]
    struct MapIndex {
        entries: Mutex<HashMap<String, (String, String)>>,
    }

    impl VectorIndex for MapIndex {
        async fn upsert(&self, record: &IndexUpsert, _embedding: &[f32]) -> Result<(), IndexError> {
            self.entries.lock().unwrap().insert(
                record.schema.name.clone(),
                (record.fingerprint.clone(), record.model.clone()),
            );
            Ok(())
        }

        async fn search(
            &self,
            _query_embedding: &[f32],
            _model: &str,
            _limit: usize,
        ) -> Result<Vec<SchemaHit>, IndexError> {
            Ok(vec![])
        }

        async fn remove(&self, table: &str) -> Result<(), IndexError> {
            self.entries.lock().unwrap().remove(table);
            Ok(())
        }

        async fn list(&self) -> Result<Vec<IndexedTable>, IndexError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .map(|(table, (fingerprint, model))| IndexedTable {
                    table: table.clone(),
                    description: String::new(),
                    fingerprint: fingerprint.clone(),
                    model: model.clone(),
                    dimension: 2,
                    updated_at: Utc::now(),
                })
                .collect())
        }

        async fn count(&self) -> Result<u64, IndexError> {
            Ok(self.entries.lock().unwrap().len() as u64)
        }
    }

    /// Cheap stand-in hash: length + first/last chars is plenty to tell
    /// different descriptions apart in tests.
    struct LenHasher;

    impl ContentHasher for LenHasher {
        fn compute_hash(&self, content: &str) -> String {
            format!("{}:{}", content.len(), content.chars().next().unwrap_or('_'))
        }
    }

    fn indexer(
        schemas: Vec<TableSchema>,
    ) -> SchemaIndexer<FixedCatalog, CountingEmbedder, MapIndex, LenHasher> {
        SchemaIndexer::new(
            FixedCatalog { schemas },
            CountingEmbedder::new(),
            MapIndex::default(),
            LenHasher,
        )
    }

    #[tokio::test]
    async fn test_first_sweep_indexes_everything() {
        let idx = indexer(vec![schema("customers"), schema("orders")]);
        let report = idx.refresh().await.unwrap();
        assert_eq!(report.indexed.len(), 2);
        assert!(report.skipped.is_empty());
        assert!(report.is_clean());
        assert_eq!(idx.index.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_second_sweep_skips_unchanged_without_embedding() {
        let idx = indexer(vec![schema("customers")]);
        idx.refresh().await.unwrap();
        let calls_after_first = idx.embedder.calls.load(Ordering::SeqCst);

        let report = idx.refresh().await.unwrap();
        assert!(report.indexed.is_empty());
        assert_eq!(report.skipped, vec!["customers".to_string()]);
        assert_eq!(idx.embedder.calls.load(Ordering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn test_failure_on_one_table_does_not_abort_others() {
        let mut idx = indexer(vec![schema("customers"), schema("orders")]);
        idx.embedder.fail_for = Some("customers".to_string());

        let report = idx.refresh().await.unwrap();
        assert_eq!(report.indexed, vec!["orders".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].table, "customers");
    }

    #[tokio::test]
    async fn test_dropped_table_is_removed_from_index() {
        let idx = indexer(vec![schema("customers"), schema("orders")]);
        idx.refresh().await.unwrap();

        let idx2 = SchemaIndexer::new(
            FixedCatalog {
                schemas: vec![schema("customers")],
            },
            CountingEmbedder::new(),
            MapIndex {
                entries: Mutex::new(idx.index.entries.lock().unwrap().clone()),
            },
            LenHasher,
        );
        let report = idx2.refresh().await.unwrap();
        assert_eq!(report.removed, vec!["orders".to_string()]);
        assert_eq!(idx2.index.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_is_stale_tracks_catalog_changes() {
        let idx = indexer(vec![schema("customers")]);
        assert!(idx.is_stale().await.unwrap());
        idx.refresh().await.unwrap();
        assert!(!idx.is_stale().await.unwrap());
    }
}
