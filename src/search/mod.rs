//! Tantivy-based search index module.
//!
//! Provides ranked full-text search over resources and training modules with
//! field boosting. The catalog listings use plain substring matching; this
//! index backs `/api/search` only.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{BooleanQuery, Occur, Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{name_of, Resource, TrainingModule};

/// Field boost values; titles dominate, classification names trail.
const BOOST_TITLE: f32 = 10.0;
const BOOST_TAGS: f32 = 7.0;
const BOOST_DESCRIPTION: f32 = 5.0;
const BOOST_LABELS: f32 = 2.5;

/// Writer heap for the single indexing thread.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Which collection a search hit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Resource,
    Training,
}

impl RecordKind {
    fn doc_key(self, id: i64) -> String {
        format!("{}:{}", name_of(&self), id)
    }
}

/// Search result with record identity and relevance score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub kind: RecordKind,
    pub id: i64,
    pub score: f32,
}

/// One window of ranked hits plus the total match count.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub hits: Vec<SearchHit>,
    pub total: usize,
}

/// Search index schema fields.
struct SearchFields {
    doc_key: Field,
    kind: Field,
    record_id: Field,
    title: Field,
    tags: Field,
    description: Field,
    labels: Field,
}

impl SearchFields {
    fn schema() -> (Schema, Self) {
        let mut schema_builder = Schema::builder();
        // STRING (untokenized, indexed) so updates can delete by key
        let doc_key = schema_builder.add_text_field("doc_key", STRING | STORED);
        let kind = schema_builder.add_text_field("kind", STRING | STORED);
        let record_id = schema_builder.add_i64_field("record_id", STORED);
        let title = schema_builder.add_text_field("title", TEXT);
        let tags = schema_builder.add_text_field("tags", TEXT);
        let description = schema_builder.add_text_field("description", TEXT);
        let labels = schema_builder.add_text_field("labels", TEXT);

        let fields = Self {
            doc_key,
            kind,
            record_id,
            title,
            tags,
            description,
            labels,
        };
        (schema_builder.build(), fields)
    }
}

/// Tantivy search index for catalog records.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: RwLock<IndexWriter>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let (schema, fields) = SearchFields::schema();
        let directory = MmapDirectory::open(index_path)
            .map_err(|e| AppError::Search(format!("Failed to open index directory: {}", e)))?;
        let index = Index::open_or_create(directory, schema)
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        Self::from_index(index, fields)
    }

    /// Create a throwaway index held in RAM.
    pub fn in_memory() -> Result<Self, AppError> {
        let (schema, fields) = SearchFields::schema();
        Self::from_index(Index::create_in_ram(schema), fields)
    }

    fn from_index(index: Index, fields: SearchFields) -> Result<Self, AppError> {
        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer_with_num_threads(1, WRITER_HEAP_BYTES)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: RwLock::new(writer),
            fields,
        })
    }

    /// Rebuild the entire index from the current catalog.
    pub async fn rebuild(
        &self,
        resources: &[Resource],
        training: &[TrainingModule],
    ) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        for resource in resources {
            writer.add_document(self.resource_document(resource))?;
        }
        for module in training {
            writer.add_document(self.training_document(module))?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!(
            "Search index rebuilt with {} resources and {} training modules",
            resources.len(),
            training.len()
        );
        Ok(())
    }

    /// Index or re-index a single resource.
    pub async fn index_resource(&self, resource: &Resource) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let key = RecordKind::Resource.doc_key(resource.id);
        writer.delete_term(Term::from_field_text(self.fields.doc_key, &key));
        writer.add_document(self.resource_document(resource))?;
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Remove a resource from the index.
    pub async fn remove_resource(&self, id: i64) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let key = RecordKind::Resource.doc_key(id);
        writer.delete_term(Term::from_field_text(self.fields.doc_key, &key));
        writer.commit()?;

        self.reader.reload()?;
        Ok(())
    }

    /// Search for records matching the query, optionally restricted to one kind.
    ///
    /// Every term must match somewhere; malformed query syntax is parsed
    /// leniently instead of being rejected.
    pub fn search(
        &self,
        query_str: &str,
        kind: Option<RecordKind>,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, AppError> {
        if query_str.trim().is_empty() {
            return Ok(SearchPage {
                hits: Vec::new(),
                total: 0,
            });
        }

        let searcher = self.reader.searcher();

        let mut query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.title,
                self.fields.tags,
                self.fields.description,
                self.fields.labels,
            ],
        );
        query_parser.set_conjunction_by_default();
        query_parser.set_field_boost(self.fields.title, BOOST_TITLE);
        query_parser.set_field_boost(self.fields.tags, BOOST_TAGS);
        query_parser.set_field_boost(self.fields.description, BOOST_DESCRIPTION);
        query_parser.set_field_boost(self.fields.labels, BOOST_LABELS);

        let (text_query, parse_errors) = query_parser.parse_query_lenient(query_str);
        if !parse_errors.is_empty() {
            tracing::debug!("Lenient search parse of {:?}: {:?}", query_str, parse_errors);
        }

        let query: Box<dyn Query> = match kind {
            Some(kind) => {
                let kind_term = Term::from_field_text(self.fields.kind, &name_of(&kind));
                Box::new(BooleanQuery::new(vec![
                    (Occur::Must, text_query),
                    (
                        Occur::Must,
                        Box::new(TermQuery::new(kind_term, IndexRecordOption::Basic)),
                    ),
                ]))
            }
            None => text_query,
        };

        let total = searcher
            .search(&query, &Count)
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;
        if limit == 0 || offset >= total {
            return Ok(SearchPage {
                hits: Vec::new(),
                total,
            });
        }

        // TopDocs buffers limit + offset entries; keep both within the match count
        let window = limit.min(total - offset);
        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(window).and_offset(offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let hits = top_docs
            .into_iter()
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let kind = doc.get_first(self.fields.kind)?.as_str()?;
                let id = doc.get_first(self.fields.record_id)?.as_i64()?;
                Some(SearchHit {
                    kind: crate::models::parse_name(kind).ok()?,
                    id,
                    score,
                })
            })
            .collect();

        Ok(SearchPage { hits, total })
    }

    fn resource_document(&self, resource: &Resource) -> TantivyDocument {
        let mut labels = vec![
            name_of(&resource.resource_type),
            resource.category.label().to_string(),
            resource.sector.label().to_string(),
        ];
        labels.extend(resource.language.iter().map(|l| l.label().to_string()));

        doc!(
            self.fields.doc_key => RecordKind::Resource.doc_key(resource.id),
            self.fields.kind => name_of(&RecordKind::Resource),
            self.fields.record_id => resource.id,
            self.fields.title => resource.title.clone(),
            self.fields.tags => resource.tags.join(" "),
            self.fields.description => resource.description.clone(),
            self.fields.labels => labels.join(" ")
        )
    }

    fn training_document(&self, module: &TrainingModule) -> TantivyDocument {
        let mut labels = vec![module.category.label().to_string(), name_of(&module.level)];
        labels.extend(module.language.iter().map(|l| l.label().to_string()));

        doc!(
            self.fields.doc_key => RecordKind::Training.doc_key(module.id),
            self.fields.kind => name_of(&RecordKind::Training),
            self.fields.record_id => module.id,
            self.fields.title => module.title.clone(),
            self.fields.tags => module.tags.join(" "),
            self.fields.description => module.description.clone(),
            self.fields.labels => labels.join(" ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use tempfile::TempDir;

    async fn seeded_index() -> (SearchIndex, Seed) {
        let seed = Seed::load().unwrap();
        let index = SearchIndex::in_memory().unwrap();
        index
            .rebuild(&seed.resources, &seed.training_modules)
            .await
            .unwrap();
        (index, seed)
    }

    #[tokio::test]
    async fn test_title_match_ranks_first() {
        let (index, _) = seeded_index().await;

        let page = index.search("latrine", None, 10, 0).unwrap();
        assert!(!page.hits.is_empty());
        assert_eq!(page.hits[0].kind, RecordKind::Resource);
        assert_eq!(page.hits[0].id, 7);
    }

    #[tokio::test]
    async fn test_kind_filter_restricts_hits() {
        let (index, _) = seeded_index().await;

        let all = index.search("advocacy", None, 10, 0).unwrap();
        assert!(all.hits.iter().any(|h| h.kind == RecordKind::Resource));
        assert!(all.hits.iter().any(|h| h.kind == RecordKind::Training));

        let training = index
            .search("advocacy", Some(RecordKind::Training), 10, 0)
            .unwrap();
        assert_eq!(training.total, 1);
        assert_eq!(training.hits[0].id, 6);
    }

    #[tokio::test]
    async fn test_reindex_and_remove_resource() {
        let (index, seed) = seeded_index().await;

        let mut renamed = seed.resources[4].clone();
        renamed.title = "Tactile Signing Primer".to_string();
        index.index_resource(&renamed).await.unwrap();

        let page = index.search("tactile", None, 10, 0).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.hits[0].id, renamed.id);

        index.remove_resource(renamed.id).await.unwrap();
        assert_eq!(index.search("tactile", None, 10, 0).unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let page = index.search("   ", None, 10, 0).unwrap();
        assert!(page.hits.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_offset_past_the_end_keeps_total() {
        let (index, _) = seeded_index().await;
        let first = index.search("health", None, 20, 0).unwrap();
        assert!(first.total > 0);

        for offset in [first.total, 100_000_000_000, usize::MAX - 5] {
            let page = index.search("health", None, 20, offset).unwrap();
            assert!(page.hits.is_empty());
            assert_eq!(page.total, first.total);
        }

        let last = index.search("health", None, usize::MAX, first.total - 1).unwrap();
        assert_eq!(last.hits.len(), 1);
    }

    #[tokio::test]
    async fn test_unbalanced_syntax_is_not_an_error() {
        let (index, _) = seeded_index().await;
        assert!(index.search("health (", None, 10, 0).is_ok());
    }
}
