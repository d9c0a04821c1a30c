//! The document store: the single shared resource of the viewer.
//!
//! Written once during the initial load and read-only afterwards. Search,
//! navigation, and TOC all consume snapshots of this store; cloning is
//! cheap (`Arc` internally) so publishing to other tasks is safe.

use crate::fetcher::Fetcher;
use crate::types::{DEFAULT_SECTION, Document, ManifestEntry, slugify};
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Ordered, immutable set of loaded documents in manifest order.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Arc<[Document]>,
}

impl DocumentStore {
    /// Loads every document named by the manifest at `manifest_url`.
    ///
    /// All document fetches are issued concurrently and the load is
    /// all-or-nothing: any single failure aborts the whole batch with
    /// [`Error::Load`]. An empty manifest is a valid (empty) store.
    pub async fn load(fetcher: &Fetcher, manifest_url: &str) -> Result<Self> {
        let entries = fetcher.fetch_manifest(manifest_url).await?;
        Self::load_entries(fetcher, manifest_url, entries).await
    }

    /// Loads documents for already-fetched manifest entries.
    pub async fn load_entries(
        fetcher: &Fetcher,
        manifest_url: &str,
        entries: Vec<ManifestEntry>,
    ) -> Result<Self> {
        let fetches = entries.iter().map(|entry| {
            let url = Fetcher::resolve_path(manifest_url, &entry.path);
            async move {
                let url = url?;
                fetcher.fetch_text(&url).await
            }
        });

        // Fail fast: the first error aborts the whole batch.
        let bodies = futures::future::try_join_all(fetches)
            .await
            .map_err(|e| Error::Load(format!("Document batch load failed: {e}")))?;

        let fetched_at = Utc::now();
        let documents: Vec<Document> = entries
            .into_iter()
            .zip(bodies)
            .enumerate()
            .map(|(id, (entry, (content, sha256)))| Document {
                id,
                slug: slugify(&entry.name),
                title: entry.name,
                section: entry.section.unwrap_or_else(|| DEFAULT_SECTION.to_string()),
                path: entry.path,
                content,
                sha256,
                fetched_at,
            })
            .collect();

        info!("Loaded {} documents from {}", documents.len(), manifest_url);

        Ok(Self::from_documents(documents))
    }

    /// Builds a store from pre-loaded documents (tests and hosts that fetch
    /// out of band).
    pub fn from_documents(documents: Vec<Document>) -> Self {
        // Collisions are undefined behavior per the data model; warn so
        // operators can fix their titles.
        let mut seen = std::collections::HashSet::new();
        for doc in &documents {
            if !seen.insert(doc.slug.as_str()) {
                warn!("Duplicate slug '{}' in manifest", doc.slug);
            }
        }
        Self {
            documents: documents.into(),
        }
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// The document at a manifest index, if in range.
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    /// The first document in manifest order (the startup fallback target).
    pub fn first(&self) -> Option<&Document> {
        self.documents.first()
    }

    /// Finds a document by its slug. First match wins on (undefined)
    /// collisions.
    pub fn find_by_slug(&self, slug: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.slug == slug)
    }

    /// Manifest index of the document with the given slug.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.slug == slug)
    }

    /// Groups documents by section in first-seen order.
    ///
    /// A pure projection of the store: section order follows the first
    /// manifest entry that mentions each section, and documents within a
    /// section keep manifest order.
    pub fn grouped_by_section(&self) -> Vec<(String, Vec<&Document>)> {
        let mut groups: Vec<(String, Vec<&Document>)> = Vec::new();
        for doc in self.documents.iter() {
            match groups.iter_mut().find(|(label, _)| *label == doc.section) {
                Some((_, docs)) => docs.push(doc),
                None => groups.push((doc.section.clone(), vec![doc])),
            }
        }
        groups
    }
}
