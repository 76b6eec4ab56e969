//! File-backed JSON collection
//!
//! Keeps every document of a collection in memory and rewrites the backing
//! file on each mutation. All writes happen under the collection's write
//! lock, so a filter-then-modify call is atomic with respect to other
//! requests touching the same collection.

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::results::{DeleteResult, InsertOneResult, UpdateResult};
use crate::{Error, Result};

/// A value that can live in a [`JsonCollection`]
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> Uuid;
}

/// Collection of documents stored as a JSON array on disk
pub struct JsonCollection<T> {
    path: PathBuf,
    docs: RwLock<Vec<T>>,
}

impl<T: Document> JsonCollection<T> {
    /// Open the collection at `path`.
    ///
    /// A missing file is an empty collection; it is created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let docs: Vec<T> = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        debug!("Opened collection {:?} with {} documents", path, docs.len());

        Ok(Self {
            path,
            docs: RwLock::new(docs),
        })
    }

    async fn persist(&self, docs: &[T]) -> Result<()> {
        let content = serde_json::to_string_pretty(docs)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, content).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }

    pub async fn find<F>(&self, filter: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().await;
        docs.iter().filter(|doc| filter(doc)).cloned().collect()
    }

    pub async fn find_one<F>(&self, filter: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().await;
        docs.iter().find(|doc| filter(doc)).cloned()
    }

    pub async fn count<F>(&self, filter: F) -> u64
    where
        F: Fn(&T) -> bool,
    {
        let docs = self.docs.read().await;
        docs.iter().filter(|doc| filter(doc)).count() as u64
    }

    pub async fn insert_one(&self, doc: T) -> Result<InsertOneResult> {
        self.insert_one_unique(doc, |_| false).await
    }

    /// Insert `doc` unless an existing document clashes with it.
    ///
    /// A document with the same id always clashes.
    pub async fn insert_one_unique<C>(&self, doc: T, clashes: C) -> Result<InsertOneResult>
    where
        C: Fn(&T) -> bool + Send,
    {
        let id = doc.id();
        let mut docs = self.docs.write().await;
        if docs.iter().any(|existing| existing.id() == id || clashes(existing)) {
            return Err(Error::Conflict(format!("Document {} clashes with an existing one", id)));
        }

        docs.push(doc);
        if let Err(err) = self.persist(&docs).await {
            docs.pop();
            return Err(err);
        }
        Ok(InsertOneResult::new(id))
    }

    /// Apply `update` to the first document matching `filter`.
    pub async fn update_one<F, U>(&self, filter: F, update: U) -> Result<UpdateResult>
    where
        F: Fn(&T) -> bool + Send,
        U: FnOnce(&mut T) + Send,
    {
        let mut docs = self.docs.write().await;
        match docs.iter().position(|doc| filter(doc)) {
            Some(index) => self.update_at(&mut docs, index, update).await,
            None => Ok(UpdateResult::unmatched()),
        }
    }

    /// Apply `update` to the first match, or insert the document built by
    /// `insert` when nothing matches.
    pub async fn upsert_one<F, U, I>(&self, filter: F, update: U, insert: I) -> Result<UpdateResult>
    where
        F: Fn(&T) -> bool + Send,
        U: FnOnce(&mut T) + Send,
        I: FnOnce() -> T + Send,
    {
        let mut docs = self.docs.write().await;
        if let Some(index) = docs.iter().position(|doc| filter(doc)) {
            return self.update_at(&mut docs, index, update).await;
        }

        let doc = insert();
        let id = doc.id();
        docs.push(doc);
        if let Err(err) = self.persist(&docs).await {
            docs.pop();
            return Err(err);
        }
        Ok(UpdateResult::upserted(id))
    }

    pub async fn delete_one<F>(&self, filter: F) -> Result<DeleteResult>
    where
        F: Fn(&T) -> bool + Send,
    {
        let mut docs = self.docs.write().await;
        let Some(index) = docs.iter().position(|doc| filter(doc)) else {
            return Ok(DeleteResult::new(false));
        };

        let removed = docs.remove(index);
        if let Err(err) = self.persist(&docs).await {
            docs.insert(index, removed);
            return Err(err);
        }
        Ok(DeleteResult::new(true))
    }

    async fn update_at<U>(&self, docs: &mut Vec<T>, index: usize, update: U) -> Result<UpdateResult>
    where
        U: FnOnce(&mut T) + Send,
    {
        let before = docs[index].clone();
        update(&mut docs[index]);

        let modified = match differs(&before, &docs[index]) {
            Ok(modified) => modified,
            Err(err) => {
                docs[index] = before;
                return Err(err);
            }
        };
        if !modified {
            return Ok(UpdateResult::matched(true, false));
        }

        if let Err(err) = self.persist(docs).await {
            docs[index] = before;
            return Err(err);
        }
        Ok(UpdateResult::matched(true, true))
    }
}

fn differs<T: Serialize>(before: &T, after: &T) -> Result<bool> {
    Ok(serde_json::to_value(before)? != serde_json::to_value(after)?)
}
