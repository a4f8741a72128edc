//! Document store
//!
//! Every collection is a list of JSON documents kept in memory behind an
//! async lock. Collections opened with a path load their snapshot on open and
//! rewrite it after each mutation; in-memory collections never touch disk.

mod ordered;

pub use ordered::{Ordered, OrderedStore};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};
use serde::{Serialize, de::DeserializeOwned};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{SiteError, SiteResult};
use crate::types::{Blog, Category, Contact, Faq, Service, User};
use crate::utils::now;

/// A persisted document with a store-assigned id
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Human-readable kind used in error messages ("FAQ", "Blog", ...)
    const KIND: &'static str;

    fn id(&self) -> Uuid;

    /// Give a fresh document its id and creation timestamps
    fn assign(&mut self, id: Uuid, now: OffsetDateTime);

    /// Bump the modification timestamp
    fn touch(&mut self, now: OffsetDateTime);
}

pub struct Collection<T: Document> {
    docs: RwLock<Vec<T>>,
    path: Option<PathBuf>,
}

impl<T: Document> Collection<T> {
    pub fn in_memory() -> Self {
        Self { docs: RwLock::new(Vec::new()), path: None }
    }

    /// Open a collection backed by a JSON snapshot file
    pub async fn open(path: PathBuf) -> SiteResult<Self> {
        let docs = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => serde_json::from_slice::<Vec<T>>(&bytes)?,
            Ok(_) => Vec::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(SiteError::Io(e)),
        };
        info!("Loaded {} {} document(s) from {:?}", docs.len(), T::KIND, path);
        Ok(Self { docs: RwLock::new(docs), path: Some(path) })
    }

    pub fn not_found() -> SiteError {
        SiteError::NotFound(format!("{} not found", T::KIND))
    }

    pub async fn all(&self) -> Vec<T> {
        self.docs.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn get(&self, id: Uuid) -> Option<T> {
        self.docs.read().await.iter().find(|d| d.id() == id).cloned()
    }

    pub async fn find_one(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.docs.read().await.iter().find(|d| pred(d)).cloned()
    }

    pub async fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs.read().await.iter().filter(|d| pred(d)).cloned().collect()
    }

    pub async fn count(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.docs.read().await.iter().filter(|d| pred(d)).count()
    }

    pub async fn insert(&self, mut doc: T) -> SiteResult<T> {
        doc.assign(Uuid::new_v4(), now());
        let mut docs = self.docs.write().await;
        docs.push(doc.clone());
        self.persist(&docs).await?;
        debug!("Inserted {} {}", T::KIND, doc.id());
        Ok(doc)
    }

    /// Apply `change` to one document; `None` when the id is unknown
    pub async fn update(&self, id: Uuid, change: impl FnOnce(&mut T)) -> SiteResult<Option<T>> {
        let mut docs = self.docs.write().await;
        let Some(doc) = docs.iter_mut().find(|d| d.id() == id) else {
            return Ok(None);
        };
        change(doc);
        doc.touch(now());
        let updated = doc.clone();
        self.persist(&docs).await?;
        Ok(Some(updated))
    }

    /// Apply `change` to every matching document, returning how many matched
    pub async fn update_many(
        &self,
        pred: impl Fn(&T) -> bool,
        mut change: impl FnMut(&mut T),
    ) -> SiteResult<usize> {
        let mut docs = self.docs.write().await;
        let stamp = now();
        let mut touched = 0;
        for doc in docs.iter_mut().filter(|d| pred(d)) {
            change(doc);
            doc.touch(stamp);
            touched += 1;
        }
        if touched > 0 {
            self.persist(&docs).await?;
        }
        Ok(touched)
    }

    pub async fn remove(&self, id: Uuid) -> SiteResult<Option<T>> {
        let mut docs = self.docs.write().await;
        let Some(pos) = docs.iter().position(|d| d.id() == id) else {
            return Ok(None);
        };
        let removed = docs.remove(pos);
        self.persist(&docs).await?;
        debug!("Removed {} {}", T::KIND, id);
        Ok(Some(removed))
    }

    async fn persist(&self, docs: &[T]) -> SiteResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(docs)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// The site's collections
pub struct Store {
    pub faqs: Arc<Collection<Faq>>,
    pub categories: Arc<Collection<Category>>,
    pub services: Arc<Collection<Service>>,
    pub blogs: Arc<Collection<Blog>>,
    pub contacts: Arc<Collection<Contact>>,
    pub users: Arc<Collection<User>>,
}

impl Store {
    pub fn in_memory() -> Self {
        Self {
            faqs: Arc::new(Collection::in_memory()),
            categories: Arc::new(Collection::in_memory()),
            services: Arc::new(Collection::in_memory()),
            blogs: Arc::new(Collection::in_memory()),
            contacts: Arc::new(Collection::in_memory()),
            users: Arc::new(Collection::in_memory()),
        }
    }

    /// Open every collection under `dir` as `<name>.json`
    pub async fn open(dir: &Path) -> SiteResult<Self> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(Self {
            faqs: Arc::new(Collection::open(dir.join("faqs.json")).await?),
            categories: Arc::new(Collection::open(dir.join("categories.json")).await?),
            services: Arc::new(Collection::open(dir.join("services.json")).await?),
            blogs: Arc::new(Collection::open(dir.join("blogs.json")).await?),
            contacts: Arc::new(Collection::open(dir.join("contacts.json")).await?),
            users: Arc::new(Collection::open(dir.join("users.json")).await?),
        })
    }

    pub async fn from_config(config: &Config) -> SiteResult<Self> {
        if config.in_memory() {
            info!("Using in-memory store; nothing will be persisted");
            Ok(Self::in_memory())
        } else {
            Self::open(&config.data_dir).await
        }
    }
}
