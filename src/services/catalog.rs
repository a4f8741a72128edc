use std::sync::Arc;

use log::info;
use serde::Deserialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{SiteError, SiteResult};
use crate::store::{Collection, Document};
use crate::types::{Blog, Service, Slugged};

/// Query string of `GET /api/blogs`
#[derive(Debug, Default, Deserialize)]
pub struct BlogFilter {
    pub published: Option<bool>,
}

/// Slug-addressed documents (services, blogs) with slug uniqueness.
///
/// Check-then-write pairs run under a mutex so two creates cannot both
/// claim the same slug.
pub struct SlugCatalog<T: Slugged> {
    docs: Arc<Collection<T>>,
    gate: Mutex<()>,
}

impl<T: Slugged> SlugCatalog<T> {
    pub fn new(docs: Arc<Collection<T>>) -> Self {
        Self { docs, gate: Mutex::new(()) }
    }

    pub async fn by_slug(&self, slug: &str) -> SiteResult<T> {
        let slug = slug.trim();
        self.docs
            .find_one(|d| d.slug() == slug)
            .await
            .ok_or_else(Collection::<T>::not_found)
    }

    pub async fn by_id(&self, id: Uuid) -> SiteResult<T> {
        self.docs.get(id).await.ok_or_else(Collection::<T>::not_found)
    }

    pub async fn create(&self, doc: T) -> SiteResult<T> {
        let _guard = self.gate.lock().await;
        self.ensure_free(doc.slug(), None).await?;
        let created = self.docs.insert(doc).await?;
        info!("{} '{}' created", T::KIND, created.slug());
        Ok(created)
    }

    /// Apply `change`, then move to `new_slug` if one is given and it is free
    pub async fn update(
        &self,
        id: Uuid,
        new_slug: Option<String>,
        change: impl FnOnce(&mut T) + Send,
    ) -> SiteResult<T> {
        let _guard = self.gate.lock().await;
        let existing = self.by_id(id).await?;

        let new_slug = new_slug.filter(|s| s != existing.slug());
        if let Some(slug) = &new_slug {
            self.ensure_free(slug, Some(id)).await?;
        }

        let updated = self
            .docs
            .update(id, |doc| {
                change(doc);
                if let Some(slug) = new_slug {
                    doc.set_slug(slug);
                }
            })
            .await?
            .ok_or_else(Collection::<T>::not_found)?;

        if updated.slug() != existing.slug() {
            info!("{} slug changed '{}' -> '{}'", T::KIND, existing.slug(), updated.slug());
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> SiteResult<T> {
        let removed = self.docs.remove(id).await?.ok_or_else(Collection::<T>::not_found)?;
        info!("{} '{}' deleted", T::KIND, removed.slug());
        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.docs.len().await
    }

    async fn ensure_free(&self, slug: &str, except: Option<Uuid>) -> SiteResult<()> {
        let taken = self
            .docs
            .find_one(|d| d.slug() == slug && Some(d.id()) != except)
            .await
            .is_some();
        if taken {
            return Err(SiteError::Conflict(format!(
                "A {} with slug '{}' already exists",
                T::KIND.to_lowercase(),
                slug
            )));
        }
        Ok(())
    }
}

impl SlugCatalog<Service> {
    /// Services sorted by title
    pub async fn list(&self) -> Vec<Service> {
        let mut services = self.docs.all().await;
        services.sort_by_key(|s| s.title.to_lowercase());
        services
    }
}

impl SlugCatalog<Blog> {
    /// Newest posts first
    pub async fn list(&self, filter: &BlogFilter) -> Vec<Blog> {
        let mut blogs = self
            .docs
            .filter(|b| filter.published.is_none_or(|p| b.is_published == p))
            .await;
        blogs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        blogs
    }
}
