use std::sync::Arc;

use log::{error, info};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{SiteError, SiteResult};
use crate::services::ordered_index::FaqIndex;
use crate::store::Collection;
use crate::types::{Category, CategoryInput};

/// FAQ categories. FAQs reference a category by name.
///
/// Name checks and the writes that depend on them run under one mutex.
pub struct CategoryService {
    categories: Arc<Collection<Category>>,
    index: Arc<FaqIndex>,
    gate: Mutex<()>,
}

impl CategoryService {
    pub fn new(categories: Arc<Collection<Category>>, index: Arc<FaqIndex>) -> Self {
        Self { categories, index, gate: Mutex::new(()) }
    }

    pub async fn list(&self) -> Vec<Category> {
        let mut all = self.categories.all().await;
        all.sort_by_key(|c| c.name.to_lowercase());
        all
    }

    pub async fn get(&self, id: Uuid) -> SiteResult<Category> {
        self.categories.get(id).await.ok_or_else(Collection::<Category>::not_found)
    }

    pub async fn create(&self, input: CategoryInput) -> SiteResult<Category> {
        let name = input.validate()?;
        let _guard = self.gate.lock().await;
        self.ensure_unique(&name, None).await?;
        let created = self.categories.insert(Category::new(name)).await?;
        info!("Category '{}' created", created.name);
        Ok(created)
    }

    /// Rename a category and carry its FAQs along
    pub async fn update(&self, id: Uuid, input: CategoryInput) -> SiteResult<Category> {
        let name = input.validate()?;
        let _guard = self.gate.lock().await;
        let existing = self.get(id).await?;
        self.ensure_unique(&name, Some(id)).await?;
        if name == existing.name {
            return Ok(existing);
        }

        let occupied = self.index.count_in_category(&name).await?;
        if occupied > 0 {
            return Err(SiteError::Conflict(format!(
                "{} FAQ(s) already use category '{}'",
                occupied, name
            )));
        }

        let renamed = self
            .categories
            .update(id, |c| c.name = name.clone())
            .await?
            .ok_or_else(Collection::<Category>::not_found)?;

        if let Err(e) = self.index.rename_category(&existing.name, &name).await {
            let previous = existing.name.clone();
            if let Err(restore) = self.categories.update(id, |c| c.name = previous).await {
                error!(
                    "Category {} left as '{}' after failed rename from '{}': {}",
                    id, name, existing.name, restore
                );
            }
            return Err(e);
        }

        info!("Category '{}' renamed to '{}'", existing.name, renamed.name);
        Ok(renamed)
    }

    /// Delete a category nothing refers to
    pub async fn delete(&self, id: Uuid) -> SiteResult<Category> {
        let _guard = self.gate.lock().await;
        let existing = self.get(id).await?;
        let count = self.index.count_in_category(&existing.name).await?;
        if count > 0 {
            return Err(SiteError::CategoryInUse { name: existing.name, count });
        }
        let removed = self
            .categories
            .remove(id)
            .await?
            .ok_or_else(Collection::<Category>::not_found)?;
        info!("Category '{}' deleted", removed.name);
        Ok(removed)
    }

    pub async fn count(&self) -> usize {
        self.categories.len().await
    }

    async fn ensure_unique(&self, name: &str, except: Option<Uuid>) -> SiteResult<()> {
        let wanted = name.to_lowercase();
        let clash = self
            .categories
            .find_one(|c| Some(c.id) != except && c.name.to_lowercase() == wanted)
            .await;
        match clash {
            Some(c) => Err(SiteError::Conflict(format!("Category '{}' already exists", c.name))),
            None => Ok(()),
        }
    }
}
