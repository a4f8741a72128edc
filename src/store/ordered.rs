use std::ops::RangeInclusive;

use async_trait::async_trait;
use uuid::Uuid;

use super::{Collection, Document};
use crate::errors::SiteResult;

/// A document positioned inside a category's 1-based sequence
pub trait Ordered: Document {
    fn category(&self) -> &str;

    fn order(&self) -> u32;

    fn place(&mut self, category: &str, order: u32);
}

/// The narrow store interface the ordering logic runs against.
///
/// Each call is one independent read or write; nothing here spans calls.
#[async_trait]
pub trait OrderedStore<T: Ordered>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> SiteResult<Option<T>>;

    /// Items of one category sorted by order
    async fn find_by_category(&self, category: &str) -> SiteResult<Vec<T>>;

    async fn find_at(&self, category: &str, order: u32) -> SiteResult<Option<T>>;

    /// Highest order in the category, `0` when it is empty
    async fn max_order(&self, category: &str) -> SiteResult<u32>;

    async fn insert(&self, item: T) -> SiteResult<T>;

    async fn update_order(&self, id: Uuid, order: u32) -> SiteResult<()>;

    /// Overwrite the stored item with the same id
    async fn save(&self, item: T) -> SiteResult<T>;

    async fn move_to_category(&self, id: Uuid, category: &str, order: u32) -> SiteResult<T>;

    async fn delete_by_id(&self, id: Uuid) -> SiteResult<Option<T>>;

    /// Add `delta` to the order of every item in `category` whose order is in `range`
    async fn shift_orders(
        &self,
        category: &str,
        range: RangeInclusive<u32>,
        delta: i32,
    ) -> SiteResult<usize>;

    async fn count_in_category(&self, category: &str) -> SiteResult<usize>;

    /// Move every item of `from` into `to`, keeping their orders
    async fn relabel_category(&self, from: &str, to: &str) -> SiteResult<usize>;
}

#[async_trait]
impl<T: Ordered> OrderedStore<T> for Collection<T> {
    async fn find_by_id(&self, id: Uuid) -> SiteResult<Option<T>> {
        Ok(self.get(id).await)
    }

    async fn find_by_category(&self, category: &str) -> SiteResult<Vec<T>> {
        let mut items = self.filter(|d| d.category() == category).await;
        items.sort_by_key(|d| d.order());
        Ok(items)
    }

    async fn find_at(&self, category: &str, order: u32) -> SiteResult<Option<T>> {
        Ok(self.find_one(|d| d.category() == category && d.order() == order).await)
    }

    async fn max_order(&self, category: &str) -> SiteResult<u32> {
        let items = self.filter(|d| d.category() == category).await;
        Ok(items.iter().map(|d| d.order()).max().unwrap_or(0))
    }

    async fn insert(&self, item: T) -> SiteResult<T> {
        Collection::insert(self, item).await
    }

    async fn update_order(&self, id: Uuid, order: u32) -> SiteResult<()> {
        let updated = self
            .update(id, |d| {
                let category = d.category().to_string();
                d.place(&category, order);
            })
            .await?;
        updated.map(|_| ()).ok_or_else(Self::not_found)
    }

    async fn save(&self, item: T) -> SiteResult<T> {
        self.update(item.id(), |d| *d = item).await?.ok_or_else(Self::not_found)
    }

    async fn move_to_category(&self, id: Uuid, category: &str, order: u32) -> SiteResult<T> {
        self.update(id, |d| d.place(category, order))
            .await?
            .ok_or_else(Self::not_found)
    }

    async fn delete_by_id(&self, id: Uuid) -> SiteResult<Option<T>> {
        self.remove(id).await
    }

    async fn shift_orders(
        &self,
        category: &str,
        range: RangeInclusive<u32>,
        delta: i32,
    ) -> SiteResult<usize> {
        self.update_many(
            |d| d.category() == category && range.contains(&d.order()),
            |d| {
                let shifted = d.order().saturating_add_signed(delta);
                d.place(category, shifted);
            },
        )
        .await
    }

    async fn count_in_category(&self, category: &str) -> SiteResult<usize> {
        Ok(self.count(|d| d.category() == category).await)
    }

    async fn relabel_category(&self, from: &str, to: &str) -> SiteResult<usize> {
        self.update_many(
            |d| d.category() == from,
            |d| {
                let order = d.order();
                d.place(to, order);
            },
        )
        .await
    }
}
