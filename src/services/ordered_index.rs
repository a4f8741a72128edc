//! Ordered Category Index
//!
//! Keeps each category's `order` values a gap-free `1..=N` sequence across
//! inserts, moves, deletes and category changes. The store only offers
//! independent single-call reads and writes, so every mutation here runs
//! while holding one async mutex; two requests can never interleave the
//! read of a neighbour with the write-back of a swap.

use std::marker::PhantomData;
use std::sync::Arc;

use log::{debug, error, info};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{SiteError, SiteResult};
use crate::store::{Collection, Ordered, OrderedStore};
use crate::types::{Direction, Faq};

pub type FaqIndex = OrderedIndex<Faq, Collection<Faq>>;

/// Result of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { from: u32, to: u32 },
    AtBoundary(Direction),
}

pub struct OrderedIndex<T: Ordered, S: OrderedStore<T>> {
    store: Arc<S>,
    gate: Mutex<()>,
    _item: PhantomData<fn() -> T>,
}

impl<T: Ordered, S: OrderedStore<T>> OrderedIndex<T, S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, gate: Mutex::new(()), _item: PhantomData }
    }

    /// Append `item` to the end of `category`
    pub async fn insert(&self, mut item: T, category: &str) -> SiteResult<T> {
        let category = required_category(category)?;
        let _guard = self.gate.lock().await;

        let order = self.store.max_order(category).await? + 1;
        item.place(category, order);
        let created = self.store.insert(item).await?;
        info!("{} {} inserted into '{}' at {}", T::KIND, created.id(), category, order);
        Ok(created)
    }

    /// Swap an item with its neighbour above or below
    pub async fn move_item(&self, id: Uuid, direction: Direction) -> SiteResult<MoveOutcome> {
        let _guard = self.gate.lock().await;

        let item = self.require(id).await?;
        let category = item.category().to_string();
        let order = item.order();

        let target = match direction {
            Direction::Up => {
                if order <= 1 {
                    debug!("{} {} already first in '{}'", T::KIND, id, category);
                    return Ok(MoveOutcome::AtBoundary(direction));
                }
                order - 1
            }
            Direction::Down => {
                let last = self.store.max_order(&category).await?;
                if order >= last {
                    debug!("{} {} already last in '{}'", T::KIND, id, category);
                    return Ok(MoveOutcome::AtBoundary(direction));
                }
                order + 1
            }
        };

        let Some(neighbour) = self.store.find_at(&category, target).await? else {
            error!(
                "No {} at position {} in '{}' while moving {} {}; sequence is broken",
                T::KIND,
                target,
                category,
                id,
                direction
            );
            return Err(SiteError::InconsistentState(format!(
                "Could not find {} {} the current one",
                T::KIND,
                if direction == Direction::Up { "above" } else { "below" }
            )));
        };

        self.store.update_order(neighbour.id(), order).await?;
        self.store.update_order(id, target).await?;
        info!("{} {} moved {} in '{}': {} -> {}", T::KIND, id, direction, category, order, target);
        Ok(MoveOutcome::Moved { from: order, to: target })
    }

    /// Remove an item and close the gap it leaves
    pub async fn delete(&self, id: Uuid) -> SiteResult<T> {
        let _guard = self.gate.lock().await;

        let item = self.require(id).await?;
        let removed = self.store.delete_by_id(id).await?.ok_or_else(Collection::<T>::not_found)?;
        let shifted = self.close_gap(item.category(), item.order()).await?;
        info!(
            "{} {} deleted from '{}' at {}; {} item(s) compacted",
            T::KIND,
            id,
            item.category(),
            item.order(),
            shifted
        );
        Ok(removed)
    }

    /// Move an item to the end of another category and compact the source
    pub async fn reassign(&self, id: Uuid, new_category: &str) -> SiteResult<T> {
        let new_category = required_category(new_category)?;
        let _guard = self.gate.lock().await;

        let item = self.require(id).await?;
        if item.category() == new_category {
            return Err(SiteError::Validation(format!(
                "{} is already in category '{}'",
                T::KIND,
                new_category
            )));
        }
        self.reassign_locked(&item, new_category).await
    }

    /// Put an item at `target` within its own category, shifting the items between
    pub async fn reposition(&self, id: Uuid, target: u32) -> SiteResult<T> {
        let _guard = self.gate.lock().await;

        let item = self.require(id).await?;
        let last = self.store.max_order(item.category()).await?;
        check_target(target, last)?;
        self.reposition_locked(&item, target).await
    }

    /// Field edit plus optional category change and position, as one step.
    ///
    /// Every check runs before the first write, so a rejected request leaves
    /// the item untouched. The category changes first, then the position
    /// within the (possibly new) category, then `change` is applied; `change`
    /// cannot alter category or order.
    pub async fn update(
        &self,
        id: Uuid,
        new_category: Option<&str>,
        target: Option<u32>,
        change: impl FnOnce(&mut T) + Send,
    ) -> SiteResult<T> {
        let new_category = new_category.map(required_category).transpose()?;
        let _guard = self.gate.lock().await;

        let item = self.require(id).await?;
        let new_category = new_category.filter(|c| *c != item.category());

        if let Some(target) = target {
            let last = match new_category {
                Some(category) => self.store.max_order(category).await? + 1,
                None => self.store.max_order(item.category()).await?,
            };
            check_target(target, last)?;
        }

        let mut current = item;
        if let Some(category) = new_category {
            current = self.reassign_locked(&current, category).await?;
        }
        if let Some(target) = target {
            current = self.reposition_locked(&current, target).await?;
        }

        let category = current.category().to_string();
        let order = current.order();
        change(&mut current);
        current.place(&category, order);
        self.store.save(current).await
    }

    /// Relabel every item of `from` as `to`; refuses to merge into a non-empty category
    pub async fn rename_category(&self, from: &str, to: &str) -> SiteResult<usize> {
        let to = required_category(to)?;
        if from == to {
            return Ok(0);
        }
        let _guard = self.gate.lock().await;

        let occupied = self.store.count_in_category(to).await?;
        if occupied > 0 {
            return Err(SiteError::Conflict(format!(
                "{} {} item(s) already use category '{}'",
                occupied,
                T::KIND,
                to
            )));
        }
        let relabelled = self.store.relabel_category(from, to).await?;
        info!("Relabelled {} {} item(s) '{}' -> '{}'", relabelled, T::KIND, from, to);
        Ok(relabelled)
    }

    pub async fn count_in_category(&self, category: &str) -> SiteResult<usize> {
        self.store.count_in_category(category).await
    }

    /// Items of one category in order
    pub async fn items(&self, category: &str) -> SiteResult<Vec<T>> {
        self.store.find_by_category(category).await
    }

    async fn reassign_locked(&self, item: &T, new_category: &str) -> SiteResult<T> {
        let order = self.store.max_order(new_category).await? + 1;
        let moved = self.store.move_to_category(item.id(), new_category, order).await?;
        self.close_gap(item.category(), item.order()).await?;
        info!(
            "{} {} reassigned '{}'#{} -> '{}'#{}",
            T::KIND,
            item.id(),
            item.category(),
            item.order(),
            new_category,
            order
        );
        Ok(moved)
    }

    async fn reposition_locked(&self, item: &T, target: u32) -> SiteResult<T> {
        let id = item.id();
        let category = item.category();
        let order = item.order();
        if target == order {
            return Ok(item.clone());
        }

        if target < order {
            self.store.shift_orders(category, target..=order - 1, 1).await?;
        } else {
            self.store.shift_orders(category, order + 1..=target, -1).await?;
        }
        self.store.update_order(id, target).await?;
        info!("{} {} repositioned in '{}': {} -> {}", T::KIND, id, category, order, target);
        self.require(id).await
    }

    async fn close_gap(&self, category: &str, vacated: u32) -> SiteResult<usize> {
        if vacated == u32::MAX {
            return Ok(0);
        }
        self.store.shift_orders(category, vacated + 1..=u32::MAX, -1).await
    }

    async fn require(&self, id: Uuid) -> SiteResult<T> {
        self.store.find_by_id(id).await?.ok_or_else(Collection::<T>::not_found)
    }
}

fn check_target(target: u32, last: u32) -> SiteResult<()> {
    if target == 0 || target > last {
        return Err(SiteError::Validation(format!("Order must be between 1 and {}", last)));
    }
    Ok(())
}

fn required_category(category: &str) -> SiteResult<&str> {
    let category = category.trim();
    if category.is_empty() {
        return Err(SiteError::Validation("Category is required".to_string()));
    }
    Ok(category)
}
