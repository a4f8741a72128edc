use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{SiteError, SiteResult};
use crate::services::ordered_index::{FaqIndex, MoveOutcome};
use crate::store::Collection;
use crate::types::{Direction, Faq, FaqPatch, NewFaq, ReorderRequest};
use crate::utils::parse_id;

/// Query string of `GET /api/faqs`
#[derive(Debug, Default, Deserialize)]
pub struct FaqFilter {
    pub category: Option<String>,
    pub active: Option<bool>,
}

/// Validates FAQ requests and routes positional changes through the index
pub struct FaqService {
    faqs: Arc<Collection<Faq>>,
    index: Arc<FaqIndex>,
}

impl FaqService {
    pub fn new(faqs: Arc<Collection<Faq>>, index: Arc<FaqIndex>) -> Self {
        Self { faqs, index }
    }

    /// FAQs sorted by category, then position
    pub async fn list(&self, filter: &FaqFilter) -> Vec<Faq> {
        let category = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
        let mut faqs = self
            .faqs
            .filter(|f| {
                category.is_none_or(|c| f.category == c) && filter.active.is_none_or(|a| f.is_active == a)
            })
            .await;
        faqs.sort_by(|a, b| a.category.cmp(&b.category).then(a.order.cmp(&b.order)));
        debug!("Listing {} FAQ(s)", faqs.len());
        faqs
    }

    pub async fn get(&self, id: Uuid) -> SiteResult<Faq> {
        self.faqs.get(id).await.ok_or_else(Collection::<Faq>::not_found)
    }

    pub async fn create(&self, input: NewFaq) -> SiteResult<Faq> {
        let faq = input.validate()?;
        let category = faq.category.clone();
        self.index.insert(faq, &category).await
    }

    /// Field update; a new category reassigns, an explicit order repositions.
    /// Nothing is written unless the whole request is acceptable.
    pub async fn update(&self, id: Uuid, patch: FaqPatch) -> SiteResult<Faq> {
        let patch = patch.validate()?;
        let updated = self
            .index
            .update(id, patch.category.as_deref(), patch.order, |faq| patch.apply_fields(faq))
            .await?;
        debug!("FAQ {} updated", updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> SiteResult<Faq> {
        self.index.delete(id).await
    }

    pub async fn reorder(&self, request: ReorderRequest) -> SiteResult<(Direction, MoveOutcome)> {
        if request.id.trim().is_empty() {
            return Err(SiteError::Validation("FAQ ID is required".to_string()));
        }
        let direction: Direction = request.direction.parse()?;
        let id = parse_id(&request.id, "FAQ")?;
        let outcome = self.index.move_item(id, direction).await?;
        Ok((direction, outcome))
    }

    pub async fn count(&self) -> usize {
        self.faqs.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FaqService {
        let faqs = Arc::new(Collection::in_memory());
        FaqService::new(faqs.clone(), Arc::new(FaqIndex::new(faqs)))
    }

    fn new_faq(question: &str, category: &str) -> NewFaq {
        NewFaq { question: question.into(), answer: "a".into(), category: category.into(), is_active: None }
    }

    #[tokio::test]
    async fn list_is_sorted_and_filtered() {
        let svc = service();
        svc.create(new_faq("w1", "weddings")).await.unwrap();
        svc.create(new_faq("g1", "general")).await.unwrap();
        let hidden = svc
            .create(NewFaq { is_active: Some(false), ..new_faq("g2", "general") })
            .await
            .unwrap();

        let all: Vec<String> = svc.list(&FaqFilter::default()).await.into_iter().map(|f| f.question).collect();
        assert_eq!(all, vec!["g1", "g2", "w1"]);

        let active = svc.list(&FaqFilter { active: Some(true), ..FaqFilter::default() }).await;
        assert!(active.iter().all(|f| f.id != hidden.id));

        let general = svc.list(&FaqFilter { category: Some("general".into()), active: None }).await;
        assert_eq!(general.len(), 2);
    }

    #[tokio::test]
    async fn update_with_same_category_keeps_order() {
        let svc = service();
        svc.create(new_faq("one", "general")).await.unwrap();
        let second = svc.create(new_faq("two", "general")).await.unwrap();

        let patch = FaqPatch {
            question: Some("two, edited".into()),
            category: Some("general".into()),
            ..FaqPatch::default()
        };
        let updated = svc.update(second.id, patch).await.unwrap();
        assert_eq!(updated.question, "two, edited");
        assert_eq!(updated.order, 2);
    }

    #[tokio::test]
    async fn update_with_new_category_reassigns() {
        let svc = service();
        let first = svc.create(new_faq("one", "general")).await.unwrap();
        let second = svc.create(new_faq("two", "general")).await.unwrap();
        svc.create(new_faq("s1", "services")).await.unwrap();
        svc.create(new_faq("s2", "services")).await.unwrap();

        let patch = FaqPatch { category: Some("services".into()), ..FaqPatch::default() };
        let moved = svc.update(first.id, patch).await.unwrap();
        assert_eq!((moved.category.as_str(), moved.order), ("services", 3));
        assert_eq!(svc.get(second.id).await.unwrap().order, 1);
    }

    #[tokio::test]
    async fn explicit_order_goes_through_reposition() {
        let svc = service();
        let first = svc.create(new_faq("one", "general")).await.unwrap();
        let second = svc.create(new_faq("two", "general")).await.unwrap();

        let patch = FaqPatch { order: Some(1), ..FaqPatch::default() };
        svc.update(second.id, patch).await.unwrap();
        assert_eq!(svc.get(second.id).await.unwrap().order, 1);
        assert_eq!(svc.get(first.id).await.unwrap().order, 2);

        let bad = FaqPatch { order: Some(9), ..FaqPatch::default() };
        assert!(matches!(svc.update(second.id, bad).await, Err(SiteError::Validation(_))));
    }

    #[tokio::test]
    async fn rejected_update_writes_nothing() {
        let svc = service();
        let only = svc.create(new_faq("one", "general")).await.unwrap();

        let patch = FaqPatch { question: Some("changed".into()), order: Some(9), ..FaqPatch::default() };
        assert!(matches!(svc.update(only.id, patch).await, Err(SiteError::Validation(_))));
        assert_eq!(svc.get(only.id).await.unwrap(), only);
    }

    #[tokio::test]
    async fn order_is_checked_against_the_new_category() {
        let svc = service();
        let mover = svc.create(new_faq("one", "general")).await.unwrap();
        let s1 = svc.create(new_faq("s1", "services")).await.unwrap();
        svc.create(new_faq("s2", "services")).await.unwrap();

        let too_far = FaqPatch {
            answer: Some("edited".into()),
            category: Some("services".into()),
            order: Some(4),
            ..FaqPatch::default()
        };
        assert!(matches!(svc.update(mover.id, too_far).await, Err(SiteError::Validation(_))));
        assert_eq!(svc.get(mover.id).await.unwrap(), mover);

        let to_front = FaqPatch {
            answer: Some("edited".into()),
            category: Some("services".into()),
            order: Some(1),
            ..FaqPatch::default()
        };
        let moved = svc.update(mover.id, to_front).await.unwrap();
        assert_eq!((moved.category.as_str(), moved.order, moved.answer.as_str()), ("services", 1, "edited"));
        assert_eq!(svc.get(s1.id).await.unwrap().order, 2);
        assert_eq!(svc.count().await, 3);
    }

    #[tokio::test]
    async fn reorder_validates_request() {
        let svc = service();
        let faq = svc.create(new_faq("one", "general")).await.unwrap();

        let missing_id = ReorderRequest { id: " ".into(), direction: "up".into() };
        assert!(matches!(svc.reorder(missing_id).await, Err(SiteError::Validation(_))));

        let bad_direction = ReorderRequest { id: faq.id.to_string(), direction: "left".into() };
        assert!(matches!(svc.reorder(bad_direction).await, Err(SiteError::Validation(_))));

        let ok = ReorderRequest { id: faq.id.to_string(), direction: "down".into() };
        assert_eq!(
            svc.reorder(ok).await.unwrap(),
            (Direction::Down, MoveOutcome::AtBoundary(Direction::Down))
        );
    }
}
