use std::sync::Arc;

use log::info;
use uuid::Uuid;

use crate::errors::SiteResult;
use crate::store::Collection;
use crate::types::{Contact, ContactPatch, NewContact};

pub struct ContactService {
    contacts: Arc<Collection<Contact>>,
}

impl ContactService {
    pub fn new(contacts: Arc<Collection<Contact>>) -> Self {
        Self { contacts }
    }

    /// Newest submissions first
    pub async fn list(&self) -> Vec<Contact> {
        let mut all = self.contacts.all().await;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn get(&self, id: Uuid) -> SiteResult<Contact> {
        self.contacts.get(id).await.ok_or_else(Collection::<Contact>::not_found)
    }

    pub async fn submit(&self, input: NewContact) -> SiteResult<Contact> {
        let contact = input.validate()?;
        let saved = self.contacts.insert(contact).await?;
        info!("Contact submission {} received", saved.id);
        Ok(saved)
    }

    pub async fn update(&self, id: Uuid, patch: ContactPatch) -> SiteResult<Contact> {
        let patch = patch.validate()?;
        self.contacts
            .update(id, |c| patch.apply(c))
            .await?
            .ok_or_else(Collection::<Contact>::not_found)
    }

    pub async fn delete(&self, id: Uuid) -> SiteResult<Contact> {
        self.contacts.remove(id).await?.ok_or_else(Collection::<Contact>::not_found)
    }

    pub async fn count(&self) -> usize {
        self.contacts.len().await
    }
}
