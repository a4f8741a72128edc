mod contact;
mod content;
mod faq;
mod user;

use std::sync::Arc;

pub use contact::{Contact, ContactPatch, ContactStatus, NewContact};
pub use content::{Blog, BlogPatch, NewBlog, NewService, Service, ServicePatch, Slugged};
pub use faq::{Category, CategoryInput, Direction, Faq, FaqPatch, NewFaq, ReorderRequest};
pub use user::{NewUser, PublicUser, User, UserPatch, UserRole};

use crate::config::Config;
use crate::services::{
    CategoryService, ContactService, FaqIndex, FaqService, MarkdownService, SlugCatalog, UserService,
};
use crate::store::Store;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub faqs: Arc<FaqService>,
    pub categories: Arc<CategoryService>,
    pub services: Arc<SlugCatalog<Service>>,
    pub blogs: Arc<SlugCatalog<Blog>>,
    pub contacts: Arc<ContactService>,
    pub users: Arc<UserService>,
    pub markdown: Arc<MarkdownService>,
}

impl AppState {
    /// Wire every service onto one store
    pub fn new(config: Config, store: Store) -> Self {
        let index = Arc::new(FaqIndex::new(store.faqs.clone()));
        Self {
            faqs: Arc::new(FaqService::new(store.faqs.clone(), index.clone())),
            categories: Arc::new(CategoryService::new(store.categories.clone(), index)),
            services: Arc::new(SlugCatalog::new(store.services.clone())),
            blogs: Arc::new(SlugCatalog::new(store.blogs.clone())),
            contacts: Arc::new(ContactService::new(store.contacts.clone())),
            users: Arc::new(UserService::new(store.users.clone())),
            markdown: Arc::new(MarkdownService::new()),
            config: Arc::new(config),
        }
    }
}
