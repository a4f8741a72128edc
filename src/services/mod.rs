pub mod catalog;
pub mod category_service;
pub mod contact_service;
pub mod faq_service;
pub mod markdown_service;
pub mod ordered_index;
pub mod user_service;

pub use catalog::{BlogFilter, SlugCatalog};
pub use category_service::CategoryService;
pub use contact_service::ContactService;
pub use faq_service::{FaqFilter, FaqService};
pub use markdown_service::{MarkdownService, RenderedMarkdown};
pub use ordered_index::{FaqIndex, MoveOutcome, OrderedIndex};
pub use user_service::UserService;
