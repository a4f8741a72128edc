use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SiteError;
use crate::store::Document;
use crate::utils::{non_blank, normalize_slug};

/// A document addressed publicly by a unique slug
pub trait Slugged: Document {
    fn slug(&self) -> &str;

    fn set_slug(&mut self, slug: String);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub cover_image: String,
    #[serde(default)]
    pub content: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub cover_image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_published: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

macro_rules! slugged_document {
    ($ty:ty, $kind:literal) => {
        impl Document for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> Uuid {
                self.id
            }

            fn assign(&mut self, id: Uuid, now: OffsetDateTime) {
                self.id = id;
                self.created_at = now;
                self.updated_at = now;
            }

            fn touch(&mut self, now: OffsetDateTime) {
                self.updated_at = now;
            }
        }

        impl Slugged for $ty {
            fn slug(&self) -> &str {
                &self.slug
            }

            fn set_slug(&mut self, slug: String) {
                self.slug = slug;
            }
        }
    };
}

slugged_document!(Service, "Service");
slugged_document!(Blog, "Blog");

/// Body of `POST /api/services`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewService {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub cover_image: String,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

impl NewService {
    pub fn validate(self) -> Result<Service, SiteError> {
        let (Some(_), Some(title), Some(description), Some(icon), Some(cover_image)) = (
            non_blank(&self.slug),
            non_blank(&self.title),
            non_blank(&self.description),
            non_blank(&self.icon),
            non_blank(&self.cover_image),
        ) else {
            return Err(SiteError::Validation(
                "Slug, title, description, icon, and coverImage are required".to_string(),
            ));
        };

        Ok(Service {
            id: Uuid::nil(),
            slug: normalize_slug(&self.slug)?,
            title,
            description,
            icon,
            cover_image,
            content: self.content.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }
}

/// Body of service updates; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub content: Option<String>,
    pub is_active: Option<bool>,
}

impl ServicePatch {
    pub fn validate(self) -> Result<Self, SiteError> {
        Ok(Self {
            slug: self.slug.as_deref().map(normalize_slug).transpose()?,
            title: required(self.title, "Title")?,
            description: required(self.description, "Description")?,
            icon: required(self.icon, "Icon")?,
            cover_image: required(self.cover_image, "Cover image")?,
            content: self.content,
            is_active: self.is_active,
        })
    }

    /// Copy every field except the slug, which the catalog guards
    pub fn apply(self, service: &mut Service) {
        if let Some(v) = self.title {
            service.title = v;
        }
        if let Some(v) = self.description {
            service.description = v;
        }
        if let Some(v) = self.icon {
            service.icon = v;
        }
        if let Some(v) = self.cover_image {
            service.cover_image = v;
        }
        if let Some(v) = self.content {
            service.content = v;
        }
        if let Some(v) = self.is_active {
            service.is_active = v;
        }
    }
}

/// Body of `POST /api/blogs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewBlog {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub is_published: Option<bool>,
}

impl NewBlog {
    pub fn validate(self) -> Result<Blog, SiteError> {
        let (Some(_), Some(title), Some(summary), Some(content), Some(author), Some(cover_image)) = (
            non_blank(&self.slug),
            non_blank(&self.title),
            non_blank(&self.summary),
            non_blank(&self.content),
            non_blank(&self.author),
            non_blank(&self.cover_image),
        ) else {
            return Err(SiteError::Validation("All required fields must be provided".to_string()));
        };

        Ok(Blog {
            id: Uuid::nil(),
            slug: normalize_slug(&self.slug)?,
            title,
            summary,
            content,
            author,
            cover_image,
            tags: clean_tags(self.tags),
            is_published: self.is_published.unwrap_or(true),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    pub slug: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

impl BlogPatch {
    pub fn validate(self) -> Result<Self, SiteError> {
        Ok(Self {
            slug: self.slug.as_deref().map(normalize_slug).transpose()?,
            title: required(self.title, "Title")?,
            summary: required(self.summary, "Summary")?,
            content: required(self.content, "Content")?,
            author: required(self.author, "Author")?,
            cover_image: required(self.cover_image, "Cover image")?,
            tags: self.tags.map(clean_tags),
            is_published: self.is_published,
        })
    }

    pub fn apply(self, blog: &mut Blog) {
        if let Some(v) = self.title {
            blog.title = v;
        }
        if let Some(v) = self.summary {
            blog.summary = v;
        }
        if let Some(v) = self.content {
            blog.content = v;
        }
        if let Some(v) = self.author {
            blog.author = v;
        }
        if let Some(v) = self.cover_image {
            blog.cover_image = v;
        }
        if let Some(v) = self.tags {
            blog.tags = v;
        }
        if let Some(v) = self.is_published {
            blog.is_published = v;
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<Option<String>, SiteError> {
    value
        .map(|raw| non_blank(&raw).ok_or_else(|| SiteError::Validation(format!("{} is required", field))))
        .transpose()
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags.iter().filter_map(|t| non_blank(t)) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
