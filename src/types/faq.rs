use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SiteError;
use crate::store::{Document, Ordered};
use crate::utils::non_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    pub category: String,
    pub is_active: bool,
    pub order: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Document for Faq {
    const KIND: &'static str = "FAQ";

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

impl Ordered for Faq {
    fn category(&self) -> &str {
        &self.category
    }

    fn order(&self) -> u32 {
        self.order
    }

    fn place(&mut self, category: &str, order: u32) {
        if self.category != category {
            self.category = category.to_string();
        }
        self.order = order;
    }
}

/// Body of `POST /api/faqs`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFaq {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "isVisible")]
    pub is_active: Option<bool>,
}

impl NewFaq {
    /// Check required fields and build an unplaced FAQ
    pub fn validate(self) -> Result<Faq, SiteError> {
        let (Some(question), Some(answer), Some(category)) = (
            non_blank(&self.question),
            non_blank(&self.answer),
            non_blank(&self.category),
        ) else {
            return Err(SiteError::Validation(
                "Missing required fields: question, answer, and category are required".to_string(),
            ));
        };

        Ok(Faq {
            id: Uuid::nil(),
            question,
            answer,
            category,
            is_active: self.is_active.unwrap_or(true),
            order: 0,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }
}

/// Body of `PUT /api/faqs/{id}`; absent fields are left alone
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPatch {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    #[serde(alias = "isVisible")]
    pub is_active: Option<bool>,
    pub order: Option<u32>,
}

impl FaqPatch {
    /// Trim text fields and reject ones that were sent blank
    pub fn validate(self) -> Result<Self, SiteError> {
        Ok(Self {
            question: required_if_present(self.question, "Question")?,
            answer: required_if_present(self.answer, "Answer")?,
            category: required_if_present(self.category, "Category")?,
            is_active: self.is_active,
            order: self.order,
        })
    }

    /// Copy the non-positional fields onto `faq`
    pub fn apply_fields(&self, faq: &mut Faq) {
        if let Some(question) = &self.question {
            faq.question = question.clone();
        }
        if let Some(answer) = &self.answer {
            faq.answer = answer.clone();
        }
        if let Some(is_active) = self.is_active {
            faq.is_active = is_active;
        }
    }

    pub fn has_fields(&self) -> bool {
        self.question.is_some() || self.answer.is_some() || self.is_active.is_some()
    }
}

fn required_if_present(value: Option<String>, field: &str) -> Result<Option<String>, SiteError> {
    match value {
        None => Ok(None),
        Some(raw) => non_blank(&raw)
            .map(Some)
            .ok_or_else(|| SiteError::Validation(format!("{} is required", field))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FromStr for Direction {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(SiteError::Validation("Direction must be 'up' or 'down'".to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Body of `POST /api/faqs/reorder`
#[derive(Debug, Default, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Category {
    pub fn new(name: String) -> Self {
        Self {
            id: Uuid::nil(),
            name,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

impl Document for Category {
    const KIND: &'static str = "Category";

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

/// Body of category create and rename
#[derive(Debug, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
}

impl CategoryInput {
    pub fn validate(self) -> Result<String, SiteError> {
        non_blank(&self.name).ok_or_else(|| SiteError::Validation("Category name is required".to_string()))
    }
}
