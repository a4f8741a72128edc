use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SiteError;
use crate::store::Document;
use crate::utils::{check_email, non_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Responded,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Document for Contact {
    const KIND: &'static str = "Contact";

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

/// Contact form submission
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

impl NewContact {
    pub fn validate(self) -> Result<Contact, SiteError> {
        let (Some(name), Some(email), Some(message)) =
            (non_blank(&self.name), non_blank(&self.email), non_blank(&self.message))
        else {
            return Err(SiteError::Validation("Name, email, and message are required".to_string()));
        };
        check_email(&email)?;

        Ok(Contact {
            id: Uuid::nil(),
            name,
            email,
            phone: self.phone.as_deref().and_then(non_blank),
            message,
            status: ContactStatus::New,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }
}

/// Admin update of a submission, usually just its status
#[derive(Debug, Default, Deserialize)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub status: Option<ContactStatus>,
}

impl ContactPatch {
    pub fn validate(self) -> Result<Self, SiteError> {
        let name = self.name.map(|v| required(&v, "Name")).transpose()?;
        let email = self.email.map(|v| required(&v, "Email")).transpose()?;
        if let Some(email) = &email {
            check_email(email)?;
        }
        let message = self.message.map(|v| required(&v, "Message")).transpose()?;
        Ok(Self { name, email, phone: self.phone, message, status: self.status })
    }

    pub fn apply(self, contact: &mut Contact) {
        if let Some(v) = self.name {
            contact.name = v;
        }
        if let Some(v) = self.email {
            contact.email = v;
        }
        if let Some(v) = self.phone {
            contact.phone = non_blank(&v);
        }
        if let Some(v) = self.message {
            contact.message = v;
        }
        if let Some(v) = self.status {
            contact.status = v;
        }
    }
}

fn required(value: &str, field: &str) -> Result<String, SiteError> {
    non_blank(value).ok_or_else(|| SiteError::Validation(format!("{} is required", field)))
}
