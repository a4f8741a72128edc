use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::errors::SiteError;
use crate::store::Document;
use crate::utils::{check_email, non_blank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Admin console account as stored; never sent to clients directly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Document for User {
    const KIND: &'static str = "User";

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

/// A user without the password, the only shape the API returns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of `POST /api/users`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Option<UserRole>,
    pub is_verified: Option<bool>,
}

impl NewUser {
    pub fn validate(self) -> Result<User, SiteError> {
        let (Some(username), Some(email), false) =
            (non_blank(&self.username), non_blank(&self.email), self.password.is_empty())
        else {
            return Err(SiteError::Validation("Username, email, and password are required".to_string()));
        };
        check_email(&email)?;

        Ok(User {
            id: Uuid::nil(),
            username,
            email,
            password: self.password,
            role: self.role.unwrap_or_default(),
            is_verified: self.is_verified.unwrap_or(false),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
    }
}

/// Body of `PUT /api/users/{id}`; the password is not editable here
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_verified: Option<bool>,
}

impl UserPatch {
    pub fn validate(self) -> Result<Self, SiteError> {
        let username = self
            .username
            .map(|v| non_blank(&v).ok_or_else(|| SiteError::Validation("Username is required".to_string())))
            .transpose()?;
        let email = self
            .email
            .map(|v| non_blank(&v).ok_or_else(|| SiteError::Validation("Email is required".to_string())))
            .transpose()?;
        if let Some(email) = &email {
            check_email(email)?;
        }
        Ok(Self { username, email, role: self.role, is_verified: self.is_verified })
    }

    pub fn apply(self, user: &mut User) {
        if let Some(v) = self.username {
            user.username = v;
        }
        if let Some(v) = self.email {
            user.email = v;
        }
        if let Some(v) = self.role {
            user.role = v;
        }
        if let Some(v) = self.is_verified {
            user.is_verified = v;
        }
    }
}
