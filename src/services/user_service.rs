use std::sync::Arc;

use log::info;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::{SiteError, SiteResult};
use crate::store::Collection;
use crate::types::{NewUser, PublicUser, User, UserPatch};

/// Admin console accounts. Usernames and emails are unique, ignoring case.
///
/// Passwords are stored as given and never leave this service.
pub struct UserService {
    users: Arc<Collection<User>>,
    gate: Mutex<()>,
}

impl UserService {
    pub fn new(users: Arc<Collection<User>>) -> Self {
        Self { users, gate: Mutex::new(()) }
    }

    /// Oldest accounts first
    pub async fn list(&self) -> Vec<PublicUser> {
        let mut all = self.users.all().await;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        all.into_iter().map(PublicUser::from).collect()
    }

    pub async fn get(&self, id: Uuid) -> SiteResult<PublicUser> {
        self.find(id).await.map(PublicUser::from)
    }

    pub async fn create(&self, input: NewUser) -> SiteResult<PublicUser> {
        let user = input.validate()?;
        let _guard = self.gate.lock().await;

        let username = user.username.to_lowercase();
        let email = user.email.to_lowercase();
        let clash = self
            .users
            .find_one(|u| u.username.to_lowercase() == username || u.email.to_lowercase() == email)
            .await;
        if clash.is_some() {
            return Err(SiteError::Conflict("User with this email or username already exists".to_string()));
        }

        let created = self.users.insert(user).await?;
        info!("User '{}' created", created.username);
        Ok(created.into())
    }

    pub async fn update(&self, id: Uuid, patch: UserPatch) -> SiteResult<PublicUser> {
        let patch = patch.validate()?;
        let _guard = self.gate.lock().await;
        let existing = self.find(id).await?;

        if let Some(username) = patch.username.as_deref().filter(|u| *u != existing.username) {
            let wanted = username.to_lowercase();
            self.ensure_free(id, |u| u.username.to_lowercase() == wanted, "Username already taken")
                .await?;
        }
        if let Some(email) = patch.email.as_deref().filter(|e| *e != existing.email) {
            let wanted = email.to_lowercase();
            self.ensure_free(id, |u| u.email.to_lowercase() == wanted, "Email already in use")
                .await?;
        }

        let updated = self
            .users
            .update(id, |u| patch.apply(u))
            .await?
            .ok_or_else(Collection::<User>::not_found)?;
        Ok(updated.into())
    }

    pub async fn delete(&self, id: Uuid) -> SiteResult<PublicUser> {
        let removed = self.users.remove(id).await?.ok_or_else(Collection::<User>::not_found)?;
        info!("User '{}' deleted", removed.username);
        Ok(removed.into())
    }

    pub async fn count(&self) -> usize {
        self.users.len().await
    }

    async fn find(&self, id: Uuid) -> SiteResult<User> {
        self.users.get(id).await.ok_or_else(Collection::<User>::not_found)
    }

    async fn ensure_free(&self, id: Uuid, taken: impl Fn(&User) -> bool, message: &str) -> SiteResult<()> {
        match self.users.find_one(|u| u.id != id && taken(u)).await {
            Some(_) => Err(SiteError::Conflict(message.to_string())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser { username: username.into(), email: email.into(), password: "pw".into(), ..NewUser::default() }
    }

    fn service() -> UserService {
        UserService::new(Arc::new(Collection::in_memory()))
    }

    #[tokio::test]
    async fn username_and_email_are_unique() {
        let svc = service();
        svc.create(new_user("ravi", "ravi@example.org")).await.unwrap();
        assert!(matches!(
            svc.create(new_user("RAVI", "other@example.org")).await,
            Err(SiteError::Conflict(_))
        ));
        assert!(matches!(
            svc.create(new_user("other", "Ravi@Example.org")).await,
            Err(SiteError::Conflict(_))
        ));
        assert_eq!(svc.count().await, 1);
    }

    #[tokio::test]
    async fn update_checks_other_accounts_only() {
        let svc = service();
        let ravi = svc.create(new_user("ravi", "ravi@example.org")).await.unwrap();
        svc.create(new_user("meera", "meera@example.org")).await.unwrap();

        let same = UserPatch { username: Some("ravi".into()), role: Some(UserRole::Admin), ..UserPatch::default() };
        assert_eq!(svc.update(ravi.id, same).await.unwrap().role, UserRole::Admin);

        let taken = UserPatch { email: Some("meera@example.org".into()), ..UserPatch::default() };
        match svc.update(ravi.id, taken).await {
            Err(SiteError::Conflict(msg)) => assert_eq!(msg, "Email already in use"),
            other => panic!("expected Conflict, got {other:?}"),
        }
        assert_eq!(svc.get(ravi.id).await.unwrap().email, "ravi@example.org");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_signups_keep_usernames_unique() {
        let svc = Arc::new(service());
        let mut tasks = Vec::new();
        for i in 0..8 {
            let svc = svc.clone();
            tasks.push(tokio::spawn(async move {
                svc.create(new_user("asha", &format!("asha{i}@example.org"))).await
            }));
        }
        let mut created = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(svc.count().await, 1);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let svc = service();
        assert!(matches!(svc.delete(Uuid::new_v4()).await, Err(SiteError::NotFound(_))));
    }
}
