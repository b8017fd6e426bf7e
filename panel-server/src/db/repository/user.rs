//! User repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{User, UserCreate, UserUpdate};
use shared::models::Role;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(users)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let pure_id = strip_table_prefix(USER_TABLE, id);
        let user: Option<User> = self.base.db().select((USER_TABLE, pure_id)).await?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_string()))
            .await?
            .take(0)?;
        Ok(users.into_iter().next())
    }

    /// Resolve recipient emails to active user accounts. Unknown or
    /// inactive addresses are simply absent from the result.
    pub async fn find_active_by_emails(&self, emails: &[String]) -> RepoResult<Vec<User>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email IN $emails AND is_active = true")
            .bind(("emails", emails.to_vec()))
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Create a user, rejecting duplicate emails.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "email '{}' already registered",
                data.email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Validation(format!("password hashing failed: {e}")))?;

        let now = now_millis();
        let user = User {
            id: None,
            email: data.email,
            name: data.name,
            hash_pass,
            role: data.role,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<User> = self.base.db().create(USER_TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Partial update. Last write wins; no version check is performed.
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let mut user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("user '{id}' not found")))?;

        if let Some(email) = data.email {
            if email != user.email {
                if self.find_by_email(&email).await?.is_some() {
                    return Err(RepoError::Duplicate(format!(
                        "email '{email}' already registered"
                    )));
                }
                user.email = email;
            }
        }
        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(password) = data.password {
            user.hash_pass = User::hash_password(&password)
                .map_err(|e| RepoError::Validation(format!("password hashing failed: {e}")))?;
        }
        if let Some(role) = data.role {
            user.role = role;
        }
        if let Some(is_active) = data.is_active {
            user.is_active = is_active;
        }
        user.updated_at = now_millis();

        let pure_id = strip_table_prefix(USER_TABLE, id).to_string();
        let id_for_update = user.id.clone();
        let updated: Option<User> = match id_for_update {
            Some(rid) => self.base.db().update(rid).content(user).await?,
            None => {
                self.base
                    .db()
                    .update((USER_TABLE, pure_id))
                    .content(user)
                    .await?
            }
        };
        updated.ok_or_else(|| RepoError::Database("Failed to update user".to_string()))
    }

    /// Delete several users at once.
    ///
    /// Refuses the whole batch when it would leave the system without
    /// any active admin account.
    pub async fn bulk_delete(&self, ids: &[String]) -> RepoResult<u32> {
        let pure_ids: Vec<String> = ids
            .iter()
            .map(|id| strip_table_prefix(USER_TABLE, id).to_string())
            .collect();

        let remaining: Vec<User> = self
            .base
            .db()
            .query(
                "SELECT * FROM user \
                 WHERE role = $role AND is_active = true \
                 AND record::id(id) NOT IN $ids",
            )
            .bind(("role", Role::Admin))
            .bind(("ids", pure_ids.clone()))
            .await?
            .take(0)?;

        if remaining.is_empty() {
            return Err(RepoError::BusinessRule(
                "cannot delete the last active admin account".to_string(),
            ));
        }

        let mut deleted = 0u32;
        for pure_id in pure_ids {
            let removed: Option<User> = self.base.db().delete((USER_TABLE, pure_id)).await?;
            if removed.is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    async fn repo() -> UserRepository {
        let svc = DbService::memory().await.unwrap();
        UserRepository::new(svc.db)
    }

    fn make(email: &str, role: Role) -> UserCreate {
        UserCreate {
            email: email.to_string(),
            name: email.split('@').next().unwrap().to_string(),
            password: "password123".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let repo = repo().await;
        let created = repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        assert!(created.id.is_some());
        assert!(created.is_active);

        let found = repo.find_by_email("ada@example.com").await.unwrap();
        assert_eq!(found.unwrap().name, "ada");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = repo().await;
        repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        let err = repo.create(make("ada@example.com", Role::Employee)).await;
        assert!(matches!(err, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_active_by_emails_skips_inactive() {
        let repo = repo().await;
        repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        let bob = repo.create(make("bob@example.com", Role::Employee)).await.unwrap();
        let bob_id = bob.id.unwrap().key().to_string();
        repo.update(
            &bob_id,
            UserUpdate {
                email: None,
                name: None,
                password: None,
                role: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();

        let found = repo
            .find_active_by_emails(&[
                "ada@example.com".to_string(),
                "bob@example.com".to_string(),
                "ghost@example.com".to_string(),
            ])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_bulk_delete_refuses_removing_last_admin() {
        let repo = repo().await;
        let admin = repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        repo.create(make("bob@example.com", Role::Employee)).await.unwrap();

        let admin_id = admin.id.unwrap().key().to_string();
        let err = repo.bulk_delete(&[admin_id]).await;
        assert!(matches!(err, Err(RepoError::BusinessRule(_))));

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_delete_allows_when_another_admin_remains() {
        let repo = repo().await;
        let a = repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        repo.create(make("eve@example.com", Role::Admin)).await.unwrap();
        repo.create(make("bob@example.com", Role::Employee)).await.unwrap();

        let a_id = a.id.unwrap().key().to_string();
        let deleted = repo.bulk_delete(&[a_id]).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(repo.find_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_password_changes_hash() {
        let repo = repo().await;
        let u = repo.create(make("ada@example.com", Role::Admin)).await.unwrap();
        let id = u.id.clone().unwrap().key().to_string();
        let updated = repo
            .update(
                &id,
                UserUpdate {
                    email: None,
                    name: None,
                    password: Some("newpassword9".to_string()),
                    role: None,
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert!(updated.verify_password("newpassword9").unwrap());
        assert!(!updated.verify_password("password123").unwrap());
    }
}
