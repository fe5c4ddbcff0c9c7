use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    #[instrument(skip(self, password_hash))]
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User> {
        trace!("Inserting user row");
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES (?, ?)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                anyhow::Error::from(DomainError::UsernameTaken)
            } else {
                anyhow::Error::from(e)
            }
        })?;

        debug!(user_id = user.id, username = %user.username, "User saved");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        match &user {
            Some(u) => debug!(user_id = u.id, "User found"),
            None => trace!("User not found"),
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn count_users(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_pool;

    #[tokio::test]
    async fn test_create_user_assigns_id() {
        let repo = SqliteUserRepository::new(test_pool().await);

        let user = repo.create_user("admin", "hash123").await.unwrap();
        assert!(user.id > 0);
        assert_eq!(user.username, "admin");
        assert_eq!(user.password_hash, "hash123");
    }

    #[tokio::test]
    async fn test_find_user_by_username() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let created = repo.create_user("perawat", "hash").await.unwrap();

        let found = repo
            .find_user_by_username("perawat")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);

        assert!(
            repo.find_user_by_username("nobody")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_find_user_by_username_case_sensitive() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create_user("Admin", "hash").await.unwrap();

        assert!(repo.find_user_by_username("admin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_id() {
        let repo = SqliteUserRepository::new(test_pool().await);
        let created = repo.create_user("dokter", "hash").await.unwrap();

        let found = repo.find_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.username, "dokter");
        assert!(
            repo.find_user_by_id(created.id + 100)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_is_username_taken() {
        let repo = SqliteUserRepository::new(test_pool().await);
        repo.create_user("admin", "hash1").await.unwrap();

        let err = repo.create_user("admin", "hash2").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::UsernameTaken)
        ));
        assert_eq!(repo.count_users().await.unwrap(), 1);
    }
}
