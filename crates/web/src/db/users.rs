//! User repository backed by `PostgreSQL`.
//!
//! Queries are checked at runtime (`query_as` + `FromRow`) so building the
//! crate does not need a live database.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;

use userdesk_core::{Email, NewUser, User, UserId};

use super::{RepositoryError, UserRepository};

/// Row shape of the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: Email,
    age: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            age: row.age,
        }
    }
}

/// Repository for user database operations.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgUserRepository {
    /// Create a new user repository.
    ///
    /// Every call is abandoned after `query_timeout`; dropping the query
    /// future releases its connection back to the pool.
    #[must_use]
    pub const fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn with_deadline<T>(
        &self,
        query: impl Future<Output = Result<T, RepositoryError>> + Send,
    ) -> Result<T, RepositoryError> {
        tokio::time::timeout(self.query_timeout, query)
            .await
            .map_err(|_| RepositoryError::Timeout(self.query_timeout))?
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, RepositoryError> {
        self.with_deadline(async {
            let rows = sqlx::query_as::<_, UserRow>(
                r"
                SELECT id, name, email, age
                FROM users
                ORDER BY id
                LIMIT $1 OFFSET $2
                ",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        self.with_deadline(async {
            sqlx::query_as::<_, UserRow>(
                r"
                SELECT id, name, email, age
                FROM users
                WHERE id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::from)
            .ok_or(RepositoryError::NotFound)
        })
        .await
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        self.with_deadline(async {
            let id = sqlx::query_scalar::<_, UserId>(
                r"
                INSERT INTO users (name, email, age)
                VALUES ($1, $2, $3)
                RETURNING id
                ",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.age)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

            Ok(user.with_id(id))
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        self.with_deadline(async {
            let result = sqlx::query(
                r"
                UPDATE users
                SET name = $1, email = $2, age = $3
                WHERE id = $4
                ",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.age)
            .bind(user.id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
        .await
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        self.with_deadline(async {
            let result = sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
        .await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.with_deadline(async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}

/// Translate a failed insert/update. `email` is the only unique column a
/// write can collide on (`id` is generated).
fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::DuplicateEmail;
    }
    RepositoryError::Database(e)
}
