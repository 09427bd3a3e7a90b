//! In-memory repository and request helpers for handler tests.

#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use userdesk_core::{Email, NewUser, User, UserId};

use crate::config::{AppConfig, FileConfig};
use crate::db::{RepositoryError, UserRepository};
use crate::server;
use crate::state::AppState;

/// Which group of repository calls should fail with a database error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// `list` and `get`
    List,
    /// `create`, `update` and `delete`
    Write,
    /// `ping`
    Ping,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_id: i64,
    failure: Option<Failure>,
    last_list: Option<(i64, i64)>,
}

/// Vec-backed `UserRepository` with the same conflict and not-found rules as
/// the Postgres one.
#[derive(Clone, Default)]
pub struct FakeUsers {
    inner: Arc<Mutex<Inner>>,
}

impl FakeUsers {
    pub fn with_users(users: &[(&str, &str, i32)]) -> Self {
        let fake = Self::default();
        {
            let mut inner = fake.inner.lock().unwrap();
            for (name, email, age) in users {
                inner.next_id += 1;
                let user = NewUser {
                    name: (*name).to_owned(),
                    email: Email::parse(email).unwrap(),
                    age: *age,
                }
                .with_id(UserId::new(inner.next_id));
                inner.users.push(user);
            }
        }
        fake
    }

    pub fn failing(failure: Failure) -> Self {
        let fake = Self::default();
        fake.inner.lock().unwrap().failure = Some(failure);
        fake
    }

    /// `(limit, offset)` of the most recent `list` call.
    pub fn last_list(&self) -> Option<(i64, i64)> {
        self.inner.lock().unwrap().last_list
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(inner: &Inner, failure: Failure) -> Result<(), RepositoryError> {
        if inner.failure == Some(failure) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        inner.last_list = Some((limit, offset));
        Self::check(&inner, Failure::List)?;

        let mut users = inner.users.clone();
        users.sort_by_key(|u| u.id);
        Ok(users
            .into_iter()
            .skip(usize::try_from(offset).unwrap())
            .take(usize::try_from(limit).unwrap())
            .collect())
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, Failure::List)?;
        inner
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, Failure::Write)?;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::DuplicateEmail);
        }
        inner.next_id += 1;
        let user = user.with_id(UserId::new(inner.next_id));
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, Failure::Write)?;
        if inner
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepositoryError::DuplicateEmail);
        }
        let slot = inner
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check(&inner, Failure::Write)?;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        let inner = self.inner.lock().unwrap();
        Self::check(&inner, Failure::Ping)
    }
}

/// Configuration with only the required DSN set.
pub fn test_config() -> AppConfig {
    AppConfig::from_sources(FileConfig::default(), |key| {
        (key == "DATABASE_DSN").then(|| "postgres://localhost/userdesk_test".to_owned())
    })
    .unwrap()
}

/// The full application router over a fake repository.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(users: FakeUsers) -> Self {
        let state = AppState::new(test_config(), Arc::new(users));
        Self {
            router: server::router(state),
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        read(self.request(request).await).await
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap();
        self.request(request).await
    }

    pub async fn post_form_text(&self, uri: &str, body: &str) -> (StatusCode, String) {
        read(self.post_form(uri, body).await).await
    }
}

/// Status and body text of a response.
pub async fn read(response: Response<Body>) -> (StatusCode, String) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}
