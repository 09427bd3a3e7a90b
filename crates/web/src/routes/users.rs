//! User CRUD route handlers.
//!
//! Each handler runs the same linear pipeline: parse and validate the
//! request, call the repository once, then map the outcome to a status code
//! and a view. Nothing is retried.

use axum::{
    Form,
    extract::{Path, Query, State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use userdesk_core::{PageRequest, UserId, validate_user_input};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::views::{EditPage, EditUserView, UserForm, UsersPage};

/// Where a successful create lands: the first page with default size.
pub const CREATED_REDIRECT: &str = "/users?page=1&limit=10";
/// Where a successful update or delete lands.
pub const LIST_REDIRECT: &str = "/users";

const DUPLICATE_EMAIL: &str = "email already exists";
const USER_NOT_FOUND: &str = "user not found";
const INVALID_ID: &str = "invalid id";

/// Raw list query. Values are validated by [`PageRequest::resolve`].
#[derive(Debug, Default)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    /// Keep the first value of each parameter. Repeats are ignored.
    #[must_use]
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "limit" => &mut query.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// A body that is not a urlencoded form counts as all fields empty.
fn form_or_empty(form: std::result::Result<Form<UserForm>, FormRejection>) -> UserForm {
    match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            tracing::debug!(%rejection, "Unreadable form body");
            UserForm::default()
        }
    }
}

/// Paginated user list.
///
/// GET /users?page=&limit=
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let query = ListQuery::from_pairs(pairs);
    let request = match PageRequest::resolve(query.page.as_deref(), query.limit.as_deref()) {
        Ok(request) => request,
        Err(e) => {
            // A bad limit still shows the requested page number
            let window = PageRequest::resolve(query.page.as_deref(), None)
                .unwrap_or_default()
                .window();
            let page = UsersPage {
                window,
                ..UsersPage::failed(e.to_string())
            };
            return (StatusCode::BAD_REQUEST, page).into_response();
        }
    };

    match state.users().list(request.limit(), request.offset()).await {
        Ok(users) => UsersPage::listing(users, request.window()).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch users");
            let page = UsersPage {
                window: request.window(),
                ..UsersPage::failed("failed to fetch users")
            };
            (StatusCode::INTERNAL_SERVER_ERROR, page).into_response()
        }
    }
}

/// Create a user.
///
/// POST /users
///
/// A rejected submission re-renders the first list page with the submitted
/// values and the reason.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    form: std::result::Result<Form<UserForm>, FormRejection>,
) -> Response {
    let form = form_or_empty(form);
    let new_user = match validate_user_input(&form.name, &form.email, &form.age) {
        Ok(user) => user,
        Err(e) => {
            return list_with_form(&state, StatusCode::BAD_REQUEST, e.to_string(), form).await;
        }
    };

    match state.users().create(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User created");
            Redirect::to(CREATED_REDIRECT).into_response()
        }
        Err(RepositoryError::DuplicateEmail) => {
            list_with_form(&state, StatusCode::BAD_REQUEST, DUPLICATE_EMAIL, form).await
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create user");
            list_with_form(
                &state,
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to create user",
                form,
            )
            .await
        }
    }
}

/// Edit form for one user.
///
/// GET /users/{id}
#[instrument(skip(state))]
pub async fn edit(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Ok(id) = raw_id.parse::<UserId>() else {
        return (StatusCode::BAD_REQUEST, EditPage::error(None, INVALID_ID)).into_response();
    };

    match state.users().get(id).await {
        Ok(user) => EditPage {
            user: Some(EditUserView::from(&user)),
            error: None,
        }
        .into_response(),
        Err(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, EditPage::error(None, USER_NOT_FOUND)).into_response()
        }
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to fetch user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                EditPage::error(None, "failed to fetch user"),
            )
                .into_response()
        }
    }
}

/// Update a user.
///
/// POST /users/{id}
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    form: std::result::Result<Form<UserForm>, FormRejection>,
) -> Response {
    let form = form_or_empty(form);
    let Ok(id) = raw_id.parse::<UserId>() else {
        return (StatusCode::BAD_REQUEST, EditPage::error(None, INVALID_ID)).into_response();
    };

    let user = match validate_user_input(&form.name, &form.email, &form.age) {
        Ok(new_user) => new_user.with_id(id),
        Err(e) => {
            let echo = EditUserView::from_form(id, form);
            return (StatusCode::BAD_REQUEST, EditPage::error(Some(echo), e.to_string()))
                .into_response();
        }
    };

    let (status, message) = match state.users().update(&user).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User updated");
            return Redirect::to(LIST_REDIRECT).into_response();
        }
        Err(RepositoryError::DuplicateEmail) => (StatusCode::BAD_REQUEST, DUPLICATE_EMAIL),
        Err(RepositoryError::NotFound) => (StatusCode::NOT_FOUND, USER_NOT_FOUND),
        Err(e) => {
            tracing::error!(user_id = %id, error = %e, "Failed to update user");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to update user")
        }
    };

    let echo = EditUserView::from_form(id, form);
    (status, EditPage::error(Some(echo), message)).into_response()
}

/// Delete a user.
///
/// POST /users/{id}/delete
///
/// Deleting an id that does not exist is a 404, the same as get and update.
#[instrument(skip(state))]
pub async fn delete(State(state): State<AppState>, Path(raw_id): Path<String>) -> Result<Redirect> {
    let id = raw_id
        .parse::<UserId>()
        .map_err(|_| AppError::BadRequest(INVALID_ID.to_owned()))?;

    match state.users().delete(id).await {
        Ok(()) => {
            tracing::info!(user_id = %id, "User deleted");
            Ok(Redirect::to(LIST_REDIRECT))
        }
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(USER_NOT_FOUND.to_owned())),
        Err(e) => Err(AppError::repository("failed to delete user", e)),
    }
}

/// Re-render the first list page around a rejected create form.
async fn list_with_form(
    state: &AppState,
    status: StatusCode,
    message: impl Into<String>,
    form: UserForm,
) -> Response {
    let request = PageRequest::default();

    match state.users().list(request.limit(), request.offset()).await {
        Ok(users) => {
            let page = UsersPage {
                users,
                form,
                error: Some(message.into()),
                window: request.window(),
            };
            (status, page).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch users");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                UsersPage::failed("failed to fetch users"),
            )
                .into_response()
        }
    }
}
