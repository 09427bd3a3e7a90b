//! View-models rendered by askama.
//!
//! Templates live in `crates/web/templates/` and are compiled into the binary.

use askama::Template;
use askama_web::WebTemplate;
use serde::Deserialize;

use userdesk_core::{PageRequest, PageWindow, User, UserId};

/// Raw user form fields, echoed back when a submission is rejected.
///
/// Missing fields deserialize as empty strings so they fail validation
/// instead of the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub age: String,
}

/// Paginated list with the create form.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersPage {
    pub users: Vec<User>,
    pub form: UserForm,
    pub error: Option<String>,
    pub window: PageWindow,
}

impl UsersPage {
    /// A populated list page.
    #[must_use]
    pub fn listing(users: Vec<User>, window: PageWindow) -> Self {
        Self {
            users,
            form: UserForm::default(),
            error: None,
            window,
        }
    }

    /// An empty first page carrying only an error message.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            users: Vec::new(),
            form: UserForm::default(),
            error: Some(error.into()),
            window: PageRequest::default().window(),
        }
    }
}

/// Field values shown on the edit form.
///
/// `age` stays a string so a rejected submission is echoed verbatim.
#[derive(Debug, Clone)]
pub struct EditUserView {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub age: String,
}

impl From<&User> for EditUserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.to_string(),
            age: user.age.to_string(),
        }
    }
}

impl EditUserView {
    #[must_use]
    pub fn from_form(id: UserId, form: UserForm) -> Self {
        Self {
            id,
            name: form.name,
            email: form.email,
            age: form.age,
        }
    }
}

/// Single-user edit form.
#[derive(Template, WebTemplate)]
#[template(path = "users/edit.html")]
pub struct EditPage {
    pub user: Option<EditUserView>,
    pub error: Option<String>,
}

impl EditPage {
    #[must_use]
    pub fn error(user: Option<EditUserView>, error: impl Into<String>) -> Self {
        Self {
            user,
            error: Some(error.into()),
        }
    }
}

/// Generic error page.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub status: u16,
    pub message: String,
}
