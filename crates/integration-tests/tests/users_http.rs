//! HTTP tests for the users pages.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p userdesk-web)
//!
//! Set `USERDESK_BASE_URL` when the server is not on localhost:8080.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use reqwest::{StatusCode, header};
use userdesk_integration_tests::{base_url, http_client, unique_email};

/// Create a user through the form and return the id parsed from the list.
async fn create_user(client: &reqwest::Client, email: &str) -> String {
    let base_url = base_url();
    let resp = client
        .post(format!("{base_url}/users"))
        .form(&[("name", "Http Test"), ("email", email), ("age", "30")])
        .send()
        .await
        .expect("Failed to create user");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    // New ids are the largest, so walk pages until the row shows up
    for page in 1.. {
        let body = client
            .get(format!("{base_url}/users?page={page}&limit=100"))
            .send()
            .await
            .expect("Failed to list users")
            .text()
            .await
            .expect("Failed to read response");
        if let Some(row) = body.split("<tr>").find(|row| row.contains(email)) {
            let start = row.find("/users/").expect("row links to user") + "/users/".len();
            let id: String = row[start..]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            return id;
        }
        assert!(body.contains("/users/"), "user {email} never listed");
    }
    unreachable!()
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health() {
    let resp = http_client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_create_redirects_to_first_page() {
    let client = http_client();
    let resp = client
        .post(format!("{}/users", base_url()))
        .form(&[
            ("name", "Redirect"),
            ("email", unique_email("redirect").as_str()),
            ("age", "41"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/users?page=1&limit=10"
    );
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_create_rejects_invalid_email() {
    let resp = http_client()
        .post(format!("{}/users", base_url()))
        .form(&[("name", "Bad"), ("email", "not-an-email"), ("age", "20")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("invalid email format"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_duplicate_email_is_rejected() {
    let client = http_client();
    let email = unique_email("dup");
    let id = create_user(&client, &email).await;

    let resp = client
        .post(format!("{}/users", base_url()))
        .form(&[("name", "Again"), ("email", email.as_str()), ("age", "22")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("email already exists"));

    client
        .post(format!("{}/users/{id}/delete", base_url()))
        .send()
        .await
        .unwrap();
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_edit_update_delete() {
    let client = http_client();
    let base_url = base_url();
    let id = create_user(&client, &unique_email("edit")).await;

    let resp = client
        .get(format!("{base_url}/users/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let new_email = unique_email("edited");
    let resp = client
        .post(format!("{base_url}/users/{id}"))
        .form(&[("name", "Edited"), ("email", new_email.as_str()), ("age", "31")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let body = client
        .get(format!("{base_url}/users/{id}"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(&new_email));

    let resp = client
        .post(format!("{base_url}/users/{id}/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let resp = client
        .get(format!("{base_url}/users/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_invalid_pagination() {
    let client = http_client();

    let resp = client
        .get(format!("{}/users?page=0", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("invalid page"));

    let resp = client
        .get(format!("{}/users?limit=-1", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.text().await.unwrap().contains("invalid limit"));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_delete_missing_user() {
    let resp = http_client()
        .post(format!("{}/users/{}/delete", base_url(), i64::MAX))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.text().await.unwrap().contains("user not found"));
}
