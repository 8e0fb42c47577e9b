//! Lending against a real PostgreSQL database.
//!
//! Skipped unless `TEST_DATABASE_URL` points at a disposable database; the
//! embedded migrations are applied first.

use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::future::join_all;
use library_rs::AppState;
use library_rs::api::routes::create_router;
use library_rs::config::settings::ServerConfig;
use library_rs::config::{DatabaseConfig, JwtConfig};
use library_rs::db::{AsyncDbPool, establish_async_connection_pool, run_pending_migrations};
use library_rs::models::{NewBook, NewReader};
use library_rs::repositories::Repositories;
use library_rs::services::{BorrowError, BorrowService};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn pool() -> Option<AsyncDbPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    run_pending_migrations(url.clone()).await.unwrap();

    let config = DatabaseConfig {
        url,
        max_connections: 20,
        ..DatabaseConfig::default()
    };
    Some(establish_async_connection_pool(&config).await.unwrap())
}

async fn setup() -> Option<(Repositories, BorrowService)> {
    let repos = Repositories::new(pool().await?, 2_000);
    let borrows = BorrowService::new(Arc::new(repos.borrows.clone()));
    Some((repos, borrows))
}

fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

async fn book(repos: &Repositories, copies: i32) -> i32 {
    repos
        .books
        .create(NewBook {
            title: unique("title"),
            author: "Test Author".to_string(),
            year: Some(2001),
            isbn: None,
            copies_available: copies,
            description: None,
        })
        .await
        .unwrap()
        .id
}

async fn reader(repos: &Repositories) -> i32 {
    repos
        .readers
        .create(NewReader {
            name: "Test Reader".to_string(),
            email: format!("{}@example.com", unique("reader")),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_last_copy_race_in_postgres() {
    let Some((repos, service)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let book_id = book(&repos, 1).await;
    let mut readers = Vec::new();
    for _ in 0..8 {
        readers.push(reader(&repos).await);
    }

    let results = join_all(readers.iter().map(|&reader_id| {
        let service = service.clone();
        tokio::spawn(async move { service.borrow(book_id, reader_id).await })
    }))
    .await;

    let granted = results
        .into_iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    assert_eq!(granted, 1);
    let stored = repos.books.find_by_id(book_id).await.unwrap().unwrap();
    assert_eq!(stored.copies_available, 0);
}

#[tokio::test]
async fn test_borrow_return_cycle_in_postgres() {
    let Some((repos, service)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let book_id = book(&repos, 2).await;
    let reader_id = reader(&repos).await;

    let record = service.borrow(book_id, reader_id).await.unwrap();
    assert_eq!(service.list_active(reader_id).await.unwrap().len(), 1);

    let returned = service.return_book(record.id).await.unwrap();
    assert!(returned.return_date.is_some());
    assert!(matches!(
        service.return_book(record.id).await,
        Err(BorrowError::AlreadyReturned)
    ));

    let stored = repos.books.find_by_id(book_id).await.unwrap().unwrap();
    assert_eq!(stored.copies_available, 2);
}

#[tokio::test]
async fn test_limit_and_missing_rows_in_postgres() {
    let Some((repos, service)) = setup().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let reader_id = reader(&repos).await;
    for _ in 0..3 {
        let book_id = book(&repos, 1).await;
        service.borrow(book_id, reader_id).await.unwrap();
    }
    let fourth = book(&repos, 1).await;
    assert!(matches!(
        service.borrow(fourth, reader_id).await,
        Err(BorrowError::BorrowLimitExceeded)
    ));
    assert!(matches!(
        service.borrow(i32::MAX, reader_id).await,
        Err(BorrowError::BookNotFound(_))
    ));
    assert!(matches!(
        service.get(i32::MAX).await,
        Err(BorrowError::RecordNotFound(_))
    ));
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let mut request = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let response = app
        .clone()
        .oneshot(request.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_login_and_borrow_through_router() {
    let Some(pool) = pool().await else {
        eprintln!("TEST_DATABASE_URL not set, skipping");
        return;
    };
    let repos = Repositories::new(pool.clone(), 2_000);
    let jwt = JwtConfig {
        secret: "0123456789abcdef0123456789abcdef".to_string(),
        ..JwtConfig::default()
    };
    let app = create_router(AppState::new(pool, jwt, 2_000), &ServerConfig::default());

    let email = format!("{}@example.com", unique("librarian"));
    let (status, _) = post_json(
        &app,
        "/auth/register",
        None,
        json!({ "email": email, "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Wrong passwords shorter than the registration minimum still count as bad credentials
    let (status, body) = post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": email, "password": "abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, body) = post_json(
        &app,
        "/auth/login",
        None,
        json!({ "email": email, "password": "secret1" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_string();

    let book_id = book(&repos, 1).await;
    let reader_id = reader(&repos).await;
    let (status, body) = post_json(
        &app,
        "/borrow",
        Some(&token),
        json!({ "book_id": book_id, "reader_id": reader_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book_id"], book_id);

    let (status, body) = post_json(
        &app,
        "/borrow",
        Some(&token),
        json!({ "book_id": book_id, "reader_id": reader_id }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NO_AVAILABLE_COPIES");
}
