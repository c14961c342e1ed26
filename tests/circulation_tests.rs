//! Circulation engine and request workflow tests
//!
//! These run against a real Postgres instance with the migrations applied:
//!
//!     DATABASE_URL=postgres://... cargo test -- --ignored

use std::time::{SystemTime, UNIX_EPOCH};

use rust_decimal_macros::dec;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

use circulation_server::{
    config::CirculationConfig,
    error::AppError,
    models::{CopyStatus, RequestDecision, RequestStatus, TransactionStatus},
    repository::Repository,
    services::{circulation::CirculationEngine, requests::RequestsService},
};

async fn pool() -> Pool<Postgres> {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for these tests");
    PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database")
}

fn engine(repository: Repository) -> CirculationEngine {
    CirculationEngine::new(
        repository,
        CirculationConfig {
            loan_period_days: 14,
            fine_per_day: dec!(0.5),
        },
    )
}

/// Engine with a zero-day loan period, so any return is at least one day late
fn strict_engine(repository: Repository) -> CirculationEngine {
    CirculationEngine::new(
        repository,
        CirculationConfig {
            loan_period_days: 0,
            fine_per_day: dec!(0.5),
        },
    )
}

fn unique() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos()
}

async fn seed_member(pool: &Pool<Postgres>) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO users (email, first_name, last_name, role)
         VALUES ($1, 'Test', 'Member', 'MEMBER') RETURNING id",
    )
    .bind(format!("member-{}@example.test", unique()))
    .fetch_one(pool)
    .await
    .expect("Failed to seed member")
}

async fn seed_book(pool: &Pool<Postgres>) -> i32 {
    sqlx::query_scalar("INSERT INTO books (title, author) VALUES ('Test Book', 'Test Author') RETURNING id")
        .fetch_one(pool)
        .await
        .expect("Failed to seed book")
}

async fn seed_copy(pool: &Pool<Postgres>, book_id: i32, status: CopyStatus) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO book_copies (book_id, barcode, status) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(book_id)
    .bind(format!("BC-{}", unique()))
    .bind(status)
    .fetch_one(pool)
    .await
    .expect("Failed to seed copy")
}

async fn copy_status(pool: &Pool<Postgres>, copy_id: i32) -> CopyStatus {
    sqlx::query_scalar("SELECT status FROM book_copies WHERE id = $1")
        .bind(copy_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read copy status")
}

async fn active_transaction_count(pool: &Pool<Postgres>, copy_id: i32) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM transactions WHERE copy_id = $1 AND status = 'ACTIVE'",
    )
    .bind(copy_id)
    .fetch_one(pool)
    .await
    .expect("Failed to count transactions")
}

#[tokio::test]
#[ignore]
async fn checkout_then_return_round_trip() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository);

    let user_id = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Available).await;

    let txn = engine.checkout(user_id, copy_id).await.expect("checkout failed");
    assert_eq!(txn.status, TransactionStatus::Active);
    assert_eq!(txn.user_id, user_id);
    assert_eq!(txn.copy_id, copy_id);
    assert_eq!((txn.due_date - txn.checkout_date).num_days(), 14);
    assert_eq!(copy_status(&pool, copy_id).await, CopyStatus::CheckedOut);

    let outcome = engine.return_copy(copy_id).await.expect("return failed");
    assert!(outcome.fine.is_none(), "on-time return must not create a fine");
    assert_eq!(outcome.transaction.id, txn.id);
    assert_eq!(outcome.transaction.status, TransactionStatus::Returned);
    assert!(outcome.transaction.return_date.is_some());
    assert_eq!(copy_status(&pool, copy_id).await, CopyStatus::Available);
}

#[tokio::test]
#[ignore]
async fn late_return_creates_fine() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = strict_engine(repository);

    let user_id = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Available).await;

    engine.checkout(user_id, copy_id).await.expect("checkout failed");
    // Due date equals the checkout instant, so this return is already late.
    let outcome = engine.return_copy(copy_id).await.expect("return failed");

    let fine = outcome.fine.expect("late return must create a fine");
    assert_eq!(fine.amount, dec!(0.5));
    assert_eq!(fine.user_id, user_id);
    assert!(!fine.paid);
}

#[tokio::test]
#[ignore]
async fn checkout_of_damaged_copy_fails_without_mutation() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository);

    let user_id = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Damaged).await;

    let err = engine.checkout(user_id, copy_id).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)), "got {:?}", err);

    assert_eq!(copy_status(&pool, copy_id).await, CopyStatus::Damaged);
    assert_eq!(active_transaction_count(&pool, copy_id).await, 0);
}

#[tokio::test]
#[ignore]
async fn checkout_of_missing_copy_fails_not_found() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository);

    let user_id = seed_member(&pool).await;

    let err = engine.checkout(user_id, i32::MAX).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
#[ignore]
async fn return_without_active_checkout_fails_not_found() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository);

    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Available).await;

    let err = engine.return_copy(copy_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);

    let fines: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM fines f JOIN transactions t ON f.transaction_id = t.id
         WHERE t.copy_id = $1",
    )
    .bind(copy_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(fines, 0);
}

#[tokio::test]
#[ignore]
async fn concurrent_checkouts_of_one_copy_yield_one_winner() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository);

    let user_a = seed_member(&pool).await;
    let user_b = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Available).await;

    let (a, b) = tokio::join!(
        engine.checkout(user_a, copy_id),
        engine.checkout(user_b, copy_id)
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one checkout must win: {:?} / {:?}", a, b);

    let loser = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
    assert!(matches!(loser, AppError::InvalidState(_)), "got {:?}", loser);

    assert_eq!(active_transaction_count(&pool, copy_id).await, 1);
    assert_eq!(copy_status(&pool, copy_id).await, CopyStatus::CheckedOut);
}

#[tokio::test]
#[ignore]
async fn approval_race_for_last_copy_yields_one_approval() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let user_a = seed_member(&pool).await;
    let user_b = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_id = seed_copy(&pool, book_id, CopyStatus::Available).await;

    let request_a = requests.create_request(user_a, book_id).await.unwrap();
    let request_b = requests.create_request(user_b, book_id).await.unwrap();

    let (a, b) = tokio::join!(
        requests.decide_request(request_a.id, RequestDecision::Approved),
        requests.decide_request(request_b.id, RequestDecision::Approved)
    );

    let successes = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(successes, 1, "exactly one approval must win");

    let (winner, loser_id) = if a.is_ok() {
        (a.unwrap(), request_b.id)
    } else {
        (b.unwrap(), request_a.id)
    };

    assert_eq!(winner.request.status, RequestStatus::Approved);
    assert_eq!(winner.request.copy_id, Some(copy_id));
    let txn = winner.transaction.expect("approval must create a transaction");
    assert_eq!(txn.copy_id, copy_id);

    // The loser saw inventory exhaustion and its request stayed pending.
    let loser_status: RequestStatus =
        sqlx::query_scalar("SELECT status FROM book_requests WHERE id = $1")
            .bind(loser_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(loser_status, RequestStatus::Pending);

    assert_eq!(active_transaction_count(&pool, copy_id).await, 1);
}

#[tokio::test]
#[ignore]
async fn concurrent_approvals_with_enough_copies_both_succeed() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let user_a = seed_member(&pool).await;
    let user_b = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    let copy_a = seed_copy(&pool, book_id, CopyStatus::Available).await;
    let copy_b = seed_copy(&pool, book_id, CopyStatus::Available).await;

    let request_a = requests.create_request(user_a, book_id).await.unwrap();
    let request_b = requests.create_request(user_b, book_id).await.unwrap();

    let (a, b) = tokio::join!(
        requests.decide_request(request_a.id, RequestDecision::Approved),
        requests.decide_request(request_b.id, RequestDecision::Approved)
    );

    // With two copies free, contention must not starve either approval.
    let a = a.expect("first approval failed");
    let b = b.expect("second approval failed");
    assert_eq!(a.request.status, RequestStatus::Approved);
    assert_eq!(b.request.status, RequestStatus::Approved);

    let claimed_a = a.request.copy_id.expect("approval must bind a copy");
    let claimed_b = b.request.copy_id.expect("approval must bind a copy");
    assert_ne!(claimed_a, claimed_b, "approvals must claim distinct copies");
    for claimed in [claimed_a, claimed_b] {
        assert!(claimed == copy_a || claimed == copy_b);
        assert_eq!(copy_status(&pool, claimed).await, CopyStatus::CheckedOut);
        assert_eq!(active_transaction_count(&pool, claimed).await, 1);
    }
}

#[tokio::test]
#[ignore]
async fn request_queue_search_filters_by_title() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let user_id = seed_member(&pool).await;
    let title = format!("Searchable Title {}", unique());
    let book_id: i32 = sqlx::query_scalar(
        "INSERT INTO books (title, author) VALUES ($1, 'Test Author') RETURNING id",
    )
    .bind(&title)
    .fetch_one(&pool)
    .await
    .unwrap();

    let request = requests.create_request(user_id, book_id).await.unwrap();

    // Case-insensitive substring match on the title finds the request.
    let hits = requests
        .list_requests(Some(&title.to_lowercase()))
        .await
        .unwrap();
    assert!(hits.iter().any(|r| r.id == request.id));
    assert!(hits.iter().all(|r| r.title == title));

    let misses = requests
        .list_requests(Some("no-request-matches-this"))
        .await
        .unwrap();
    assert!(misses.is_empty());

    // Blank search collapses to the unfiltered queue.
    let all = requests.list_requests(Some("   ")).await.unwrap();
    assert!(all.iter().any(|r| r.id == request.id));
}

#[tokio::test]
#[ignore]
async fn approving_when_no_copy_available_leaves_request_pending() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let user_id = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;
    // No copies registered for this book at all.

    let request = requests.create_request(user_id, book_id).await.unwrap();
    let err = requests
        .decide_request(request.id, RequestDecision::Approved)
        .await
        .unwrap_err();
    assert!(
        matches!(err, AppError::InsufficientAvailability(_)),
        "got {:?}",
        err
    );

    let status: RequestStatus =
        sqlx::query_scalar("SELECT status FROM book_requests WHERE id = $1")
            .bind(request.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(status, RequestStatus::Pending);
}

#[tokio::test]
#[ignore]
async fn resolved_requests_are_terminal() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let user_id = seed_member(&pool).await;
    let book_id = seed_book(&pool).await;

    let request = requests.create_request(user_id, book_id).await.unwrap();
    let outcome = requests
        .decide_request(request.id, RequestDecision::Denied)
        .await
        .unwrap();
    assert_eq!(outcome.request.status, RequestStatus::Denied);
    assert!(outcome.transaction.is_none());

    let err = requests
        .decide_request(request.id, RequestDecision::Approved)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState(_)), "got {:?}", err);
}

#[tokio::test]
#[ignore]
async fn deciding_a_missing_request_fails_not_found() {
    let pool = pool().await;
    let repository = Repository::new(pool.clone());
    let engine = engine(repository.clone());
    let requests = RequestsService::new(repository, engine);

    let err = requests
        .decide_request(i32::MAX, RequestDecision::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "got {:?}", err);
}
