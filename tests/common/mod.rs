//! Shared test infrastructure for database-backed tests.
//!
//! Tests connect to `TEST_DATABASE_URL` (or `DATABASE_URL`). Each call to
//! `setup_test_db()` gets its own freshly migrated Postgres schema, so tests
//! can run in parallel. When no URL is configured the database tests are
//! skipped.

#![allow(dead_code)]

use chrono::NaiveDate;
use rand::Rng;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use rollbook::db::MIGRATOR;
use rollbook::models::attendance::{self, RollEntry};
use rollbook::models::member::{self, NewMember};

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASS: &str = "admin123";

pub struct TestDb {
    pool: PgPool,
    schema: String,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drop the schema created for this test.
    pub async fn teardown(self) {
        let sql = format!("DROP SCHEMA IF EXISTS {} CASCADE", self.schema);
        let _ = self.pool.execute(sql.as_str()).await;
        self.pool.close().await;
    }
}

fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Migrated database in a private schema, or `None` when no database is configured.
pub async fn setup_test_db() -> Option<TestDb> {
    let Some(url) = database_url() else {
        eprintln!("TEST_DATABASE_URL not set, skipping database test");
        return None;
    };

    let suffix: u64 = rand::rng().random();
    let schema = format!("rollbook_test_{suffix:016x}");

    let admin = PgPoolOptions::new()
        .max_connections(1)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    admin
        .execute(format!("CREATE SCHEMA {schema}").as_str())
        .await
        .expect("Failed to create test schema");
    admin.close().await;

    let search_path = format!("SET search_path TO {schema}");
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .after_connect(move |conn, _meta| {
            let sql = search_path.clone();
            Box::pin(async move {
                conn.execute(sql.as_str()).await?;
                Ok(())
            })
        })
        .connect(&url)
        .await
        .expect("Failed to open test pool");

    MIGRATOR.run(&pool).await.expect("Failed to run migrations");

    Some(TestDb { pool, schema })
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A member with only a first name; tests fill in what they need.
pub fn new_member(first_name: &str) -> NewMember {
    NewMember {
        first_name: first_name.to_string(),
        last_name: "Test".to_string(),
        gender: None,
        birth_month: None,
        birth_year: None,
        ethnicity: None,
        sexual_orientation: None,
        employment_status: None,
        postcode: None,
        address: String::new(),
        email: String::new(),
        phone: String::new(),
    }
}

pub async fn insert_member(pool: &PgPool, new: &NewMember) -> i64 {
    member::create(pool, new).await.expect("Failed to insert member")
}

pub async fn mark(pool: &PgPool, member_id: i64, date: NaiveDate, present: bool) {
    attendance::record_roll_call(pool, date, &[RollEntry { member_id, present }])
        .await
        .expect("Failed to record attendance");
}
