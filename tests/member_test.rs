//! Member registry tests: create, read, update, delete, search, conditions.
//!
//! Validation is checked without a database; everything else needs
//! `TEST_DATABASE_URL` and is skipped otherwise.

mod common;

use rollbook::models::member::{self, MemberRequest};
use common::*;

fn request(first_name: &str) -> MemberRequest {
    MemberRequest {
        first_name: first_name.to_string(),
        last_name: "Okafor".to_string(),
        ..Default::default()
    }
}

// ────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────

#[test]
fn test_validate_rejects_bad_fields() {
    let req = MemberRequest {
        first_name: "  ".to_string(),
        gender: Some("Robot".to_string()),
        birth_month: Some(13),
        birth_year: Some(2031),
        email: "not-an-email".to_string(),
        ..Default::default()
    };
    let errors = req.validate(2025);
    assert_eq!(errors.len(), 5, "{errors:?}");
    assert!(errors.iter().any(|e| e.starts_with("First name")));
    assert!(errors.iter().any(|e| e.starts_with("Gender")));
    assert!(errors.iter().any(|e| e.starts_with("Birth month")));
    assert!(errors.iter().any(|e| e.starts_with("Birth year")));
    assert!(errors.iter().any(|e| e.starts_with("Email")));
}

#[test]
fn test_postcode_taken_from_address_when_blank() {
    let req = MemberRequest {
        address: "4 Mill Lane, Walsall ws4 1ab".to_string(),
        ..request("Ada")
    };
    assert!(req.validate(2025).is_empty());
    let new = req.into_new_member();
    assert_eq!(new.postcode.as_deref(), Some("WS4 1AB"));

    let req = MemberRequest {
        postcode: Some("b742qq".to_string()),
        address: "4 Mill Lane, Walsall WS4 1AB".to_string(),
        ..request("Ada")
    };
    assert_eq!(req.into_new_member().postcode.as_deref(), Some("B74 2QQ"));
}

// ────────────────────────────────────────────────────────────────────
// CRUD
// ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_read_update_delete() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let mut new = new_member("Grace");
    new.gender = Some("Female".to_string());
    new.birth_month = Some(3);
    new.birth_year = Some(1990);
    let id = insert_member(pool, &new).await;

    let found = member::find_by_id(pool, id).await.unwrap().expect("member exists");
    assert_eq!(found.first_name, "Grace");
    assert_eq!(found.gender.as_deref(), Some("Female"));
    assert_eq!(found.birth_month, Some(3));

    new.first_name = "Grace Ann".to_string();
    new.postcode = Some("WS4 1AB".to_string());
    assert!(member::update(pool, id, &new).await.unwrap());
    let found = member::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(found.first_name, "Grace Ann");
    assert_eq!(found.postcode.as_deref(), Some("WS4 1AB"));
    assert!(found.updated_at >= found.created_at);

    assert!(member::delete(pool, id).await.unwrap());
    assert!(member::find_by_id(pool, id).await.unwrap().is_none());
    assert!(!member::delete(pool, id).await.unwrap());
    assert!(!member::update(pool, id, &new).await.unwrap());

    db.teardown().await;
}

#[tokio::test]
async fn test_search_and_pagination() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    for name in ["Alice", "Bob", "Carla", "Alina", "Dmitri"] {
        insert_member(pool, &new_member(name)).await;
    }

    let page = member::find_paginated(pool, Some("ali"), 1, 25).await.unwrap();
    assert_eq!(page.total, 2);
    let names: Vec<&str> = page.items.iter().map(|m| m.first_name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Alina"]);

    let first = member::find_paginated(pool, None, 1, 2).await.unwrap();
    let third = member::find_paginated(pool, None, 3, 2).await.unwrap();
    assert_eq!(first.total, 5);
    assert_eq!(first.items.len(), 2);
    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].first_name, "Dmitri");

    // Blank search is the same as no search.
    let blank = member::find_paginated(pool, Some("   "), 1, 25).await.unwrap();
    assert_eq!(blank.total, 5);

    db.teardown().await;
}

// ────────────────────────────────────────────────────────────────────
// Conditions
// ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_conditions_are_idempotent_and_removable() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let id = insert_member(pool, &new_member("Hassan")).await;
    let adhd = member::add_condition(pool, id, "ADHD").await.unwrap();
    let again = member::add_condition(pool, id, " ADHD ").await.unwrap();
    assert_eq!(adhd, again);
    member::add_condition(pool, id, "Autism Spectrum Disorder").await.unwrap();

    let tags: Vec<String> = member::find_conditions(pool, id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.condition)
        .collect();
    assert_eq!(tags, vec!["ADHD", "Autism Spectrum Disorder"]);

    let page = member::find_paginated(pool, Some("Hassan"), 1, 25).await.unwrap();
    assert_eq!(page.items[0].condition_count, 2);

    assert!(member::remove_condition(pool, id, adhd).await.unwrap());
    assert!(!member::remove_condition(pool, id, adhd).await.unwrap());
    assert_eq!(member::find_conditions(pool, id).await.unwrap().len(), 1);

    // Deleting the member removes the remaining tags.
    member::delete(pool, id).await.unwrap();
    let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM medical_conditions")
        .fetch_one(pool)
        .await
        .unwrap();
    assert_eq!(left, 0);

    db.teardown().await;
}
