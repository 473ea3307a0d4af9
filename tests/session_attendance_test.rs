//! Session scheduling and roll-call tests. Skipped without `TEST_DATABASE_URL`.

mod common;

use rollbook::errors::is_unique_violation;
use rollbook::models::attendance::{self, RollEntry};
use rollbook::models::session::{self, SessionStatus};
use rollbook::report::ReportPeriod;
use common::*;

#[tokio::test]
async fn test_schedule_is_unique_per_date() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let id = session::schedule(pool, day(2025, 6, 14), "Summer fair").await.unwrap();
    let created = session::find_by_id(pool, id).await.unwrap().unwrap();
    assert_eq!(created.status(), Some(SessionStatus::Scheduled));
    assert_eq!(created.notes, "Summer fair");

    let err = session::schedule(pool, day(2025, 6, 14), "").await.unwrap_err();
    assert!(is_unique_violation(&err));

    db.teardown().await;
}

#[tokio::test]
async fn test_held_and_cancelled_transitions() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let a = session::schedule(pool, day(2025, 6, 7), "").await.unwrap();
    let b = session::schedule(pool, day(2025, 6, 21), "").await.unwrap();

    assert!(session::mark_held(pool, a).await.unwrap());
    assert!(session::cancel(pool, b, "Hall flooded", "admin").await.unwrap());
    assert!(!session::mark_held(pool, b).await.unwrap());

    let cancelled = session::find_by_id(pool, b).await.unwrap().unwrap();
    assert_eq!(cancelled.status(), Some(SessionStatus::Cancelled));
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("Hall flooded"));
    assert_eq!(cancelled.cancelled_by.as_deref(), Some("admin"));
    assert!(cancelled.cancelled_at.is_some());

    assert!(!session::cancel(pool, 9999, "n/a", "admin").await.unwrap());

    db.teardown().await;
}

#[tokio::test]
async fn test_month_and_cancellation_listings() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let may = session::schedule(pool, day(2025, 5, 31), "").await.unwrap();
    session::schedule(pool, day(2025, 6, 1), "").await.unwrap();
    let late_june = session::schedule(pool, day(2025, 6, 30), "").await.unwrap();
    let next_year = session::schedule(pool, day(2026, 1, 3), "").await.unwrap();

    let june = ReportPeriod::new(6, 2025).unwrap();
    let dates: Vec<_> = session::find_for_month(pool, &june)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.date)
        .collect();
    assert_eq!(dates, vec![day(2025, 6, 1), day(2025, 6, 30)]);

    session::cancel(pool, late_june, "Storm", "admin").await.unwrap();
    session::cancel(pool, may, "Illness", "admin").await.unwrap();
    session::cancel(pool, next_year, "Holiday", "admin").await.unwrap();

    let cancelled: Vec<_> = session::find_cancellations(pool, 2025)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.date)
        .collect();
    assert_eq!(cancelled, vec![day(2025, 5, 31), day(2025, 6, 30)]);

    db.teardown().await;
}

#[tokio::test]
async fn test_roll_call_upserts_and_marks_session_held() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let date = day(2025, 6, 14);
    let session_id = session::schedule(pool, date, "").await.unwrap();
    let ann = insert_member(pool, &new_member("Ann")).await;
    let ben = insert_member(pool, &new_member("Ben")).await;

    let result = attendance::record_roll_call(
        pool,
        date,
        &[
            RollEntry { member_id: ann, present: true },
            RollEntry { member_id: ben, present: false },
        ],
    )
    .await
    .unwrap();
    assert_eq!((result.recorded, result.present), (2, 1));
    assert!(result.session_marked_held);

    let held = session::find_by_id(pool, session_id).await.unwrap().unwrap();
    assert_eq!(held.status(), Some(SessionStatus::Held));

    // Second call overwrites Ben's mark instead of adding a row.
    let again = attendance::record_roll_call(
        pool,
        date,
        &[RollEntry { member_id: ben, present: true }],
    )
    .await
    .unwrap();
    assert!(!again.session_marked_held);

    let roll = attendance::find_for_date(pool, date).await.unwrap();
    assert_eq!(roll.len(), 2);
    assert!(roll.iter().all(|r| r.present));

    db.teardown().await;
}

#[tokio::test]
async fn test_roll_call_is_all_or_nothing() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let date = day(2025, 6, 14);
    let ann = insert_member(pool, &new_member("Ann")).await;

    let err = attendance::record_roll_call(
        pool,
        date,
        &[
            RollEntry { member_id: ann, present: true },
            RollEntry { member_id: ann + 1000, present: true },
        ],
    )
    .await
    .unwrap_err();
    assert!(rollbook::errors::is_foreign_key_violation(&err));
    assert!(attendance::find_for_date(pool, date).await.unwrap().is_empty());

    db.teardown().await;
}
