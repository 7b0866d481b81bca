mod common;

use calstar_core::ConstraintKind;
use calstar_core::repo::departments::{self, DepartmentFilter};
use calstar_core::repo::offerings;
use calstar_core::testing::test_db;

use common::*;

#[tokio::test]
async fn test_concurrent_creates_of_one_department_code_admit_exactly_one() {
    let db = test_db().await;

    let (a, b) = tokio::join!(
        departments::create(&db, new_department("CS61A")),
        departments::create(&db, new_department("CS61A")),
    );

    let results = [a, b];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let failure = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert_eq!(failure.constraint_kind(), Some(ConstraintKind::Unique));

    let stored = departments::list(&db, DepartmentFilter::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_spawned_offering_creates_for_one_term_admit_exactly_one() {
    let db = test_db().await;
    let c = catalog(&db).await;

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = db.clone();
            let new = new_offering(c.course.id, c.professor.id, "Spring", 2025);
            tokio::spawn(async move { offerings::create(&db, new).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(e) => assert_eq!(e.constraint_kind(), Some(ConstraintKind::Unique)),
        }
    }
    assert_eq!(successes, 1);
}

#[tokio::test]
async fn test_concurrent_deletes_of_one_department_succeed_once() {
    let db = test_db().await;
    let c = catalog(&db).await;

    let (a, b) = tokio::join!(
        departments::delete(&db, c.department.id),
        departments::delete(&db, c.department.id),
    );

    let oks = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
    assert_eq!(oks, 1);
    assert!(a.err().or(b.err()).unwrap().is_not_found());
}
