//! Concurrent writers on a SQLite file with a multi-connection pool, where
//! each task really does hold its own connection.

mod common;

use std::path::PathBuf;

use calstar_core::ConstraintKind;
use calstar_core::repo::departments::{self, DepartmentFilter};
use calstar_core::repo::professors::{self, ProfessorChanges};
use calstar_core::repo::resources;
use calstar_core::repo::reviews::{self, NewReview, ReviewFilter};
use calstar_core::repo::users::{self, ProfileChanges};
use calstar_core::repo::{courses, offerings, tags};
use calstar_core::repo::offerings::OfferingChanges;
use calstar_core::testing::file_test_db;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

use common::*;

const WRITERS: usize = 16;

async fn file_db() -> (TempDir, DatabaseConnection) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("calstar.db");
    let db = file_test_db(&path).await;
    (dir, db)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_reviews_all_land() {
    let (_dir, db) = file_db().await;
    let c = catalog(&db).await;
    let offering_id = c.offering.id;

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let db = db.clone();
            let new = NewReview {
                course_offering_id: offering_id,
                overall_rating: (i % 5) as i32 + 1,
                comment: format!("review {i}"),
            };
            tokio::spawn(async move { reviews::create(&db, new).await })
        })
        .collect();

    for handle in handles {
        let review = handle.await.unwrap().unwrap();
        assert_eq!(review.professor_id, c.professor.id);
    }
    let stored = reviews::list(&db, ReviewFilter::default()).await.unwrap();
    assert_eq!(stored.len(), WRITERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_updates_of_one_professor_all_succeed() {
    let (_dir, db) = file_db().await;
    let c = catalog(&db).await;
    let professor_id = c.professor.id;

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let db = db.clone();
            let changes = ProfessorChanges {
                bio: Some(format!("bio {i}")),
                ..Default::default()
            };
            tokio::spawn(async move { professors::update(&db, professor_id, changes).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let stored = professors::get(&db, c.professor.id).await.unwrap();
    assert!(stored.bio.starts_with("bio "));
    assert_eq!(stored.full_name, "John DeNero");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawned_creates_of_one_department_code_admit_exactly_one() {
    let (_dir, db) = file_db().await;

    let handles: Vec<_> = (0..WRITERS)
        .map(|_| {
            let db = db.clone();
            tokio::spawn(async move { departments::create(&db, new_department("EECS")).await })
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
    let stored = departments::list(&db, DepartmentFilter::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_mixed_updates_on_separate_rows_all_succeed() {
    let (_dir, db) = file_db().await;
    let c = catalog(&db).await;
    let student = user(&db, "oski").await;
    let notes = resource(&db, c.offering.id, student.id, "Midterm 1").await;
    let tag = tags::create(&db, "lower-div").await.unwrap();
    let (student_id, notes_id, tag_id) = (student.id, notes.id, tag.id);

    let mut handles = Vec::new();
    for i in 0..4 {
        let db1 = db.clone();
        handles.push(tokio::spawn(async move {
            resources::set_approved(&db1, notes_id, i % 2 == 0).await.map(|_| ())
        }));
        let db2 = db.clone();
        handles.push(tokio::spawn(async move {
            let changes = ProfileChanges {
                major: Some(format!("Major {i}")),
                ..Default::default()
            };
            users::update_profile(&db2, student_id, changes).await.map(|_| ())
        }));
        let db3 = db.clone();
        handles.push(tokio::spawn(async move {
            tags::rename(&db3, tag_id, &format!("lower-div-{i}")).await.map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let stored = users::get(&db, student.id).await.unwrap();
    assert!(stored.major.starts_with("Major "));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reviews_follow_a_concurrent_professor_change() {
    let (_dir, db) = file_db().await;
    let c = catalog(&db).await;
    let hug = professor(&db, "Josh Hug", Some(c.department.id)).await;
    let (offering_id, hug_id) = (c.offering.id, hug.id);

    let mut handles = Vec::new();
    for i in 0..WRITERS {
        let db = db.clone();
        let new = NewReview {
            course_offering_id: offering_id,
            overall_rating: 4,
            comment: format!("review {i}"),
        };
        handles.push(tokio::spawn(async move { reviews::create(&db, new).await.map(|_| ()) }));
    }
    let reassign = {
        let db = db.clone();
        tokio::spawn(async move {
            let changes = OfferingChanges {
                professor_id: Some(hug_id),
                ..Default::default()
            };
            offerings::update(&db, offering_id, changes).await.map(|_| ())
        })
    };

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    reassign.await.unwrap().unwrap();

    let stored = reviews::list(&db, ReviewFilter::default()).await.unwrap();
    assert_eq!(stored.len(), WRITERS);
    assert!(stored.iter().all(|r| r.professor_id == hug.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_overlapping_deletes_end_in_ok_or_not_found() {
    let (_dir, db) = file_db().await;
    let c = catalog(&db).await;
    reviews::create(
        &db,
        NewReview {
            course_offering_id: c.offering.id,
            overall_rating: 5,
            comment: String::new(),
        },
    )
    .await
    .unwrap();
    let (department_id, course_id, offering_id) = (c.department.id, c.course.id, c.offering.id);

    let department = {
        let db = db.clone();
        tokio::spawn(async move { departments::delete(&db, department_id).await })
    };
    let course = {
        let db = db.clone();
        tokio::spawn(async move { courses::delete(&db, course_id).await })
    };
    let offering = {
        let db = db.clone();
        tokio::spawn(async move { offerings::delete(&db, offering_id).await })
    };

    department.await.unwrap().unwrap();
    for result in [course.await.unwrap(), offering.await.unwrap()] {
        if let Err(e) = result {
            assert!(e.is_not_found(), "unexpected error: {e}");
        }
    }

    assert!(courses::get(&db, c.course.id).await.unwrap_err().is_not_found());
    assert!(offerings::get(&db, c.offering.id).await.unwrap_err().is_not_found());
    let left = reviews::list(&db, ReviewFilter::default()).await.unwrap();
    assert!(left.is_empty());
    // Professors outlive their department.
    assert!(professors::get(&db, c.professor.id).await.unwrap().department_id.is_none());
}
