mod common;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use calstar_core::repo::reviews::{self, NewReview};
use calstar_core::testing::test_app;
use serde_json::Value;
use tower::ServiceExt;

use common::*;

async fn get(app: &calstar_core::App, uri: &str) -> (StatusCode, Value) {
    let response = app
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_welcome_banner() {
    let app = test_app().await;
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["service"], "calstar");
    assert_eq!(body["data"]["status"], "running");
}

#[tokio::test]
async fn test_list_and_get_departments() {
    let app = test_app().await;
    department(&app.db, "MATH").await;
    let cs = department(&app.db, "COMPSCI").await;

    let (status, body) = get(&app, "/api/departments").await;
    assert_eq!(status, StatusCode::OK);
    let codes: Vec<_> = body["data"].as_array().unwrap().iter().map(|d| d["code"].clone()).collect();
    assert_eq!(codes, ["COMPSCI", "MATH"]);

    let (status, body) = get(&app, &format!("/api/departments/{}", cs.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["code"], "COMPSCI");
}

#[tokio::test]
async fn test_missing_department_is_404_with_error_body() {
    let app = test_app().await;
    let (status, body) = get(&app, "/api/departments/99").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_professor_detail_includes_average_rating() {
    let app = test_app().await;
    let c = catalog(&app.db).await;
    for rating in [3, 4] {
        reviews::create(
            &app.db,
            NewReview {
                course_offering_id: c.offering.id,
                overall_rating: rating,
                comment: String::new(),
            },
        )
        .await
        .unwrap();
    }

    let (status, body) = get(&app, &format!("/api/professors/{}", c.professor.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["full_name"], "John DeNero");
    assert_eq!(body["data"]["average_rating"], 3.5);

    let (_, body) = get(&app, &format!("/api/professors?department_id={}", c.department.id)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_course_endpoints() {
    let app = test_app().await;
    let c = catalog(&app.db).await;
    let math = department(&app.db, "MATH").await;
    course(&app.db, math.id, "1A").await;

    let (status, body) = get(&app, &format!("/api/courses/{}", c.course.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["display"], "COMPSCI 61A: Course 61A");
    assert_eq!(body["data"]["average_rating"], 0.0);

    let (_, body) = get(&app, "/api/courses").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    let (_, body) = get(&app, &format!("/api/courses?department_id={}", math.id)).await;
    assert_eq!(body["data"][0]["code"], "1A");

    let (status, body) = get(&app, &format!("/api/courses/{}/offerings", c.course.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["display"], "COMPSCI 61A - Fall 2024 - Prof. John DeNero");
    assert_eq!(body["data"][0]["semester"], "Fall");

    let (status, _) = get(&app, "/api/courses/404/offerings").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_offering_resources() {
    let app = test_app().await;
    let c = catalog(&app.db).await;
    let u = user(&app.db, "oski").await;
    let r = resource(&app.db, c.offering.id, u.id, "Final").await;

    let (status, body) = get(&app, &format!("/api/offerings/{}/resources", c.offering.id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["id"], r.id);
    assert_eq!(body["data"][0]["resource_type"], "past_exams");

    let (_, body) = get(
        &app,
        &format!("/api/offerings/{}/resources?approved=true", c.offering.id),
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = get(&app, "/api/offerings/404/resources").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_department_list_is_paginated() {
    let app = test_app().await;
    for i in 0..105 {
        department(&app.db, &format!("D{i:03}")).await;
    }

    let (status, body) = get(&app, "/api/departments").await;
    assert_eq!(status, StatusCode::OK);
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 20);
    assert_eq!(page[0]["code"], "D000");
    assert_eq!(page[19]["code"], "D019");

    let (_, body) = get(&app, "/api/departments?limit=5&offset=20").await;
    let codes: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(codes, ["D020", "D021", "D022", "D023", "D024"]);

    let (_, body) = get(&app, "/api/departments?limit=500").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 100);

    let (_, body) = get(&app, "/api/departments?offset=100").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_filtered_course_list_is_paginated() {
    let app = test_app().await;
    let cs = department(&app.db, "COMPSCI").await;
    let math = department(&app.db, "MATH").await;
    for i in 0..25 {
        course(&app.db, cs.id, &format!("{}", 100 + i)).await;
    }
    course(&app.db, math.id, "1A").await;

    let uri = format!("/api/courses?department_id={}", cs.id);
    let (_, body) = get(&app, &uri).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 20);

    let uri = format!("/api/courses?department_id={}&offset=20&limit=10", cs.id);
    let (_, body) = get(&app, &uri).await;
    let page = body["data"].as_array().unwrap();
    assert_eq!(page.len(), 5);
    assert!(page.iter().all(|c| c["department_id"] == cs.id));
}
