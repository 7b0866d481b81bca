use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::error::CalstarError;
use crate::extractors::Pagination;
use crate::models::{course, course_offering, department, professor, resource};
use crate::ratings;
use crate::repo::courses::{self, CourseFilter};
use crate::repo::departments::{self, DepartmentFilter};
use crate::repo::offerings::{self, OfferingFilter};
use crate::repo::professors::{self, ProfessorFilter};
use crate::repo::resources::{self, ResourceFilter};
use crate::response::ApiResponse;

use super::AppState;

type ApiResult<T> = Result<ApiResponse<T>, CalstarError>;

// ── Query parameters ──

#[derive(Debug, Default, Deserialize)]
pub struct DepartmentQuery {
    pub department_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    pub approved: Option<bool>,
}

// ── Response types ──

#[derive(Debug, Serialize)]
pub struct ProfessorDetail {
    #[serde(flatten)]
    pub professor: professor::Model,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: course::Model,
    pub display: String,
    pub average_rating: f64,
}

#[derive(Debug, Serialize)]
pub struct OfferingSummary {
    #[serde(flatten)]
    pub offering: course_offering::Model,
    pub display: String,
}

// ── Handlers ──

pub async fn list_departments(
    State(state): State<AppState>,
    page: Pagination,
) -> ApiResult<Vec<department::Model>> {
    let filter = DepartmentFilter {
        page: Some(page),
        ..Default::default()
    };
    let departments = departments::list(&state.db, filter).await?;
    Ok(ApiResponse::success(departments))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<department::Model> {
    Ok(ApiResponse::success(departments::get(&state.db, id).await?))
}

pub async fn list_professors(
    State(state): State<AppState>,
    Query(query): Query<DepartmentQuery>,
    page: Pagination,
) -> ApiResult<Vec<professor::Model>> {
    let filter = ProfessorFilter {
        department_id: query.department_id,
        page: Some(page),
        ..Default::default()
    };
    Ok(ApiResponse::success(professors::list(&state.db, filter).await?))
}

pub async fn get_professor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<ProfessorDetail> {
    let professor = professors::get(&state.db, id).await?;
    let average_rating = ratings::professor_rating(&state.db, id).await?;
    Ok(ApiResponse::success(ProfessorDetail {
        professor,
        average_rating,
    }))
}

pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<DepartmentQuery>,
    page: Pagination,
) -> ApiResult<Vec<course::Model>> {
    let filter = CourseFilter {
        department_id: query.department_id,
        page: Some(page),
        ..Default::default()
    };
    Ok(ApiResponse::success(courses::list(&state.db, filter).await?))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<CourseDetail> {
    let (course, department) = courses::with_department(&state.db, id).await?;
    let average_rating = ratings::course_rating(&state.db, id).await?;
    Ok(ApiResponse::success(CourseDetail {
        display: course.describe(&department),
        course,
        average_rating,
    }))
}

pub async fn course_offerings(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    page: Pagination,
) -> ApiResult<Vec<OfferingSummary>> {
    let (course, department) = courses::with_department(&state.db, id).await?;
    let filter = OfferingFilter {
        page: Some(page),
        ..OfferingFilter::for_course(id)
    };
    let offerings = offerings::list(&state.db, filter).await?;

    let mut summaries = Vec::with_capacity(offerings.len());
    for offering in offerings {
        let professor = professors::get(&state.db, offering.professor_id).await?;
        summaries.push(OfferingSummary {
            display: offering.describe(&course, &department, &professor),
            offering,
        });
    }
    Ok(ApiResponse::success(summaries))
}

/// Resources for an offering, newest first, one page at a time.
pub async fn offering_resources(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<ResourceQuery>,
    page: Pagination,
) -> ApiResult<Vec<resource::Model>> {
    // Unknown offering is a 404 rather than an empty list.
    offerings::get(&state.db, id).await?;
    let filter = ResourceFilter {
        approved: query.approved,
        page: Some(page),
        ..ResourceFilter::for_offering(id)
    };
    Ok(ApiResponse::success(resources::list(&state.db, filter).await?))
}
