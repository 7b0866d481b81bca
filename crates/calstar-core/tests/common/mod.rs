//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use calstar_core::BaseIdentity;
use calstar_core::models::{ResourceType, course, course_offering, department, professor, resource, user};
use calstar_core::repo::courses::{self, NewCourse};
use calstar_core::repo::departments::{self, NewDepartment};
use calstar_core::repo::offerings::{self, NewOffering};
use calstar_core::repo::professors::{self, NewProfessor};
use calstar_core::repo::resources::{self, NewResource};
use calstar_core::repo::users::{self, StudentProfile};
use sea_orm::DatabaseConnection;

pub fn new_department(code: &str) -> NewDepartment {
    NewDepartment {
        name: format!("Department of {code}"),
        code: code.to_string(),
        description: String::new(),
    }
}

pub async fn department(db: &DatabaseConnection, code: &str) -> department::Model {
    departments::create(db, new_department(code))
        .await
        .expect("Failed to create department")
}

pub async fn professor(
    db: &DatabaseConnection,
    full_name: &str,
    department_id: Option<i32>,
) -> professor::Model {
    professors::create(
        db,
        NewProfessor {
            full_name: full_name.to_string(),
            department_id,
            ..Default::default()
        },
    )
    .await
    .expect("Failed to create professor")
}

pub fn new_course(department_id: i32, code: &str) -> NewCourse {
    NewCourse {
        department_id,
        code: code.to_string(),
        title: format!("Course {code}"),
        description: String::new(),
        units: Some(4),
    }
}

pub async fn course(db: &DatabaseConnection, department_id: i32, code: &str) -> course::Model {
    courses::create(db, new_course(department_id, code))
        .await
        .expect("Failed to create course")
}

pub fn new_offering(course_id: i32, professor_id: i32, semester: &str, year: i32) -> NewOffering {
    NewOffering {
        course_id,
        professor_id,
        semester: semester.to_string(),
        year,
    }
}

pub async fn offering(
    db: &DatabaseConnection,
    course_id: i32,
    professor_id: i32,
    semester: &str,
    year: i32,
) -> course_offering::Model {
    offerings::create(db, new_offering(course_id, professor_id, semester, year))
        .await
        .expect("Failed to create offering")
}

pub fn identity(handle: &str) -> BaseIdentity {
    BaseIdentity::new(handle, handle, format!("{handle}@berkeley.edu"))
}

pub async fn user(db: &DatabaseConnection, handle: &str) -> user::Model {
    users::create(db, &identity(handle), StudentProfile::default())
        .await
        .expect("Failed to create user")
}

pub async fn resource(
    db: &DatabaseConnection,
    course_offering_id: i32,
    user_id: i32,
    title: &str,
) -> resource::Model {
    resources::create(
        db,
        NewResource {
            course_offering_id,
            user_id,
            title: title.to_string(),
            description: String::new(),
            resource_type: ResourceType::PastExams,
            file_path: format!("resources/{title}.pdf"),
            file_size: Some(1024),
            file_type: "application/pdf".to_string(),
        },
    )
    .await
    .expect("Failed to create resource")
}

/// COMPSCI with 61A taught by DeNero in Fall 2024.
pub struct Catalog {
    pub department: department::Model,
    pub professor: professor::Model,
    pub course: course::Model,
    pub offering: course_offering::Model,
}

pub async fn catalog(db: &DatabaseConnection) -> Catalog {
    let department = department(db, "COMPSCI").await;
    let professor = professor(db, "John DeNero", Some(department.id)).await;
    let course = course(db, department.id, "61A").await;
    let offering = offering(db, course.id, professor.id, "Fall", 2024).await;
    Catalog {
        department,
        professor,
        course,
        offering,
    }
}
