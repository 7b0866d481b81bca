use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// One professor teaching one course in one term.
///
/// `(course_id, professor_id, semester, year)` is unique. `semester` is free
/// text ("Fall", "Spring", "Summer" by convention).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course_offerings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub course_id: i32,

    pub professor_id: i32,

    pub semester: String,

    pub year: i32,

    pub created_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::professor::Entity",
        from = "Column::ProfessorId",
        to = "super::professor::Column::Id",
        on_delete = "Cascade"
    )]
    Professor,
    #[sea_orm(has_many = "super::resource::Entity")]
    Resources,
    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::professor::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<super::resource::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resources.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(Utc::now().naive_utc());
        }
        Ok(self)
    }
}

impl Model {
    /// `"COMPSCI 61A - Fall 2024 - Prof. John DeNero"`.
    pub fn describe(
        &self,
        course: &super::course::Model,
        department: &super::department::Model,
        professor: &super::professor::Model,
    ) -> String {
        format!(
            "{} {} - {} {} - Prof. {}",
            department.code, course.code, self.semester, self.year, professor.full_name
        )
    }
}
