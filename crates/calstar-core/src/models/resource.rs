use chrono::{NaiveDateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

/// Kind of uploaded course material.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    #[sea_orm(string_value = "syllabus")]
    Syllabus,
    #[sea_orm(string_value = "textbook")]
    Textbook,
    #[sea_orm(string_value = "study_guides")]
    StudyGuides,
    #[sea_orm(string_value = "lecture_notes")]
    LectureNotes,
    #[sea_orm(string_value = "past_exams")]
    PastExams,
    #[sea_orm(string_value = "other")]
    Other,
}

impl ResourceType {
    /// Stored value, e.g. `"study_guides"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Syllabus => "syllabus",
            ResourceType::Textbook => "textbook",
            ResourceType::StudyGuides => "study_guides",
            ResourceType::LectureNotes => "lecture_notes",
            ResourceType::PastExams => "past_exams",
            ResourceType::Other => "other",
        }
    }

    /// Human-readable label, e.g. `"Study Guides"`.
    pub fn label(&self) -> &'static str {
        match self {
            ResourceType::Syllabus => "Syllabus",
            ResourceType::Textbook => "Textbook",
            ResourceType::StudyGuides => "Study Guides",
            ResourceType::LectureNotes => "Lecture Notes",
            ResourceType::PastExams => "Past Exams",
            ResourceType::Other => "Other",
        }
    }
}

/// Uploaded material attached to a course offering.
///
/// `file_path` is an opaque locator into external storage; the bytes never
/// pass through this crate.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resources")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub course_offering_id: i32,

    /// Uploader
    pub user_id: i32,

    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub resource_type: ResourceType,

    pub file_path: String,

    /// Size in bytes, when known
    pub file_size: Option<i64>,

    /// MIME type or extension, may be empty
    pub file_type: String,

    #[sea_orm(default_value = false)]
    pub approved: bool,

    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course_offering::Entity",
        from = "Column::CourseOfferingId",
        to = "super::course_offering::Column::Id",
        on_delete = "Cascade"
    )]
    CourseOffering,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::course_offering::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseOffering.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// `updated_at` is refreshed on every save.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now().naive_utc();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}

impl Model {
    /// `"Midterm 1 (Past Exams) for COMPSCI 61A - Fall 2024 - Prof. John DeNero"`.
    pub fn describe(&self, offering: &str) -> String {
        format!(
            "{} ({}) for {}",
            self.title,
            self.resource_type.label(),
            offering
        )
    }
}
