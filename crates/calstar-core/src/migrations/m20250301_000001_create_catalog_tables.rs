use sea_orm_migration::prelude::*;

use super::foreign_key;
use crate::schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── departments ──
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Departments::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Departments::Description).text().not_null())
                    .to_owned(),
            )
            .await?;

        // ── professors ──
        manager
            .create_table(
                Table::create()
                    .table(Professors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Professors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Professors::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Professors::DepartmentId).integer().null())
                    .col(ColumnDef::new(Professors::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Professors::Bio).text().not_null())
                    .col(ColumnDef::new(Professors::WebsiteUrl).string_len(200).not_null())
                    .col(ColumnDef::new(Professors::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut foreign_key(&schema::PROFESSOR_DEPARTMENT))
                    .to_owned(),
            )
            .await?;

        // ── courses ──
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::DepartmentId).integer().not_null())
                    .col(ColumnDef::new(Courses::Code).string_len(20).not_null())
                    .col(ColumnDef::new(Courses::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Units).integer().null())
                    .col(ColumnDef::new(Courses::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut foreign_key(&schema::COURSE_DEPARTMENT))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_department_code_unique")
                    .table(Courses::Table)
                    .col(Courses::DepartmentId)
                    .col(Courses::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ── course_offerings ──
        manager
            .create_table(
                Table::create()
                    .table(CourseOfferings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseOfferings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseOfferings::CourseId).integer().not_null())
                    .col(ColumnDef::new(CourseOfferings::ProfessorId).integer().not_null())
                    .col(ColumnDef::new(CourseOfferings::Semester).string_len(20).not_null())
                    .col(ColumnDef::new(CourseOfferings::Year).integer().not_null())
                    .col(ColumnDef::new(CourseOfferings::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut foreign_key(&schema::OFFERING_COURSE))
                    .foreign_key(&mut foreign_key(&schema::OFFERING_PROFESSOR))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_offerings_term_unique")
                    .table(CourseOfferings::Table)
                    .col(CourseOfferings::CourseId)
                    .col(CourseOfferings::ProfessorId)
                    .col(CourseOfferings::Semester)
                    .col(CourseOfferings::Year)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_offerings_professor")
                    .table(CourseOfferings::Table)
                    .col(CourseOfferings::ProfessorId)
                    .to_owned(),
            )
            .await?;

        // ── tags ──
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tags::Name).string_len(50).not_null().unique_key())
                    .to_owned(),
            )
            .await?;

        // ── course_tags junction ──
        manager
            .create_table(
                Table::create()
                    .table(CourseTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseTags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseTags::CourseId).integer().not_null())
                    .col(ColumnDef::new(CourseTags::TagId).integer().not_null())
                    .foreign_key(&mut foreign_key(&schema::COURSE_TAG_COURSE))
                    .foreign_key(&mut foreign_key(&schema::COURSE_TAG_TAG))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_course_tags_unique")
                    .table(CourseTags::Table)
                    .col(CourseTags::CourseId)
                    .col(CourseTags::TagId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CourseTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseOfferings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Professors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Departments {
    Table,
    Id,
    Name,
    Code,
    Description,
}

#[derive(DeriveIden)]
enum Professors {
    Table,
    Id,
    FullName,
    DepartmentId,
    Email,
    Bio,
    WebsiteUrl,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    DepartmentId,
    Code,
    Title,
    Description,
    Units,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CourseOfferings {
    Table,
    Id,
    CourseId,
    ProfessorId,
    Semester,
    Year,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum CourseTags {
    Table,
    Id,
    CourseId,
    TagId,
}
