use sea_orm_migration::prelude::*;

use super::foreign_key;
use crate::schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ── resources ──
        manager
            .create_table(
                Table::create()
                    .table(Resources::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Resources::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Resources::CourseOfferingId).integer().not_null())
                    .col(ColumnDef::new(Resources::UserId).integer().not_null())
                    .col(ColumnDef::new(Resources::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Resources::Description).text().not_null())
                    .col(ColumnDef::new(Resources::ResourceType).string_len(50).not_null())
                    .col(ColumnDef::new(Resources::FilePath).string_len(255).not_null())
                    .col(ColumnDef::new(Resources::FileSize).big_integer().null())
                    .col(ColumnDef::new(Resources::FileType).string_len(50).not_null())
                    .col(
                        ColumnDef::new(Resources::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Resources::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Resources::UpdatedAt).timestamp().not_null())
                    .foreign_key(&mut foreign_key(&schema::RESOURCE_OFFERING))
                    .foreign_key(&mut foreign_key(&schema::RESOURCE_USER))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_resources_course_offering")
                    .table(Resources::Table)
                    .col(Resources::CourseOfferingId)
                    .to_owned(),
            )
            .await?;

        // ── reviews ──
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::CourseOfferingId).integer().not_null())
                    .col(ColumnDef::new(Reviews::ProfessorId).integer().not_null())
                    .col(ColumnDef::new(Reviews::OverallRating).integer().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).timestamp().not_null())
                    .foreign_key(&mut foreign_key(&schema::REVIEW_OFFERING))
                    .foreign_key(&mut foreign_key(&schema::REVIEW_PROFESSOR))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_professor")
                    .table(Reviews::Table)
                    .col(Reviews::ProfessorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_course_offering")
                    .table(Reviews::Table)
                    .col(Reviews::CourseOfferingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Resources::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Resources {
    Table,
    Id,
    CourseOfferingId,
    UserId,
    Title,
    Description,
    ResourceType,
    FilePath,
    FileSize,
    FileType,
    Approved,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    CourseOfferingId,
    ProfessorId,
    OverallRating,
    Comment,
    CreatedAt,
}
