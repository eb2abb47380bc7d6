use crate::entities::complaints;
use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEX_NAME: &str = "idx_complaints_email";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // "My complaints" filters on the snapshot email.
        manager
            .create_index(
                Index::create()
                    .name(INDEX_NAME)
                    .table(Complaints)
                    .col(complaints::Column::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEX_NAME).table(Complaints).to_owned())
            .await
    }
}
